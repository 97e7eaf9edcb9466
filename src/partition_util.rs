use crate::{BalanceBounds, Hypergraph, Side};
use rand::rngs::StdRng;
use rand::Rng;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum InitialPartitioningMethod {
    /// Whole nets are assigned to alternating sides in net order, skipping any
    /// net that shares a cell with an earlier assigned net.
    #[default]
    LogicAffinity,
    /// Cells are assigned by the parity of their id.
    Modulo,
    /// Cells are assigned to random sides.
    Random,
}

impl Hypergraph {
    /// Seeds a two-way partition and brings all derived counters up to date.
    ///
    /// The seed is followed by a coarse repair that shifts cells from the
    /// larger side when no single move could be made within the balance
    /// bounds. The repair does not guarantee the result is balanced.
    pub fn partition_initial(&mut self, method: InitialPartitioningMethod, rng: &mut StdRng) {
        for c in self.cells.iter_mut() {
            c.side = Side::A;
            c.locked = false;
        }

        match method {
            InitialPartitioningMethod::LogicAffinity => self.assign_logic_affinity(),
            InitialPartitioningMethod::Modulo => {
                for (i, c) in self.cells.iter_mut().enumerate() {
                    c.side = if i % 2 == 0 { Side::A } else { Side::B };
                }
            }
            InitialPartitioningMethod::Random => {
                for c in self.cells.iter_mut() {
                    c.side = if rng.gen_bool(0.5) { Side::A } else { Side::B };
                }
            }
        }

        self.recount_side_sizes();
        self.repair_balance();
        self.refresh();
    }

    fn assign_logic_affinity(&mut self) {
        let Hypergraph { cells, nets, .. } = self;
        let mut side = Side::A;
        for net in nets.iter() {
            if net.cells.iter().any(|&c| cells[c as usize].locked) {
                continue;
            }
            for &c in net.cells.iter() {
                let cell = &mut cells[c as usize];
                cell.side = side;
                cell.locked = true;
            }
            side = side.opposite();
        }
        for c in cells.iter_mut() {
            c.locked = false;
        }
    }

    /// Moves cells from the larger to the smaller side, scanning nets from the
    /// last one backwards, until half of the size difference has moved.
    /// Only runs when neither side could give up a cell within the bounds.
    fn repair_balance(&mut self) {
        let bounds = BalanceBounds::new(self.cells.len(), self.balance_factor);
        let sizes = self.side_sizes;
        if bounds.can_move_from(sizes, Side::A) || bounds.can_move_from(sizes, Side::B) {
            return;
        }

        let (more, gap) = if sizes[0] > sizes[1] {
            (Side::A, (sizes[0] - sizes[1]) / 2)
        } else {
            (Side::B, (sizes[1] - sizes[0]) / 2)
        };
        log::debug!("initial sizes {sizes:?} out of balance, moving {gap} cells off {more:?}");

        let Hypergraph { cells, nets, .. } = self;
        let mut remaining = gap;
        'nets: for net in nets.iter().rev() {
            for &c in net.cells.iter() {
                if remaining == 0 {
                    break 'nets;
                }
                let cell = &mut cells[c as usize];
                if cell.side == more {
                    cell.side = more.opposite();
                    remaining -= 1;
                }
            }
        }
        self.recount_side_sizes();
    }
}

#[cfg(test)]
mod tests {
    use crate::{Hypergraph, InitialPartitioningMethod, Side};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sides(graph: &Hypergraph) -> Vec<Side> {
        graph.cells().iter().map(|c| c.side).collect()
    }

    fn seed(graph: &mut Hypergraph, method: InitialPartitioningMethod) {
        let mut rng = StdRng::seed_from_u64(1234);
        graph.partition_initial(method, &mut rng);
    }

    #[test]
    fn logic_affinity_skips_nets_with_assigned_cells() {
        let mut graph = Hypergraph::parse("0.5\nNET n1 a b ;\nNET n2 b c ;\n").unwrap();
        seed(&mut graph, InitialPartitioningMethod::LogicAffinity);
        // n2 shares "b" with n1 and is skipped, so "c" keeps the default side.
        assert_eq!(sides(&graph), vec![Side::A, Side::A, Side::A]);
        assert_eq!(graph.side_sizes(), [3, 0]);
        assert_eq!(graph.cut_size(), 0);
        assert!(graph.cells().iter().all(|c| !c.locked));
    }

    #[test]
    fn logic_affinity_alternates_sides() {
        let mut graph =
            Hypergraph::parse("1.0 NET n1 a b ; NET n2 c d ; NET n3 a c ; NET n4 e ;").unwrap();
        seed(&mut graph, InitialPartitioningMethod::LogicAffinity);
        assert_eq!(
            sides(&graph),
            vec![Side::A, Side::A, Side::B, Side::B, Side::A]
        );
        assert_eq!(graph.cut_size(), 1);
    }

    #[test]
    fn repair_moves_half_the_gap_from_the_back() {
        let mut graph = Hypergraph::parse("0.2 NET n1 a b c d ;").unwrap();
        seed(&mut graph, InitialPartitioningMethod::LogicAffinity);
        assert_eq!(
            sides(&graph),
            vec![Side::B, Side::B, Side::A, Side::A]
        );
        assert_eq!(graph.side_sizes(), [2, 2]);
        assert_eq!(graph.cut_size(), 1);
    }

    #[test]
    fn equal_sides_are_left_alone() {
        // No single move fits the tight bounds, but there is no gap to close.
        let mut graph = Hypergraph::parse("0.1 NET n1 a b c ; NET n2 d e f ;").unwrap();
        seed(&mut graph, InitialPartitioningMethod::Modulo);
        assert_eq!(
            sides(&graph),
            vec![Side::A, Side::B, Side::A, Side::B, Side::A, Side::B]
        );
    }

    #[test]
    fn repair_starts_at_the_last_net() {
        let mut graph = Hypergraph::parse("0.1 NET n1 a b c ; NET n2 c d e f ;").unwrap();
        seed(&mut graph, InitialPartitioningMethod::LogicAffinity);
        // Everything starts on A, the gap is 3 and is taken from n2 first.
        assert_eq!(graph.side_sizes(), [3, 3]);
        assert_eq!(
            sides(&graph),
            vec![Side::A, Side::A, Side::B, Side::B, Side::B, Side::A]
        );
    }

    #[test]
    fn random_is_seeded() {
        let text = "0.5 NET n1 a b c d e f g h ; NET n2 a e ;";
        let mut first = Hypergraph::parse(text).unwrap();
        let mut second = Hypergraph::parse(text).unwrap();
        seed(&mut first, InitialPartitioningMethod::Random);
        seed(&mut second, InitialPartitioningMethod::Random);
        assert_eq!(sides(&first), sides(&second));
        let [a, b] = first.side_sizes();
        assert_eq!(a + b, 8);
    }
}
