use crate::{GainBuckets, Hypergraph, Side};

impl Hypergraph {
    /// Sets every cell's gain from the current net side counts.
    ///
    /// A cell loses one for every net that lies entirely on its side and gains
    /// one for every net on which it is the only cell on its side.
    pub(crate) fn compute_gains(&mut self) {
        let Hypergraph { cells, nets, .. } = self;
        for c in cells.iter_mut() {
            c.gain = 0;
        }
        for net in nets.iter() {
            if net.side_count[0] == 0 || net.side_count[1] == 0 {
                for &c in net.cells.iter() {
                    cells[c as usize].gain -= 1;
                }
            }
            for side in Side::BOTH {
                if net.side_count[side.index()] == 1 {
                    for &c in net.cells.iter() {
                        if cells[c as usize].side == side {
                            cells[c as usize].gain += 1;
                        }
                    }
                }
            }
        }
    }

    /// Updates net side counts and the gains of the unlocked neighbours after
    /// `moved` went from `from` to the other side. The cell itself must already
    /// be locked. Every changed gain is re-bucketed.
    pub(crate) fn update_gains_after_move(
        &mut self,
        moved: u32,
        from: Side,
        buckets: &mut GainBuckets,
    ) {
        let to = from.opposite();
        let Hypergraph { cells, nets, .. } = self;
        debug_assert!(cells[moved as usize].locked);

        for i in 0..cells[moved as usize].nets.len() {
            let net = &mut nets[cells[moved as usize].nets[i] as usize];

            match net.side_count[to.index()] {
                0 => {
                    for &c in net.cells.iter() {
                        let cell = &mut cells[c as usize];
                        if !cell.locked {
                            cell.gain += 1;
                            buckets.insert(c, cell.side, cell.gain);
                        }
                    }
                }
                1 => {
                    for &c in net.cells.iter() {
                        let cell = &mut cells[c as usize];
                        if !cell.locked && cell.side == to {
                            cell.gain -= 1;
                            buckets.insert(c, cell.side, cell.gain);
                        }
                    }
                }
                _ => {}
            }

            net.side_count[from.index()] -= 1;
            net.side_count[to.index()] += 1;

            match net.side_count[from.index()] {
                0 => {
                    for &c in net.cells.iter() {
                        let cell = &mut cells[c as usize];
                        if !cell.locked {
                            cell.gain -= 1;
                            buckets.insert(c, cell.side, cell.gain);
                        }
                    }
                }
                1 => {
                    for &c in net.cells.iter() {
                        let cell = &mut cells[c as usize];
                        if !cell.locked && cell.side == from {
                            cell.gain += 1;
                            buckets.insert(c, cell.side, cell.gain);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}
