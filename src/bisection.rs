use crate::{BalanceBounds, GainBuckets, Hypergraph, InitialPartitioningMethod, PartitionError};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// What a pass does when no unlocked cell can move within the balance bounds.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum InfeasibleMovePolicy {
    /// Stop moving, log a warning and roll back to the best prefix as usual.
    #[default]
    EndPass,
    /// Undo the pass and fail with [`PartitionError::NoFeasibleMove`].
    Abort,
}

pub struct BisectionPartitioningConfig {
    /// The seed for the random number generator.
    pub rng_seed: u64,
    /// What initial partitioning method to use.
    pub initial_partitioning: InitialPartitioningMethod,
    /// The maximum amount of passes the algorithm is allowed to run.
    pub max_passes: u32,
    /// How many of the most recent pass gains are summed for the stagnation check.
    pub stagnation_window: usize,
    /// The stagnation check only applies once more than this many passes have run.
    pub stagnation_after: u32,
    /// Stop once the summed gains of the window fall below this value.
    pub stagnation_threshold: i32,
    /// How to react when a pass runs out of feasible moves.
    pub on_infeasible: InfeasibleMovePolicy,
}

impl Default for BisectionPartitioningConfig {
    fn default() -> Self {
        Self {
            rng_seed: 1234,
            initial_partitioning: InitialPartitioningMethod::LogicAffinity,
            max_passes: 150,
            stagnation_window: 5,
            stagnation_after: 100,
            stagnation_threshold: 20,
            on_infeasible: InfeasibleMovePolicy::EndPass,
        }
    }
}

/// Result of a single FM pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PassOutcome {
    /// Highest cumulative gain over all non-empty move prefixes, 0 if no cell moved.
    pub max_gain: i32,
    /// Number of cells moved before the pass ended.
    pub moves: usize,
    /// Number of those moves kept after rolling back.
    pub kept_moves: usize,
    /// Whether the pass ended early because no move was feasible.
    pub stalled: bool,
    pub cut_size: u32,
    pub side_sizes: [u32; 2],
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StopReason {
    /// The last pass found no improving prefix.
    Converged,
    /// The recent pass gains summed below the stagnation threshold.
    Stagnated,
    /// The pass limit was reached.
    PassLimit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartitionReport {
    pub initial_cut_size: u32,
    pub passes: Vec<PassOutcome>,
    pub stop: StopReason,
}

impl PartitionReport {
    pub fn final_cut_size(&self) -> u32 {
        self.passes
            .last()
            .map_or(self.initial_cut_size, |p| p.cut_size)
    }
}

impl Hypergraph {
    /// Splits the hypergraph into two parts while minimizing the number of cut
    /// nets: seeds a partition, then refines it with FM passes.
    pub fn partition_bisection(
        &mut self,
        config: &BisectionPartitioningConfig,
    ) -> Result<PartitionReport, PartitionError> {
        let mut rng = StdRng::seed_from_u64(config.rng_seed);
        self.partition_initial(config.initial_partitioning, &mut rng);
        log::info!(
            "initial partition: cut size {}, sizes {:?}, max pin count {}",
            self.cut_size,
            self.side_sizes,
            self.max_pin_count
        );
        self.refine(config)
    }

    /// Runs FM passes on the current partition until a pass finds no
    /// improvement, the gains stagnate or the pass limit is hit.
    pub fn refine(
        &mut self,
        config: &BisectionPartitioningConfig,
    ) -> Result<PartitionReport, PartitionError> {
        self.refresh();
        let initial_cut_size = self.cut_size;
        let mut passes = Vec::new();
        let mut recent_gains = vec![0; config.stagnation_window.max(1)];
        let mut stop = StopReason::PassLimit;

        for pass in 1..=config.max_passes {
            let outcome = self.fm_pass(pass, config.on_infeasible)?;
            log::info!(
                "pass {pass}: max gain {}, cut size {}",
                outcome.max_gain,
                outcome.cut_size
            );
            let gain = outcome.max_gain;
            passes.push(outcome);

            if gain <= 0 {
                stop = StopReason::Converged;
                break;
            }

            recent_gains.rotate_right(1);
            recent_gains[0] = gain;
            if pass > config.stagnation_after
                && recent_gains.iter().sum::<i32>() < config.stagnation_threshold
            {
                log::info!("stopping early after pass {pass}, recent gains {recent_gains:?}");
                stop = StopReason::Stagnated;
                break;
            }
        }

        Ok(PartitionReport {
            initial_cut_size,
            passes,
            stop,
        })
    }

    /// Moves every cell once in order of decreasing gain, as far as the
    /// balance bounds allow, then keeps only the prefix of moves with the
    /// highest cumulative gain. Nothing is kept unless that gain is positive.
    /// Keeping a non-improving full pass would mirror the partition instead,
    /// so the groups reported after such a pass can be swapped relative to a
    /// run that keeps those moves.
    pub fn fm_pass(
        &mut self,
        pass: u32,
        policy: InfeasibleMovePolicy,
    ) -> Result<PassOutcome, PartitionError> {
        self.refresh();
        let cut_before = self.cut_size;
        let bounds = BalanceBounds::new(self.cells.len(), self.balance_factor);

        let mut buckets = GainBuckets::new(self.max_pin_count, self.cells.len());
        for (i, c) in self.cells.iter_mut().enumerate() {
            c.locked = false;
            buckets.insert(i as u32, c.side, c.gain);
        }

        let mut moves = Vec::with_capacity(self.cells.len());
        let mut partial_sum = 0;
        let mut max_partial_sum = i32::MIN;
        let mut best_len = 0;
        let mut stalled = false;

        for step in 0..self.cells.len() {
            let sizes = self.side_sizes;
            let Some(cell) = buckets.pick_highest(|side| bounds.can_move_from(sizes, side)) else {
                match policy {
                    InfeasibleMovePolicy::Abort => {
                        self.undo_moves(&moves);
                        return Err(PartitionError::NoFeasibleMove { pass, step, sizes });
                    }
                    InfeasibleMovePolicy::EndPass => {
                        log::warn!(
                            "pass {pass}: no feasible move at step {step} with sizes {sizes:?}, \
                             {} cells left unmoved",
                            buckets.len()
                        );
                        stalled = true;
                        break;
                    }
                }
            };

            buckets.remove(cell);
            let moved = &mut self.cells[cell as usize];
            let from = moved.side;
            moved.side = from.opposite();
            moved.locked = true;
            self.side_sizes[from.index()] -= 1;
            self.side_sizes[from.opposite().index()] += 1;

            partial_sum += moved.gain;
            moves.push(cell);
            if partial_sum > max_partial_sum {
                max_partial_sum = partial_sum;
                best_len = moves.len();
            }
            log::trace!(
                "pass {pass} step {step}: {} {from:?} -> {:?}, gain {}, partial sum {partial_sum}",
                moved.name,
                moved.side,
                moved.gain
            );

            self.update_gains_after_move(cell, from, &mut buckets);
        }

        let max_gain = if moves.is_empty() { 0 } else { max_partial_sum };
        let kept_moves = if max_gain > 0 { best_len } else { 0 };
        self.undo_moves(&moves[kept_moves..]);
        log::debug!(
            "pass {pass}: kept {kept_moves} of {} moves, sizes {:?}",
            moves.len(),
            self.side_sizes
        );
        debug_assert_eq!(
            self.cut_size as i64,
            cut_before as i64 - max_gain.max(0) as i64
        );

        Ok(PassOutcome {
            max_gain,
            moves: moves.len(),
            kept_moves,
            stalled,
            cut_size: self.cut_size,
            side_sizes: self.side_sizes,
        })
    }

    /// Flips the given cells back, unlocks everything and recounts.
    fn undo_moves(&mut self, moves: &[u32]) {
        for &c in moves {
            let cell = &mut self.cells[c as usize];
            cell.side = cell.side.opposite();
        }
        for c in self.cells.iter_mut() {
            c.locked = false;
        }
        self.refresh();
    }
}
