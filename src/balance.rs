use crate::Side;

/// Size window both partitions must stay inside.
///
/// With `n` cells and balance factor `b` a partition may hold between
/// `(1 - b) / 2 * n` and `(1 + b) / 2 * n` cells.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BalanceBounds {
    pub lower: f64,
    pub upper: f64,
}

impl BalanceBounds {
    pub fn new(cell_count: usize, balance_factor: f64) -> Self {
        let n = cell_count as f64;
        Self {
            lower: (1.0 - balance_factor) / 2.0 * n,
            upper: (1.0 + balance_factor) / 2.0 * n,
        }
    }

    /// Returns whether moving one cell off `from` keeps both partitions
    /// inside the window. `sizes` are the partition sizes before the move.
    pub fn can_move_from(&self, sizes: [u32; 2], from: Side) -> bool {
        let from_size = sizes[from.index()] as f64 - 1.0;
        let to_size = sizes[from.opposite().index()] as f64 + 1.0;
        from_size >= self.lower
            && to_size >= self.lower
            && from_size <= self.upper
            && to_size <= self.upper
    }

    /// Returns whether `sizes` already lie inside the window.
    pub fn contains(&self, sizes: [u32; 2]) -> bool {
        sizes
            .iter()
            .all(|&s| s as f64 >= self.lower && s as f64 <= self.upper)
    }
}
