//! Tile-size selection as a register-budget packing policy.
//!
//! A T-row tile keeps T vector accumulators live, plus two B-row buffers for
//! double buffering. All of them sit at the same register grouping, so the
//! real constraint is `group * (T + 2) <= register budget`. Small tiles leave
//! room for a wide grouping (fewer, wider registers); the 16-row tile barely
//! fits at grouping 1. [`TilePolicy`] derives both the grouping and the
//! M-range dispatch table from the budget instead of hardcoding either.

/// Tile heights the kernel family supports: how many output rows one kernel
/// invocation computes, each row in its own vector accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    T1,
    T2,
    T4,
    T8,
    T16,
}

impl Tile {
    /// Every tile height, smallest first.
    pub const ALL: [Tile; 5] = [Tile::T1, Tile::T2, Tile::T4, Tile::T8, Tile::T16];

    /// Output rows per kernel invocation.
    pub fn rows(self) -> usize {
        match self {
            Tile::T1 => 1,
            Tile::T2 => 2,
            Tile::T4 => 4,
            Tile::T8 => 8,
            Tile::T16 => 16,
        }
    }
}

/// B-row buffers each tile kernel keeps live for double buffering.
const ROW_BUFFERS: usize = 2;

/// Largest register grouping a policy will hand out.
const GROUP_CAP: usize = crate::engine::soft::MAX_GROUP;

/// Decides which tile height and register grouping to run a problem at.
///
/// The default budget of 32 vector registers reproduces the tuning of the
/// vector unit this kernel family was written for: grouping 4 for the 4-row
/// tile, 2 for the 8-row tile, 1 for the 16-row tile, and the familiar
/// dispatch thresholds at M = 4, 8, 64, and 128 (for 64 base lanes).
#[derive(Debug, Clone)]
pub struct TilePolicy {
    register_budget: usize,
}

impl TilePolicy {
    /// Policy for a unit with `register_budget` vector registers.
    ///
    /// # Panics
    ///
    /// Panics if the budget cannot hold even the 16-row tile at grouping 1
    /// (16 accumulators + 2 row buffers).
    pub fn new(register_budget: usize) -> Self {
        assert!(
            register_budget >= Tile::T16.rows() + ROW_BUFFERS,
            "register budget {} cannot hold a 16-row tile",
            register_budget
        );
        TilePolicy { register_budget }
    }

    /// Register grouping multiplier for `tile`: the largest power of two g
    /// such that g * (rows + 2) registers fit the budget, capped at the
    /// engine maximum.
    pub fn group(&self, tile: Tile) -> usize {
        let need = tile.rows() + ROW_BUFFERS;
        let mut group = 1;
        while group * 2 * need <= self.register_budget && group * 2 <= GROUP_CAP {
            group *= 2;
        }
        group
    }

    /// Widest column chunk a `lanes`-lane engine can sweep for `tile`.
    pub fn max_chunk(&self, tile: Tile, lanes: usize) -> usize {
        lanes * self.group(tile)
    }

    /// Pick the tile height for an M-row problem on a `lanes`-lane engine.
    ///
    /// Total over positive M. Small problems take the tile that just covers
    /// their rows; mid-sized problems take the tallest tile; past one
    /// grouping-1 chunk of rows, register pressure is better spent on wider
    /// chunks than on more rows, so the tile height steps back down.
    pub fn select(&self, m: usize, lanes: usize) -> Tile {
        if m <= 4 {
            Tile::T4
        } else if m <= 8 {
            Tile::T8
        } else if m <= lanes {
            Tile::T16
        } else if m <= self.max_chunk(Tile::T8, lanes) {
            Tile::T8
        } else {
            Tile::T4
        }
    }
}

impl Default for TilePolicy {
    fn default() -> Self {
        TilePolicy::new(32)
    }
}
