use serde::{Deserialize, Serialize};

// Finder pattern
//------------------------------------------------------------------------------

/// Width of a finder pattern in modules.
pub const FINDER_SIZE: usize = 7;

/// Width of the inner finder dot in modules.
pub const FINDER_DOT_SIZE: usize = 3;

/// Modules reserved on each axis by the two finder patterns sharing it.
pub const FINDER_RESERVE: usize = FINDER_SIZE * 2;

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ECLevel {
    L = 0,
    M = 1,
    #[default]
    Q = 2,
    H = 3,
}

impl ECLevel {
    /// Fraction of the symbol that can be covered by a logo and still be recovered.
    pub const fn hide_budget(self) -> f64 {
        match self {
            Self::L => 0.07,
            Self::M => 0.15,
            Self::Q => 0.25,
            Self::H => 0.30,
        }
    }

    /// Maximum number of modules a logo scaled by `image_size` may hide.
    pub fn max_hidden_dots(self, image_size: f64, count: usize) -> usize {
        let cover = image_size * self.hide_budget();
        let hidden = (cover * count as f64 * count as f64).floor();
        if hidden > 0.0 {
            hidden as usize
        } else {
            0
        }
    }
}

/// Modules on one axis that lie outside both finder patterns.
pub fn max_hidden_axis_dots(count: usize) -> usize {
    count.saturating_sub(FINDER_RESERVE)
}
