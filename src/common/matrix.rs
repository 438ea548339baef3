use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use super::error::{RenderError, RenderResult};

// Module matrix
//------------------------------------------------------------------------------

/// Read-only view of an encoded symbol: a square grid of dark and light modules.
pub trait ModuleMatrix {
    fn module_count(&self) -> usize;

    fn is_dark(&self, row: usize, col: usize) -> bool;

    /// Whether the producer has finished placing modules.
    fn is_finalized(&self) -> bool {
        true
    }
}

impl<T: ModuleMatrix + ?Sized> ModuleMatrix for &T {
    fn module_count(&self) -> usize {
        (**self).module_count()
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        (**self).is_dark(row, col)
    }

    fn is_finalized(&self) -> bool {
        (**self).is_finalized()
    }
}

// Bit matrix
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    grid: Vec<bool>,
    w: usize,
}

impl BitMatrix {
    pub fn new(w: usize) -> Self {
        Self { grid: vec![false; w * w], w }
    }

    pub fn from_fn(w: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut grid = Vec::with_capacity(w * w);
        for r in 0..w {
            for c in 0..w {
                grid.push(f(r, c));
            }
        }
        Self { grid, w }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.w && c < self.w, "Module out of bounds");
        self.grid[r * self.w + c]
    }

    pub fn set(&mut self, r: usize, c: usize, dark: bool) {
        debug_assert!(r < self.w && c < self.w, "Module out of bounds");
        self.grid[r * self.w + c] = dark;
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&d| d).count()
    }
}

impl ModuleMatrix for BitMatrix {
    fn module_count(&self) -> usize {
        self.w
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        self.get(row, col)
    }
}

impl FromStr for BitMatrix {
    type Err = RenderError;

    /// Parses one row per line: `#`, `1`, `x` or `X` are dark; `.`, `0`, `-` or space are light.
    fn from_str(s: &str) -> RenderResult<Self> {
        let rows = s.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect::<Vec<_>>();
        let w = rows.len();
        let mut mat = Self::new(w);
        for (r, line) in rows.iter().enumerate() {
            let cells = line.chars().collect::<Vec<_>>();
            if cells.len() > w {
                return Err(RenderError::InvalidMatrix(format!("row {r} is wider than {w} modules")));
            }
            for (c, ch) in cells.into_iter().enumerate() {
                let dark = match ch {
                    '#' | '1' | 'x' | 'X' => true,
                    '.' | '0' | '-' | ' ' => false,
                    _ => return Err(RenderError::InvalidMatrix(format!("unexpected {ch:?} at {r}:{c}"))),
                };
                mat.set(r, c, dark);
            }
        }
        Ok(mat)
    }
}

impl Display for BitMatrix {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        for r in 0..self.w {
            let row = (0..self.w).map(|c| if self.get(r, c) { '#' } else { '.' }).collect::<String>();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
