use super::metadata::FINDER_SIZE;
use super::ModuleMatrix;

// Finder masks
//------------------------------------------------------------------------------

/// Outer ring of a finder pattern.
pub static SQUARE_MASK: [[bool; FINDER_SIZE]; FINDER_SIZE] = ring_mask();

/// Centered 3x3 dot of a finder pattern.
pub static DOT_MASK: [[bool; FINDER_SIZE]; FINDER_SIZE] = dot_mask();

const fn ring_mask() -> [[bool; FINDER_SIZE]; FINDER_SIZE] {
    let mut mask = [[false; FINDER_SIZE]; FINDER_SIZE];
    let mut i = 0;
    while i < FINDER_SIZE {
        mask[0][i] = true;
        mask[FINDER_SIZE - 1][i] = true;
        mask[i][0] = true;
        mask[i][FINDER_SIZE - 1] = true;
        i += 1;
    }
    mask
}

const fn dot_mask() -> [[bool; FINDER_SIZE]; FINDER_SIZE] {
    let mut mask = [[false; FINDER_SIZE]; FINDER_SIZE];
    let mut r = 2;
    while r < 5 {
        let mut c = 2;
        while c < 5 {
            mask[r][c] = true;
            c += 1;
        }
        r += 1;
    }
    mask
}

/// Looks up a mask cell by signed coordinates; anything outside the 7x7 box is unset.
pub fn mask_at(mask: &[[bool; FINDER_SIZE]; FINDER_SIZE], r: isize, c: isize) -> bool {
    let w = FINDER_SIZE as isize;
    (0..w).contains(&r) && (0..w).contains(&c) && mask[r as usize][c as usize]
}

/// Whether a module of an `n`-wide symbol falls on one of the three finder masks.
fn on_finder(mask: &[[bool; FINDER_SIZE]; FINDER_SIZE], n: usize, r: usize, c: usize) -> bool {
    let (n, r, c) = (n as isize, r as isize, c as isize);
    let off = n - FINDER_SIZE as isize;
    mask_at(mask, r, c) || mask_at(mask, r - off, c) || mask_at(mask, r, c - off)
}

// Module filter
//------------------------------------------------------------------------------

/// Predicate deciding which modules are drawn by the generic module pass. Finder
/// footprints are excluded, as is the centered region reserved for a logo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleFilter {
    n: usize,
    hide_x: usize,
    hide_y: usize,
}

impl ModuleFilter {
    pub fn new(n: usize) -> Self {
        Self { n, hide_x: 0, hide_y: 0 }
    }

    /// Reserves a centered `hide_x` by `hide_y` block of modules.
    pub fn hiding(mut self, hide_x: usize, hide_y: usize) -> Self {
        self.hide_x = hide_x;
        self.hide_y = hide_y;
        self
    }

    pub fn allows(&self, r: usize, c: usize) -> bool {
        !self.in_hidden_area(r, c)
            && !on_finder(&SQUARE_MASK, self.n, r, c)
            && !on_finder(&DOT_MASK, self.n, r, c)
    }

    fn in_hidden_area(&self, r: usize, c: usize) -> bool {
        let n = self.n as f64;
        let (r, c) = (r as f64, c as f64);
        let (hx, hy) = (self.hide_x as f64, self.hide_y as f64);
        (n - hx) / 2.0 <= c && c < (n + hx) / 2.0 && (n - hy) / 2.0 <= r && r < (n + hy) / 2.0
    }

    /// Dark, unfiltered module at a signed offset from `(r, c)`. Out-of-grid counts as absent.
    pub fn neighbor<M: ModuleMatrix + ?Sized>(
        &self,
        mat: &M,
        r: usize,
        c: usize,
        dx: isize,
        dy: isize,
    ) -> bool {
        let nr = r as isize + dy;
        let nc = c as isize + dx;
        let n = self.n as isize;
        if nr < 0 || nc < 0 || nr >= n || nc >= n {
            return false;
        }
        let (nr, nc) = (nr as usize, nc as usize);
        self.allows(nr, nc) && mat.is_dark(nr, nc)
    }
}

#[cfg(test)]
mod mask_tests {
    use super::{mask_at, ModuleFilter, DOT_MASK, SQUARE_MASK};
    use crate::{BitMatrix, ModuleMatrix};

    #[test]
    fn test_masks() {
        let ring = SQUARE_MASK.iter().flatten().filter(|&&b| b).count();
        let dot = DOT_MASK.iter().flatten().filter(|&&b| b).count();
        assert_eq!(ring, 24);
        assert_eq!(dot, 9);
        assert!(SQUARE_MASK[0][3] && SQUARE_MASK[6][6] && !SQUARE_MASK[1][1]);
        assert!(DOT_MASK[3][3] && !DOT_MASK[1][3]);
        assert!(!mask_at(&SQUARE_MASK, -1, 0));
        assert!(!mask_at(&SQUARE_MASK, 0, 7));
    }

    #[test]
    fn test_filter_excludes_finders() {
        let filter = ModuleFilter::new(21);
        for (r, c) in [(0, 0), (6, 6), (3, 3), (0, 20), (14, 0), (20, 6), (16, 2)] {
            assert!(!filter.allows(r, c), "({r}, {c}) should be masked");
        }
        // Gap between ring and dot, separators and the free corner stay drawable
        for (r, c) in [(1, 1), (7, 7), (0, 7), (20, 20), (14, 14), (10, 10)] {
            assert!(filter.allows(r, c), "({r}, {c}) should be drawable");
        }
    }

    #[test]
    fn test_filter_hidden_area() {
        let filter = ModuleFilter::new(25).hiding(7, 5);
        assert!(!filter.allows(12, 12));
        assert!(!filter.allows(10, 9));
        assert!(!filter.allows(14, 15));
        assert!(filter.allows(9, 12));
        assert!(filter.allows(15, 12));
        assert!(filter.allows(12, 8));
        assert!(filter.allows(12, 16));
    }

    #[test]
    fn test_neighbor() {
        let mat = BitMatrix::from_fn(21, |_, _| true);
        let filter = ModuleFilter::new(21);
        assert!(filter.neighbor(&mat, 10, 10, 1, 0));
        assert!(!filter.neighbor(&mat, 0, 10, 0, -1));
        assert!(!filter.neighbor(&mat, 20, 20, 1, 0));
        // (3, 14) is on the top-right finder ring
        assert!(!filter.neighbor(&mat, 3, 13, 1, 0));
        assert_eq!(mat.module_count(), 21);
    }
}
