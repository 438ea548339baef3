use log::debug;

// Image size
//------------------------------------------------------------------------------

/// Logo footprint: hidden module columns/rows and the pixel size to draw at.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub hide_x: usize,
    pub hide_y: usize,
    pub width: f64,
    pub height: f64,
}

fn make_odd(v: f64) -> f64 {
    if v % 2.0 == 0.0 {
        v - 1.0
    } else {
        v
    }
}

/// Fits an image of natural size `natural_w` x `natural_h` into a centered block
/// of at most `max_hidden` modules, no wider or taller than `max_axis` modules.
/// Hidden spans are odd so the block stays centered on the module grid.
pub fn calculate_image_size(
    natural_w: f64,
    natural_h: f64,
    max_hidden: usize,
    max_axis: usize,
    dot_size: f64,
) -> ImageSize {
    if !(natural_w > 0.0 && natural_h > 0.0 && dot_size > 0.0) || max_hidden == 0 || max_axis == 0 {
        return ImageSize::default();
    }

    let k = natural_h / natural_w;
    let max = max_hidden as f64;
    let max_axis = max_axis as f64;

    let mut hx = (max / k).sqrt().floor().max(1.0);
    if hx > max_axis {
        hx = max_axis;
    }
    hx = make_odd(hx);
    let mut hy = 1.0 + 2.0 * ((hx * k - 1.0) / 2.0).ceil();
    let mut w = hx * dot_size;
    let mut h = (w * k).round();

    if hx * hy > max || hy > max_axis {
        if hy > max_axis {
            hy = make_odd(max_axis);
        } else {
            hy -= 2.0;
        }
        h = hy * dot_size;
        hx = 1.0 + 2.0 * ((hy / k - 1.0) / 2.0).ceil();
        w = (h / k).round();
    }

    // Very wide or very tall images can still overshoot after the adjustment
    let cap = make_odd(max_axis);
    let (mut cx, mut cy) = (hx.clamp(1.0, cap), hy.clamp(1.0, cap));
    while cx * cy > max && (cx > 1.0 || cy > 1.0) {
        if cx >= cy {
            cx -= 2.0;
        } else {
            cy -= 2.0;
        }
    }
    if (cx, cy) != (hx, hy) {
        debug!("Clamped hidden logo area from {hx}x{hy} to {cx}x{cy}");
        w = (cx * dot_size).min(cy * dot_size / k).round();
        h = (w * k).round();
        (hx, hy) = (cx, cy);
    }

    ImageSize { hide_x: hx as usize, hide_y: hy as usize, width: w, height: h }
}

#[cfg(test)]
mod logo_tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::{calculate_image_size, ImageSize};
    use crate::common::{max_hidden_axis_dots, ECLevel};

    #[test_case(0.0, 10.0, 10, 11, 10.0; "zero_width")]
    #[test_case(10.0, 10.0, 0, 11, 10.0; "no_budget")]
    #[test_case(10.0, 10.0, 10, 0, 10.0; "no_axis")]
    #[test_case(10.0, 10.0, 10, 11, 0.0; "no_dot")]
    fn test_degenerate(w: f64, h: f64, max: usize, axis: usize, dot: f64) {
        assert_eq!(calculate_image_size(w, h, max, axis, dot), ImageSize::default());
    }

    #[test]
    fn test_square_logo() {
        // H level, 0.4 image size, 25 modules
        let max = ECLevel::H.max_hidden_dots(0.4, 25);
        let axis = max_hidden_axis_dots(25);
        assert_eq!((max, axis), (75, 11));
        let s = calculate_image_size(200.0, 200.0, max, axis, 10.0);
        assert_eq!(s, ImageSize { hide_x: 7, hide_y: 7, width: 70.0, height: 70.0 });
    }

    #[test]
    fn test_wide_logo() {
        let s = calculate_image_size(400.0, 100.0, 75, 11, 10.0);
        assert_eq!(s, ImageSize { hide_x: 11, hide_y: 3, width: 110.0, height: 28.0 });
    }

    #[test]
    fn test_tall_logo() {
        let s = calculate_image_size(100.0, 400.0, 75, 11, 10.0);
        assert_eq!(s, ImageSize { hide_x: 3, hide_y: 11, width: 28.0, height: 110.0 });
    }

    #[test]
    fn test_over_budget_shrinks_rows() {
        let s = calculate_image_size(100.0, 50.0, 30, 11, 10.0);
        assert_eq!(s, ImageSize { hide_x: 7, hide_y: 3, width: 60.0, height: 30.0 });
    }

    #[test]
    fn test_clamped() {
        let s = calculate_image_size(900.0, 100.0, 2, 11, 10.0);
        assert_eq!(s, ImageSize { hide_x: 1, hide_y: 1, width: 10.0, height: 1.0 });
    }

    proptest! {
        #[test]
        fn proptest_within_budget(
            w in 1.0f64..2000.0,
            h in 1.0f64..2000.0,
            max in 1usize..400,
            axis in 1usize..60,
        ) {
            let s = calculate_image_size(w, h, max, axis, 4.0);
            prop_assert!(s.hide_x <= axis && s.hide_y <= axis);
            prop_assert!(s.hide_x * s.hide_y <= max);
            prop_assert!(s.hide_x % 2 == 1 && s.hide_y % 2 == 1);
        }
    }
}
