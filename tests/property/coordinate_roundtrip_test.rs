//! Property-based tests for the coordinate mapper.
//!
//! Mapping a pointer offset to a percentage and back onto the same surface
//! reproduces the offset within floating-point tolerance.

use cobrowse::services::coordinate_mapper::{to_percentage, to_pixels};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn percentage_pixel_roundtrip(
        width in 1.0f64..4000.0,
        height in 1.0f64..4000.0,
        fx in -0.5f64..1.5,
        fy in -0.5f64..1.5,
    ) {
        let px = fx * width;
        let py = fy * height;
        let c = to_percentage(px, py, width, height).unwrap();
        let (rx, ry) = to_pixels(&c, width, height);
        prop_assert!(close(rx, px), "x: {} vs {}", rx, px);
        prop_assert!(close(ry, py), "y: {} vs {}", ry, py);
    }

    #[test]
    fn inside_surface_stays_in_range(
        width in 1.0f64..4000.0,
        height in 1.0f64..4000.0,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let c = to_percentage(fx * width, fy * height, width, height).unwrap();
        prop_assert!(c.x >= -1e-9 && c.x <= 100.0 + 1e-9);
        prop_assert!(c.y >= -1e-9 && c.y <= 100.0 + 1e-9);
    }

    #[test]
    fn non_positive_width_always_rejected(width in -4000.0f64..=0.0, height in 1.0f64..4000.0) {
        prop_assert!(to_percentage(1.0, 1.0, width, height).is_err());
    }
}
