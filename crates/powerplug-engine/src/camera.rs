use serde::{Deserialize, Serialize};

/// Horizontal viewport offset that follows the player. Levels scroll
/// sideways only, so there is no vertical component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Center the viewport on `focus_x`, clamped so the view never shows
    /// space left of the level start or right of its end.
    pub fn follow(&mut self, focus_x: f32, viewport_width: f32, level_width: f32) {
        let max_offset = (level_width - viewport_width).max(0.0);
        self.x = (focus_x - viewport_width / 2.0).clamp(0.0, max_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_on_the_focus_mid_level() {
        let mut camera = Camera::default();
        camera.follow(1_000.0, 800.0, 2_000.0);
        assert_eq!(camera.x, 600.0);
    }

    #[test]
    fn pins_to_the_left_edge() {
        let mut camera = Camera::default();
        camera.follow(66.0, 800.0, 2_000.0);
        assert_eq!(camera.x, 0.0, "never show space before the level start");
    }

    #[test]
    fn pins_to_the_right_edge() {
        let mut camera = Camera::default();
        camera.follow(1_950.0, 800.0, 2_000.0);
        assert_eq!(camera.x, 1_200.0);
    }

    #[test]
    fn narrow_level_never_scrolls() {
        let mut camera = Camera::default();
        camera.follow(400.0, 800.0, 600.0);
        assert_eq!(camera.x, 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_stays_inside_level_bounds(
                focus in -100.0f32..=5_000.0,
                level_width in 100.0f32..=4_000.0,
            ) {
                let mut camera = Camera::default();
                camera.follow(focus, 800.0, level_width);
                let max_offset = (level_width - 800.0).max(0.0);
                prop_assert!(camera.x >= 0.0);
                prop_assert!(camera.x <= max_offset, "offset {} beyond {}", camera.x, max_offset);
            }
        }
    }
}
