use glam::Vec4;

use crate::config::{HeightColors, WHITE};

impl HeightColors {
    /// Vertex color for a height.
    ///
    /// Blend factors are not clamped, so heights above `max_height` keep
    /// extrapolating past `high`.
    pub fn color_at(&self, height: f32, max_height: f32) -> [f32; 4] {
        if !self.enabled {
            return WHITE;
        }

        if height < self.low_level_height {
            self.low
        } else if height < self.mid_level_height {
            if self.smoothing {
                let t = (height - self.low_level_height)
                    / (self.mid_level_height - self.low_level_height);
                lerp(self.low, self.mid, t)
            } else {
                self.mid
            }
        } else if self.smoothing {
            let t = (height - self.mid_level_height) / (max_height - self.mid_level_height);
            lerp(self.mid, self.high, t)
        } else {
            self.high
        }
    }
}

fn lerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    Vec4::from_array(a).lerp(Vec4::from_array(b), t).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    const GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

    fn bands(smoothing: bool) -> HeightColors {
        HeightColors {
            enabled: true,
            smoothing,
            low: BLACK,
            mid: GRAY,
            high: WHITE,
            low_level_height: 10.0,
            mid_level_height: 20.0,
        }
    }

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn disabled_is_white() {
        let colors = HeightColors {
            enabled: false,
            ..bands(true)
        };
        assert_eq!(colors.color_at(-5.0, 30.0), WHITE);
        assert_eq!(colors.color_at(500.0, 30.0), WHITE);
    }

    #[test]
    fn hard_bands_include_lower_threshold_in_upper_band() {
        let colors = bands(false);
        assert_eq!(colors.color_at(9.999, 30.0), BLACK);
        assert_eq!(colors.color_at(10.0, 30.0), GRAY);
        assert_eq!(colors.color_at(19.9, 30.0), GRAY);
        assert_eq!(colors.color_at(20.0, 30.0), WHITE);
    }

    #[test]
    fn smoothing_blends_between_thresholds() {
        let colors = bands(true);
        assert!(close(colors.color_at(15.0, 30.0), [0.25, 0.25, 0.25, 1.0]));
        assert!(close(colors.color_at(25.0, 30.0), [0.75, 0.75, 0.75, 1.0]));
        assert!(close(colors.color_at(30.0, 30.0), WHITE));
    }

    #[test]
    fn smoothing_extrapolates_above_max_height() {
        let colors = bands(true);
        // t = (40 - 20) / (30 - 20) = 2
        assert!(close(colors.color_at(40.0, 30.0), [1.5, 1.5, 1.5, 1.0]));
    }
}
