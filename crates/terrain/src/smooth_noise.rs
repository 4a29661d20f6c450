use noise::{NoiseFn, Perlin};

/// Coherent 2D noise in [0, 1].
///
/// The permutation table is fixed, so the same coordinates always produce the
/// same value regardless of the terrain seed.
#[derive(Clone, Debug)]
pub struct SmoothNoise {
    perlin: Perlin,
}

impl Default for SmoothNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl SmoothNoise {
    pub fn new() -> Self {
        Self {
            perlin: Perlin::new(Perlin::DEFAULT_SEED),
        }
    }

    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let n = self.perlin.get([x as f64, z as f64]);
        ((n * 0.5 + 0.5) as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_in_unit_range() {
        let noise = SmoothNoise::new();
        for i in 0..200 {
            let x = i as f32 * 0.173 - 7.0;
            let z = i as f32 * 0.311 + 3.0;
            let v = noise.sample(x, z);
            assert!((0.0..=1.0).contains(&v), "noise({x}, {z}) = {v}");
        }
    }

    #[test]
    fn lattice_points_sit_at_midpoint() {
        let noise = SmoothNoise::new();
        assert!((noise.sample(0.0, 0.0) - 0.5).abs() < 1e-6);
        assert!((noise.sample(3.0, 2.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn independent_instances_agree() {
        let a = SmoothNoise::new();
        let b = SmoothNoise::default();
        assert_eq!(a.sample(1.37, 4.21), b.sample(1.37, 4.21));
    }

    #[test]
    fn varies_between_lattice_points() {
        let noise = SmoothNoise::new();
        let samples: Vec<f32> = (0..16)
            .map(|i| noise.sample(0.3 + i as f32 * 0.61, 0.7 + i as f32 * 0.29))
            .collect();
        assert!(samples.iter().any(|v| (v - samples[0]).abs() > 1e-3));
    }
}
