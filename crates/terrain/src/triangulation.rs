use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TriangulationSettings;

/// Splits every grid cell into two triangles.
///
/// Cells are visited row by row. The diagonal state is toggled before each
/// cell (alternating first, then the coin flip) and is never reset between
/// rows. The random stream is created here, so concurrent calls never share
/// one.
pub fn triangulate(resolution: u32, settings: &TriangulationSettings, seed: u64) -> Vec<u32> {
    let r = resolution as usize;
    let verts_per_line = resolution + 1;
    let mut indices = Vec::with_capacity(r * r * 6);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut flip = settings.flip_diagonal;

    let mut vert = 0u32;
    for _z in 0..resolution {
        for _x in 0..resolution {
            if settings.mode.alternates() {
                flip = !flip;
            }
            if settings.mode.randomizes() && rng.random_bool(0.5) {
                flip = !flip;
            }

            let below = vert + verts_per_line;
            if flip {
                indices.extend_from_slice(&[vert, below + 1, below, vert, vert + 1, below + 1]);
            } else {
                indices.extend_from_slice(&[vert, vert + 1, below, below, vert + 1, below + 1]);
            }

            vert += 1;
        }
        // Skip the last vertex of the row.
        vert += 1;
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagonalMode;

    const PLAIN: [u32; 6] = [0, 1, 3, 3, 1, 4];
    const FLIPPED: [u32; 6] = [0, 4, 3, 0, 1, 4];

    fn settings(mode: DiagonalMode, flip_diagonal: bool) -> TriangulationSettings {
        TriangulationSettings {
            mode,
            flip_diagonal,
        }
    }

    /// Whether each cell of a triangulated grid was split along the flipped diagonal.
    fn flipped_cells(indices: &[u32], resolution: u32) -> Vec<bool> {
        let vpl = resolution + 1;
        indices
            .chunks_exact(6)
            .map(|cell| cell[1] == cell[0] + vpl + 1)
            .collect()
    }

    #[test]
    fn single_cell_plain_winding() {
        let indices = triangulate(1, &settings(DiagonalMode::Fixed, false), 0);
        assert_eq!(indices, vec![0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn single_cell_flipped_winding() {
        let indices = triangulate(1, &settings(DiagonalMode::Fixed, true), 0);
        assert_eq!(indices, vec![0, 3, 2, 0, 1, 3]);
    }

    #[test]
    fn rows_skip_the_edge_vertex() {
        let indices = triangulate(2, &settings(DiagonalMode::Fixed, false), 0);
        assert_eq!(&indices[..6], &PLAIN);
        assert_eq!(&indices[6..12], &[1, 2, 4, 4, 2, 5]);
        assert_eq!(&indices[12..18], &[3, 4, 6, 6, 4, 7]);
        assert_eq!(&indices[18..24], &[4, 5, 7, 7, 5, 8]);
    }

    #[test]
    fn alternating_state_carries_across_rows() {
        let indices = triangulate(2, &settings(DiagonalMode::Alternating, false), 0);
        assert_eq!(&indices[..6], &FLIPPED);
        // Even resolution: every row restarts flipped, giving columns rather than a checkerboard.
        assert_eq!(flipped_cells(&indices, 2), vec![true, false, true, false]);

        let indices = triangulate(3, &settings(DiagonalMode::Alternating, false), 0);
        assert_eq!(
            flipped_cells(&indices, 3),
            vec![true, false, true, false, true, false, true, false, true]
        );
    }

    #[test]
    fn alternating_respects_initial_flip() {
        let indices = triangulate(2, &settings(DiagonalMode::Alternating, true), 0);
        assert_eq!(flipped_cells(&indices, 2), vec![false, true, false, true]);
    }

    #[test]
    fn random_mode_is_seed_deterministic() {
        let s = settings(DiagonalMode::Random, false);
        assert_eq!(triangulate(16, &s, 42), triangulate(16, &s, 42));
    }

    #[test]
    fn random_mode_depends_on_seed() {
        let s = settings(DiagonalMode::Random, false);
        let a = flipped_cells(&triangulate(16, &s, 1), 16);
        let b = flipped_cells(&triangulate(16, &s, 2), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn random_mode_mixes_diagonals() {
        let s = settings(DiagonalMode::Random, false);
        let cells = flipped_cells(&triangulate(16, &s, 9), 16);
        let flipped = cells.iter().filter(|f| **f).count();
        assert!(flipped > 32 && flipped < 224, "{flipped} of 256 flipped");
    }

    #[test]
    fn alternating_random_composes_both_toggles() {
        let random = flipped_cells(&triangulate(8, &settings(DiagonalMode::Random, false), 5), 8);
        let both = flipped_cells(
            &triangulate(8, &settings(DiagonalMode::AlternatingRandom, false), 5),
            8,
        );
        // Same coin flips, plus one extra toggle per visited cell.
        for (i, (r, b)) in random.iter().zip(&both).enumerate() {
            assert_eq!(*b, *r ^ (i % 2 == 0), "cell {i}");
        }
    }

    #[test]
    fn fixed_mode_ignores_seed() {
        let s = settings(DiagonalMode::Fixed, true);
        assert_eq!(triangulate(4, &s, 1), triangulate(4, &s, 2));
    }
}
