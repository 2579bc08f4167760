//! Procedural terrain generation
//!
//! A 1D fractal noise profile gives the ground height per column; the grid is
//! then filled with ground, open air and the sky gradient.

use rand::Rng;

use super::terrain::{AIR, SOLID, Terrain};
use crate::consts::{NOISE_BIAS, NOISE_OCTAVES};

/// Number of sky gradient bands (codes -1 down to -8)
pub const SKY_BANDS: f32 = 8.0;

/// Multi-octave 1D fractal noise over `seed`.
///
/// Octave `o` samples the seed every `len >> o` entries, blends linearly
/// between the two bracketing samples and is weighted by `1 / bias^o`. The
/// output is the weighted average, so it stays within the seed's range.
pub fn fractal_noise_1d(seed: &[f32], octaves: u32, bias: f32) -> Vec<f32> {
    let count = seed.len();
    let mut output = Vec::with_capacity(count);

    for x in 0..count {
        let mut noise = 0.0;
        let mut scale_acc = 0.0;
        let mut scale = 1.0;

        for o in 0..octaves {
            let pitch = count.checked_shr(o).unwrap_or(0).max(1);
            let sample1 = (x / pitch) * pitch;
            let sample2 = (sample1 + pitch) % count;
            let blend = (x - sample1) as f32 / pitch as f32;
            let sample = (1.0 - blend) * seed[sample1] + blend * seed[sample2];
            scale_acc += scale;
            noise += sample * scale;
            scale /= bias;
        }

        output.push(noise / scale_acc);
    }

    output
}

/// Random seed array for the noise. The first entry is pinned to mid-height
/// so the profile starts level across runs.
pub fn noise_seed(len: usize, rng: &mut impl Rng) -> Vec<f32> {
    let mut seed: Vec<f32> = (0..len).map(|_| rng.random::<f32>()).collect();
    if let Some(first) = seed.first_mut() {
        *first = 0.5;
    }
    seed
}

/// Sky gradient code for a row in the top third of the map
fn sky_code(y: usize, height: usize) -> i8 {
    let third = height as f32 / 3.0;
    (-SKY_BANDS * (y as f32 / third) - 1.0) as i8
}

/// Fill a terrain grid from a normalized height profile (one entry per column)
pub fn fill_terrain(profile: &[f32], width: usize, height: usize) -> Terrain {
    assert_eq!(profile.len(), width, "profile must cover every column");
    let mut terrain = Terrain::new(width, height);
    let third = height as f32 / 3.0;

    for (x, &surface) in profile.iter().enumerate() {
        let ground = surface * height as f32;
        for y in 0..height {
            let code = if y as f32 >= ground {
                SOLID
            } else if (y as f32) < third {
                sky_code(y, height)
            } else {
                AIR
            };
            terrain.set(x, y, code);
        }
    }

    terrain
}

/// Generate a fresh map
pub fn generate_terrain(width: usize, height: usize, rng: &mut impl Rng) -> Terrain {
    let seed = noise_seed(width, rng);
    let profile = fractal_noise_1d(&seed, NOISE_OCTAVES, NOISE_BIAS);
    let terrain = fill_terrain(&profile, width, height);
    log::info!("Generated {}x{} terrain", width, height);
    terrain
}
