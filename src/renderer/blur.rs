//! Gaussian blur approximated by three successive box blurs
//!
//! Pixels outside a coverage mask count as zero, matching a canvas blur
//! filter applied to a shape on a transparent layer.

use super::raster::Coverage;

/// Box passes used to approximate one gaussian
const PASSES: usize = 3;

/// Box radii whose successive application approximates a gaussian of `sigma`
pub fn box_radii(sigma: f32) -> [usize; PASSES] {
    if !sigma.is_finite() || sigma <= 0.0 {
        return [0; PASSES];
    }

    let n = PASSES as f32;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as i32;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let (wl, s2) = (lower as f32, sigma * sigma);
    let m = ((12.0 * s2 - n * wl * wl - 4.0 * n * wl - 3.0 * n) / (-4.0 * wl - 4.0)).round() as i32;

    let mut radii = [0; PASSES];
    for (i, r) in radii.iter_mut().enumerate() {
        let size = if (i as i32) < m { lower } else { upper };
        *r = ((size - 1) / 2) as usize;
    }
    radii
}

/// Pixels of padding a mask needs so the blur is not cut off
pub fn blur_padding(sigma: f32) -> i32 {
    box_radii(sigma).iter().sum::<usize>() as i32
}

/// Blur a coverage mask in place
pub fn blur(cov: &mut Coverage, sigma: f32) {
    let radii = box_radii(sigma);
    if radii.iter().all(|r| *r == 0) || cov.is_empty() {
        return;
    }

    let (w, h) = (cov.width(), cov.height());
    let mut scratch = vec![0.0; w.max(h) + 1];
    let mut column = vec![0.0; h];

    for r in radii {
        for row in cov.data.chunks_exact_mut(w) {
            box_line(row, r, &mut scratch);
        }
        for x in 0..w {
            for (y, c) in column.iter_mut().enumerate() {
                *c = cov.data[y * w + x];
            }
            box_line(&mut column, r, &mut scratch);
            for (y, c) in column.iter().enumerate() {
                cov.data[y * w + x] = *c;
            }
        }
    }
}

/// One box pass of radius `r` over a line, using prefix sums
fn box_line(line: &mut [f32], r: usize, prefix: &mut [f32]) {
    if r == 0 {
        return;
    }
    let n = line.len();
    prefix[0] = 0.0;
    for (i, v) in line.iter().enumerate() {
        prefix[i + 1] = prefix[i] + v;
    }

    let norm = 1.0 / (2 * r + 1) as f32;
    for (i, v) in line.iter_mut().enumerate() {
        let lo = i.saturating_sub(r);
        let hi = (i + r + 1).min(n);
        *v = ((prefix[hi] - prefix[lo]) * norm).clamp(0.0, 1.0);
    }
}
