//! 2D simplex noise used to desynchronise swing phase and axis over time.
//!
//! Gradients come from a hashed lattice rather than a permutation table, so
//! the function is stateless and safe to call from any worker.

use glam::Vec2;

const F2: f32 = 0.366_025_4; // (sqrt(3) - 1) / 2
const G2: f32 = 0.211_324_87; // (3 - sqrt(3)) / 6
const OUTPUT_SCALE: f32 = 70.0;

/// Smooth, continuous noise in `[-1, 1]`. Non-finite input samples as `0`.
pub fn simplex2(p: Vec2) -> f32 {
    if !p.is_finite() {
        return 0.0;
    }

    // Skew into simplex cell space
    let s = (p.x + p.y) * F2;
    let i = (p.x + s).floor();
    let j = (p.y + s).floor();
    let t = (i + j) * G2;
    let x0 = p.x - (i - t);
    let y0 = p.y - (j - t);

    let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };
    let x1 = x0 - i1 as f32 + G2;
    let y1 = y0 - j1 as f32 + G2;
    let x2 = x0 - 1.0 + 2.0 * G2;
    let y2 = y0 - 1.0 + 2.0 * G2;

    let ii = i as i32;
    let jj = j as i32;
    let n0 = corner(x0, y0, lattice_hash(ii, jj));
    let n1 = corner(
        x1,
        y1,
        lattice_hash(ii.wrapping_add(i1), jj.wrapping_add(j1)),
    );
    let n2 = corner(
        x2,
        y2,
        lattice_hash(ii.wrapping_add(1), jj.wrapping_add(1)),
    );

    (OUTPUT_SCALE * (n0 + n1 + n2)).clamp(-1.0, 1.0)
}

#[inline]
fn corner(x: f32, y: f32, hash: u32) -> f32 {
    let t = 0.5 - x * x - y * y;
    if t <= 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * gradient_dot(hash, x, y)
    }
}

#[inline]
fn gradient_dot(hash: u32, x: f32, y: f32) -> f32 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[inline]
fn lattice_hash(i: i32, j: i32) -> u32 {
    let mut h = (i as u32).wrapping_mul(0x8DA6_B343) ^ (j as u32).wrapping_mul(0xD816_3841);
    h ^= h >> 13;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 16;
    h
}
