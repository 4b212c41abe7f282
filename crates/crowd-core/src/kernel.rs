//! The per-instance kernel.
//!
//! Every function here is pure: the output depends only on the config, the
//! seat's planar position, the time and the seed. Each function builds its
//! own [`SeatRng`] on the stack, so calls can run in any order on any thread.

use crate::color::hsv_to_rgb;
use crate::config::{BlockConfig, SwingDirection};
use crate::constants::*;
use crate::noise::simplex2;
use crate::random::SeatRng;
use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
use std::f32::consts::TAU;

/// Everything the kernel produces for one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceSample {
    pub human: Mat4,
    pub penlight: Mat4,
    pub color: Vec4,
}

impl InstanceSample {
    pub const IDENTITY: Self = Self {
        human: Mat4::IDENTITY,
        penlight: Mat4::IDENTITY,
        color: Vec4::ZERO,
    };
}

/// Seeds for global instance `index`: `(transform_seed, color_seed)`.
///
/// The colour seed is the next value after the transform seed so hue jitter
/// does not mirror the position jitter.
#[inline]
pub fn instance_seeds(index: usize) -> (u32, u32) {
    let seed = (index as u32)
        .wrapping_mul(SEEDS_PER_INSTANCE)
        .wrapping_add(SEED_BASE);
    (seed, seed.wrapping_add(1))
}

/// Run the whole kernel for one seat.
#[inline]
pub fn evaluate_instance(config: &BlockConfig, planar: Vec2, time: f32, index: usize) -> InstanceSample {
    let (transform_seed, color_seed) = instance_seeds(index);
    let (human, penlight) = human_and_penlight_matrix(config, planar, time, transform_seed);
    let color = penlight_color(config, &penlight, time, color_seed);
    InstanceSample {
        human,
        penlight,
        color,
    }
}

pub fn human_and_penlight_matrix(config: &BlockConfig, planar: Vec2, time: f32, seed: u32) -> (Mat4, Mat4) {
    let human = human_matrix(config, planar, seed);
    let penlight = penlight_matrix(config, &human, time, seed);
    (human, penlight)
}

/// World transform of the seated figure.
pub fn human_matrix(config: &BlockConfig, planar: Vec2, seed: u32) -> Mat4 {
    let mut rng = SeatRng::for_instance(seed);

    let jitter = rng.next_vec2_in(config.position_variance_xz) * config.seat_pitch;
    let local = Vec3::new(planar.x + jitter.x, 0.0, planar.y + jitter.y);
    let origin = config.spawn_transform.transform_point3(local);

    let rotation = if config.enable_look_at_target {
        look_rotation(config.target_point - origin, Vec3::Y)
    } else {
        Quat::IDENTITY
    };

    Mat4::from_scale_rotation_translation(Vec3::ONE, rotation, origin)
}

/// World transform of the light wand held by the figure at `human`.
pub fn penlight_matrix(config: &BlockConfig, human: &Mat4, time: f32, seed: u32) -> Mat4 {
    let mut rng = SeatRng::for_instance(seed);

    // Swing angle
    let phase_seed = rng.next_in(config.noise_seed_range);
    let phase = TAU * config.swing_frequency * time
        + simplex2(Vec2::new(phase_seed, time * config.phase_noise_time_scale));

    let raw = phase.cos();
    let snappy = smoothstep(-1.0, 1.0, raw) * 2.0 - 1.0;
    let mut angle = lerp(raw, snappy, rng.next_f32());
    angle *= rng.next_in(config.swing_angle_variance);

    // Swing axis
    let axis_seed = rng.next_in(config.noise_seed_range);
    let dx = simplex2(Vec2::new(
        axis_seed,
        time * config.axis_noise_time_scale + AXIS_NOISE_TIME_OFFSET,
    ));
    let axis = swing_axis(config.swing_mode, dx * config.swing_axis_tilt_factor);

    let arm = config.swing_offset * rng.next_in(config.arm_length_variance);

    // shoulder -> swing -> arm, all local to the figure
    let local = Mat4::from_translation(config.shoulder_offset)
        * Mat4::from_quat(Quat::from_axis_angle(axis, angle))
        * Mat4::from_translation(Vec3::new(0.0, arm, 0.0));

    *human * local
}

/// Wand colour. Value is 1 unless the brightness wave is enabled.
pub fn penlight_color(config: &BlockConfig, penlight: &Mat4, time: f32, seed: u32) -> Vec4 {
    let mut rng = SeatRng::for_instance(seed);

    let value = if config.enable_wave_animation {
        wave_brightness(config, penlight.w_axis.truncate(), time)
    } else {
        1.0
    };

    let hue = (config.base_hue + rng.next_in(config.hue_variance)).clamp(0.0, 1.0);
    hsv_to_rgb(hue, 1.0, value).extend(1.0)
}

/// Brightness of the wave at a world position. Ranges over
/// `[0.1, wave_intensity + 0.1]`.
#[inline]
pub fn wave_brightness(config: &BlockConfig, position: Vec3, time: f32) -> f32 {
    let distance = Vec2::new(position.x, position.z)
        .distance(Vec2::new(config.target_point.x, config.target_point.z));
    let wave = (distance * config.wave_frequency - time * config.wave_speed).sin() * 0.5 + 0.5;
    wave * wave * config.wave_intensity + WAVE_BRIGHTNESS_FLOOR
}

/// Rotation whose +Z points along `direction` with +Y as close to `up` as possible.
/// Degenerate directions give the identity.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Quat {
    if !direction.is_finite() || direction.length_squared() < LOOK_AT_MIN_LENGTH_SQ {
        return Quat::IDENTITY;
    }
    let forward = direction.normalize();
    match up.cross(forward).try_normalize() {
        Some(right) => {
            let true_up = forward.cross(right);
            Quat::from_mat3(&Mat3::from_cols(right, true_up, forward))
        }
        // Looking straight along `up`: any roll will do.
        None => Quat::from_rotation_arc(Vec3::Z, forward),
    }
}

#[inline]
fn swing_axis(mode: SwingDirection, tilt: f32) -> Vec3 {
    let (raw, principal) = match mode {
        SwingDirection::Horizontal => (Vec3::new(tilt, 0.0, 1.0), Vec3::Z),
        SwingDirection::Vertical => (Vec3::new(1.0, 0.0, tilt), Vec3::X),
    };
    raw.try_normalize().unwrap_or(principal)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
