//! Per-block crowd configuration.
//!
//! One [`BlockConfig`] describes a seating area: where it sits in the world,
//! how its seats are tiled, and the tunables the instance kernel reads for
//! swing, colour and the brightness wave. The spawn transform and target
//! point are overwritten every frame from live transforms; everything else is
//! fixed after setup except the swing amplitude range, which the reaction
//! hook nudges between frames.

use crate::constants::*;
use crate::error::CrowdError;
use glam::{IVec2, Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Principal axis the light wand swings around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingDirection {
    /// Swing left-right, rotating around the figure's forward (Z) axis.
    Horizontal,
    /// Swing forward-back, rotating around the figure's right (X) axis.
    #[default]
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// World placement of the block's seating origin.
    pub spawn_transform: Mat4,
    /// Offset from a seated figure's origin to its shoulder.
    pub shoulder_offset: Vec3,

    /// Seat grid of one sub-block (columns, rows).
    pub seats_per_block: IVec2,
    /// Spacing between neighbouring seats (x, z).
    pub seat_pitch: Vec2,
    /// Number of sub-blocks tiled in x and z.
    pub block_count: IVec2,
    /// Gap between neighbouring sub-blocks (x, z).
    pub aisle_width: Vec2,

    pub swing_frequency: f32,
    /// Arm length: distance from shoulder to wand.
    pub swing_offset: f32,

    pub base_hue: f32,
    pub hue_variance: Vec2,

    pub swing_mode: SwingDirection,
    /// Seat position jitter, as a fraction of the seat pitch.
    pub position_variance_xz: Vec2,
    /// Swing amplitude range in radians.
    pub swing_angle_variance: Vec2,
    /// Arm length multiplier range.
    pub arm_length_variance: Vec2,

    pub phase_noise_time_scale: f32,
    pub axis_noise_time_scale: f32,
    pub noise_seed_range: Vec2,
    /// How far the swing axis wobbles off its principal axis (0 = never).
    pub swing_axis_tilt_factor: f32,

    pub enable_wave_animation: bool,
    pub enable_look_at_target: bool,
    /// Look-at target and brightness wave origin, in world space.
    pub target_point: Vec3,
    pub wave_speed: f32,
    pub wave_frequency: f32,
    pub wave_intensity: f32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            spawn_transform: Mat4::IDENTITY,
            shoulder_offset: Vec3::ZERO,

            seats_per_block: IVec2::from_array(DEFAULT_SEATS_PER_BLOCK),
            seat_pitch: DEFAULT_SEAT_PITCH,
            block_count: IVec2::ONE,
            aisle_width: DEFAULT_AISLE_WIDTH,

            swing_frequency: 0.5,
            swing_offset: 0.3,

            base_hue: DEFAULT_BASE_HUE,
            hue_variance: Vec2::new(-0.15, 0.15),

            swing_mode: SwingDirection::Vertical,
            position_variance_xz: Vec2::new(-0.01, 0.01),
            swing_angle_variance: Vec2::new(0.3, 0.5),
            arm_length_variance: Vec2::new(0.9, 1.1),

            phase_noise_time_scale: 0.0,
            axis_noise_time_scale: 0.0,
            noise_seed_range: Vec2::new(0.0, 0.4),
            swing_axis_tilt_factor: 0.2,

            enable_wave_animation: false,
            enable_look_at_target: true,
            target_point: DEFAULT_TARGET_POINT,
            wave_speed: 2.8,
            wave_frequency: 0.53,
            wave_intensity: 50.0,
        }
    }
}

impl BlockConfig {
    /// Seats in one sub-block.
    #[inline]
    pub fn seats_per_sub_block(&self) -> usize {
        (self.seats_per_block.x.max(0) as usize) * (self.seats_per_block.y.max(0) as usize)
    }

    /// Seats in the whole tiled block. Fixed for the lifetime of a crowd.
    #[inline]
    pub fn total_seat_count(&self) -> usize {
        self.seats_per_sub_block()
            * (self.block_count.x.max(0) as usize)
            * (self.block_count.y.max(0) as usize)
    }

    /// Check the shape and placement fields. `block` is only used for error context.
    pub fn validate(&self, block: usize) -> Result<(), CrowdError> {
        if self.seats_per_block.cmple(IVec2::ZERO).any() {
            return Err(CrowdError::InvalidSeatGrid {
                block,
                seats_per_block: self.seats_per_block,
            });
        }
        if self.block_count.cmple(IVec2::ZERO).any() {
            return Err(CrowdError::InvalidBlockCount {
                block,
                block_count: self.block_count,
            });
        }
        let total = self
            .seats_per_block
            .x
            .checked_mul(self.seats_per_block.y)
            .and_then(|n| n.checked_mul(self.block_count.x))
            .and_then(|n| n.checked_mul(self.block_count.y));
        if total.is_none() {
            return Err(CrowdError::SeatCountOverflow { block });
        }

        let finite_fields: [(&'static str, bool); 4] = [
            ("seat_pitch", self.seat_pitch.is_finite()),
            ("aisle_width", self.aisle_width.is_finite()),
            ("spawn_transform", self.spawn_transform.is_finite()),
            ("shoulder_offset", self.shoulder_offset.is_finite()),
        ];
        for (field, ok) in finite_fields {
            if !ok {
                return Err(CrowdError::NonFinite { block, field });
            }
        }
        Ok(())
    }

    /// Step the swing amplitude range by `delta` on both ends, clamped to the
    /// reaction bounds. Returns `true` when the clamp engaged.
    pub fn nudge_swing_amplitude(&mut self, delta: f32) -> bool {
        let wanted = self.swing_angle_variance + Vec2::splat(delta);
        let clamped = wanted.clamp(MIN_SWING_ANGLE_VARIANCE, MAX_SWING_ANGLE_VARIANCE);
        self.swing_angle_variance = clamped;
        clamped != wanted
    }
}
