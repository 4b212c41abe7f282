//! Crowd layouts for the native demo: a built-in three-block arena with live
//! (animated) transforms, or a list of block configs loaded from JSON.

use crowd_core::{block_footprints, AudienceBlock, BlockConfig, InstanceRaw, SwingDirection};
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use std::path::Path;

// Stage the crowd faces; also the wave origin
pub const STAGE_HEIGHT: f32 = 1.5;
pub const STAGE_SWEEP: f32 = 4.0; // how far the spotlight target drifts sideways
pub const STAGE_SWEEP_SPEED: f32 = 0.3;

pub const SHOULDER_OFFSET: Vec3 = Vec3::new(0.18, 0.95, 0.0);

const SLAB_TINT: [f32; 4] = [0.08, 0.09, 0.12, 1.0];

fn stage_target(time: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(
        (time * STAGE_SWEEP_SPEED).sin() * STAGE_SWEEP,
        STAGE_HEIGHT,
        0.0,
    ))
}

/// Floor block in front of the stage plus two raked side stands.
pub fn default_arena() -> Vec<AudienceBlock> {
    let floor = BlockConfig {
        spawn_transform: Mat4::from_translation(Vec3::new(0.0, 0.0, 14.0)),
        seats_per_block: glam::IVec2::new(12, 8),
        block_count: glam::IVec2::new(3, 2),
        enable_wave_animation: true,
        wave_intensity: 3.0,
        phase_noise_time_scale: 0.2,
        axis_noise_time_scale: 0.35,
        ..BlockConfig::default()
    };

    let left = BlockConfig {
        spawn_transform: Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(-18.0, 2.0, 10.0),
        ),
        seats_per_block: glam::IVec2::new(10, 6),
        block_count: glam::IVec2::new(1, 3),
        swing_mode: SwingDirection::Horizontal,
        base_hue: 0.55,
        hue_variance: Vec2::new(-0.05, 0.05),
        swing_frequency: 0.75,
        ..BlockConfig::default()
    };

    let right_base = Mat4::from_rotation_translation(
        Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        Vec3::new(18.0, 2.0, 10.0),
    );
    let right = BlockConfig {
        spawn_transform: right_base,
        seats_per_block: glam::IVec2::new(10, 6),
        block_count: glam::IVec2::new(1, 3),
        base_hue: 0.12,
        hue_variance: Vec2::new(-0.04, 0.04),
        enable_wave_animation: true,
        wave_intensity: 2.0,
        wave_speed: 4.0,
        ..BlockConfig::default()
    };

    vec![
        AudienceBlock::new(floor).with_target(stage_target),
        AudienceBlock::new(left).with_target(stage_target),
        AudienceBlock::new(right)
            .with_spawn(move |time: f32| {
                // the right stand sways gently, like a moving platform
                let lift = (time * 0.5).sin() * 0.3;
                Mat4::from_translation(Vec3::new(0.0, lift, 0.0)) * right_base
            })
            .with_target(stage_target),
    ]
}

/// Load a JSON array of block configs. Missing fields take their defaults.
pub fn load_arena(path: &Path) -> anyhow::Result<Vec<AudienceBlock>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
    let configs: Vec<BlockConfig> = serde_json::from_str(&text)?;
    log::info!("[arena] loaded {} blocks from {}", configs.len(), path.display());
    Ok(configs.into_iter().map(AudienceBlock::new).collect())
}

/// World-space floor slabs under every sub-block, for the current spawn transforms.
pub fn footprint_instances(configs: &[BlockConfig], out: &mut Vec<InstanceRaw>) {
    out.clear();
    let tint = Vec4::from_array(SLAB_TINT);
    for config in configs {
        for footprint in block_footprints(config) {
            let local = Mat4::from_scale_rotation_translation(
                footprint.size,
                Quat::IDENTITY,
                footprint.center,
            );
            out.push(InstanceRaw::new(&(config.spawn_transform * local), tint));
        }
    }
}
