// Host-side tests for block config defaults, serde and constants.

use crowd_core::*;
use glam::{IVec2, Vec2, Vec3};

#[test]
fn defaults_match_reference_values() {
    let config = BlockConfig::default();
    assert_eq!(config.seats_per_block, IVec2::new(12, 8));
    assert_eq!(config.block_count, IVec2::ONE);
    assert_eq!(config.total_seat_count(), 96);
    assert_eq!(config.swing_mode, SwingDirection::Vertical);
    assert_eq!(config.swing_angle_variance, Vec2::new(0.3, 0.5));
    assert_eq!(config.target_point, Vec3::new(0.0, 0.0, 16.0));
    assert!((config.base_hue - 300.0 / 360.0).abs() < 1e-6);
    assert!(config.enable_look_at_target);
    assert!(!config.enable_wave_animation);
    assert!(config.validate(0).is_ok());
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn reaction_bounds_are_ordered() {
    assert!(MIN_SWING_ANGLE_VARIANCE.cmplt(MAX_SWING_ANGLE_VARIANCE).all());
    assert!(EXCITEMENT_INCREMENT > 0.0);
    assert!(WAVE_BRIGHTNESS_FLOOR > 0.0);
    assert!(DEFAULT_CHUNK_SIZE > 0);
    let defaults = BlockConfig::default().swing_angle_variance;
    assert!(defaults.cmpge(MIN_SWING_ANGLE_VARIANCE).all());
    assert!(defaults.cmple(MAX_SWING_ANGLE_VARIANCE).all());
}

#[test]
fn nudge_reports_clamping() {
    let mut config = BlockConfig {
        swing_angle_variance: Vec2::new(1.598, 1.598),
        ..BlockConfig::default()
    };
    assert!(config.nudge_swing_amplitude(EXCITEMENT_INCREMENT));
    assert_eq!(config.swing_angle_variance, MAX_SWING_ANGLE_VARIANCE);
    assert!(!config.nudge_swing_amplitude(-EXCITEMENT_INCREMENT));
}

#[test]
fn partial_json_fills_in_defaults() {
    let json = r#"{
        "seats_per_block": [6, 4],
        "block_count": [2, 2],
        "swing_mode": "Horizontal",
        "enable_wave_animation": true
    }"#;
    let config: BlockConfig = serde_json::from_str(json).expect("parse");
    assert_eq!(config.seats_per_block, IVec2::new(6, 4));
    assert_eq!(config.total_seat_count(), 96);
    assert_eq!(config.swing_mode, SwingDirection::Horizontal);
    assert!(config.enable_wave_animation);
    assert_eq!(config.seat_pitch, BlockConfig::default().seat_pitch);
    assert_eq!(config.wave_intensity, BlockConfig::default().wave_intensity);
}

#[test]
fn config_survives_json() {
    let config = BlockConfig {
        base_hue: 0.4,
        target_point: Vec3::new(1.0, 2.0, 3.0),
        ..BlockConfig::default()
    };
    let text = serde_json::to_string(&config).expect("serialize");
    let back: BlockConfig = serde_json::from_str(&text).expect("parse");
    assert_eq!(back, config);
}

#[test]
fn sub_block_and_total_counts() {
    let config = BlockConfig {
        seats_per_block: IVec2::new(5, 3),
        block_count: IVec2::new(4, 2),
        ..BlockConfig::default()
    };
    assert_eq!(config.seats_per_sub_block(), 15);
    assert_eq!(config.total_seat_count(), 120);
}
