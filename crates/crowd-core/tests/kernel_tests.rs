// Host-side tests for the instance kernel, noise and colour helpers.

use crowd_core::*;
use glam::{IVec2, Mat4, Quat, Vec2, Vec3, Vec4};

fn still_config() -> BlockConfig {
    BlockConfig {
        position_variance_xz: Vec2::ZERO,
        ..BlockConfig::default()
    }
}

fn brightness(color: Vec4) -> f32 {
    color.truncate().max_element()
}

#[test]
fn kernel_is_deterministic() {
    let config = BlockConfig {
        phase_noise_time_scale: 0.4,
        axis_noise_time_scale: 0.7,
        enable_wave_animation: true,
        ..BlockConfig::default()
    };
    for index in [0usize, 1, 17, 959] {
        let planar = planar_position(&config, index % config.total_seat_count());
        let a = evaluate_instance(&config, planar, 3.25, index);
        let b = evaluate_instance(&config, planar, 3.25, index);
        assert_eq!(a, b, "instance {index} differs between calls");
    }
}

#[test]
fn seeds_follow_instance_index() {
    assert_eq!(instance_seeds(0), (123, 124));
    assert_eq!(instance_seeds(1), (125, 126));
    assert_eq!(instance_seeds(10), (143, 144));
}

#[test]
fn human_faces_the_target() {
    let config = BlockConfig {
        target_point: Vec3::new(0.0, 0.0, 10.0),
        ..still_config()
    };
    let human = human_matrix(&config, Vec2::ZERO, 123);
    let forward = human.z_axis.truncate().normalize();
    assert!(forward.angle_between(Vec3::Z) < 1e-3, "forward was {forward}");

    let side = BlockConfig {
        target_point: Vec3::new(10.0, 0.0, 0.0),
        ..still_config()
    };
    let human = human_matrix(&side, Vec2::ZERO, 123);
    let forward = human.z_axis.truncate().normalize();
    assert!(forward.angle_between(Vec3::X) < 1e-3, "forward was {forward}");
}

#[test]
fn look_at_keeps_figures_upright() {
    let config = BlockConfig {
        target_point: Vec3::new(3.0, 6.0, 12.0),
        ..still_config()
    };
    let human = human_matrix(&config, Vec2::new(-2.0, 1.0), 321);
    let right = human.x_axis.truncate();
    assert!(right.y.abs() < 1e-4, "figure rolled: right axis {right}");
    assert!(human.y_axis.truncate().y > 0.0);
}

#[test]
fn degenerate_look_direction_gives_identity() {
    assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
    assert_eq!(look_rotation(Vec3::splat(1e-3), Vec3::Y), Quat::IDENTITY);
    assert_eq!(look_rotation(Vec3::new(f32::NAN, 0.0, 1.0), Vec3::Y), Quat::IDENTITY);

    // target on the figure's own seat
    let config = BlockConfig {
        target_point: Vec3::ZERO,
        ..still_config()
    };
    let human = human_matrix(&config, Vec2::ZERO, 123);
    assert!(human.abs_diff_eq(Mat4::IDENTITY, 1e-6));
}

#[test]
fn look_direction_parallel_to_up_stays_finite() {
    let q = look_rotation(Vec3::Y, Vec3::Y);
    assert!(q.is_finite());
    assert!((q * Vec3::Z).abs_diff_eq(Vec3::Y, 1e-4));
}

#[test]
fn disabled_look_at_leaves_rotation_identity() {
    let spawn = Mat4::from_rotation_translation(Quat::from_rotation_y(0.7), Vec3::new(4.0, 1.0, -2.0));
    let config = BlockConfig {
        spawn_transform: spawn,
        enable_look_at_target: false,
        ..still_config()
    };
    let human = human_matrix(&config, Vec2::new(0.5, 0.25), 999);
    let origin = spawn.transform_point3(Vec3::new(0.5, 0.0, 0.25));
    assert!(human.w_axis.truncate().abs_diff_eq(origin, 1e-5));
    assert!(human.z_axis.truncate().abs_diff_eq(Vec3::Z, 1e-6));
}

#[test]
fn wand_hangs_an_arm_length_from_the_shoulder() {
    let config = BlockConfig {
        shoulder_offset: Vec3::new(0.2, 1.0, 0.0),
        phase_noise_time_scale: 0.3,
        ..BlockConfig::default()
    };
    for index in 0..50usize {
        let planar = planar_position(&config, index);
        let (seed, _) = instance_seeds(index);
        let (human, penlight) = human_and_penlight_matrix(&config, planar, 1.7, seed);
        let shoulder = human.transform_point3(config.shoulder_offset);
        let arm = penlight.w_axis.truncate().distance(shoulder);
        let lo = config.swing_offset * config.arm_length_variance.x;
        let hi = config.swing_offset * config.arm_length_variance.y;
        assert!(arm >= lo - 1e-4 && arm <= hi + 1e-4, "arm {arm} of instance {index}");
    }
}

#[test]
fn zero_amplitude_keeps_wand_upright() {
    let config = BlockConfig {
        swing_angle_variance: Vec2::ZERO,
        ..still_config()
    };
    let human = human_matrix(&config, Vec2::ZERO, 123);
    let penlight = penlight_matrix(&config, &human, 2.0, 123);
    assert!(penlight
        .y_axis
        .truncate()
        .abs_diff_eq(human.y_axis.truncate(), 1e-5));
}

#[test]
fn swing_mode_picks_the_rotation_plane() {
    let base = BlockConfig {
        enable_look_at_target: false,
        swing_axis_tilt_factor: 0.0,
        swing_angle_variance: Vec2::splat(1.0),
        ..still_config()
    };
    let human = Mat4::IDENTITY;
    let time = 0.1;

    // Vertical swings pitch the wand about X, so it leans in Z only
    let vertical = penlight_matrix(&base, &human, time, 555);
    assert!(vertical.y_axis.x.abs() < 1e-5);

    // Horizontal swings roll it about Z, so it leans in X only
    let horizontal = BlockConfig {
        swing_mode: SwingDirection::Horizontal,
        ..base
    };
    let horizontal = penlight_matrix(&horizontal, &human, time, 555);
    assert!(horizontal.y_axis.z.abs() < 1e-5);
}

#[test]
fn colour_without_wave_has_full_value() {
    let config = BlockConfig {
        hue_variance: Vec2::ZERO,
        base_hue: 0.0,
        ..BlockConfig::default()
    };
    let color = penlight_color(&config, &Mat4::IDENTITY, 0.0, 124);
    assert!(color.abs_diff_eq(Vec4::new(1.0, 0.0, 0.0, 1.0), 1e-5));
}

#[test]
fn hue_is_clamped_into_range() {
    let config = BlockConfig {
        base_hue: 0.98,
        hue_variance: Vec2::new(0.1, 0.2),
        ..BlockConfig::default()
    };
    // hue clamps to 1.0, which is red again
    let color = penlight_color(&config, &Mat4::IDENTITY, 0.0, 124);
    assert!(color.abs_diff_eq(Vec4::new(1.0, 0.0, 0.0, 1.0), 1e-5));
}

#[test]
fn hue_varies_across_instances() {
    let config = BlockConfig::default();
    let colors: Vec<Vec4> = (0..100usize)
        .map(|i| penlight_color(&config, &Mat4::IDENTITY, 0.0, instance_seeds(i).1))
        .collect();
    assert!(colors.iter().any(|c| !c.abs_diff_eq(colors[0], 1e-4)));
}

#[test]
fn wave_brightness_stays_within_bounds() {
    let config = BlockConfig {
        enable_wave_animation: true,
        wave_intensity: 3.0,
        ..BlockConfig::default()
    };
    let position = Vec3::new(2.0, 0.0, 5.0);
    let floor = 0.1;
    let ceiling = config.wave_intensity + 0.1;
    let period = std::f32::consts::TAU / config.wave_speed;

    let mut lowest = f32::MAX;
    let mut highest = f32::MIN;
    for step in 0..2_000 {
        let time = period * step as f32 / 2_000.0;
        let b = wave_brightness(&config, position, time);
        assert!(b >= floor - 1e-5 && b <= ceiling + 1e-5, "brightness {b} at t={time}");
        lowest = lowest.min(b);
        highest = highest.max(b);
    }
    assert!(lowest < floor + 0.01 * config.wave_intensity);
    assert!(highest > ceiling - 0.01 * config.wave_intensity);
}

#[test]
fn wave_drives_colour_value() {
    let config = BlockConfig {
        enable_wave_animation: true,
        ..BlockConfig::default()
    };
    let penlight = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let color = penlight_color(&config, &penlight, 0.8, 10);
    let expected = wave_brightness(&config, Vec3::new(1.0, 2.0, 3.0), 0.8);
    assert!((brightness(color) - expected).abs() < 1e-3 * expected.max(1.0));
    assert_eq!(color.w, 1.0);
}

#[test]
fn kernel_output_is_finite_over_time() {
    let config = BlockConfig {
        phase_noise_time_scale: 1.3,
        axis_noise_time_scale: 0.9,
        enable_wave_animation: true,
        ..BlockConfig::default()
    };
    for index in 0..config.total_seat_count() {
        let planar = planar_position(&config, index);
        for time in [0.0, 0.016, 12.5, 3600.0] {
            let s = evaluate_instance(&config, planar, time, index);
            assert!(s.human.is_finite() && s.penlight.is_finite() && s.color.is_finite());
        }
    }
}

#[test]
fn noise_is_bounded_and_continuous() {
    let mut seen_positive = false;
    let mut seen_negative = false;
    for i in 0..200 {
        for j in 0..50 {
            let p = Vec2::new(i as f32 * 0.137 - 7.0, j as f32 * 0.291 - 3.0);
            let n = simplex2(p);
            assert!((-1.0..=1.0).contains(&n), "noise {n} at {p}");
            let nudged = simplex2(p + Vec2::splat(1e-3));
            assert!((n - nudged).abs() < 0.05, "jump at {p}");
            seen_positive |= n > 0.1;
            seen_negative |= n < -0.1;
        }
    }
    assert!(seen_positive && seen_negative);
}

#[test]
fn noise_ignores_non_finite_input() {
    assert_eq!(simplex2(Vec2::new(f32::NAN, 0.0)), 0.0);
    assert_eq!(simplex2(Vec2::new(0.0, f32::INFINITY)), 0.0);
}

#[test]
fn hsv_primaries() {
    assert!(hsv_to_rgb(0.0, 1.0, 1.0).abs_diff_eq(Vec3::X, 1e-5));
    assert!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0).abs_diff_eq(Vec3::Y, 1e-5));
    assert!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0).abs_diff_eq(Vec3::Z, 1e-5));
    assert!(hsv_to_rgb(0.3, 0.0, 0.5).abs_diff_eq(Vec3::splat(0.5), 1e-6));
}

#[test]
fn hsv_value_is_not_clamped() {
    let rgb = hsv_to_rgb(0.5, 1.0, 5.0);
    assert!((rgb.max_element() - 5.0).abs() < 1e-5);
}

#[test]
fn random_configs_never_produce_non_finite_output() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..40 {
        let lo: f32 = rng.gen_range(0.0..1.0);
        let config = BlockConfig {
            seats_per_block: IVec2::new(rng.gen_range(1..6), rng.gen_range(1..6)),
            block_count: IVec2::new(rng.gen_range(1..4), rng.gen_range(1..4)),
            swing_frequency: rng.gen_range(0.0..3.0),
            swing_mode: if rng.gen_bool(0.5) {
                SwingDirection::Horizontal
            } else {
                SwingDirection::Vertical
            },
            swing_angle_variance: Vec2::new(lo, lo + rng.gen_range(0.0..1.0)),
            phase_noise_time_scale: rng.gen_range(0.0..2.0),
            axis_noise_time_scale: rng.gen_range(0.0..2.0),
            swing_axis_tilt_factor: rng.gen_range(0.0..5.0),
            enable_wave_animation: rng.gen_bool(0.5),
            enable_look_at_target: rng.gen_bool(0.8),
            target_point: Vec3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(0.0..5.0),
                rng.gen_range(-20.0..20.0),
            ),
            ..BlockConfig::default()
        };
        let time = rng.gen_range(0.0..600.0);
        for index in 0..config.total_seat_count() {
            let planar = planar_position(&config, index);
            let s = evaluate_instance(&config, planar, time, index);
            assert!(s.human.is_finite() && s.penlight.is_finite() && s.color.is_finite());
            if config.enable_wave_animation {
                let value = brightness(s.color);
                assert!(value >= 0.1 - 1e-4 && value <= config.wave_intensity + 0.1 + 1e-3);
            }
        }
    }
}
