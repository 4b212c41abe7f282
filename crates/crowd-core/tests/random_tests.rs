// Host-side tests for the per-instance generator.

use crowd_core::*;
use glam::Vec2;
use rand::{Rng, RngCore, SeedableRng};

#[test]
fn same_seed_gives_same_sequence() {
    let mut a = SeatRng::for_instance(123);
    let mut b = SeatRng::for_instance(123);
    for _ in 0..64 {
        assert_eq!(a.next_u32(), b.next_u32());
    }
}

#[test]
fn adjacent_seeds_diverge_after_discard() {
    let mut a = SeatRng::for_instance(123);
    let mut b = SeatRng::for_instance(125);
    let draws_a: Vec<f32> = (0..8).map(|_| a.next_f32()).collect();
    let draws_b: Vec<f32> = (0..8).map(|_| b.next_f32()).collect();
    assert_ne!(draws_a, draws_b);
}

#[test]
fn discard_skips_four_draws() {
    let mut skipped = SeatRng::new(77);
    skipped.discard();
    let mut stepped = SeatRng::new(77);
    for _ in 0..4 {
        stepped.next_u32();
    }
    assert_eq!(skipped, stepped);
    assert_eq!(SeatRng::for_instance(77), skipped);
}

#[test]
fn unit_floats_stay_in_half_open_range() {
    let mut rng = SeatRng::for_instance(9);
    for _ in 0..10_000 {
        let x = rng.next_f32();
        assert!((0.0..1.0).contains(&x), "draw {x} out of [0, 1)");
    }
}

#[test]
fn ranged_draws_respect_bounds() {
    let mut rng = SeatRng::for_instance(4242);
    let range = Vec2::new(-0.15, 0.15);
    for _ in 0..5_000 {
        let x = rng.next_in(range);
        assert!(x >= range.x && x < range.y, "draw {x} out of {range}");
        let v = rng.next_vec2_in(Vec2::new(0.9, 1.1));
        assert!(v.cmpge(Vec2::splat(0.9)).all() && v.cmplt(Vec2::splat(1.1)).all());
    }
}

#[test]
fn empty_range_collapses_to_its_start() {
    let mut rng = SeatRng::for_instance(5);
    assert_eq!(rng.next_in(Vec2::new(0.4, 0.4)), 0.4);
    assert_eq!(rng.next_vec2_in(Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn zero_seed_does_not_stick() {
    let mut rng = SeatRng::new(0);
    let draws: Vec<u32> = (0..4).map(|_| rng.next_u32()).collect();
    assert!(draws.iter().all(|&d| d != 0));
}

#[test]
fn works_as_a_rand_generator() {
    let mut rng = SeatRng::seed_from_u64(31);
    let mut bytes = [0u8; 11];
    rng.fill_bytes(&mut bytes);
    assert!(bytes.iter().any(|&b| b != 0));
    for _ in 0..100 {
        let roll: u32 = rng.gen_range(1..=6);
        assert!((1..=6).contains(&roll));
    }
}

#[test]
fn mean_of_unit_draws_is_centred() {
    let mut rng = SeatRng::for_instance(2024);
    let n = 20_000;
    let mean = (0..n).map(|_| rng.next_f32()).sum::<f32>() / n as f32;
    assert!((mean - 0.5).abs() < 0.02, "mean was {mean}");
}
