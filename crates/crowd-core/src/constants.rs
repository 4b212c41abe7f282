use glam::{Vec2, Vec3};

// Shared crowd tuning constants used by the kernel, the evaluator and the frontends.

// Reaction hook (excite / soothe) bounds for the swing amplitude range
pub const MIN_SWING_ANGLE_VARIANCE: Vec2 = Vec2::new(0.1, 0.3);
pub const MAX_SWING_ANGLE_VARIANCE: Vec2 = Vec2::new(1.6, 1.6);
pub const EXCITEMENT_INCREMENT: f32 = 0.005; // per reaction, added to both range ends

// Per-instance seeding: seed = index * SEEDS_PER_INSTANCE + SEED_BASE
pub const SEED_BASE: u32 = 123;
pub const SEEDS_PER_INSTANCE: u32 = 2;

// Scheduling
pub const DEFAULT_CHUNK_SIZE: usize = 64; // instances handed to one worker at a time

// Kernel guards
pub const LOOK_AT_MIN_LENGTH_SQ: f32 = 1e-4; // below this the look direction is degenerate
pub const AXIS_NOISE_TIME_OFFSET: f32 = 100.0; // keeps axis noise away from the phase noise track
pub const WAVE_BRIGHTNESS_FLOOR: f32 = 0.1; // minimum wand brightness while the wave runs

// Debug footprint boxes
pub const FOOTPRINT_HEIGHT: f32 = 0.2;

// Flat tint used for the seated figures when packing GPU instances
pub const HUMAN_TINT: [f32; 4] = [0.18, 0.18, 0.22, 1.0];

// Reference block defaults
pub const DEFAULT_SEATS_PER_BLOCK: [i32; 2] = [12, 8];
pub const DEFAULT_SEAT_PITCH: Vec2 = Vec2::new(0.4, 0.8);
pub const DEFAULT_AISLE_WIDTH: Vec2 = Vec2::new(0.7, 1.2);
pub const DEFAULT_BASE_HUE: f32 = 300.0 / 360.0;
pub const DEFAULT_TARGET_POINT: Vec3 = Vec3::new(0.0, 0.0, 16.0);
