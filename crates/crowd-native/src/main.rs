mod arena;
mod camera;
mod gpu;
mod mesh;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use crowd_core::{CrowdSettings, CrowdSystem, EvaluatorParams, InstanceRaw, ReactionHandle};
use rand::prelude::*;

use crate::gpu::GpuState;

// Simulated rhythm-game judgments feeding the reaction hook
const JUDGMENT_INTERVAL_MS: u64 = 180;
const JUDGMENT_HIT_RATE: f64 = 0.7;

const STATS_LOG_EVERY_FRAMES: u64 = 300;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let blocks = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => arena::load_arena(&path)?,
        None => arena::default_arena(),
    };
    let mut crowd = CrowdSystem::new(
        blocks,
        CrowdSettings {
            shoulder_offset: arena::SHOULDER_OFFSET,
            evaluator: EvaluatorParams::default(),
        },
    )?;

    let mut slabs: Vec<InstanceRaw> = Vec::new();
    arena::footprint_instances(crowd.configs(), &mut slabs);

    // Gameplay judgments arrive off the frame thread
    let _judgments = spawn_judgment_thread(crowd.reaction_handle());

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Light-wand crowd (native)")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(
        &window,
        crowd.instance_count(),
        slabs.len(),
    ))?;
    let start = Instant::now();
    let mut frames: u64 = 0;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => match logical_key {
            Key::Named(NamedKey::ArrowUp) => crowd.excite(),
            Key::Named(NamedKey::ArrowDown) => crowd.soothe(),
            Key::Named(NamedKey::Escape) => elwt.exit(),
            _ => {}
        },
        Event::AboutToWait => {
            let time = start.elapsed().as_secs_f32();
            let stats = crowd.tick(time, &mut state);
            arena::footprint_instances(crowd.configs(), &mut slabs);
            state.upload_slabs(&slabs);

            frames += 1;
            if frames % STATS_LOG_EVERY_FRAMES == 0 {
                log::info!(
                    "[frame {}] instances={} batches={} eval={:?} swing={:?}",
                    frames,
                    stats.instances,
                    stats.batches,
                    stats.evaluate_time,
                    crowd.configs().first().map(|c| c.swing_angle_variance)
                );
            }

            match state.render(time) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}

fn spawn_judgment_thread(reactions: ReactionHandle) -> Option<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("judgment".into())
        .spawn(move || {
            let mut rng = StdRng::seed_from_u64(42);
            loop {
                if rng.gen_bool(JUDGMENT_HIT_RATE) {
                    reactions.excite();
                } else {
                    reactions.soothe();
                }
                thread::sleep(Duration::from_millis(JUDGMENT_INTERVAL_MS));
            }
        })
        .ok()
}
