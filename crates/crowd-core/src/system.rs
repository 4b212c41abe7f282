//! Frame orchestration for the crowd.
//!
//! Each frame runs four phases strictly in order:
//! 1. refresh: apply queued reactions, re-sample live spawn/target transforms
//! 2. evaluate: parallel fan-out of the kernel over every instance
//! 3. upload: pack outputs and hand them to the renderer
//! 4. draw: one batch per block
//!
//! All configs and output arrays are created in [`CrowdSystem::new`] and
//! mutated in place afterwards; nothing is reallocated per frame.

use crate::config::BlockConfig;
use crate::error::CrowdError;
use crate::evaluator::{CrowdBuffers, EvaluatorParams, ParallelEvaluator};
use crate::partition::SeatPartition;
use crate::reaction::{Reaction, ReactionHandle};
use crate::render::{pack_instances, CrowdRenderer, DrawBatch, InstanceRaw};
use bytemuck::Zeroable;
use glam::{Mat4, Vec3};
use instant::Instant;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// A live world transform, sampled once per frame before the fan-out.
pub trait TransformSource: Send {
    fn world_matrix(&mut self, time: f32) -> Mat4;
}

impl<F> TransformSource for F
where
    F: FnMut(f32) -> Mat4 + Send,
{
    fn world_matrix(&mut self, time: f32) -> Mat4 {
        self(time)
    }
}

/// A transform that never moves.
pub fn fixed(matrix: Mat4) -> impl TransformSource {
    move |_time: f32| matrix
}

/// Setup record for one block: its config plus the live transforms that
/// drive its spawn origin and look/wave target.
pub struct AudienceBlock {
    pub config: BlockConfig,
    pub spawn: Box<dyn TransformSource>,
    pub target: Box<dyn TransformSource>,
}

impl AudienceBlock {
    /// Block whose spawn and target stay where the config puts them.
    pub fn new(config: BlockConfig) -> Self {
        let spawn = config.spawn_transform;
        let target = Mat4::from_translation(config.target_point);
        Self {
            config,
            spawn: Box::new(fixed(spawn)),
            target: Box::new(fixed(target)),
        }
    }

    pub fn with_spawn(mut self, source: impl TransformSource + 'static) -> Self {
        self.spawn = Box::new(source);
        self
    }

    pub fn with_target(mut self, source: impl TransformSource + 'static) -> Self {
        self.target = Box::new(source);
        self
    }
}

/// Crowd-wide settings.
///
/// `shoulder_offset` is shared by every block and overwrites whatever the
/// individual configs carry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CrowdSettings {
    pub shoulder_offset: Vec3,
    pub evaluator: EvaluatorParams,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub time: f32,
    pub instances: usize,
    pub batches: usize,
    pub reactions_applied: usize,
    pub evaluate_time: Duration,
}

pub struct CrowdSystem {
    configs: Vec<BlockConfig>,
    spawn_sources: Vec<Box<dyn TransformSource>>,
    target_sources: Vec<Box<dyn TransformSource>>,
    partition: SeatPartition,
    evaluator: ParallelEvaluator,
    buffers: CrowdBuffers,
    human_instances: Vec<InstanceRaw>,
    penlight_instances: Vec<InstanceRaw>,
    reactions_tx: Sender<Reaction>,
    reactions_rx: Receiver<Reaction>,
}

impl CrowdSystem {
    pub fn new(blocks: Vec<AudienceBlock>, settings: CrowdSettings) -> Result<Self, CrowdError> {
        let mut configs = Vec::with_capacity(blocks.len());
        let mut spawn_sources = Vec::with_capacity(blocks.len());
        let mut target_sources = Vec::with_capacity(blocks.len());
        for (index, block) in blocks.into_iter().enumerate() {
            let AudienceBlock {
                mut config,
                spawn,
                target,
            } = block;
            config.shoulder_offset = settings.shoulder_offset;
            config.validate(index)?;
            configs.push(config);
            spawn_sources.push(spawn);
            target_sources.push(target);
        }

        let partition = SeatPartition::from_configs(&configs);
        let evaluator = ParallelEvaluator::new(settings.evaluator)?;
        let total = partition.total();
        let (reactions_tx, reactions_rx) = mpsc::channel();

        if configs.is_empty() {
            log::warn!("[crowd] no blocks configured; frames will be no-ops");
        }
        log::info!(
            "[crowd] blocks={} instances={} chunk={} workers={}",
            configs.len(),
            total,
            evaluator.chunk_size(),
            evaluator.worker_count()
        );

        let mut system = Self {
            configs,
            spawn_sources,
            target_sources,
            partition,
            evaluator,
            buffers: CrowdBuffers::new(total),
            human_instances: vec![InstanceRaw::zeroed(); total],
            penlight_instances: vec![InstanceRaw::zeroed(); total],
            reactions_tx,
            reactions_rx,
        };
        system.refresh_transforms(0.0);
        Ok(system)
    }

    pub fn configs(&self) -> &[BlockConfig] {
        &self.configs
    }

    pub fn partition(&self) -> &SeatPartition {
        &self.partition
    }

    pub fn instance_count(&self) -> usize {
        self.partition.total()
    }

    /// Outputs of the most recent [`evaluate`](Self::evaluate).
    pub fn buffers(&self) -> &CrowdBuffers {
        &self.buffers
    }

    pub fn human_instances(&self) -> &[InstanceRaw] {
        &self.human_instances
    }

    pub fn penlight_instances(&self) -> &[InstanceRaw] {
        &self.penlight_instances
    }

    pub fn reaction_handle(&self) -> ReactionHandle {
        ReactionHandle::new(self.reactions_tx.clone())
    }

    pub fn excite(&mut self) {
        self.apply_reaction(Reaction::Excite);
    }

    pub fn soothe(&mut self) {
        self.apply_reaction(Reaction::Soothe);
    }

    pub fn apply_reaction(&mut self, reaction: Reaction) {
        if reaction.apply(&mut self.configs) {
            log::debug!("[crowd] {:?} clamped at swing amplitude bound", reaction);
        }
    }

    /// Drain reactions queued through [`ReactionHandle`]s, in arrival order.
    pub fn apply_pending_reactions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(reaction) = self.reactions_rx.try_recv() {
            self.apply_reaction(reaction);
            applied += 1;
        }
        applied
    }

    /// Phase 1. Returns how many queued reactions were applied.
    pub fn refresh(&mut self, time: f32) -> usize {
        let applied = self.apply_pending_reactions();
        self.refresh_transforms(time);
        applied
    }

    fn refresh_transforms(&mut self, time: f32) {
        let sources = self.spawn_sources.iter_mut().zip(self.target_sources.iter_mut());
        for (index, (config, (spawn, target))) in self.configs.iter_mut().zip(sources).enumerate() {
            let spawn_matrix = spawn.world_matrix(time);
            if spawn_matrix.is_finite() {
                config.spawn_transform = spawn_matrix;
            } else {
                log::warn!("[crowd] block {index}: non-finite spawn transform; keeping previous");
            }

            let target_point = target.world_matrix(time).w_axis.truncate();
            if target_point.is_finite() {
                config.target_point = target_point;
            } else {
                log::warn!("[crowd] block {index}: non-finite target point; keeping previous");
            }
        }
    }

    /// Phase 2. Blocks until every instance has been written.
    pub fn evaluate(&mut self, time: f32) -> Duration {
        let started = Instant::now();
        self.evaluator
            .evaluate(&self.configs, &self.partition, time, &mut self.buffers);
        started.elapsed()
    }

    /// One batch per block, in block order.
    pub fn draw_batches(&self) -> impl Iterator<Item = DrawBatch> + '_ {
        (0..self.partition.len()).map(move |block| {
            let range = self.partition.range(block);
            DrawBatch {
                block,
                start: range.start,
                count: range.len(),
            }
        })
    }

    /// Phases 3 and 4.
    pub fn present<R: CrowdRenderer + ?Sized>(&mut self, renderer: &mut R) -> usize {
        pack_instances(
            &self.buffers,
            &mut self.human_instances,
            &mut self.penlight_instances,
        );
        renderer.upload(&self.human_instances, &self.penlight_instances);
        let mut batches = 0;
        for batch in self.draw_batches() {
            renderer.draw(batch);
            batches += 1;
        }
        batches
    }

    /// Run one full frame at `time` seconds.
    pub fn tick<R: CrowdRenderer + ?Sized>(&mut self, time: f32, renderer: &mut R) -> FrameStats {
        let reactions_applied = self.refresh(time);
        let evaluate_time = self.evaluate(time);
        let batches = self.present(renderer);
        log::debug!(
            "[crowd] t={:.3} instances={} batches={} eval={:?}",
            time,
            self.instance_count(),
            batches,
            evaluate_time
        );
        FrameStats {
            time,
            instances: self.instance_count(),
            batches,
            reactions_applied,
            evaluate_time,
        }
    }
}
