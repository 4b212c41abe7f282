//! Data-parallel fan-out of the instance kernel.
//!
//! The three output arrays are split into matching chunks and handed to
//! rayon workers. Every instance reads the shared, read-only block configs
//! and writes only its own slot, so no locking is involved. `evaluate`
//! returns only once every chunk has been written.

use crate::config::BlockConfig;
use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::CrowdError;
use crate::kernel::{evaluate_instance, InstanceSample};
use crate::layout::planar_position;
use crate::partition::SeatPartition;
use glam::{Mat4, Vec4};
use rayon::prelude::*;

/// Flat per-instance outputs, indexed by global instance index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrowdBuffers {
    pub human_matrices: Vec<Mat4>,
    pub penlight_matrices: Vec<Mat4>,
    pub penlight_colors: Vec<Vec4>,
}

impl CrowdBuffers {
    pub fn new(len: usize) -> Self {
        Self {
            human_matrices: vec![Mat4::IDENTITY; len],
            penlight_matrices: vec![Mat4::IDENTITY; len],
            penlight_colors: vec![Vec4::ZERO; len],
        }
    }

    pub fn len(&self) -> usize {
        self.human_matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.human_matrices.is_empty()
    }

    pub fn sample(&self, index: usize) -> Option<InstanceSample> {
        Some(InstanceSample {
            human: *self.human_matrices.get(index)?,
            penlight: *self.penlight_matrices.get(index)?,
            color: *self.penlight_colors.get(index)?,
        })
    }
}

/// Scheduling knobs.
///
/// - `chunk_size`: instances per rayon task; larger chunks cut task overhead,
///   smaller ones balance better across workers
/// - `worker_threads`: `None` runs on rayon's global pool, `Some(n)` on a
///   dedicated pool of `n` threads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluatorParams {
    pub chunk_size: usize,
    pub worker_threads: Option<usize>,
}

impl Default for EvaluatorParams {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            worker_threads: None,
        }
    }
}

pub struct ParallelEvaluator {
    chunk_size: usize,
    pool: Option<rayon::ThreadPool>,
}

impl ParallelEvaluator {
    pub fn new(params: EvaluatorParams) -> Result<Self, CrowdError> {
        let pool = match params.worker_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads.max(1))
                    .thread_name(|i| format!("crowd-worker-{i}"))
                    .build()?,
            ),
            None => None,
        };
        Ok(Self {
            chunk_size: params.chunk_size.max(1),
            pool,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn worker_count(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Evaluate every instance for `time` into `out`. Blocks until done.
    ///
    /// `configs` and `partition` must describe the same blocks and `out` must
    /// be sized to `partition.total()`; both are fixed at crowd setup.
    pub fn evaluate(&self, configs: &[BlockConfig], partition: &SeatPartition, time: f32, out: &mut CrowdBuffers) {
        assert_eq!(configs.len(), partition.len(), "config / partition mismatch");
        assert_eq!(out.len(), partition.total(), "output buffers not sized to the partition");

        let chunk_size = self.chunk_size;
        match &self.pool {
            Some(pool) => pool.install(|| fan_out(chunk_size, configs, partition, time, out)),
            None => fan_out(chunk_size, configs, partition, time, out),
        }
    }
}

fn fan_out(chunk_size: usize, configs: &[BlockConfig], partition: &SeatPartition, time: f32, out: &mut CrowdBuffers) {
    let CrowdBuffers {
        human_matrices,
        penlight_matrices,
        penlight_colors,
    } = out;

    human_matrices
        .par_chunks_mut(chunk_size)
        .zip(penlight_matrices.par_chunks_mut(chunk_size))
        .zip(penlight_colors.par_chunks_mut(chunk_size))
        .enumerate()
        .for_each(|(chunk_index, ((humans, penlights), colors))| {
            let start = chunk_index * chunk_size;
            let slots = humans.iter_mut().zip(penlights.iter_mut()).zip(colors.iter_mut());
            for (offset, ((human, penlight), color)) in slots.enumerate() {
                let sample = evaluate_index(configs, partition, start + offset, time);
                *human = sample.human;
                *penlight = sample.penlight;
                *color = sample.color;
            }
        });
}

/// Route a global index to its block and seat and run the kernel on it.
#[inline]
pub fn evaluate_index(configs: &[BlockConfig], partition: &SeatPartition, index: usize, time: f32) -> InstanceSample {
    let (block, local) = partition.locate(index);
    let config = &configs[block];
    let planar = planar_position(config, local);
    evaluate_instance(config, planar, time, index)
}
