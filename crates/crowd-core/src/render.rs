//! GPU-facing side of the crowd: packed instance records, per-block draw
//! batches and the trait a draw/transfer layer implements.

use crate::constants::HUMAN_TINT;
use crate::evaluator::CrowdBuffers;
use glam::{Mat4, Vec4};
use std::ops::Range;

/// One instanced-draw record: column-major model matrix plus colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    #[inline]
    pub fn new(model: &Mat4, color: Vec4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_array(),
        }
    }
}

/// A contiguous slice of the instance arrays owned by one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawBatch {
    pub block: usize,
    pub start: usize,
    pub count: usize,
}

impl DrawBatch {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }
}

/// The draw/transfer layer. `upload` is called once per frame with the full
/// arrays, then `draw` once per block.
pub trait CrowdRenderer {
    fn upload(&mut self, humans: &[InstanceRaw], penlights: &[InstanceRaw]);
    fn draw(&mut self, batch: DrawBatch);
}

/// Renderer that drops everything; useful for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl CrowdRenderer for NullRenderer {
    fn upload(&mut self, _humans: &[InstanceRaw], _penlights: &[InstanceRaw]) {}
    fn draw(&mut self, _batch: DrawBatch) {}
}

/// Pack kernel outputs into upload records. Figures get a flat tint; wands
/// carry their computed colour.
pub fn pack_instances(buffers: &CrowdBuffers, humans: &mut [InstanceRaw], penlights: &mut [InstanceRaw]) {
    let tint = Vec4::from_array(HUMAN_TINT);
    for (human, model) in humans.iter_mut().zip(&buffers.human_matrices) {
        *human = InstanceRaw::new(model, tint);
    }
    let wands = buffers.penlight_matrices.iter().zip(&buffers.penlight_colors);
    for (penlight, (model, color)) in penlights.iter_mut().zip(wands) {
        *penlight = InstanceRaw::new(model, *color);
    }
}
