use glam::IVec2;
use thiserror::Error;

/// Setup-time failures. The per-frame path has no error conditions.
#[derive(Debug, Error)]
pub enum CrowdError {
    #[error("block {block}: seats per block {seats_per_block} must be positive on both axes")]
    InvalidSeatGrid { block: usize, seats_per_block: IVec2 },

    #[error("block {block}: block count {block_count} must be positive on both axes")]
    InvalidBlockCount { block: usize, block_count: IVec2 },

    #[error("block {block}: {field} is not finite")]
    NonFinite { block: usize, field: &'static str },

    #[error("block {block}: seat count overflows the instance index range")]
    SeatCountOverflow { block: usize },

    #[error("failed to build crowd worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
