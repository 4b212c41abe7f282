//! Seat layout: local instance index -> (sub-block, seat) -> planar offset.
//!
//! A block is a grid of `block_count` sub-blocks, each holding a grid of
//! `seats_per_block` seats. Indices fill one sub-block row-major before moving
//! on to the next sub-block, also row-major. Planar positions are (x, z)
//! offsets from the block's spawn origin with the whole tiled group centred on
//! that origin.

use crate::config::BlockConfig;
use crate::constants::FOOTPRINT_HEIGHT;
use glam::{IVec2, Vec2, Vec3};

/// Split a local index into `(block_coord, seat_coord)`.
///
/// `local_index` must be below the block's total seat count; the partition
/// table guarantees that for every index the evaluator hands in.
#[inline]
pub fn index_to_seat(local_index: usize, seats_per_block: IVec2, block_count: IVec2) -> (IVec2, IVec2) {
    let index = local_index as i32;
    let seats_per_sub_block = seats_per_block.x * seats_per_block.y;

    let sub_block = index / seats_per_sub_block;
    let seat = index - seats_per_sub_block * sub_block;

    let by = sub_block / block_count.x;
    let bx = sub_block - block_count.x * by;

    let sy = seat / seats_per_block.x;
    let sx = seat - seats_per_block.x * sy;

    (IVec2::new(bx, by), IVec2::new(sx, sy))
}

/// Planar (x, z) offset of a seat from the centre of the tiled block group.
#[inline]
pub fn seat_to_planar_position(
    block_coord: IVec2,
    seat_coord: IVec2,
    seats_per_block: IVec2,
    seat_pitch: Vec2,
    block_count: IVec2,
    aisle_width: Vec2,
) -> Vec2 {
    let seat_span = (seats_per_block - IVec2::ONE).as_vec2();
    let block_span = (block_count - IVec2::ONE).as_vec2();
    let footprint = seat_pitch * seat_span;

    seat_pitch * (seat_coord.as_vec2() - seat_span * 0.5)
        + (footprint + aisle_width) * (block_coord.as_vec2() - block_span * 0.5)
}

/// Convenience over [`index_to_seat`] + [`seat_to_planar_position`] for one config.
#[inline]
pub fn planar_position(config: &BlockConfig, local_index: usize) -> Vec2 {
    let (block, seat) = index_to_seat(local_index, config.seats_per_block, config.block_count);
    seat_to_planar_position(
        block,
        seat,
        config.seats_per_block,
        config.seat_pitch,
        config.block_count,
        config.aisle_width,
    )
}

/// Outline box of one sub-block in the block's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockFootprint {
    pub block_coord: IVec2,
    pub center: Vec3,
    pub size: Vec3,
}

/// One footprint per sub-block, row-major. Each box is `seats * pitch` wide
/// and deep so the outer seats sit half a pitch inside its edges.
pub fn block_footprints(config: &BlockConfig) -> Vec<BlockFootprint> {
    let columns = config.block_count.x.max(0);
    let rows = config.block_count.y.max(0);
    let box_size = config.seat_pitch * config.seats_per_block.as_vec2();
    let size = Vec3::new(box_size.x, FOOTPRINT_HEIGHT, box_size.y);

    let seat_span = (config.seats_per_block - IVec2::ONE).as_vec2();
    let block_span = (config.block_count - IVec2::ONE).as_vec2();
    let stride = config.seat_pitch * seat_span + config.aisle_width;

    let mut footprints = Vec::with_capacity((columns * rows) as usize);
    for y in 0..rows {
        for x in 0..columns {
            let block_coord = IVec2::new(x, y);
            let center = stride * (block_coord.as_vec2() - block_span * 0.5);
            footprints.push(BlockFootprint {
                block_coord,
                center: Vec3::new(center.x, FOOTPRINT_HEIGHT * 0.5, center.y),
                size,
            });
        }
    }
    footprints
}
