//! Neighbour offsets in enumeration order.
//!
//! Cardinals come first, then diagonals, each in a fixed rotation. The vector
//! field breaks ties by this order, so changing it changes the field.

use bevy::prelude::*;

pub const UP: IVec2 = IVec2::new(0, 1);
pub const RIGHT: IVec2 = IVec2::new(1, 0);
pub const DOWN: IVec2 = IVec2::new(0, -1);
pub const LEFT: IVec2 = IVec2::new(-1, 0);

pub const RIGHT_UP: IVec2 = IVec2::new(1, 1);
pub const RIGHT_DOWN: IVec2 = IVec2::new(1, -1);
pub const LEFT_DOWN: IVec2 = IVec2::new(-1, -1);
pub const LEFT_UP: IVec2 = IVec2::new(-1, 1);

pub const CARDINAL: [IVec2; 4] = [UP, RIGHT, DOWN, LEFT];

pub const ALL_EIGHT: [IVec2; 8] = [
    UP,
    RIGHT,
    DOWN,
    LEFT,
    RIGHT_UP,
    RIGHT_DOWN,
    LEFT_DOWN,
    LEFT_UP,
];

/// Offsets to enumerate for a neighbour query.
pub fn offsets(include_diagonals: bool) -> &'static [IVec2] {
    if include_diagonals {
        &ALL_EIGHT
    } else {
        &CARDINAL
    }
}
