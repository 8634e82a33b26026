/// Messages for editing the grid and driving agents.
///
/// Edits only mutate the grid. The field is rebuilt when a
/// [`RecomputeFlowField`] message arrives, so a batch of edits costs one
/// recompute.

use bevy::prelude::*;
use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::structures::FieldStats;

use super::resources::SimConfig;

// ============================================================================
// Grid Commands
// ============================================================================

/// Edit applied to the grid in [`SimSet::Input`](super::SimSet).
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEditCommand {
    SetGoal(IVec2),
    AddObstacle(IVec2),
    RemoveObstacle(IVec2),
    ToggleObstacle(IVec2),
    SetStart(IVec2),
}

/// Rebuild the flow field from the grid's current goal and obstacles.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RecomputeFlowField;

/// Emitted after every successful recompute.
#[derive(Message, Debug, Clone, Copy)]
pub struct FlowFieldRecomputed {
    pub stats: FieldStats,
}

// ============================================================================
// Agent Commands
// ============================================================================

/// Spawn a flow agent at a world position.
#[derive(Message, Debug, Clone, Copy)]
pub struct SpawnAgentCommand {
    pub position: FixedVec2,
    pub max_speed: FixedNum,
    pub max_force: FixedNum,
}

impl SpawnAgentCommand {
    /// Spawn with the configured default steering limits.
    pub fn at(position: FixedVec2, config: &SimConfig) -> Self {
        Self {
            position,
            max_speed: config.max_speed,
            max_force: config.max_force,
        }
    }
}
