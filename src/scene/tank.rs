//! Tank sprite state

use crate::channel::protocol::TankState;

/// Local display state for one tank
///
/// Position and rotation are overwritten wholesale by every snapshot; the
/// server owns the simulation.
#[derive(Debug, Clone)]
pub struct TankSprite {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub health: f32,
}

impl TankSprite {
    pub fn new(state: &TankState) -> Self {
        Self {
            x: state.x,
            y: state.y,
            rotation: state.rotation,
            health: state.health,
        }
    }

    /// Apply a snapshot entry
    pub fn apply(&mut self, state: &TankState) {
        self.x = state.x;
        self.y = state.y;
        self.rotation = state.rotation;
        self.health = state.health;
    }
}
