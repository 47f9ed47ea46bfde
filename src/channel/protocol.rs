//! Channel protocol message definitions
//! These are the wire types exchanged with the game server

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input actions relayed to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Forward,
    Left,
    Right,
    Brake,
    Shoot,
}

/// Envelopes sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum ClientEnvelope {
    /// Request to join a game topic
    #[serde(rename = "join")]
    Join {
        topic: String,
        token: String,
        /// Client-generated identifier echoed back in the join reply
        #[serde(rename = "ref")]
        join_ref: Uuid,
    },

    /// Input relay: an action transitioned between held and released
    #[serde(rename = "event")]
    Event { action: Action, state: bool },
}

/// Envelopes sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum ServerEnvelope {
    /// Answer to a join request
    #[serde(rename = "join:reply")]
    JoinReply(JoinReply),

    /// Periodic state snapshot
    #[serde(rename = "player:update")]
    PlayerUpdate(SnapshotPayload),

    /// Snapshot sent when a client joins, additionally carrying obstacles
    #[serde(rename = "player:join")]
    PlayerJoin(SnapshotPayload),
}

/// Join reply payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinReply {
    #[serde(rename = "ref")]
    pub join_ref: Uuid,
    pub status: JoinStatus,
    /// Server-provided reason on error
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStatus {
    Ok,
    Error,
}

/// Game-state payload carried by `player:update` and `player:join`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPayload {
    /// All known players, keyed by player id
    pub players: HashMap<String, PlayerEntry>,
    /// Static obstacle segments (present on `player:join`)
    #[serde(default)]
    pub obstacles: Option<Vec<Obstacle>>,
}

/// One player in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    pub state: TankState,
}

/// Server-reported tank state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankState {
    /// Position X
    pub x: f32,
    /// Position Y
    pub y: f32,
    /// Rotation in radians
    pub rotation: f32,
    /// Health (0-100)
    pub health: f32,
    pub kills: u32,
    pub deaths: u32,
    /// Fired this snapshot
    #[serde(default)]
    pub shot: bool,
    #[serde(default, rename = "shootTargetX")]
    pub shoot_target_x: f32,
    #[serde(default, rename = "shootTargetY")]
    pub shoot_target_y: f32,
}

/// Obstacle as a line segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub a: Point,
    pub b: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
