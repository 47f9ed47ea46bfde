//! On-screen stats overlay
//!
//! Mirrors server-reported per-player stats from the latest snapshot. The
//! overlay is a data mirror; drawing it is the renderer's business.

use parking_lot::Mutex;

use crate::channel::protocol::SnapshotPayload;

/// Stats mirrored for one player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub health: f32,
    pub kills: u32,
    pub deaths: u32,
}

/// The stats overlay, players in first-seen order
pub struct StatsOverlay {
    entries: Mutex<Vec<(String, PlayerStats)>>,
}

impl StatsOverlay {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Mirror the stats carried by a snapshot payload
    pub fn apply(&self, payload: &SnapshotPayload) {
        let mut entries = self.entries.lock();

        for entry in payload.players.values() {
            let stats = PlayerStats {
                health: entry.state.health,
                kills: entry.state.kills,
                deaths: entry.state.deaths,
            };

            match entries.iter_mut().find(|(id, _)| id == &entry.id) {
                Some((_, existing)) => *existing = stats,
                None => entries.push((entry.id.clone(), stats)),
            }
        }
    }

    /// Stats for a single player
    pub fn get(&self, id: &str) -> Option<PlayerStats> {
        self.entries
            .lock()
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, stats)| stats.clone())
    }

    /// One display line per player
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .enumerate()
            .map(|(i, (_, stats))| {
                format!(
                    "Player {}, health: {}, kills: {}, deaths: {}",
                    i, stats.health, stats.kills, stats.deaths
                )
            })
            .collect()
    }
}

impl Default for StatsOverlay {
    fn default() -> Self {
        Self::new()
    }
}
