//! Local rendering scene driven by server snapshots

pub mod frame;
pub mod tank;

pub use tank::TankSprite;

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::channel::protocol::{Obstacle, Point, SnapshotPayload};
use crate::util::time::unix_millis;

/// Map dimensions in world units
pub const MAP_WIDTH: f32 = 1080.0;
pub const MAP_HEIGHT: f32 = 720.0;

/// A transient shot effect, drained by the next rendered frame
#[derive(Debug, Clone)]
pub struct ShotTracer {
    pub shooter_id: String,
    pub from: Point,
    pub to: Point,
}

/// The scene: tank registry, static obstacles, pending shot effects
///
/// Tanks are created lazily on first sighting and never removed; a fresh
/// process starts empty and rebuilds from the next snapshot.
pub struct Scene {
    players: DashMap<String, TankSprite>,
    obstacles: Mutex<Option<Vec<Obstacle>>>,
    shots: Mutex<Vec<ShotTracer>>,
    /// Unix millis of the last applied snapshot (0 = none yet)
    last_snapshot_ms: AtomicU64,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
            obstacles: Mutex::new(None),
            shots: Mutex::new(Vec::new()),
            last_snapshot_ms: AtomicU64::new(0),
        }
    }

    /// Apply a snapshot payload: update known tanks, create new ones
    pub fn apply(&self, payload: &SnapshotPayload) {
        self.last_snapshot_ms.store(unix_millis(), Ordering::Relaxed);
        for entry in payload.players.values() {
            match self.players.get_mut(&entry.id) {
                Some(mut sprite) => {
                    sprite.apply(&entry.state);
                }
                None => {
                    info!(player_id = %entry.id, "New tank");
                    self.players
                        .insert(entry.id.clone(), TankSprite::new(&entry.state));
                }
            }

            if entry.state.shot {
                self.shots.lock().push(ShotTracer {
                    shooter_id: entry.id.clone(),
                    from: Point {
                        x: entry.state.x,
                        y: entry.state.y,
                    },
                    to: Point {
                        x: entry.state.shoot_target_x,
                        y: entry.state.shoot_target_y,
                    },
                });
            }
        }

        if let Some(segments) = &payload.obstacles {
            let mut obstacles = self.obstacles.lock();
            if obstacles.is_none() {
                info!(count = segments.len(), "Installing obstacle map");
                *obstacles = Some(segments.clone());
            } else {
                debug!("Obstacle map already installed, ignoring");
            }
        }
    }

    /// Number of tanks seen so far
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn get(&self, id: &str) -> Option<TankSprite> {
        self.players.get(id).map(|sprite| sprite.clone())
    }

    /// Installed obstacle segments (empty until a payload carries them)
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles.lock().clone().unwrap_or_default()
    }

    /// All tanks, for frame building
    pub fn tanks(&self) -> Vec<(String, TankSprite)> {
        self.players
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Take the shot effects accumulated since the last frame
    pub fn drain_shots(&self) -> Vec<ShotTracer> {
        std::mem::take(&mut *self.shots.lock())
    }

    /// When the last snapshot arrived, if any
    pub fn last_snapshot_ms(&self) -> Option<u64> {
        match self.last_snapshot_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(ms),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::protocol::{PlayerEntry, TankState};
    use std::collections::HashMap;

    fn entry(id: &str, x: f32, y: f32, shot: bool) -> PlayerEntry {
        PlayerEntry {
            id: id.to_string(),
            state: TankState {
                x,
                y,
                rotation: 0.5,
                health: 90.0,
                kills: 1,
                deaths: 0,
                shot,
                shoot_target_x: 500.0,
                shoot_target_y: 250.0,
            },
        }
    }

    fn payload(entries: Vec<PlayerEntry>, obstacles: Option<Vec<Obstacle>>) -> SnapshotPayload {
        SnapshotPayload {
            players: entries
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect::<HashMap<_, _>>(),
            obstacles,
        }
    }

    #[test]
    fn creates_tank_on_first_sighting() {
        let scene = Scene::new();
        scene.apply(&payload(vec![entry("p1", 100.0, 200.0, false)], None));

        assert_eq!(scene.player_count(), 1);
        let tank = scene.get("p1").unwrap();
        assert_eq!(tank.x, 100.0);
        assert_eq!(tank.y, 200.0);
    }

    #[test]
    fn overwrites_existing_tank() {
        let scene = Scene::new();
        scene.apply(&payload(vec![entry("p1", 100.0, 200.0, false)], None));
        scene.apply(&payload(vec![entry("p1", 150.0, 220.0, false)], None));

        assert_eq!(scene.player_count(), 1);
        let tank = scene.get("p1").unwrap();
        assert_eq!(tank.x, 150.0);
        assert_eq!(tank.y, 220.0);
    }

    #[test]
    fn tanks_are_never_removed() {
        let scene = Scene::new();
        scene.apply(&payload(vec![entry("p1", 1.0, 1.0, false)], None));
        // p1 absent from the next snapshot
        scene.apply(&payload(vec![entry("p2", 2.0, 2.0, false)], None));

        assert_eq!(scene.player_count(), 2);
        assert!(scene.get("p1").is_some());
    }

    #[test]
    fn obstacles_install_once() {
        let scene = Scene::new();
        let first = vec![Obstacle {
            a: Point { x: 0.0, y: 0.0 },
            b: Point { x: 10.0, y: 0.0 },
        }];
        let second = vec![Obstacle {
            a: Point { x: 5.0, y: 5.0 },
            b: Point { x: 15.0, y: 5.0 },
        }];

        scene.apply(&payload(vec![], Some(first)));
        scene.apply(&payload(vec![], Some(second)));

        let installed = scene.obstacles();
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].b.x, 10.0);
    }

    #[test]
    fn shot_records_tracer_until_drained() {
        let scene = Scene::new();
        scene.apply(&payload(vec![entry("p1", 100.0, 200.0, true)], None));

        let shots = scene.drain_shots();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].shooter_id, "p1");
        assert_eq!(shots[0].from.x, 100.0);
        assert_eq!(shots[0].to.x, 500.0);

        assert!(scene.drain_shots().is_empty());
    }
}
