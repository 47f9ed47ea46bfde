//! Fixed-rate frame building
//!
//! The renderer seam: the loop periodically assembles a render-ready view of
//! the scene and overlay and hands it to whatever backend is attached.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::debug;

use crate::channel::protocol::Obstacle;
use crate::overlay::StatsOverlay;
use crate::scene::{Scene, ShotTracer, MAP_HEIGHT, MAP_WIDTH};
use crate::util::time::FRAME_DURATION_MICROS;

/// One tank to draw
#[derive(Debug, Clone)]
pub struct TankDraw {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub health: f32,
}

/// A render-ready view of the scene
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub frame: u64,
    pub map_width: f32,
    pub map_height: f32,
    pub obstacles: Vec<Obstacle>,
    pub tanks: Vec<TankDraw>,
    pub shots: Vec<ShotTracer>,
    pub overlay_lines: Vec<String>,
    /// Unix millis of the snapshot the frame was built from
    pub snapshot_ms: Option<u64>,
}

/// Builds frames at the display rate
pub struct FrameBuilder {
    frame: u64,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self { frame: 0 }
    }

    /// Assemble the next frame, draining transient shot effects
    pub fn build(&mut self, scene: &Scene, overlay: &StatsOverlay) -> RenderFrame {
        self.frame += 1;

        let tanks = scene
            .tanks()
            .into_iter()
            .map(|(id, sprite)| TankDraw {
                id,
                x: sprite.x,
                y: sprite.y,
                rotation: sprite.rotation,
                health: sprite.health,
            })
            .collect();

        RenderFrame {
            frame: self.frame,
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            obstacles: scene.obstacles(),
            tanks,
            shots: scene.drain_shots(),
            overlay_lines: overlay.lines(),
            snapshot_ms: scene.last_snapshot_ms(),
        }
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Rendering backend attached to the frame loop
pub trait Renderer: Send {
    fn render(&mut self, frame: &RenderFrame);
}

/// Default backend: logs a frame summary at debug level
pub struct TraceRenderer;

impl Renderer for TraceRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        debug!(
            frame = frame.frame,
            tanks = frame.tanks.len(),
            shots = frame.shots.len(),
            snapshot_ms = ?frame.snapshot_ms,
            "Rendered frame"
        );
    }
}

/// Run the frame loop at the display rate until the task is aborted
pub async fn run_frame_loop(
    scene: Arc<Scene>,
    overlay: Arc<StatsOverlay>,
    mut renderer: Box<dyn Renderer>,
) {
    let frame_duration = Duration::from_micros(FRAME_DURATION_MICROS);
    let mut frame_interval = interval(frame_duration);
    frame_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut builder = FrameBuilder::new();

    loop {
        frame_interval.tick().await;
        let frame = builder.build(&scene, &overlay);
        renderer.render(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::protocol::{PlayerEntry, SnapshotPayload, TankState};
    use std::collections::HashMap;

    fn snapshot(shot: bool) -> SnapshotPayload {
        let entry = PlayerEntry {
            id: "p1".to_string(),
            state: TankState {
                x: 320.0,
                y: 240.0,
                rotation: 1.0,
                health: 75.0,
                kills: 0,
                deaths: 0,
                shot,
                shoot_target_x: 400.0,
                shoot_target_y: 300.0,
            },
        };
        SnapshotPayload {
            players: HashMap::from([("p1".to_string(), entry)]),
            obstacles: None,
        }
    }

    #[test]
    fn frame_reflects_scene_and_overlay() {
        let scene = Scene::new();
        let overlay = StatsOverlay::new();
        let payload = snapshot(false);
        scene.apply(&payload);
        overlay.apply(&payload);

        let mut builder = FrameBuilder::new();
        let frame = builder.build(&scene, &overlay);

        assert_eq!(frame.frame, 1);
        assert_eq!(frame.map_width, MAP_WIDTH);
        assert_eq!(frame.tanks.len(), 1);
        assert_eq!(frame.tanks[0].id, "p1");
        assert_eq!(frame.overlay_lines.len(), 1);
    }

    #[test]
    fn shots_appear_in_one_frame_only() {
        let scene = Scene::new();
        let overlay = StatsOverlay::new();
        scene.apply(&snapshot(true));

        let mut builder = FrameBuilder::new();
        let first = builder.build(&scene, &overlay);
        assert_eq!(first.shots.len(), 1);

        let second = builder.build(&scene, &overlay);
        assert!(second.shots.is_empty());
        assert_eq!(second.frame, 2);
    }
}
