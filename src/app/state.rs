//! Client state shared across tasks

use std::sync::Arc;

use crate::config::Config;
use crate::overlay::StatsOverlay;
use crate::scene::Scene;

/// Shared client state
#[derive(Clone)]
pub struct ClientState {
    pub config: Arc<Config>,
    pub scene: Arc<Scene>,
    pub overlay: Arc<StatsOverlay>,
}

impl ClientState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            scene: Arc::new(Scene::new()),
            overlay: Arc::new(StatsOverlay::new()),
        }
    }
}
