//! Rate limiting utilities

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter type alias
pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Create a rate limiter with the specified events per second
pub fn create_limiter(events_per_second: u32) -> Arc<Limiter> {
    let quota = Quota::per_second(NonZeroU32::new(events_per_second).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

/// Outbound input-event rate limit (per session)
pub const EVENT_RATE_LIMIT: u32 = 30; // Max 30 event pushes per second

/// Per-session rate limiter for outbound event pushes
#[derive(Clone)]
pub struct EventRateLimiter {
    event_limiter: Arc<Limiter>,
}

impl EventRateLimiter {
    pub fn new() -> Self {
        Self {
            event_limiter: create_limiter(EVENT_RATE_LIMIT),
        }
    }

    /// Check if an event push is allowed (returns true if allowed)
    pub fn check_event(&self) -> bool {
        self.event_limiter.check().is_ok()
    }
}

impl Default for EventRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
