//! Per-client scan cooldown.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// In-memory per-IP cooldown. A client may start one scan per cooldown
/// window; the window restarts on every accepted request.
pub struct RateLimiter {
    last_request: DashMap<IpAddr, Instant>,
    cooldown: Duration,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_request: DashMap::new(),
            cooldown,
        }
    }

    /// Record a request from `ip`. `Err` carries the whole seconds left in
    /// the cooldown, rounded up, for the client-facing message.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let now = Instant::now();

        if let Some(last) = self.last_request.get(&ip) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                return Err(remaining.as_secs_f64().ceil() as u64);
            }
        }

        self.last_request.insert(ip, now);
        Ok(())
    }

    /// Drop entries whose cooldown has long expired. The map otherwise
    /// grows with every distinct client.
    pub fn evict_expired(&self) {
        let now = Instant::now();
        let cooldown = self.cooldown;
        self.last_request
            .retain(|_, last| now.duration_since(*last) < cooldown);
    }
}
