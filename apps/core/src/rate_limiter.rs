use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Sliding-window limiter for the chat route, keyed by client address.
pub struct RateLimiter {
    hits: HashMap<String, Vec<Instant>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    /// `limit` requests per `window` for each client. A zero limit disables
    /// limiting.
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            hits: HashMap::new(),
            limit,
            window,
        }
    }

    /// Records the request and returns `true` when `client` is still under
    /// its limit. Rejected requests are not recorded.
    pub fn check(&mut self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&mut self, client: &str, now: Instant) -> bool {
        if self.limit == 0 {
            return true;
        }

        let window = self.window;
        let recent = self.hits.entry(client.to_string()).or_default();
        recent.retain(|&t| now.duration_since(t) < window);

        if recent.len() < self.limit {
            recent.push(now);
            true
        } else {
            false
        }
    }

    /// Drops clients with no hits inside the window.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.hits.retain(|_, hits| {
            hits.retain(|&t| now.duration_since(t) < window);
            !hits.is_empty()
        });
    }

    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }
}
