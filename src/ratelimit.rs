use std::time::Duration;

/// Blunt throttle between squad page requests: always waits the full
/// interval, however long the previous request took.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        RateLimiter { delay }
    }

    pub async fn wait_until_ready(&self) {
        // A zero delay is how tests switch throttling off.
        if self.delay.is_zero() {
            return;
        }
        tokio::time::sleep(self.delay).await;
    }
}
