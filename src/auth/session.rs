//! Inactivity tracking for the interactive menu

use std::time::{Duration, Instant};

/// Tracks the last time the user did something
#[derive(Debug, Clone)]
pub struct Session {
    timeout: Duration,
    last_active: Instant,
}

impl Session {
    /// Start a session that expires after `timeout` of inactivity
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_active: Instant::now(),
        }
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes.saturating_mul(60)))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether more than the timeout has passed since the last activity
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_active) > self.timeout
    }

    /// Record activity now
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_active() {
        let session = Session::from_minutes(30);
        assert!(!session.is_expired());
        assert_eq!(session.timeout(), Duration::from_secs(1800));
    }

    #[test]
    fn test_expires_after_timeout() {
        let session = Session::from_minutes(1);
        let later = Instant::now() + Duration::from_secs(61);
        assert!(session.is_expired_at(later));
    }

    #[test]
    fn test_touch_resets_clock() {
        let mut session = Session::new(Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(30));
        assert!(session.is_expired());

        session.touch();
        assert!(!session.is_expired());
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        let session = Session::new(Duration::ZERO);
        let later = Instant::now() + Duration::from_millis(1);
        assert!(session.is_expired_at(later));
    }
}
