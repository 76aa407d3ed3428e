use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(2800);

/// Single-slot transient message. A new message replaces the current one and
/// rearms the only deadline.
#[derive(Debug, Clone)]
pub struct Toasts {
    ttl: Duration,
    message: Option<String>,
    expires_at: Option<Instant>,
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            message: None,
            expires_at: None,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notify_at(message, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(%message, "toast");
        self.message = Some(message);
        self.expires_at = Some(now + self.ttl);
    }

    /// Drop the message once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.expires_at.is_some_and(|deadline| now >= deadline) {
            self.message = None;
            self.expires_at = None;
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires_after_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::new(Duration::from_millis(100));
        toasts.notify_at("Added to Favorites", start);

        toasts.tick(start + Duration::from_millis(99));
        assert_eq!(toasts.current(), Some("Added to Favorites"));

        toasts.tick(start + Duration::from_millis(100));
        assert_eq!(toasts.current(), None);
    }

    #[test]
    fn test_new_message_replaces_and_rearms() {
        let start = Instant::now();
        let mut toasts = Toasts::new(Duration::from_millis(100));
        toasts.notify_at("first", start);
        toasts.notify_at("second", start + Duration::from_millis(80));

        // The first deadline would have passed here; the rearmed one has not
        toasts.tick(start + Duration::from_millis(150));
        assert_eq!(toasts.current(), Some("second"));

        toasts.tick(start + Duration::from_millis(180));
        assert_eq!(toasts.current(), None);
    }

    #[test]
    fn test_default_ttl() {
        let start = Instant::now();
        let mut toasts = Toasts::default();
        toasts.notify_at("hello", start);
        toasts.tick(start + Duration::from_millis(2799));
        assert!(toasts.current().is_some());
        toasts.tick(start + DEFAULT_TOAST_TTL);
        assert!(toasts.current().is_none());
    }
}
