use std::time::{Duration, Instant};

/// A transient status message plus the moment it should disappear.
#[derive(Debug, Clone)]
pub struct Notification {
    message: String,
    deadline: Instant,
    seq: u64,
}

impl Notification {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// Token identifying one `notify` call. A dismissal carrying a token that has
/// been superseded is a no-op, so a stale timer can never blank out a newer
/// message early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissToken(u64);

/// Keeps at most one notification visible and guarantees its dismissal.
///
/// Replacing the message re-arms the deadline; expiry is observed by the
/// host calling [`tick`](NotificationScheduler::tick) from its event loop.
#[derive(Debug, Default)]
pub struct NotificationScheduler {
    current: Option<Notification>,
    next_seq: u64,
}

impl NotificationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message`, replacing whatever was visible, and schedules its
    /// dismissal `duration` from now.
    pub fn notify(&mut self, message: impl Into<String>, duration: Duration) -> DismissToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.current = Some(Notification {
            message: message.into(),
            deadline: Instant::now() + duration,
            seq,
        });
        DismissToken(seq)
    }

    /// Explicit dismissal path. Returns whether anything was cleared.
    pub fn dismiss(&mut self, token: DismissToken) -> bool {
        match &self.current {
            Some(notification) if notification.seq == token.0 => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Clears the current notification once its deadline has passed. Returns
    /// whether a dismissal fired on this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(notification) if now >= notification.deadline => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Unconditional clear, used on teardown and on playback success.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|notification| notification.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACK: Duration = Duration::from_millis(2_000);
    const PROMPT: Duration = Duration::from_millis(3_000);

    #[test]
    fn message_disappears_after_its_duration() {
        let mut scheduler = NotificationScheduler::new();
        let now = Instant::now();
        scheduler.notify("Music muted", ACK);

        assert!(!scheduler.tick(now));
        assert_eq!(scheduler.current(), Some("Music muted"));

        assert!(scheduler.tick(now + ACK + Duration::from_secs(60)));
        assert_eq!(scheduler.current(), None);
    }

    #[test]
    fn newer_message_replaces_and_rearms() {
        let mut scheduler = NotificationScheduler::new();
        let now = Instant::now();
        scheduler.notify("Music muted", ACK);
        scheduler.notify("Gagal memutar musik", PROMPT);

        // The first message's deadline passing must not clear the second.
        assert!(!scheduler.tick(now + ACK + Duration::from_millis(1)));
        assert_eq!(scheduler.current(), Some("Gagal memutar musik"));

        assert!(scheduler.tick(now + PROMPT + Duration::from_secs(60)));
        assert_eq!(scheduler.current(), None);
    }

    #[test]
    fn stale_dismiss_token_is_a_no_op() {
        let mut scheduler = NotificationScheduler::new();
        let stale = scheduler.notify("Music muted", ACK);
        scheduler.notify("Music playing", ACK);

        assert!(!scheduler.dismiss(stale));
        assert_eq!(scheduler.current(), Some("Music playing"));
    }

    #[test]
    fn matching_token_dismisses() {
        let mut scheduler = NotificationScheduler::new();
        let token = scheduler.notify("Music playing", ACK);

        assert!(scheduler.dismiss(token));
        assert_eq!(scheduler.current(), None);
    }

    #[test]
    fn tick_with_nothing_visible_does_nothing() {
        let mut scheduler = NotificationScheduler::new();
        assert!(!scheduler.tick(Instant::now()));
    }
}
