use std::time::Duration;
use tokio::time::Instant;

/// Criteria-edit debouncer driven by an explicit version counter.
///
/// Every edit bumps the version and pushes the deadline out; the refresh for
/// a version fires only once the deadline passes with no newer edit.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    version: u64,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, version: 0, deadline: None }
    }

    /// Record an edit made at `now`; returns the new version
    pub fn touch(&mut self, now: Instant) -> u64 {
        self.version += 1;
        self.deadline = Some(now + self.window);
        self.version
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Version to refresh for, once the window has elapsed at `now`
    pub fn fire(&mut self, now: Instant) -> Option<u64> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(self.version)
            }
            _ => None,
        }
    }

    pub fn is_current(&self, version: u64) -> bool {
        self.version == version
    }

    /// Resolves when the pending deadline passes; never resolves when idle
    pub async fn settled(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}

/// Ticket captured when a fetch starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub u64);

/// Monotonic ticket counter for one response stream
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// Only the most recently issued ticket may land
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest(&self) -> RequestTicket {
        RequestTicket(self.latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(400);

    #[test]
    fn test_burst_of_edits_fires_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.touch(start);
        debouncer.touch(start + Duration::from_millis(100));
        let last = debouncer.touch(start + Duration::from_millis(200));

        assert_eq!(debouncer.fire(start + Duration::from_millis(500)), None);
        assert_eq!(debouncer.fire(start + Duration::from_millis(600)), Some(last));
        assert_eq!(debouncer.fire(start + Duration::from_millis(900)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_older_versions_are_not_current() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let first = debouncer.touch(start);
        let second = debouncer.touch(start);
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }

    #[tokio::test]
    async fn test_settled_waits_for_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        let version = debouncer.touch(Instant::now());
        debouncer.settled().await;
        assert_eq!(debouncer.fire(Instant::now()), Some(version));
    }

    #[test]
    fn test_request_tracker_only_latest_lands() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!tracker.is_latest(first));
        assert!(tracker.is_latest(second));
        assert_eq!(tracker.latest(), second);
    }
}
