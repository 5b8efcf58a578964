use chrono::DateTime;
use chrono::Utc;

/// Time source injected into every service.
///
/// Each operation reads the clock exactly once and threads the timestamp
/// through its collaborators, so expiry logic is deterministic under test.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
