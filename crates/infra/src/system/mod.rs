use chrono::Utc;
use chrono_tz::Tz;
use songcircle_domain::DateKey;

// Mocking out time so that it is possible to run tests that depend on it.
// "Today" is computed once per invocation here and threaded into the use
// cases as plain data.
pub trait ISys: Send + Sync {
    /// The current calendar date in the platform's reference time zone.
    fn today(&self) -> DateKey;
}

/// System that reads the real clock and is used when not testing
pub struct RealSys {
    pub timezone: Tz,
}

impl ISys for RealSys {
    fn today(&self) -> DateKey {
        DateKey::new(Utc::now().with_timezone(&self.timezone).date_naive())
    }
}

/// Clock pinned to a fixed date, for tests.
pub struct FixedSys(pub DateKey);

impl ISys for FixedSys {
    fn today(&self) -> DateKey {
        self.0
    }
}
