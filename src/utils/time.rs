use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Source of "now" for every expiry and eligibility decision.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn starting_on(date: NaiveDate) -> Self {
        Self::new((date.and_time(NaiveTime::default()) + Duration::hours(9)).and_utc())
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_crosses_midnight_on_advance() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let clock = ManualClock::starting_on(day);
        assert_eq!(clock.today(), day);

        clock.advance(Duration::hours(15));
        assert_eq!(clock.today(), day.succ_opt().unwrap());
    }
}
