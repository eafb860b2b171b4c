use jiff::{SignedDuration, Timestamp};
use std::sync::{Arc, Mutex, PoisonError};

/// Clock for token expiry. Tests pin it and move it by hand; the dev server
/// follows the system clock.
#[derive(Debug, Clone)]
pub struct TimeSource {
    time: Option<Arc<Mutex<Timestamp>>>,
}

impl TimeSource {
    pub fn new(initial_time: Timestamp) -> Self {
        Self {
            time: Some(Arc::new(Mutex::new(initial_time))),
        }
    }

    pub fn system() -> Self {
        Self { time: None }
    }

    pub fn now(&self) -> Timestamp {
        match &self.time {
            Some(time) => *time.lock().unwrap_or_else(PoisonError::into_inner),
            None => Timestamp::now(),
        }
    }

    /// No-op on the system clock.
    pub fn advance(&self, duration: SignedDuration) {
        if let Some(time) = &self.time {
            let mut time = time.lock().unwrap_or_else(PoisonError::into_inner);
            *time = time.saturating_add(duration).unwrap_or(*time);
        }
    }

    pub fn set(&self, now: Timestamp) {
        if let Some(time) = &self.time {
            *time.lock().unwrap_or_else(PoisonError::into_inner) = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mocked_clock_only_moves_when_told() {
        let start: Timestamp = "2025-03-01T01:00:00Z".parse().unwrap();
        let time_source = TimeSource::new(start);
        assert_eq!(time_source.now(), start);

        time_source.advance(SignedDuration::from_mins(90));
        assert_eq!(time_source.now(), start + SignedDuration::from_mins(90));

        time_source.set(start);
        assert_eq!(time_source.now(), start);
    }
}
