//! Platform-agnostic clock and fixed-interval scheduling
//!
//! Hosts feed wall-clock seconds into `FieldHandle::tick`; `now_seconds`
//! is the default source (`performance.now()` in the browser, `Date.now()`
//! where no `Performance` is exposed, a process start `Instant` natively).

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or_else(|| js_sys::Date::now() / 1000.0)
}

#[cfg(not(all(feature = "wasm", target_arch = "wasm32")))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Fires at most once per `period` seconds of host time.
///
/// The first poll only starts the schedule: owners do the initial run
/// themselves. A clock that jumps backwards (host reset) fires and restarts
/// the schedule.
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    period: f64,
    last: Option<f64>,
}

impl Interval {
    pub fn new(period: f64) -> Self {
        Self { period, last: None }
    }

    /// True when a run is due at `now`; records the run.
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(last) = self.last else {
            self.last = Some(now);
            return false;
        };
        let due = now - last >= self.period || now < last;
        if due {
            self.last = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_on_period() {
        let mut every = Interval::new(2.0);
        assert!(!every.poll(10.0), "first poll only arms");
        assert!(!every.poll(10.5));
        assert!(!every.poll(11.99));
        assert!(every.poll(12.0));
        assert!(!every.poll(13.0));
    }

    #[test]
    fn test_interval_clock_jump() {
        let mut every = Interval::new(2.0);
        assert!(!every.poll(100.0));
        assert!(every.poll(1.0), "backwards clock fires");
        assert!(!every.poll(2.0));
        assert!(every.poll(3.0));
    }

    #[test]
    fn test_native_clock_is_monotonic() {
        let a = now_seconds();
        let b = now_seconds();
        assert!(b >= a && a >= 0.0);
    }
}
