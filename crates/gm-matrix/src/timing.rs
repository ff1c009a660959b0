use std::fmt;
use std::time::Instant;

/// Where a [`KernelTiming`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSource {
    /// GPU timestamp queries written around the compute pass.
    Device,
    /// Host clock around submission and readback.
    Host,
}

impl fmt::Display for TimingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingSource::Device => write!(f, "device"),
            TimingSource::Host => write!(f, "host"),
        }
    }
}

/// Start and end timestamps of one kernel dispatch, in nanoseconds.
///
/// Device timestamps are on the GPU's own timeline; host timestamps are
/// relative to the [`HostClock`] that produced them. Only the difference is
/// comparable across sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelTiming {
    pub start_ns: u64,
    pub end_ns: u64,
    pub source: TimingSource,
}

impl KernelTiming {
    pub fn new(start_ns: u64, end_ns: u64, source: TimingSource) -> Self {
        KernelTiming {
            start_ns,
            end_ns,
            source,
        }
    }

    /// Elapsed nanoseconds. Saturates at zero if the timestamps are out of order.
    pub fn duration_ns(&self) -> u64 {
        self.end_ns.saturating_sub(self.start_ns)
    }

    /// Elapsed time in milliseconds.
    pub fn execution_ms(&self) -> f64 {
        self.duration_ns() as f64 / 1.0e6
    }
}

/// Monotonic nanosecond clock anchored at its creation.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    epoch: Instant,
}

impl HostClock {
    pub fn new() -> Self {
        HostClock {
            epoch: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since this clock was created.
    pub fn now_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Run `f` and return its output with a host-sourced timing.
    pub fn measure<T>(&self, f: impl FnOnce() -> T) -> (T, KernelTiming) {
        let start = self.now_ns();
        let out = f();
        let end = self.now_ns();
        (out, KernelTiming::new(start, end, TimingSource::Host))
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_execution_ms() {
        let t = KernelTiming::new(1_000, 2_501_000, TimingSource::Device);
        assert_eq!(t.duration_ns(), 2_500_000);
        assert_relative_eq!(t.execution_ms(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_duration_saturates() {
        let t = KernelTiming::new(10, 5, TimingSource::Host);
        assert_eq!(t.duration_ns(), 0);
        assert_eq!(t.execution_ms(), 0.0);
    }

    #[test]
    fn test_host_clock_measure_orders_timestamps() {
        let clock = HostClock::new();
        let (value, timing) = clock.measure(|| (0..1000).sum::<u64>());
        assert_eq!(value, 499_500);
        assert!(timing.end_ns >= timing.start_ns);
        assert_eq!(timing.source, TimingSource::Host);
    }
}
