use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5_000);

/// One "re-fetch now" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Starts at 1 for the first emitted tick; 0 means nothing emitted yet.
    pub seq: u64,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockControl {
    paused: bool,
    interval: Duration,
}

/// Process-wide refresh clock shared by every view.
///
/// A single driver task owns the timer; subscribers only observe the tick
/// channel, so the number of views never multiplies backend load. Pausing
/// stops the ticks, and resuming or changing the interval emits at once and
/// restarts the period from that moment.
#[derive(Debug)]
pub struct Clock {
    control: watch::Sender<ClockControl>,
    ticks: Arc<watch::Sender<Tick>>,
    driver: JoinHandle<()>,
}

impl Clock {
    /// Must be called from within a tokio runtime.
    pub fn new(interval: Duration) -> Self {
        let interval = clamp_interval(interval);
        let (control, control_rx) = watch::channel(ClockControl {
            paused: false,
            interval,
        });
        let (ticks, _) = watch::channel(Tick {
            seq: 0,
            at: Instant::now(),
        });
        let ticks = Arc::new(ticks);
        let driver = tokio::spawn(run_clock(control_rx, ticks.clone()));
        tracing::debug!(interval_ms = interval.as_millis() as u64, "refresh clock started");
        Self {
            control,
            ticks,
            driver,
        }
    }

    /// Receiver that reports the next tick as a change.
    ///
    /// While the clock runs and has already ticked, the latest tick is
    /// replayed so a newly opened view fetches immediately.
    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        let mut rx = self.ticks.subscribe();
        if !self.is_paused() && rx.borrow().seq > 0 {
            rx.mark_changed();
        }
        rx
    }

    pub fn is_paused(&self) -> bool {
        self.control.borrow().paused
    }

    pub fn interval(&self) -> Duration {
        self.control.borrow().interval
    }

    pub fn pause(&self) {
        self.set_paused(true);
    }

    pub fn resume(&self) {
        self.set_paused(false);
    }

    pub fn toggle_pause(&self) {
        self.control.send_modify(|c| c.paused = !c.paused);
        tracing::info!(paused = self.is_paused(), "auto-refresh toggled");
    }

    pub fn set_paused(&self, paused: bool) {
        let changed = self.control.send_if_modified(|c| {
            if c.paused == paused {
                return false;
            }
            c.paused = paused;
            true
        });
        if changed {
            tracing::info!(paused, "auto-refresh state changed");
        }
    }

    pub fn set_interval(&self, interval: Duration) {
        let interval = clamp_interval(interval);
        let changed = self.control.send_if_modified(|c| {
            if c.interval == interval {
                return false;
            }
            c.interval = interval;
            true
        });
        if changed {
            tracing::info!(interval_ms = interval.as_millis() as u64, "refresh interval changed");
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

fn clamp_interval(interval: Duration) -> Duration {
    interval.max(Duration::from_millis(1))
}

async fn run_clock(mut control: watch::Receiver<ClockControl>, ticks: Arc<watch::Sender<Tick>>) {
    loop {
        let ClockControl { paused, interval } = *control.borrow_and_update();
        if paused {
            if control.changed().await.is_err() {
                return;
            }
            continue;
        }

        ticks.send_modify(|tick| {
            tick.seq += 1;
            tick.at = Instant::now();
        });

        // Any control change restarts the loop, which emits right away.
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = control.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}
