//! Timer overlay.
//!
//! A single transient line rewritten at a fixed cadence, counting down a
//! lead-in and then counting up. The overlay never takes part in the output
//! log's line accounting.
//!
//! The updater task is the only writer of the transient line. The owning
//! scope can only stop it, through [`TimerHandle`]. Stopping flips
//! [`TimerState`]'s running flag while holding the surface lock, and the
//! updater checks the flag under that same lock before every draw, so no
//! write can land after a stop returns.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::time::{Instant, MissedTickBehavior};

/// Overlay refresh cadence.
pub const TICK: Duration = Duration::from_millis(100);

/// A surface owning one transient line.
pub trait OverlaySurface: Send + 'static {
    /// Replace the transient line with `text`.
    fn draw(&mut self, text: &str);

    /// Remove the transient line.
    fn clear(&mut self);
}

/// Deadline and running flag shared between a scope and its updater.
#[derive(Debug)]
pub struct TimerState {
    deadline: Instant,
    running: AtomicBool,
}

impl TimerState {
    /// Start a timer whose zero point is `lead_in_secs` from now.
    pub fn new(lead_in_secs: i64) -> Self {
        let now = Instant::now();
        let offset = Duration::from_secs(lead_in_secs.unsigned_abs());
        let deadline = if lead_in_secs >= 0 {
            now + offset
        } else {
            now.checked_sub(offset).unwrap_or(now)
        };

        Self { deadline, running: AtomicBool::new(true) }
    }

    /// Signed elapsed seconds relative to the deadline.
    ///
    /// Negative while counting down, rounding away from zero so the full
    /// lead-in is shown at the start.
    pub fn elapsed_secs(&self) -> i64 {
        signed_elapsed(self.deadline, Instant::now())
    }

    /// Whether the timer has not been stopped.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the timer. Returns whether it was running.
    pub fn stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }
}

/// Signed whole seconds from `deadline` to `now`.
pub fn signed_elapsed(deadline: Instant, now: Instant) -> i64 {
    if now < deadline {
        let remaining = deadline - now;
        let secs = remaining.as_millis().div_ceil(1000);
        -(secs as i64)
    } else {
        (now - deadline).as_secs() as i64
    }
}

/// Human timer format: `<N>s` while counting down, `<m>m<s>s` after.
pub fn format_elapsed(secs: i64) -> String {
    if secs < 0 {
        format!("{}s", secs.unsigned_abs())
    } else {
        format!("{}m{}s", secs / 60, secs % 60)
    }
}

/// Stops a running timer when invoked or dropped.
#[must_use = "dropping the handle stops the timer immediately"]
pub struct TimerHandle {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    /// Wrap a stop action.
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self { stop: Some(Box::new(stop)) }
    }

    /// A handle with nothing to stop.
    pub fn detached() -> Self {
        Self { stop: None }
    }

    /// Stop the timer now.
    pub fn stop(mut self) {
        self.run_stop();
    }

    fn run_stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.run_stop();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle").field("armed", &self.stop.is_some()).finish()
    }
}

/// Background updater for one transient timer line.
pub struct TimerOverlay;

impl TimerOverlay {
    /// Spawn an updater drawing onto `surface` every [`TICK`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S: OverlaySurface>(lead_in_secs: i64, surface: Arc<Mutex<S>>) -> TimerHandle {
        let state = Arc::new(TimerState::new(lead_in_secs));
        let task = tokio::spawn(Self::run(Arc::clone(&state), Arc::clone(&surface)));
        let abort = task.abort_handle();

        TimerHandle::new(move || {
            match surface.lock() {
                Ok(mut surface) => {
                    if state.stop() {
                        surface.clear();
                    }
                },
                Err(_) => {
                    state.stop();
                },
            }
            abort.abort();
        })
    }

    async fn run<S: OverlaySurface>(state: Arc<TimerState>, surface: Arc<Mutex<S>>) {
        let mut ticks = tokio::time::interval(TICK);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticks.tick().await;

            let Ok(mut surface) = surface.lock() else {
                tracing::warn!("timer surface poisoned, stopping overlay");
                break;
            };
            if !state.is_running() {
                break;
            }
            surface.draw(&format_elapsed(state.elapsed_secs()));
        }
    }
}
