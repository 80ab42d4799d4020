//! Timer-driven pane advancement.
//!
//! - One tokio task per running timer, sending ticks into the owner's inbox
//! - Every tick carries the generation of the timer that produced it
//! - Ticks are only honoured while Running and from the current generation,
//!   so a tick already queued when the timer is cancelled is ignored
//! - Pausing keeps the progress made in the current cycle

use std::time::Duration;

use flume::Sender;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::events::GalleryEvent;
use crate::error::{GalleryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayState {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug)]
pub struct AutoplayController {
    interval: Duration,
    state: AutoplayState,
    /// Bumped whenever a timer is spawned or cancelled.
    generation: u64,
    ticks: Sender<GalleryEvent>,
    runtime: Handle,
    timer: Option<JoinHandle<()>>,
    /// When the current interval began counting.
    cycle_started: Instant,
    /// Progress into the interval at the moment of pausing.
    paused_progress: Duration,
    disposed: bool,
}

impl AutoplayController {
    /// Creates a stopped controller that will deliver ticks to `ticks`.
    ///
    /// Must be called from within a tokio runtime; the timer tasks are
    /// spawned on it later.
    pub fn new(interval: Duration, ticks: Sender<GalleryEvent>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| GalleryError::NoRuntime)?;
        Ok(Self {
            interval: interval.max(Duration::from_millis(1)),
            state: AutoplayState::Stopped,
            generation: 0,
            ticks,
            runtime,
            timer: None,
            cycle_started: Instant::now(),
            paused_progress: Duration::ZERO,
            disposed: false,
        })
    }

    pub fn state(&self) -> AutoplayState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Starts ticking every interval. No-op while Running; resumes when Paused.
    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        match self.state {
            AutoplayState::Running => {}
            AutoplayState::Paused => self.resume(),
            AutoplayState::Stopped => {
                self.paused_progress = Duration::ZERO;
                self.spawn_timer(self.interval);
                self.state = AutoplayState::Running;
                debug!(interval_ms = self.interval.as_millis() as u64, "Autoplay started");
            }
        }
    }

    /// Cancels the timer and forgets any progress. Idempotent.
    pub fn stop(&mut self) {
        if self.state == AutoplayState::Stopped {
            return;
        }
        self.cancel_timer();
        self.state = AutoplayState::Stopped;
        self.paused_progress = Duration::ZERO;
        debug!("Autoplay stopped");
    }

    /// Suspends ticking, remembering how far into the interval we were.
    pub fn pause(&mut self) {
        if self.state != AutoplayState::Running {
            return;
        }
        self.paused_progress = Instant::now()
            .saturating_duration_since(self.cycle_started)
            .min(self.interval);
        self.cancel_timer();
        self.state = AutoplayState::Paused;
        debug!(
            progress_ms = self.paused_progress.as_millis() as u64,
            "Autoplay paused"
        );
    }

    /// Continues from the paused progress; the next tick comes after the
    /// remainder of the interval.
    pub fn resume(&mut self) {
        if self.disposed || self.state != AutoplayState::Paused {
            return;
        }
        let remaining = self.interval.saturating_sub(self.paused_progress);
        self.spawn_timer(remaining);
        self.state = AutoplayState::Running;
        debug!(remaining_ms = remaining.as_millis() as u64, "Autoplay resumed");
    }

    /// Decides whether a delivered tick should advance the layout.
    pub fn accept_tick(&mut self, generation: u64, fired_at: Instant) -> bool {
        if self.disposed || self.state != AutoplayState::Running || generation != self.generation {
            trace!(
                generation,
                current = self.generation,
                state = ?self.state,
                "Ignoring stale autoplay tick"
            );
            return false;
        }
        self.cycle_started = fired_at;
        true
    }

    /// Stops for good; later calls and ticks are ignored.
    pub fn dispose(&mut self) {
        self.stop();
        self.disposed = true;
    }

    fn spawn_timer(&mut self, first_delay: Duration) {
        self.cancel_timer();
        let generation = self.generation;
        let interval = self.interval;
        let ticks = self.ticks.clone();
        let now = Instant::now();

        // Progress already made counts toward the first cycle.
        let carried = interval.saturating_sub(first_delay);
        self.cycle_started = now.checked_sub(carried).unwrap_or(now);

        self.timer = Some(self.runtime.spawn(async move {
            let mut deadline = now + first_delay;
            loop {
                tokio::time::sleep_until(deadline).await;
                let tick = GalleryEvent::AutoplayTick {
                    generation,
                    fired_at: Instant::now(),
                };
                if ticks.send(tick).is_err() {
                    break;
                }
                deadline += interval;
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Drop for AutoplayController {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
