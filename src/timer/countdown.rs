//! Countdown timer handle
//!
//! [`CountdownTimer::start`] creates a [`TimerSession`] and, when a display
//! target is supplied, spawns the ticking task on the current tokio runtime.
//! The session, the display and the hooks share one lock. A tick holds it
//! while it evaluates and runs callbacks, and [`CountdownTimer::stop`] takes
//! it too, so no callback runs once `stop` has returned.
//!
//! Hooks run under that lock and must not call back into their own timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{sync::watch, time::Instant};
use tracing::{debug, info};

use super::{
    session::{TimerSession, TimerSnapshot, TimerState},
    tick::TimerReading,
};
use crate::{error::{DisplayError, TimerError}, tasks::countdown_task};

/// Surface the timer writes its formatted reading into
pub trait DisplayTarget: Send {
    fn show(&mut self, reading: &TimerReading) -> Result<(), DisplayError>;
}

impl<F> DisplayTarget for F
where
    F: FnMut(&TimerReading) -> Result<(), DisplayError> + Send,
{
    fn show(&mut self, reading: &TimerReading) -> Result<(), DisplayError> {
        self(reading)
    }
}

/// Callbacks supplied by whoever hosts the timer
pub trait TimerHooks: Send {
    /// Fired at most once, when remaining time first drops to the warning threshold.
    fn on_warning(&mut self, _remaining_seconds: u64) {}

    /// Fired once when a countdown runs out. Ticking has already stopped.
    fn on_expiry(&mut self, _elapsed_seconds: u64) {}
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl TimerHooks for NoHooks {}

pub(crate) struct Shared {
    pub(crate) session: TimerSession,
    pub(crate) display: Option<Box<dyn DisplayTarget>>,
    pub(crate) hooks: Box<dyn TimerHooks>,
}

pub(crate) fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running (or idle) quiz timer
pub struct CountdownTimer {
    shared: Arc<Mutex<Shared>>,
    cancel_tx: watch::Sender<bool>,
}

impl CountdownTimer {
    /// Create a timer and start ticking if there is somewhere to show it.
    ///
    /// `duration` is in seconds; `None` runs a stopwatch. Without a display
    /// target the timer stays [`TimerState::Idle`] and never schedules a tick.
    /// Must be called from within a tokio runtime when `display` is present.
    pub fn start(
        duration: Option<i64>,
        mut display: Option<Box<dyn DisplayTarget>>,
        hooks: Box<dyn TimerHooks>,
    ) -> Result<Self, TimerError> {
        let now = Instant::now();
        let mut session = TimerSession::new(duration, now)?;
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let has_display = display.is_some();
        if let Some(target) = display.as_mut() {
            session.begin();
            // Show the starting value rather than a blank display until the first tick
            if let Err(e) = target.show(&session.reading(now)) {
                debug!("Initial reading not shown: {}", e);
            }
        }

        let shared = Arc::new(Mutex::new(Shared {
            session,
            display,
            hooks,
        }));

        if has_display {
            info!("Starting quiz timer: duration={:?}s", duration);
            tokio::spawn(countdown_task(Arc::clone(&shared), cancel_rx));
        } else {
            debug!("No display target, quiz timer stays idle");
        }

        Ok(Self { shared, cancel_tx })
    }

    /// Cancel ticking. Safe to call any number of times, including after expiry.
    pub fn stop(&self) {
        let stopped = lock_shared(&self.shared).session.stop(Instant::now());

        if stopped {
            info!("Quiz timer stopped");
            // The task may already be gone after expiry.
            let _ = self.cancel_tx.send(true);
        }
    }

    pub fn state(&self) -> TimerState {
        lock_shared(&self.shared).session.state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        lock_shared(&self.shared).session.snapshot(Instant::now())
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::Duration,
    };

    use tokio::time::sleep;

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder {
        warnings: Arc<AtomicUsize>,
        expiries: Arc<AtomicUsize>,
        readings: Arc<Mutex<Vec<TimerReading>>>,
    }

    impl Recorder {
        fn display(&self) -> Box<dyn DisplayTarget> {
            let readings = Arc::clone(&self.readings);
            Box::new(move |reading: &TimerReading| -> Result<(), DisplayError> {
                readings.lock().unwrap().push(reading.clone());
                Ok(())
            })
        }

        fn texts(&self) -> Vec<String> {
            self.readings.lock().unwrap().iter().map(|r| r.text.clone()).collect()
        }

        fn warnings(&self) -> usize {
            self.warnings.load(Ordering::SeqCst)
        }

        fn expiries(&self) -> usize {
            self.expiries.load(Ordering::SeqCst)
        }
    }

    impl TimerHooks for Recorder {
        fn on_warning(&mut self, _remaining_seconds: u64) {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }

        fn on_expiry(&mut self, _elapsed_seconds: u64) {
            self.expiries.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn start(duration: Option<i64>, recorder: &Recorder) -> CountdownTimer {
        CountdownTimer::start(duration, Some(recorder.display()), Box::new(recorder.clone())).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn expires_exactly_once_at_duration() {
        let recorder = Recorder::default();
        let timer = start(Some(3), &recorder);

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(recorder.expiries(), 0);
        assert_eq!(timer.state(), TimerState::Running);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(recorder.expiries(), 1);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(recorder.texts(), vec!["0:03", "0:02", "0:01"]);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(recorder.expiries(), 1);
        assert_eq!(recorder.texts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn long_quiz_warns_once_before_expiry() {
        let recorder = Recorder::default();
        let _timer = start(Some(305), &recorder);

        sleep(Duration::from_millis(4500)).await;
        assert_eq!(recorder.warnings(), 0);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(recorder.warnings(), 1);
        assert_eq!(recorder.texts().last().unwrap(), "5:00");

        sleep(Duration::from_secs(300)).await;
        assert_eq!(recorder.warnings(), 1);
        assert_eq!(recorder.expiries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn short_quiz_warns_on_first_tick() {
        let recorder = Recorder::default();
        let _timer = start(Some(120), &recorder);

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(recorder.warnings(), 1);

        sleep(Duration::from_secs(200)).await;
        assert_eq!(recorder.warnings(), 1);
        assert_eq!(recorder.expiries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn one_second_quiz_expires_without_warning() {
        let recorder = Recorder::default();
        let timer = start(Some(1), &recorder);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(recorder.warnings(), 0);
        assert_eq!(recorder.expiries(), 1);
        assert_eq!(recorder.texts(), vec!["0:01"]);
    }

    #[tokio::test(start_paused = true)]
    async fn start_shows_the_full_duration_before_the_first_tick() {
        let recorder = Recorder::default();
        let timer = start(Some(1800), &recorder);

        assert_eq!(recorder.texts(), vec!["30:00"]);
        assert_eq!(timer.snapshot().display.text, "30:00");

        let idle = Recorder::default();
        let _idle = CountdownTimer::start(Some(1800), None, Box::new(idle.clone())).unwrap();
        assert!(idle.texts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stopwatch_counts_up_without_callbacks() {
        let recorder = Recorder::default();
        let timer = start(None, &recorder);

        sleep(Duration::from_millis(3500)).await;
        assert_eq!(recorder.texts(), vec!["0:00", "0:01", "0:02", "0:03"]);

        sleep(Duration::from_secs(4000)).await;
        assert_eq!(recorder.warnings(), 0);
        assert_eq!(recorder.expiries(), 0);
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(recorder.texts().last().unwrap(), "1:06:43");
    }

    #[tokio::test(start_paused = true)]
    async fn last_minute_is_urgent() {
        let recorder = Recorder::default();
        let _timer = start(Some(62), &recorder);

        sleep(Duration::from_millis(2500)).await;
        let readings = recorder.readings.lock().unwrap().clone();
        assert_eq!(readings[0].text, "1:02");
        assert!(!readings[1].urgent);
        assert_eq!(readings[2].text, "1:00");
        assert!(readings[2].urgent);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_ticking_and_is_idempotent() {
        let recorder = Recorder::default();
        let timer = start(Some(10), &recorder);

        sleep(Duration::from_millis(2500)).await;
        timer.stop();
        timer.stop();

        let shown = recorder.texts().len();
        sleep(Duration::from_secs(30)).await;

        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(recorder.texts().len(), shown);
        assert_eq!(recorder.expiries(), 0);
        assert_eq!(timer.snapshot().elapsed_seconds, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_after_expiry_is_a_no_op() {
        let recorder = Recorder::default();
        let timer = start(Some(1), &recorder);

        sleep(Duration::from_secs(5)).await;
        timer.stop();

        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(recorder.expiries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_expires_on_first_tick() {
        let recorder = Recorder::default();
        let timer = start(Some(0), &recorder);

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(recorder.warnings(), 0);
        assert_eq!(recorder.expiries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_display_means_idle_forever() {
        let recorder = Recorder::default();
        let timer = CountdownTimer::start(Some(2), None, Box::new(recorder.clone())).unwrap();

        sleep(Duration::from_secs(10)).await;

        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(recorder.warnings(), 0);
        assert_eq!(recorder.expiries(), 0);
        timer.stop();
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn detached_display_does_not_stop_ticking() {
        let recorder = Recorder::default();
        let display: Box<dyn DisplayTarget> =
            Box::new(|_: &TimerReading| -> Result<(), DisplayError> { Err(DisplayError::Detached) });
        let timer = CountdownTimer::start(Some(3), Some(display), Box::new(recorder.clone())).unwrap();

        sleep(Duration::from_secs(5)).await;

        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(recorder.expiries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let recorder = Recorder::default();
        let timer = start(Some(5), &recorder);

        sleep(Duration::from_millis(1500)).await;
        drop(timer);
        sleep(Duration::from_secs(10)).await;

        assert_eq!(recorder.texts().len(), 2);
        assert_eq!(recorder.expiries(), 0);
    }

    #[test]
    fn negative_duration_fails_fast() {
        let result = CountdownTimer::start(Some(-1), None, Box::new(NoHooks));
        assert!(matches!(result, Err(TimerError::NegativeDuration(-1))));
    }
}
