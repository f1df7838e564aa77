//! Quiz countdown background task

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::watch,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::timer::{
    countdown::{lock_shared, Shared},
    TickAction,
};

/// Period between display updates
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Ticks a timer once per second until it is stopped or expires
pub(crate) async fn countdown_task(shared: Arc<Mutex<Shared>>, mut cancel_rx: watch::Receiver<bool>) {
    let start = lock_shared(&shared).session.start_instant();

    // First tick lands one period after the session started.
    let mut interval = interval_at(start + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let mut guard = lock_shared(&shared);
                if !run_tick(&mut guard, Instant::now()) {
                    break;
                }
            }

            // Fires on stop, and on handle drop once the sender is gone
            _ = cancel_rx.changed() => {
                debug!("Countdown task cancelled");
                break;
            }
        }
    }

    debug!("Countdown task finished");
}

/// Run one tick against the shared state. Returns whether ticking should continue.
pub(crate) fn run_tick(shared: &mut Shared, now: Instant) -> bool {
    let Some(tick) = shared.session.tick(now) else {
        // Stopped between the interval firing and us taking the lock
        return false;
    };

    match tick.action {
        TickAction::Expire => {
            info!("Quiz timer expired after {}s", tick.elapsed_seconds);
            shared.hooks.on_expiry(tick.elapsed_seconds);
            return false;
        }
        TickAction::Warn => {
            let remaining = tick.reading.as_ref().map(|r| r.seconds).unwrap_or_default();
            warn!("Quiz timer warning: {}s remaining", remaining);
            shared.hooks.on_warning(remaining);
        }
        TickAction::None => {}
    }

    if let (Some(reading), Some(display)) = (tick.reading.as_ref(), shared.display.as_mut()) {
        if let Err(e) = display.show(reading) {
            debug!("Ignoring display update failure: {}", e);
        }
    }

    true
}
