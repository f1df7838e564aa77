//! Notice sweeper background task

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::time::interval;
use tracing::{debug, info};

use crate::state::AppState;

/// How often expired notices are dropped
pub const SWEEP_PERIOD: Duration = Duration::from_secs(1);

/// Background task that removes notices once their time-to-live has passed
pub async fn notice_sweeper_task(state: Arc<AppState>) {
    info!("Starting notice sweeper task");

    let mut interval = interval(SWEEP_PERIOD);

    loop {
        interval.tick().await;

        let removed = state.notifications.sweep(Utc::now());
        if removed > 0 {
            debug!("Swept {} expired notices", removed);
        }
    }
}
