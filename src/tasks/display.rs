//! Display follower task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{engine::Side, state::TimerSnapshot};

/// Follow both timers' snapshots and log every change until both engines are gone
pub async fn display_task(
    mut left: watch::Receiver<TimerSnapshot>,
    mut right: watch::Receiver<TimerSnapshot>,
) {
    info!("Starting display task");

    let mut left_open = true;
    let mut right_open = true;

    while left_open || right_open {
        tokio::select! {
            changed = left.changed(), if left_open => match changed {
                Ok(()) => {
                    let snapshot = left.borrow_and_update().clone();
                    log_snapshot(Side::Left, &snapshot);
                }
                Err(_) => left_open = false,
            },
            changed = right.changed(), if right_open => match changed {
                Ok(()) => {
                    let snapshot = right.borrow_and_update().clone();
                    log_snapshot(Side::Right, &snapshot);
                }
                Err(_) => right_open = false,
            },
        }
    }

    info!("Display task finished");
}

fn log_snapshot(side: Side, snapshot: &TimerSnapshot) {
    debug!("{:>5} {} {:?}", side, snapshot.display, snapshot.run_state);
}
