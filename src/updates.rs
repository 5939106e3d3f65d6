//! Incremental table updates
//!
//! Drains a stream of replacement `TableData` into the session while the
//! user is navigating. Bad updates are skipped; a failing stream only ends
//! this consumer, never the picker.

use std::fmt::Display;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::UpdateRejected;
use crate::render::Renderer;
use crate::session::Session;
use crate::table::TableData;

/// What happened to the updates a consumer saw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub applied: usize,
    pub rejected: usize,
    /// The stream yielded an error and the consumer stopped
    pub failed: bool,
}

/// Apply updates from `updates` until the stream ends, fails, or the
/// session shuts down
///
/// The stream is dropped on return, which releases its producer.
pub async fn consume_updates<S, E>(
    session: Session,
    renderer: Arc<Renderer>,
    mut updates: S,
    shutdown: CancellationToken,
) -> UpdateStats
where
    S: Stream<Item = Result<TableData, E>> + Unpin,
    E: Display,
{
    let mut stats = UpdateStats::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("update consumer shutting down");
                break;
            }
            next = updates.next() => next,
        };

        let Some(item) = next else {
            debug!("update stream ended");
            break;
        };
        if session.is_stopped() {
            break;
        }

        let data = match item {
            Ok(data) => data,
            Err(e) => {
                warn!("table update stream failed: {}", e);
                stats.failed = true;
                break;
            }
        };

        match session.replace_data(data) {
            Ok(snapshot) => {
                stats.applied += 1;
                debug!(rows = snapshot.total_rows(), "applied table update");
                renderer.render(&snapshot);
            }
            Err(UpdateRejected::Stopped) => break,
            Err(rejected) => {
                stats.rejected += 1;
                warn!("discarding table update: {}", rejected);
            }
        }
    }

    stats
}
