use crate::domain::upload::NewUpload;
use crate::error::AppError;
use crate::utils::state::AppState;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Outcome of one archiver pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Rows inserted for staged files found on disk.
    pub recorded: usize,
    /// Pending rows moved to `archived`.
    pub archived: usize,
    /// Files deleted from the staging directory.
    pub removed: usize,
}

/// Sweeps the staging directory once.
///
/// Every file listed at the start of the pass is deleted once the record
/// store has been updated; files arriving later are left for the next pass.
/// Pending rows are marked archived. With `legacy_parity` every listed file
/// is also recorded again under its own name, otherwise only files with no
/// pending row are.
pub async fn run_archive_pass(state: &AppState) -> Result<ArchiveReport, AppError> {
    let _staging = state.lock_staging().await;
    state.upload_storage.ensure_schema().await?;

    let staged = state.storage.list_staged().await?;
    let scanned_at = Utc::now();

    let pending = state.upload_storage.list_pending().await?;
    let settled: Vec<i64> = pending.iter().map(|record| record.id).collect();
    let swept: Vec<NewUpload> = if state.config.legacy_parity {
        staged
            .iter()
            .map(|name| NewUpload::swept(name, scanned_at))
            .collect()
    } else {
        let pending_names: HashSet<&str> = pending
            .iter()
            .map(|record| record.saved_filename.as_str())
            .collect();
        staged
            .iter()
            .filter(|name| !pending_names.contains(name.as_str()))
            .map(|name| NewUpload::swept(name, scanned_at))
            .collect()
    };

    let mut report = ArchiveReport {
        recorded: swept.len(),
        archived: settled.len(),
        removed: 0,
    };
    if !settled.is_empty() || !swept.is_empty() {
        state
            .upload_storage
            .record_archive_pass(&settled, swept)
            .await?;
    }

    for name in &staged {
        if state.storage.remove_staged(name).await? {
            report.removed += 1;
        }
    }
    Ok(report)
}

/// Owns the recurring archiver task.
pub struct ArchiverHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ArchiverHandle {
    /// Stops the schedule, letting a pass already running finish first.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(err) = self.task.await {
            error!("archiver task ended abnormally: {err}");
        }
    }
}

/// Starts the archiver: the first pass runs one interval after startup.
///
/// Each pass runs in its own task, so a failed or panicking pass is logged
/// and the schedule carries on.
pub fn spawn_archiver(state: Arc<AppState>, token: CancellationToken) -> ArchiverHandle {
    let period = state.config.archive_interval;
    let cancelled = token.clone();

    let task = tokio::spawn(async move {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    info!("archiver stopped");
                    break;
                }
                _ = timer.tick() => {
                    let pass_state = state.clone();
                    let pass = tokio::spawn(async move { run_archive_pass(&pass_state).await });
                    match pass.await {
                        Ok(Ok(report)) => info!(
                            recorded = report.recorded,
                            archived = report.archived,
                            removed = report.removed,
                            "archiver pass complete"
                        ),
                        Ok(Err(err)) => error!("archiver pass failed: {err}"),
                        Err(err) => error!("archiver pass panicked: {err}"),
                    }
                }
            }
        }
    });

    ArchiverHandle { token, task }
}
