//! The retention sweep: scheduled deletion of notes past their expiry.
//!
//! Pages through the entire `notes/` prefix with the store's cursor,
//! inspecting every record. A note with `retentionDays == 0` is never a
//! candidate; otherwise it expires `retentionDays` after its last update.
//! Expired notes go through the repository's shared deletion path (note +
//! images + index entry, concurrently). Failures are isolated per note:
//! one bad record or one failing delete is logged and counted, and the
//! sweep moves on.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use evergreen_core::{keys::NOTES_PREFIX, note::Note, store::ObjectStore};

use crate::repo::{NoteRepository, OpError};

/// Keys fetched per page while scanning.
const PAGE_SIZE: usize = 100;

/// What one sweep pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
  /// Note objects inspected.
  pub scanned:  usize,
  /// Notes fully deleted.
  pub deleted:  usize,
  /// Notes skipped because of a per-note fault.
  pub failures: usize,
}

/// Run one sweep pass over every stored note.
///
/// A listing fault aborts the pass (there is nothing sensible to iterate);
/// every per-note fault is contained.
pub async fn run_sweep<S>(
  repo: &NoteRepository<S>,
  now: DateTime<Utc>,
) -> Result<SweepReport, OpError>
where
  S: ObjectStore + 'static,
{
  let mut report = SweepReport::default();
  let mut cursor = None;

  loop {
    let page = repo
      .store()
      .list(NOTES_PREFIX, cursor, PAGE_SIZE)
      .await
      .map_err(OpError::store)?;

    for key in &page.keys {
      report.scanned += 1;
      match sweep_one(repo, key, now).await {
        Ok(true) => report.deleted += 1,
        Ok(false) => {}
        Err(e) => {
          report.failures += 1;
          tracing::warn!(key = %key, error = %e, "sweep: skipping note after fault");
        }
      }
    }

    if !page.truncated {
      break;
    }
    cursor = page.cursor;
  }

  tracing::info!(
    scanned = report.scanned,
    deleted = report.deleted,
    failures = report.failures,
    "retention sweep finished"
  );
  Ok(report)
}

/// Inspect a single note object; delete it if expired. Returns whether a
/// deletion happened.
async fn sweep_one<S>(
  repo: &NoteRepository<S>,
  key: &str,
  now: DateTime<Utc>,
) -> Result<bool, OpError>
where
  S: ObjectStore + 'static,
{
  // A note deleted between listing and inspection is not a fault.
  let Some(obj) = repo.store().get(key).await.map_err(OpError::store)? else {
    return Ok(false);
  };
  let note = Note::from_bytes(&obj.bytes)?;

  let Some(expires_at) = note.expires_at() else {
    return Ok(false);
  };
  if now <= expires_at {
    return Ok(false);
  }

  repo
    .delete(&note.vault, &note.title_slug, &note.hash)
    .await?;
  Ok(true)
}

/// Fire [`run_sweep`] every `every` on a background task, starting one
/// interval after boot.
pub fn spawn<S>(
  repo: Arc<NoteRepository<S>>,
  every: std::time::Duration,
) -> tokio::task::JoinHandle<()>
where
  S: ObjectStore + 'static,
{
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // interval's first tick completes immediately; consume it so the
    // sweep runs on schedule rather than at boot.
    ticker.tick().await;
    loop {
      ticker.tick().await;
      if let Err(e) = run_sweep(&repo, Utc::now()).await {
        tracing::error!(error = %e, "retention sweep aborted");
      }
    }
  })
}
