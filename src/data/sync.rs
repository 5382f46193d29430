/// Delta synchronization against the remote append-only log.
///
/// The remote store is the durable cursor: the watermark is re-derived from
/// its last row on every cycle, never cached locally. Restarting mid-cycle
/// cannot produce duplicates or gaps because the next cycle re-reads the
/// true remote state.
use tracing::{debug, info};

use crate::error::{Result, CollectorError};
use crate::types::{LabeledBar, SHEET_COLUMNS};

/// Append-only tabular store: read everything, append one row, append a batch
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn read_all(&self) -> Result<Vec<Vec<String>>>;
    async fn append_row(&self, row: &[String]) -> Result<()>;
    async fn append_rows(&self, rows: &[Vec<String>]) -> Result<()>;
}

/// Header row in worksheet column order
pub fn header_row() -> Vec<String> {
    SHEET_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Append the batch rows not yet present in the store, exactly once.
///
/// Returns the number of rows appended; zero means nothing new yet. At most
/// one batched append per call. Any store failure aborts the cycle before
/// any write happens for this batch.
pub async fn synchronize<S: RemoteStore>(store: &S, batch: &[LabeledBar]) -> Result<usize> {
    let existing = store.read_all().await?;

    let new_rows: Vec<&LabeledBar> = if existing.len() > 1 {
        let watermark = watermark_of(&existing)?;
        debug!("Remote watermark: {}", watermark);

        // Canonical timestamps are fixed-width and zero-padded, so string
        // order equals chronological order
        batch
            .iter()
            .filter(|bar| bar.timestamp.as_str() > watermark)
            .collect()
    } else {
        if existing.is_empty() {
            store.append_row(&header_row()).await?;
            info!("Header row created");
        }
        batch.iter().collect()
    };

    if new_rows.is_empty() {
        debug!("No new rows to append");
        return Ok(0);
    }

    let cells: Vec<Vec<String>> = new_rows.iter().map(|bar| bar.to_cells()).collect();
    store.append_rows(&cells).await?;

    Ok(cells.len())
}

/// Timestamp of the store's last row, the exclusive lower bound for new data
fn watermark_of(existing: &[Vec<String>]) -> Result<&str> {
    existing
        .last()
        .and_then(|row| row.first())
        .map(|cell| cell.as_str())
        .filter(|cell| !cell.is_empty())
        .ok_or_else(|| CollectorError::InvalidWatermark("Last remote row has no timestamp cell".to_string()))
}
