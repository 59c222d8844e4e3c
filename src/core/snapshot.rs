use crate::core::{Inventory, Storage, Textbook};
use crate::utils::error::{Result, StoreError};
use serde::{Deserialize, Serialize};

/// Version tag written into every snapshot. A file carrying a different tag
/// is rejected instead of being guessed at.
pub const FORMAT_VERSION: u32 = 1;

/// The persisted form of a whole catalog: a self-describing JSON document,
/// overwritten in full on every save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub saved_at: String,
    pub books: Vec<Textbook>,
}

impl Snapshot {
    pub fn capture(inventory: &Inventory) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            books: inventory.books().to_vec(),
        }
    }

    pub fn into_inventory(self) -> Inventory {
        Inventory::from_books(self.books)
    }
}

/// Result of a load attempt. A missing file is a normal outcome, reported
/// separately from a file that exists but cannot be read or parsed.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Inventory),
    Missing,
}

pub async fn save_snapshot<S: Storage>(
    storage: &S,
    path: &str,
    inventory: &Inventory,
) -> Result<()> {
    let snapshot = Snapshot::capture(inventory);
    let data = serde_json::to_vec_pretty(&snapshot)?;

    storage.write_file(path, &data).await?;
    tracing::debug!(
        "Snapshot written to {} ({} bytes, {} record(s))",
        path,
        data.len(),
        snapshot.books.len()
    );
    Ok(())
}

pub async fn load_snapshot<S: Storage>(storage: &S, path: &str) -> Result<LoadOutcome> {
    let data = match storage.read_file(path).await {
        Ok(data) => data,
        Err(StoreError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No snapshot at {}", path);
            return Ok(LoadOutcome::Missing);
        }
        Err(e) => return Err(e),
    };

    let snapshot: Snapshot = serde_json::from_slice(&data)?;

    if snapshot.format_version != FORMAT_VERSION {
        return Err(StoreError::SnapshotFormatError {
            message: format!(
                "unsupported snapshot format version {} (expected {})",
                snapshot.format_version, FORMAT_VERSION
            ),
        });
    }

    tracing::debug!(
        "Snapshot loaded from {} ({} record(s))",
        path,
        snapshot.books.len()
    );
    Ok(LoadOutcome::Loaded(snapshot.into_inventory()))
}
