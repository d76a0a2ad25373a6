//! Bulk import: upsert each record by id, collecting per-record failures.
//!
//! Records are applied one at a time and committed individually. A failing
//! record is reported in the result and never stops the rest of the batch.
use crate::db::{self, Pool, StoreError};
use crate::model::{case_id_from_value, CaseFields, ImportFailure, ImportResult, MissingCaseName};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const IMPORT_COMPLETE: &str = "Import complete";

#[derive(Debug, Error)]
enum RecordError {
    #[error("Case ID is missing")]
    MissingId,
    #[error("Invalid case record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    MissingName(#[from] MissingCaseName),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Created,
    Updated,
}

fn record_id(record: &Value) -> Option<String> {
    record.get("id").and_then(case_id_from_value)
}

async fn apply_record(pool: &Pool, record: &Value) -> Result<Applied, RecordError> {
    let id = record_id(record).ok_or(RecordError::MissingId)?;
    let fields: CaseFields = serde_json::from_value(record.clone())?;
    let case = fields.into_case(id)?;

    if db::case_exists(pool, &case.id).await? {
        db::update_case(pool, &case).await?;
        Ok(Applied::Updated)
    } else {
        // A concurrent insert between the lookup and here surfaces as DuplicateId.
        db::create_case(pool, &case).await?;
        Ok(Applied::Created)
    }
}

#[instrument(skip_all, fields(records = records.len()))]
pub async fn reconcile(pool: &Pool, records: &[Value]) -> ImportResult {
    let mut imported_count = 0;
    let mut updated_count = 0;
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match apply_record(pool, record).await {
            Ok(Applied::Created) => imported_count += 1,
            Ok(Applied::Updated) => updated_count += 1,
            Err(err) => {
                warn!(index, error = %err, "import record rejected");
                errors.push(ImportFailure {
                    record: record.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        imported_count,
        updated_count,
        failed = errors.len(),
        "import finished"
    );
    ImportResult {
        message: IMPORT_COMPLETE.to_string(),
        imported_count,
        updated_count,
        errors,
    }
}
