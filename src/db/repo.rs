use crate::model::Case;
use anyhow::Context;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use thiserror::Error;
use tracing::instrument;

pub type Pool = SqlitePool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Case with this ID already exists")]
    DuplicateId(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub async fn init_pool(database_url: &str) -> anyhow::Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let options = SqliteConnectOptions::from_str(&normalized)
        .with_context(|| format!("invalid database url {}", normalized))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Full);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("failed to open case database")?;
    Ok(pool)
}

/// If using a file-backed SQLite URL, expand a leading `~/` and ensure the parent
/// directory exists. Leaves in-memory URLs untouched. Returns possibly-updated URL.
fn prepare_sqlite_url(url: &str) -> String {
    if !url.starts_with("sqlite:") || url.starts_with("sqlite::memory") {
        return url.to_string();
    }

    let rest = &url["sqlite:".len()..];
    let path_with_query = rest.strip_prefix("//").unwrap_or(rest);

    let (path_part, query_part) = match path_with_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_with_query, None),
    };

    if path_part.is_empty() {
        return url.to_string();
    }

    let expanded_path = match (path_part.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
        _ => path_part.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&expanded_path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let mut rebuilt = String::from("sqlite://");
    rebuilt.push_str(&expanded_path);
    if let Some(q) = query_part {
        rebuilt.push('?');
        rebuilt.push_str(q);
    }
    rebuilt
}

pub async fn run_migrations(pool: &Pool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const CASE_COLUMNS: &str = "id, case_name, modern_house_youtube_link, searchome_link, \
     gorgeous_space_link, uploaded_to_modern_house, remarks";

fn case_from_row(row: &SqliteRow) -> Result<Case, sqlx::Error> {
    Ok(Case {
        id: row.try_get("id")?,
        case_name: row.try_get("case_name")?,
        modern_house_youtube_link: row.try_get("modern_house_youtube_link")?,
        searchome_link: row.try_get("searchome_link")?,
        gorgeous_space_link: row.try_get("gorgeous_space_link")?,
        uploaded_to_modern_house: row.try_get("uploaded_to_modern_house")?,
        remarks: row.try_get("remarks")?,
    })
}

/// All cases in insertion order.
#[instrument(skip_all)]
pub async fn list_cases(pool: &Pool) -> Result<Vec<Case>, StoreError> {
    let rows = sqlx::query(&format!("SELECT {} FROM cases ORDER BY rowid ASC", CASE_COLUMNS))
        .fetch_all(pool)
        .await?;
    let cases = rows
        .iter()
        .map(case_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cases)
}

#[instrument(skip_all, fields(id = %id))]
pub async fn get_case(pool: &Pool, id: &str) -> Result<Option<Case>, StoreError> {
    let row = sqlx::query(&format!("SELECT {} FROM cases WHERE id = ?", CASE_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(case_from_row).transpose()?)
}

#[instrument(skip_all, fields(id = %id))]
pub async fn case_exists(pool: &Pool, id: &str) -> Result<bool, StoreError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM cases WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Insert a new case. An existing row with the same id is left untouched and
/// `DuplicateId` is returned.
#[instrument(skip_all, fields(id = %case.id))]
pub async fn create_case(pool: &Pool, case: &Case) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    let existing = sqlx::query_scalar::<_, i64>("SELECT 1 FROM cases WHERE id = ?")
        .bind(&case.id)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Err(StoreError::DuplicateId(case.id.clone()));
    }
    let inserted = sqlx::query(
        "INSERT INTO cases (id, case_name, modern_house_youtube_link, searchome_link, \
         gorgeous_space_link, uploaded_to_modern_house, remarks) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&case.id)
    .bind(&case.case_name)
    .bind(&case.modern_house_youtube_link)
    .bind(&case.searchome_link)
    .bind(&case.gorgeous_space_link)
    .bind(case.uploaded_to_modern_house)
    .bind(&case.remarks)
    .execute(&mut *tx)
    .await;
    match inserted {
        Ok(_) => {}
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(StoreError::DuplicateId(case.id.clone()));
        }
        Err(err) => return Err(err.into()),
    }
    tx.commit().await?;
    Ok(())
}

/// Replace every mutable field of the case keyed by `case.id`.
///
/// There is no existence check: updating an unknown id succeeds without
/// creating anything. Returns whether a row was changed.
#[instrument(skip_all, fields(id = %case.id))]
pub async fn update_case(pool: &Pool, case: &Case) -> Result<bool, StoreError> {
    let res = sqlx::query(
        "UPDATE cases SET case_name = ?, modern_house_youtube_link = ?, searchome_link = ?, \
         gorgeous_space_link = ?, uploaded_to_modern_house = ?, remarks = ?, \
         updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(&case.case_name)
    .bind(&case.modern_house_youtube_link)
    .bind(&case.searchome_link)
    .bind(&case.gorgeous_space_link)
    .bind(case.uploaded_to_modern_house)
    .bind(&case.remarks)
    .bind(&case.id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

/// Remove a case if present. Returns whether a row was removed.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_case(pool: &Pool, id: &str) -> Result<bool, StoreError> {
    let res = sqlx::query("DELETE FROM cases WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}
