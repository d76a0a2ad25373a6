//! Batch link check over every stored case, plus the JSON export document.
use crate::checker::ExistenceChecker;
use crate::db::{self, Pool, StoreError};
use crate::model::{Case, CaseCheckReport};
use chrono::{DateTime, Utc};
use reqwest::Url;
use thiserror::Error;
use tracing::{instrument, warn};

pub const NO_ACTION: &str = "No action needed";
pub const MOVE_SUGGESTED: &str = "Move suggested: the video is on Searchome or Gorgeous Space \
     but not on the Modern House channel.";
pub const DUPLICATE_WARNING: &str = "Warning: the video is already on the Modern House channel \
     but Searchome or Gorgeous Space still link to it; check for duplicate content.";

fn non_empty(link: &Option<String>) -> Option<&str> {
    link.as_deref().filter(|l| !l.is_empty())
}

/// Partner platform links only need to be well-formed absolute URLs.
fn is_well_formed_link(link: &Option<String>) -> bool {
    non_empty(link).is_some_and(|l| Url::parse(l).is_ok())
}

async fn check_case(checker: &ExistenceChecker, channel_id: &str, case: Case) -> CaseCheckReport {
    let modern_house_youtube_exists = match non_empty(&case.modern_house_youtube_link) {
        Some(link) => match checker.check_video_in_channel(Some(link), Some(channel_id)).await {
            Ok(found) => found.exists_in_channel,
            Err(err) => {
                warn!(id = %case.id, error = %err, "channel check failed");
                false
            }
        },
        None => false,
    };
    let searchome_video_exists = is_well_formed_link(&case.searchome_link);
    let gorgeous_space_video_exists = is_well_formed_link(&case.gorgeous_space_link);
    let elsewhere = searchome_video_exists || gorgeous_space_video_exists;

    let (recommendation, warning) = match (modern_house_youtube_exists, elsewhere) {
        (true, true) => (NO_ACTION, Some(DUPLICATE_WARNING.to_string())),
        (false, true) => (MOVE_SUGGESTED, None),
        _ => (NO_ACTION, None),
    };

    CaseCheckReport {
        id: case.id,
        case_name: case.case_name,
        modern_house_youtube_link: case.modern_house_youtube_link,
        searchome_link: case.searchome_link,
        gorgeous_space_link: case.gorgeous_space_link,
        modern_house_youtube_exists,
        searchome_video_exists,
        gorgeous_space_video_exists,
        recommendation: recommendation.to_string(),
        warning,
    }
}

/// Check every stored case against `channel_id`, one case at a time.
#[instrument(skip(pool, checker))]
pub async fn batch_check(
    pool: &Pool,
    checker: &ExistenceChecker,
    channel_id: &str,
) -> Result<Vec<CaseCheckReport>, StoreError> {
    let cases = db::list_cases(pool).await?;
    let mut reports = Vec::with_capacity(cases.len());
    for case in cases {
        reports.push(check_case(checker, channel_id, case).await);
    }
    Ok(reports)
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("cases_{}.json", now.format("%Y-%m-%d"))
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Pretty-printed JSON array of all cases.
pub async fn export_cases(pool: &Pool) -> Result<String, ExportError> {
    let cases = db::list_cases(pool).await?;
    Ok(serde_json::to_string_pretty(&cases)?)
}
