use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A stored case. Field names are the wire names used by the front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub case_name: String,
    pub modern_house_youtube_link: Option<String>,
    pub searchome_link: Option<String>,
    pub gorgeous_space_link: Option<String>,
    #[serde(default)]
    pub uploaded_to_modern_house: bool,
    pub remarks: Option<String>,
}

/// Mutable fields of a case as they arrive from a client. Everything is
/// optional here; `into_case` enforces the presence rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseFields {
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub modern_house_youtube_link: Option<String>,
    #[serde(default)]
    pub searchome_link: Option<String>,
    #[serde(default)]
    pub gorgeous_space_link: Option<String>,
    #[serde(default)]
    pub uploaded_to_modern_house: Option<bool>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CaseFields {
    /// Attach an id and validate. Fails when `case_name` is absent or blank.
    pub fn into_case(self, id: impl Into<String>) -> Result<Case, MissingCaseName> {
        let case_name = self
            .case_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(MissingCaseName)?;
        Ok(Case {
            id: id.into(),
            case_name,
            modern_house_youtube_link: self.modern_house_youtube_link,
            searchome_link: self.searchome_link,
            gorgeous_space_link: self.gorgeous_space_link,
            uploaded_to_modern_house: self.uploaded_to_modern_house.unwrap_or(false),
            remarks: self.remarks,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Case name is required")]
pub struct MissingCaseName;

/// Read a case id from raw JSON. The front end sends timestamps as numbers,
/// so numbers are stringified. Null and empty strings count as missing.
pub fn case_id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_case_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ (Value::Null | Value::String(_) | Value::Number(_)) => {
            Ok(case_id_from_value(&value))
        }
        _ => Err(D::Error::custom("case id must be a string or a number")),
    }
}

/// Body of `POST /cases`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCaseRequest {
    #[serde(default, deserialize_with = "deserialize_case_id")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: CaseFields,
}

/// One rejected record of an import batch, echoed back verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportFailure {
    pub record: Value,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportResult {
    pub message: String,
    pub imported_count: u64,
    pub updated_count: u64,
    pub errors: Vec<ImportFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoLookup {
    pub video_id: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelLookup {
    pub video_id: String,
    pub exists_in_channel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Per-case row of the batch link check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseCheckReport {
    pub id: String,
    pub case_name: String,
    pub modern_house_youtube_link: Option<String>,
    pub searchome_link: Option<String>,
    pub gorgeous_space_link: Option<String>,
    pub modern_house_youtube_exists: bool,
    pub searchome_video_exists: bool,
    pub gorgeous_space_video_exists: bool,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
