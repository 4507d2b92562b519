use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{HistoryEvent, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Author of the record.
    #[serde(default, deserialize_with = "super::lenient::string_or_none")]
    pub user: Option<UserId>,
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<HistoryEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_file: Option<MedicalFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalFile {
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<HistoryEvent>,
}

/// Decodes a history array entry by entry. Records written years apart do
/// not share a schema, so an entry that fails to decode is dropped instead
/// of failing the whole person.
fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<HistoryEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut events = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<HistoryEvent>(value) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!("skipping history entry {}: {}", index, e),
        }
    }
    Ok(events)
}
