use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::*;

const UNKNOWN_USER: &str = "Unknown";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to serialize history: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    pub person_id: String,
    pub person_name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub history: Vec<ExportedEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedEvent {
    pub date: DateTime<Utc>,
    pub user: String,
    pub user_id: Option<UserId>,
    pub data: BTreeMap<String, FieldChange>,
}

/// Builds the downloadable history document with author names resolved.
pub fn build_export(person: &Person, history: &[HistoryEvent], users: &UserDirectory) -> HistoryExport {
    let history = history
        .iter()
        .map(|event| ExportedEvent {
            date: event.date,
            user: event
                .user
                .as_deref()
                .and_then(|id| users.name_of(id))
                .or(event.user_name.as_deref())
                .unwrap_or(UNKNOWN_USER)
                .to_string(),
            user_id: event.user.clone(),
            data: event.data.clone(),
        })
        .collect();

    HistoryExport {
        person_id: person.id.clone(),
        person_name: person.name.clone(),
        created_at: person.created_at,
        created_by: person
            .user
            .as_deref()
            .and_then(|id| users.name_of(id))
            .unwrap_or(UNKNOWN_USER)
            .to_string(),
        history,
    }
}

/// `history-<name or id>-<YYYY-MM-DD-HHmm>.json`
pub fn export_file_name(person: &Person, at: DateTime<Utc>) -> String {
    let who = if person.name.is_empty() {
        person.id.as_str()
    } else {
        person.name.as_str()
    };
    let who: String = who
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("history-{}-{}.json", who, at.format("%Y-%m-%d-%H%M"))
}

/// Writes `export` as pretty JSON into `dir` and returns the file path.
pub fn write_export(
    dir: &Path,
    person: &Person,
    export: &HistoryExport,
    at: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(person, at));
    let body = serde_json::to_string_pretty(export)?;
    std::fs::write(&path, body).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        "exported {} history entries to {}",
        export.history.len(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn person() -> Person {
        serde_json::from_value(json!({
            "_id": "p1",
            "name": "Jo",
            "createdAt": "2022-01-01T00:00:00.000Z",
            "user": "u1",
            "history": [
                { "date": "2022-02-01T00:00:00.000Z", "user": "u1", "data": { "name": { "oldValue": "J", "newValue": "Jo" } } },
                { "date": "2022-03-01T00:00:00.000Z", "user": "u7", "userName": "Former", "data": {} },
                { "date": "2022-04-01T00:00:00.000Z", "user": "u8", "data": {} }
            ]
        }))
        .expect("decode person")
    }

    #[test]
    fn resolves_authors_with_fallbacks() {
        let person = person();
        let users = UserDirectory {
            users: vec![User { id: "u1".into(), name: Some("Alice".into()) }],
            deleted_users: vec![],
        };

        let export = build_export(&person, &person.history, &users);

        assert_eq!(export.created_by, "Alice");
        let authors: Vec<&str> = export.history.iter().map(|e| e.user.as_str()).collect();
        assert_eq!(authors, vec!["Alice", "Former", "Unknown"]);
        assert_eq!(export.history[0].user_id.as_deref(), Some("u1"));

        let value = serde_json::to_value(&export).expect("serialize");
        assert_eq!(value["personId"], "p1");
        assert_eq!(value["history"][0]["data"]["name"]["newValue"], "Jo");
    }

    #[test]
    fn file_name_uses_name_then_id() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 0).unwrap();
        let mut person = person();
        assert_eq!(export_file_name(&person, at), "history-Jo-2024-05-06-0708.json");
        person.name = String::new();
        assert_eq!(export_file_name(&person, at), "history-p1-2024-05-06-0708.json");
    }

    #[test]
    fn writes_pretty_json() {
        let dir = std::env::temp_dir().join(format!("teamline-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create dir");
        let person = person();
        let export = build_export(&person, &person.history, &UserDirectory::default());
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 0).unwrap();

        let path = write_export(&dir, &person, &export, at).expect("write export");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("\"personName\": \"Jo\""));
        std::fs::remove_dir_all(dir).ok();
    }
}
