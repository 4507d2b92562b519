use chrono::{DateTime, Utc};

use crate::domain::*;
use crate::timeline::team_label;

/// One row of the person history table.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub date: DateTime<Utc>,
    pub author: String,
    pub changes: Vec<String>,
}

/// The person's history, newest first. The medical-file history is only
/// merged in for healthcare professionals.
pub fn merged_history(person: &Person, include_medical_file: bool) -> Vec<HistoryEvent> {
    let mut history = person.history.clone();
    if include_medical_file {
        if let Some(medical) = &person.medical_file {
            history.extend(medical.history.iter().cloned());
        }
    }
    // Same-instant entries: later-recorded first.
    history.reverse();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}

/// Human-readable lines describing every field touched by an event.
pub fn describe_event(event: &HistoryEvent, teams: &TeamDirectory) -> Vec<String> {
    event
        .data
        .iter()
        .filter_map(|(field, change)| describe_change(field, change, teams))
        .collect()
}

pub fn describe_change(field: &str, change: &FieldChange, teams: &TeamDirectory) -> Option<String> {
    match field {
        "merge" => {
            let name = change.0.get("name").and_then(|v| v.as_str()).unwrap_or("?");
            match change.0.get("_id").and_then(|v| v.as_str()) {
                Some(id) => Some(format!("Merged with \"{}\" (id \"{}\")", name, id)),
                None => Some(format!("Merged with \"{}\"", name)),
            }
        }
        ASSIGNED_TEAMS => {
            let names = |value: Option<&serde_json::Value>| {
                value
                    .and_then(|v| v.as_array())
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|id| id.as_str())
                            .map(|id| team_label(teams, id))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default()
            };
            Some(format!(
                "{}: \"{}\" ➔ \"{}\"",
                field,
                names(change.old_value()),
                names(change.new_value())
            ))
        }
        "outOfActiveList" => Some(
            if change.new_value().and_then(|v| v.as_bool()) == Some(true) {
                "Left active list".to_string()
            } else {
                "Back in active list".to_string()
            },
        ),
        "outOfActiveListReasons" => {
            let reasons = change.new_value().and_then(|v| v.as_array())?;
            if reasons.is_empty() {
                return None;
            }
            let reasons: Vec<&str> = reasons.iter().filter_map(|r| r.as_str()).collect();
            Some(format!("{}: {}", field, reasons.join(", ")))
        }
        "outOfActiveListDate" => {
            let date = change.new_value().and_then(timestamp::parse_timestamp)?;
            Some(date.format("%-d %B %Y").to_string())
        }
        "outOfTeamsInformations" => {
            let entries = change.0.as_array()?;
            let parts: Vec<String> = entries
                .iter()
                .map(|entry| {
                    let team = entry.get("team").and_then(|t| t.as_str()).unwrap_or_default();
                    let reasons: Vec<&str> = entry
                        .get("reasons")
                        .and_then(|r| r.as_array())
                        .map(|r| r.iter().filter_map(|s| s.as_str()).collect())
                        .unwrap_or_default();
                    let reasons = if reasons.is_empty() {
                        "Not specified".to_string()
                    } else {
                        reasons.join(", ")
                    };
                    format!("{}: {}", team_label(teams, team), reasons)
                })
                .collect();
            Some(format!("Team exit reasons: {}", parts.join("; ")))
        }
        _ => {
            let compact = |v: Option<&serde_json::Value>| {
                v.map(|v| v.to_string()).unwrap_or_else(|| "\"\"".to_string())
            };
            Some(format!(
                "{}: {} ➔ {}",
                field,
                compact(change.old_value()),
                compact(change.new_value())
            ))
        }
    }
}

/// Table rows for `history`, closed by the creation row of the person.
pub fn history_rows(
    person: &Person,
    history: &[HistoryEvent],
    teams: &TeamDirectory,
    users: &UserDirectory,
) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = history
        .iter()
        .map(|event| HistoryRow {
            date: event.date,
            author: users.display_name(event.user.as_deref(), event.user_name.as_deref()),
            changes: describe_event(event, teams),
        })
        .collect();
    rows.push(HistoryRow {
        date: person.created_at,
        author: users.display_name(person.user.as_deref(), None),
        changes: vec!["Person created".to_string()],
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person() -> Person {
        serde_json::from_value(json!({
            "_id": "p1",
            "name": "Jo",
            "createdAt": "2022-01-01T00:00:00.000Z",
            "user": "u1",
            "history": [
                { "date": "2022-02-01T00:00:00.000Z", "user": "u1", "data": { "assignedTeams": { "oldValue": ["t1"], "newValue": ["t1", "gone"] } } },
                { "date": "2022-04-01T00:00:00.000Z", "user": "u2", "userName": "Old Name", "data": { "outOfActiveList": { "oldValue": false, "newValue": true } } }
            ],
            "medicalFile": {
                "history": [
                    { "date": "2022-03-01T00:00:00.000Z", "user": "u1", "data": { "allergies": { "oldValue": null, "newValue": "peanuts" } } }
                ]
            }
        }))
        .expect("decode person")
    }

    fn teams() -> TeamDirectory {
        vec![Team {
            id: "t1".into(),
            name: "Maraude".into(),
            color: None,
            night_session: false,
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn merged_history_is_newest_first() {
        let person = person();

        let plain = merged_history(&person, false);
        assert_eq!(plain.len(), 2);
        assert!(plain[0].date > plain[1].date);

        let full = merged_history(&person, true);
        let months: Vec<u32> = full
            .iter()
            .map(|e| chrono::Datelike::month(&e.date))
            .collect();
        assert_eq!(months, vec![4, 3, 2]);
    }

    #[test]
    fn describes_known_fields() {
        let person = person();
        let teams = teams();

        let lines = describe_event(&person.history[0], &teams);
        assert_eq!(
            lines,
            vec![format!("assignedTeams: \"Maraude\" ➔ \"Maraude, {}\"", crate::timeline::UNKNOWN_TEAM_LABEL)]
        );

        let lines = describe_event(&person.history[1], &teams);
        assert_eq!(lines, vec!["Left active list".to_string()]);

        let medical = &person.medical_file.as_ref().expect("medical file").history[0];
        assert_eq!(
            describe_event(medical, &teams),
            vec!["allergies: \"\" ➔ \"peanuts\"".to_string()]
        );
    }

    #[test]
    fn describes_merge_and_team_exit_reasons() {
        let teams = teams();
        let merge = FieldChange(json!({ "_id": "p2", "name": "Joe" }));
        assert_eq!(
            describe_change("merge", &merge, &teams).as_deref(),
            Some("Merged with \"Joe\" (id \"p2\")")
        );

        let left_on = FieldChange(json!({ "oldValue": null, "newValue": "2022-03-05T00:00:00.000Z" }));
        assert_eq!(
            describe_change("outOfActiveListDate", &left_on, &teams).as_deref(),
            Some("5 March 2022")
        );
        let cleared = FieldChange(json!({ "oldValue": "2022-03-05", "newValue": "" }));
        assert_eq!(describe_change("outOfActiveListDate", &cleared, &teams), None);
        let unset = FieldChange(json!({ "oldValue": "2022-03-05", "newValue": null }));
        assert_eq!(describe_change("outOfActiveListDate", &unset, &teams), None);

        let exits = FieldChange(json!([{ "team": "t1", "reasons": [] }]));
        assert_eq!(
            describe_change("outOfTeamsInformations", &exits, &teams).as_deref(),
            Some("Team exit reasons: Maraude: Not specified")
        );

        let no_reasons = FieldChange(json!({ "oldValue": ["x"], "newValue": [] }));
        assert_eq!(describe_change("outOfActiveListReasons", &no_reasons, &teams), None);
    }

    #[test]
    fn rows_end_with_creation() {
        let person = person();
        let users = UserDirectory {
            users: vec![User { id: "u1".into(), name: Some("Alice".into()) }],
            deleted_users: vec![],
        };
        let history = merged_history(&person, false);

        let rows = history_rows(&person, &history, &teams(), &users);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].author, "Old Name");
        assert_eq!(rows[1].author, "Alice");
        assert_eq!(rows[2].date, person.created_at);
        assert_eq!(rows[2].changes, vec!["Person created".to_string()]);
    }
}
