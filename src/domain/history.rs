use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TeamId;

/// Name of the history field that records team assignment edits.
pub const ASSIGNED_TEAMS: &str = "assignedTeams";

/// One entry of a person's append-only change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "super::lenient::string_or_none")]
    pub user: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::lenient::string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_name: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, FieldChange>,
}

/// A single field edit, kept as the raw JSON the record was stored with.
///
/// Most fields are `{ oldValue, newValue }` objects, but a few (`merge`,
/// `outOfTeamsInformations`) carry other shapes, so nothing is assumed up
/// front.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldChange(pub serde_json::Value);

impl FieldChange {
    pub fn old_value(&self) -> Option<&serde_json::Value> {
        self.0.get("oldValue").filter(|v| !v.is_null())
    }

    pub fn new_value(&self) -> Option<&serde_json::Value> {
        self.0.get("newValue").filter(|v| !v.is_null())
    }

    pub fn is_diff(&self) -> bool {
        self.0.is_object()
    }
}

/// Typed view of an `assignedTeams` change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamsChange {
    pub old_value: Vec<TeamId>,
    pub new_value: Vec<TeamId>,
}

impl TeamsChange {
    pub fn left(&self) -> impl Iterator<Item = &TeamId> {
        self.old_value
            .iter()
            .filter(move |team| !self.new_value.contains(team))
    }

    pub fn joined(&self) -> impl Iterator<Item = &TeamId> {
        self.new_value
            .iter()
            .filter(move |team| !self.old_value.contains(team))
    }
}

impl HistoryEvent {
    /// Returns the team assignment change carried by this event, if any.
    /// Non-array values read as empty lists and non-string members are
    /// dropped.
    pub fn teams_change(&self) -> Option<TeamsChange> {
        let change = self.data.get(ASSIGNED_TEAMS)?;
        if !change.is_diff() {
            return None;
        }
        Some(TeamsChange {
            old_value: team_ids(change.old_value()),
            new_value: team_ids(change.new_value()),
        })
    }
}

fn team_ids(value: Option<&serde_json::Value>) -> Vec<TeamId> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(TeamId::from))
                .collect()
        })
        .unwrap_or_default()
}
