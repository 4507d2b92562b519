use serde::{Deserialize, Serialize};

use super::TeamId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: TeamId,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub name: String,
    /// Explicit team colour (`#rrggbb`), overriding the palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::null_as_default")]
    pub night_session: bool,
}

/// Ordered list of an organisation's teams. A team's position is its colour
/// index, so the order must match the one the rest of the dashboard uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamDirectory {
    teams: Vec<Team>,
}

impl TeamDirectory {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|t| t.name.as_str())
    }
}

impl FromIterator<Team> for TeamDirectory {
    fn from_iter<I: IntoIterator<Item = Team>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
