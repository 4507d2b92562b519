use serde::{Deserialize, Serialize};

use super::UserId;

pub const UNNAMED_USER: &str = "Unnamed user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, deserialize_with = "super::lenient::string_or_none")]
    pub name: Option<String>,
}

/// Active and deleted users, used to put names on history authors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDirectory {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub deleted_users: Vec<User>,
}

impl UserDirectory {
    pub fn find(&self, id: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .or_else(|| self.deleted_users.iter().find(|u| u.id == id))
    }

    /// Name to show for a history author. Falls back to the name stored on
    /// the event itself, then to `-`.
    pub fn display_name(&self, id: Option<&str>, fallback: Option<&str>) -> String {
        if let Some(user) = id.and_then(|id| self.find(id)) {
            return user
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNNAMED_USER.to_string());
        }
        match fallback {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "-".to_string(),
        }
    }

    /// Name of a user, or `None` when unknown or unnamed.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.find(id)
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}
