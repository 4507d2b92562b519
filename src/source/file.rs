use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{LoadError, LoadResult, RecordSource};
use crate::domain::*;

/// Reads a person, the organisation's teams and (optionally) its users from
/// JSON files on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    person_path: PathBuf,
    teams_path: PathBuf,
    users_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(person_path: PathBuf, teams_path: PathBuf, users_path: Option<PathBuf>) -> Self {
        Self {
            person_path,
            teams_path,
            users_path,
        }
    }
}

/// Users files come either as `{ users, deletedUsers }` or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum UsersFile {
    Directory(UserDirectory),
    List(Vec<User>),
}

impl RecordSource for FileSource {
    fn load_person(&self) -> LoadResult<Person> {
        let person: Person = read_json(&self.person_path)?;
        tracing::info!(
            "loaded person {} with {} history entries",
            person.id,
            person.history.len()
        );
        Ok(person)
    }

    fn load_teams(&self) -> LoadResult<TeamDirectory> {
        let teams: TeamDirectory = read_json(&self.teams_path)?;
        tracing::info!("loaded {} teams", teams.len());
        Ok(teams)
    }

    fn load_users(&self) -> LoadResult<UserDirectory> {
        let Some(path) = &self.users_path else {
            return Ok(UserDirectory::default());
        };
        let users = match read_json::<UsersFile>(path)? {
            UsersFile::Directory(dir) => dir,
            UsersFile::List(users) => UserDirectory {
                users,
                deleted_users: vec![],
            },
        };
        tracing::info!(
            "loaded {} users ({} deleted)",
            users.users.len(),
            users.deleted_users.len()
        );
        Ok(users)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| {
        tracing::error!("failed to parse {}: {}", path.display(), source);
        LoadError::Json {
            path: path.to_path_buf(),
            source,
        }
    })
}
