use std::path::PathBuf;

use thiserror::Error;

use crate::domain::*;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Everything the viewer needs about one person.
#[derive(Debug, Clone)]
pub struct PersonRecord {
    pub person: Person,
    pub teams: TeamDirectory,
    pub users: UserDirectory,
}

/// Where person records come from. The surrounding dashboard owns
/// persistence; implementations only read.
pub trait RecordSource: Send + Sync {
    fn load_person(&self) -> LoadResult<Person>;

    fn load_teams(&self) -> LoadResult<TeamDirectory>;

    fn load_users(&self) -> LoadResult<UserDirectory>;

    fn load_record(&self) -> LoadResult<PersonRecord> {
        Ok(PersonRecord {
            person: self.load_person()?,
            teams: self.load_teams()?,
            users: self.load_users()?,
        })
    }
}
