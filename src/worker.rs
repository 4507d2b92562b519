use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::domain::{HistoryEvent, Person, UserDirectory};
use crate::history::{build_export, write_export};
use crate::source::RecordSource;

#[derive(Debug)]
pub enum WorkerRequest {
    Reload,
    ExportHistory {
        dir: PathBuf,
        person: Box<Person>,
        history: Vec<HistoryEvent>,
        users: UserDirectory,
    },
}

#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::UnboundedSender<WorkerRequest>,
}

impl WorkerHandle {
    pub fn send(&self, request: WorkerRequest) {
        let _ = self.tx.send(request);
    }
}

/// Runs file I/O off the render loop and reports back as actions.
pub struct Worker {
    source: Arc<dyn RecordSource>,
    rx: mpsc::UnboundedReceiver<WorkerRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Worker {
    pub fn new(
        source: Arc<dyn RecordSource>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, WorkerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = WorkerHandle { tx };
        let worker = Self {
            source,
            rx,
            action_tx,
        };
        (worker, handle)
    }

    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let source = Arc::clone(&self.source);
            let action = tokio::task::spawn_blocking(move || process(source.as_ref(), request))
                .await
                .unwrap_or_else(|e| Action::Error(format!("worker task failed: {}", e)));
            if self.action_tx.send(action).is_err() {
                break;
            }
        }
    }
}

fn process(source: &dyn RecordSource, request: WorkerRequest) -> Action {
    match request {
        WorkerRequest::Reload => match source.load_record() {
            Ok(record) => Action::RecordLoaded(Box::new(record)),
            Err(e) => Action::Error(format!("failed to reload: {}", e)),
        },
        WorkerRequest::ExportHistory {
            dir,
            person,
            history,
            users,
        } => {
            let export = build_export(&person, &history, &users);
            match write_export(&dir, &person, &export, Utc::now()) {
                Ok(path) => Action::Exported(path.display().to_string()),
                Err(e) => Action::Error(format!("export failed: {}", e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TeamDirectory;
    use crate::source::{LoadError, LoadResult};

    struct FixedSource {
        fail: bool,
    }

    impl RecordSource for FixedSource {
        fn load_person(&self) -> LoadResult<Person> {
            if self.fail {
                return Err(LoadError::Io {
                    path: PathBuf::from("person.json"),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                });
            }
            Ok(serde_json::from_str(r#"{ "_id": "p1", "createdAt": "2022-01-01" }"#)
                .expect("decode person"))
        }

        fn load_teams(&self) -> LoadResult<TeamDirectory> {
            Ok(TeamDirectory::default())
        }

        fn load_users(&self) -> LoadResult<UserDirectory> {
            Ok(UserDirectory::default())
        }
    }

    #[tokio::test]
    async fn reload_reports_record_or_error() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let (worker, handle) = Worker::new(Arc::new(FixedSource { fail: false }), action_tx);
        tokio::spawn(worker.run());

        handle.send(WorkerRequest::Reload);
        let action = action_rx.recv().await.expect("action");
        assert!(matches!(action, Action::RecordLoaded(record) if record.person.id == "p1"));

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let (worker, handle) = Worker::new(Arc::new(FixedSource { fail: true }), action_tx);
        tokio::spawn(worker.run());

        handle.send(WorkerRequest::Reload);
        let action = action_rx.recv().await.expect("action");
        assert!(matches!(action, Action::Error(msg) if msg.contains("person.json")));
    }
}
