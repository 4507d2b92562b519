use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::action::{Action, Tab};
use crate::config::Settings;
use crate::domain::*;
use crate::history::{history_rows, merged_history, HistoryRow};
use crate::source::PersonRecord;
use crate::timeline::TeamTimeline;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

#[derive(Debug, Clone)]
pub enum Effect {
    Reload,
    ExportHistory {
        dir: PathBuf,
        person: Box<Person>,
        history: Vec<HistoryEvent>,
        users: UserDirectory,
    },
    Quit,
}

const TOAST_TTL: Duration = Duration::from_secs(5);

pub struct App {
    // View state
    pub tab: Tab,
    pub overlay: Overlay,
    pub scroll: u16,
    pub page_height: u16,

    // Data
    pub record: PersonRecord,
    pub settings: Settings,
    pub now: DateTime<Utc>,
    pub timeline: TeamTimeline,
    pub history: Vec<HistoryEvent>,
    pub rows: Vec<HistoryRow>,

    // App
    pub should_quit: bool,
    pub reloading: bool,
    pub last_error: Option<(String, Instant)>,
    pub last_notice: Option<(String, Instant)>,
}

impl App {
    pub fn new(record: PersonRecord, settings: Settings, now: DateTime<Utc>) -> Self {
        let mut app = Self {
            tab: Tab::Timeline,
            overlay: Overlay::None,
            scroll: 0,
            page_height: 20,

            record,
            settings,
            now,
            timeline: TeamTimeline::default(),
            history: vec![],
            rows: vec![],

            should_quit: false,
            reloading: false,
            last_error: None,
            last_notice: None,
        };
        app.recompute_at(now);
        app
    }

    /// Rebuilds every derived view from the record, with `now` as the end
    /// of still-open assignments.
    pub fn recompute_at(&mut self, now: DateTime<Utc>) {
        let person = &self.record.person;
        self.now = now;
        self.timeline = TeamTimeline::build(
            &person.history,
            person.created_at,
            now,
            &self.record.teams,
            self.settings.timeline,
        );
        self.history = merged_history(person, self.settings.include_medical_file);
        self.rows = history_rows(person, &self.history, &self.record.teams, &self.record.users);
        tracing::debug!(
            "recomputed: {} intervals, {} drawn, {} skipped, {} history rows",
            self.timeline.intervals.len(),
            self.timeline.layout.slices.len(),
            self.timeline.layout.skipped.len(),
            self.rows.len()
        );
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        self.expire_toasts();

        match action {
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                vec![]
            }
            Action::ScrollDown => {
                self.scroll = self.scroll.saturating_add(1);
                vec![]
            }
            Action::ScrollTop => {
                self.scroll = 0;
                vec![]
            }
            Action::ScrollBottom => {
                self.scroll = u16::MAX;
                vec![]
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.page_height);
                vec![]
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(self.page_height);
                vec![]
            }
            Action::NextTab => {
                self.tab = self.tab.next();
                self.scroll = 0;
                vec![]
            }
            Action::PrevTab => {
                self.tab = self.tab.prev();
                self.scroll = 0;
                vec![]
            }
            Action::ToggleHelp => {
                self.overlay = match self.overlay {
                    Overlay::Help => Overlay::None,
                    Overlay::None => Overlay::Help,
                };
                vec![]
            }
            Action::CloseOverlay => {
                self.overlay = Overlay::None;
                vec![]
            }
            Action::Recompute | Action::Tick => {
                self.recompute_at(Utc::now());
                vec![]
            }
            Action::Reload => {
                if self.reloading {
                    return vec![];
                }
                self.reloading = true;
                vec![Effect::Reload]
            }
            Action::RecordLoaded(record) => {
                self.reloading = false;
                self.record = *record;
                self.recompute_at(Utc::now());
                self.notice("Record reloaded");
                vec![]
            }
            Action::ExportHistory => vec![Effect::ExportHistory {
                dir: self.settings.export_dir.clone(),
                person: Box::new(self.record.person.clone()),
                history: self.history.clone(),
                users: self.record.users.clone(),
            }],
            Action::Exported(path) => {
                self.notice(&format!("History exported to {}", path));
                vec![]
            }
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Error(msg) => {
                tracing::error!("{}", msg);
                self.reloading = false;
                self.last_error = Some((msg, Instant::now()));
                vec![]
            }
            Action::ClearError => {
                self.last_error = None;
                vec![]
            }
        }
    }

    fn notice(&mut self, msg: &str) {
        self.last_notice = Some((msg.to_string(), Instant::now()));
    }

    fn expire_toasts(&mut self) {
        if let Some((_, at)) = &self.last_error {
            if at.elapsed() > TOAST_TTL {
                self.last_error = None;
            }
        }
        if let Some((_, at)) = &self.last_notice {
            if at.elapsed() > TOAST_TTL {
                self.last_notice = None;
            }
        }
    }
}
