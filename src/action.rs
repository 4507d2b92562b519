use crate::source::PersonRecord;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    ScrollUp,
    ScrollDown,
    ScrollTop,
    ScrollBottom,
    PageUp,
    PageDown,

    // Tabs
    NextTab,
    PrevTab,

    // UI
    ToggleHelp,
    CloseOverlay,

    // Data
    Recompute,
    Reload,
    RecordLoaded(Box<PersonRecord>),
    ExportHistory,
    Exported(String),

    // App control
    Quit,
    Tick,
    Error(String),
    ClearError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Timeline,
    History,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Timeline, Tab::History];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Timeline => "Team timeline",
            Self::History => "History",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Timeline => Self::History,
            Self::History => Self::Timeline,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }
}
