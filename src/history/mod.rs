pub mod export;
pub mod view;

pub use export::{build_export, export_file_name, write_export, ExportError, HistoryExport};
pub use view::{describe_change, describe_event, history_rows, merged_history, HistoryRow};
