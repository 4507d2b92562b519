pub mod error_toast;
pub mod footer;
pub mod help_overlay;
pub mod history_table;
pub mod tab_bar;
pub mod timeline;
