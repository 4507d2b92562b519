pub mod action;
pub mod app;
pub mod config;
pub mod domain;
pub mod event;
pub mod history;
pub mod source;
pub mod theme;
pub mod timeline;
pub mod tui;
pub mod widgets;
pub mod worker;
