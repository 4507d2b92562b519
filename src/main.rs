use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::Result;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use teamline::action::{Action, Tab};
use teamline::app::{App, Effect, Overlay};
use teamline::config::{Cli, ConfigFile, Settings};
use teamline::event::{key_to_action, AppEvent, EventHandler};
use teamline::source::{FileSource, PersonRecord, RecordSource};
use teamline::timeline::TeamTimeline;
use teamline::widgets;
use teamline::worker::{Worker, WorkerHandle, WorkerRequest};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Set up logging
    if let Some(ref log_file) = cli.log_file {
        let file = std::fs::File::create(log_file)?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let settings = Settings::resolve(&cli, &ConfigFile::load().unwrap_or_default());
    let source: Arc<dyn RecordSource> = Arc::new(FileSource::new(
        cli.person.clone(),
        cli.teams.clone(),
        cli.users.clone(),
    ));
    let record = source.load_record()?;

    if cli.json {
        return print_json(&record, &settings);
    }

    run_tui(source, record, settings).await
}

fn print_json(record: &PersonRecord, settings: &Settings) -> Result<()> {
    let timeline = TeamTimeline::build(
        &record.person.history,
        record.person.created_at,
        Utc::now(),
        &record.teams,
        settings.timeline,
    );
    println!("{}", serde_json::to_string_pretty(&timeline)?);
    Ok(())
}

async fn run_tui(
    source: Arc<dyn RecordSource>,
    record: PersonRecord,
    settings: Settings,
) -> Result<()> {
    let tick_interval = settings.tick_interval;
    let mut app = App::new(record, settings, Utc::now());

    // Set up channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Create worker
    let (worker, worker_handle) = Worker::new(source, action_tx);
    tokio::spawn(worker.run());

    // Set up terminal
    let mut terminal = teamline::tui::init()?;

    let mut events = EventHandler::new(tick_interval);

    // Main loop
    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => key_to_action(key, &app.overlay),
                    AppEvent::Resize => None,
                    AppEvent::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, &worker_handle);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, &worker_handle);
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    teamline::tui::restore()?;

    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default()
            .style(ratatui::style::Style::default().bg(teamline::theme::BG_DARK)),
        area,
    );

    let layout = Layout::vertical([
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Content
        Constraint::Length(1), // Footer
    ])
    .split(area);

    widgets::tab_bar::render(app, frame, layout[0]);

    let content_area = layout[1];
    app.page_height = content_area.height.max(1);
    match app.tab {
        Tab::Timeline => widgets::timeline::render(app, frame, content_area),
        Tab::History => widgets::history_table::render(app, frame, content_area),
    }

    widgets::footer::render(app, frame, layout[2]);

    if app.overlay == Overlay::Help {
        widgets::help_overlay::render(frame, area);
    }

    widgets::error_toast::render(app, frame, area);
}

fn handle_effects(effects: Vec<Effect>, worker: &WorkerHandle) {
    for effect in effects {
        match effect {
            Effect::Reload => worker.send(WorkerRequest::Reload),
            Effect::ExportHistory {
                dir,
                person,
                history,
                users,
            } => worker.send(WorkerRequest::ExportHistory {
                dir,
                person,
                history,
                users,
            }),
            Effect::Quit => {}
        }
    }
}
