use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::Overlay;

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Forwards crossterm events and periodic ticks over a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    event = reader.next() => {
                        let forwarded = match event {
                            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                                AppEvent::Key(key)
                            }
                            Some(Ok(Event::Resize(_, _))) => AppEvent::Resize,
                            Some(Ok(_)) => continue,
                            Some(Err(e)) => {
                                tracing::error!("terminal event stream failed: {}", e);
                                break;
                            }
                            None => break,
                        };
                        if tx.send(forwarded).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a key event to an action based on current app state
pub fn key_to_action(key: KeyEvent, overlay: &Overlay) -> Option<Action> {
    if *overlay == Overlay::Help {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Action::ToggleHelp),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Recompute),
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::ScrollTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::ScrollBottom),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => Some(Action::NextTab),
        KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevTab),
        KeyCode::Char('r') => Some(Action::Recompute),
        KeyCode::Char('R') => Some(Action::Reload),
        KeyCode::Char('e') => Some(Action::ExportHistory),
        KeyCode::Esc => Some(Action::ClearError),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_bindings() {
        assert!(matches!(key_to_action(key(KeyCode::Char('q')), &Overlay::None), Some(Action::Quit)));
        assert!(matches!(key_to_action(key(KeyCode::Tab), &Overlay::None), Some(Action::NextTab)));
        assert!(matches!(key_to_action(key(KeyCode::Char('R')), &Overlay::None), Some(Action::Reload)));
        assert!(matches!(
            key_to_action(key(KeyCode::Char('e')), &Overlay::None),
            Some(Action::ExportHistory)
        ));
        assert!(key_to_action(key(KeyCode::Char('x')), &Overlay::None).is_none());
    }

    #[test]
    fn ctrl_bindings() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(key_to_action(ctrl_c, &Overlay::None), Some(Action::Quit)));
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        assert!(key_to_action(key(KeyCode::Char('j')), &Overlay::Help).is_none());
        assert!(matches!(
            key_to_action(key(KeyCode::Esc), &Overlay::Help),
            Some(Action::ToggleHelp)
        ));
    }
}
