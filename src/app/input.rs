use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::editor::{Key, KeyPress, Modifiers};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let press = decode_key(key)?;

        if model.close_confirmation.is_some() {
            return Some(match press.key {
                Key::Char('y' | 'Y') if !press.modifiers.ctrl => Message::ConfirmClose(true),
                Key::Char('w' | 'q') if press.modifiers.ctrl => {
                    Message::RequestClose { force: false }
                }
                _ => Message::ConfirmClose(false),
            });
        }

        // Quitting and tab switching are handled by the host; everything else
        // goes to the session.
        match (press.key, press.modifiers) {
            (Key::Char('q' | 'Q'), Modifiers { alt: true, ctrl: false, .. }) => {
                Some(Message::Quit)
            }
            (Key::PageDown, Modifiers { ctrl: true, .. })
            | (Key::Right, Modifiers { alt: true, .. }) => Some(Message::NextTab),
            (Key::PageUp, Modifiers { ctrl: true, .. })
            | (Key::Left, Modifiers { alt: true, .. }) => Some(Message::PrevTab),
            _ => Some(Message::Key(press)),
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Translate a crossterm key event into an engine key press.
pub(super) fn decode_key(event: KeyEvent) -> Option<KeyPress> {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    let modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT) || event.code == KeyCode::BackTab,
    };
    Some(KeyPress { key, modifiers })
}
