use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gita_core::SearchEngine;
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Task(outcome) => app.apply_outcome(outcome),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_report_editing(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('n') | KeyCode::Char(' ') => app.request_verse(),
        KeyCode::Char('e') | KeyCode::Enter => app.explain(),
        KeyCode::Char('g') => app.search(SearchEngine::Google),
        KeyCode::Char('y') => app.search(SearchEngine::YouTube),
        KeyCode::Char('r') => app.start_report(),

        _ => {}
    }
}

fn handle_report_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.submit_report(),
        KeyCode::Backspace => app.backspace_report(),
        KeyCode::Delete => app.delete_report(),
        KeyCode::Left => {
            app.report_cursor = app.report_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.report_input.chars().count();
            app.report_cursor = (app.report_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.report_cursor = 0;
        }
        KeyCode::End => {
            app.report_cursor = app.report_input.chars().count();
        }
        KeyCode::Char(c) => app.insert_report_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{verse, CountingBackend, Harness};
    use std::sync::atomic::Ordering;

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut h = Harness::new(CountingBackend::default(), None);
        handle_event(&mut h.app, press(KeyCode::Char('q')));
        assert!(h.app.should_quit);

        let mut h = Harness::new(CountingBackend::default(), None);
        handle_event(
            &mut h.app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(h.app.should_quit);
    }

    #[tokio::test]
    async fn test_typing_q_in_report_does_not_quit() {
        let mut h = Harness::new(CountingBackend::default(), None);
        h.app.session.set_current(verse(1, 1));

        handle_event(&mut h.app, press(KeyCode::Char('r')));
        assert_eq!(h.app.input_mode, InputMode::Editing);
        for c in "quote".chars() {
            handle_event(&mut h.app, press(KeyCode::Char(c)));
        }

        assert!(!h.app.should_quit);
        assert_eq!(h.app.report_input, "quote");

        handle_event(&mut h.app, press(KeyCode::Esc));
        assert_eq!(h.app.input_mode, InputMode::Normal);
        assert!(!h.app.should_quit);
    }

    #[tokio::test]
    async fn test_cursor_movement_inserts_mid_string() {
        let mut h = Harness::new(CountingBackend::default(), None);
        h.app.session.set_current(verse(1, 1));
        handle_event(&mut h.app, press(KeyCode::Char('r')));
        for c in "ac".chars() {
            handle_event(&mut h.app, press(KeyCode::Char(c)));
        }
        handle_event(&mut h.app, press(KeyCode::Left));
        handle_event(&mut h.app, press(KeyCode::Char('b')));
        assert_eq!(h.app.report_input, "abc");

        handle_event(&mut h.app, press(KeyCode::Home));
        handle_event(&mut h.app, press(KeyCode::Delete));
        assert_eq!(h.app.report_input, "bc");

        handle_event(&mut h.app, press(KeyCode::End));
        handle_event(&mut h.app, press(KeyCode::Backspace));
        assert_eq!(h.app.report_input, "b");
    }

    #[tokio::test]
    async fn test_new_verse_key_fetches_and_task_event_applies() {
        let mut h = Harness::new(CountingBackend::default(), None);

        handle_event(&mut h.app, press(KeyCode::Char('n')));
        let outcome = loop {
            match h.rx.recv().await {
                Some(event @ AppEvent::Task(_)) => break event,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        };
        handle_event(&mut h.app, outcome);

        assert_eq!(h.backend.fetches.load(Ordering::SeqCst), 1);
        assert!(h.app.current_verse().is_some());
    }
}
