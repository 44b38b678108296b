use std::time::Instant;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use sparknomad_core::Config;
use crate::app::{char_to_byte_index, App, FocusPane};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        // The next draw picks up the new size
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick(Instant::now()),
        AppEvent::Generated(outcome) => app.complete_generation(outcome),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_api_key_input {
        handle_api_key_input(app, key);
        return;
    }

    match app.focus {
        FocusPane::Input => handle_input_editing(app, key),
        FocusPane::Results => handle_results_normal(app, key),
    }
}

fn handle_input_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.dispatch_generation();
        }
        KeyCode::Esc | KeyCode::Tab => {
            app.focus = FocusPane::Results;
        }
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Delete => app.input_delete(),
        KeyCode::Left => app.input_left(),
        KeyCode::Right => app.input_right(),
        KeyCode::Home => app.input_home(),
        KeyCode::End => app.input_end(),
        KeyCode::Char(c) => app.input_insert(c),
        _ => {}
    }
}

fn handle_results_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Back to the input box
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Tab => {
            app.focus = FocusPane::Input;
            app.input_end();
        }

        KeyCode::Enter => {
            app.dispatch_generation();
        }
        KeyCode::Char('r') => {
            app.regenerate();
        }

        // Quick picks on the start screen
        KeyCode::Char(c @ '1'..='5') => {
            let idx = (c as usize) - ('1' as usize);
            if app.pick_quick_tag(idx) {
                app.focus = FocusPane::Input;
            }
        }

        KeyCode::Char('c') | KeyCode::Char('y') => {
            app.copy_selected(Instant::now());
        }

        KeyCode::Char('K') => app.open_api_key_input(),

        // Grid navigation, only while cards are on screen
        _ if !app.results_visible() => {}
        KeyCode::Char('l') | KeyCode::Right => app.card_next(),
        KeyCode::Char('h') | KeyCode::Left => app.card_prev(),
        KeyCode::Char('j') | KeyCode::Down => app.card_down(),
        KeyCode::Char('k') | KeyCode::Up => app.card_up(),
        KeyCode::Char('g') | KeyCode::Home => app.card_first(),
        KeyCode::Char('G') | KeyCode::End => app.card_last(),

        _ => {}
    }
}

fn handle_api_key_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_api_key_input(),
        KeyCode::Enter => {
            let key = app.api_key_input.trim().to_string();
            if !key.is_empty() {
                app.apply_api_key(&key);
                match Config::save_api_key(&key) {
                    Ok(()) => tracing::info!("Saved Gemini API key to config"),
                    Err(e) => tracing::warn!("Failed to save API key: {}", e),
                }
            }
            app.close_api_key_input();
        }
        KeyCode::Backspace => {
            if app.api_key_input_cursor > 0 {
                app.api_key_input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.api_key_input, app.api_key_input_cursor);
                app.api_key_input.remove(byte_pos);
            }
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.api_key_input, app.api_key_input_cursor);
            app.api_key_input.insert(byte_pos, c);
            app.api_key_input_cursor += 1;
        }
        KeyCode::Left => {
            app.api_key_input_cursor = app.api_key_input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.api_key_input.chars().count();
            app.api_key_input_cursor = (app.api_key_input_cursor + 1).min(char_count);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_api_key_input || !app.results_visible() {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.card_down(),
        MouseEventKind::ScrollUp => app.card_up(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{offline_app, test_app};
    use sparknomad_core::{GenerationError, GenerationResponse, LoadingState, StartupName};

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn with_results(app: &mut App, count: usize) {
        app.finish_generation(Ok(GenerationResponse {
            names: (0..count)
                .map(|i| StartupName {
                    name: format!("Name{}", i),
                    tagline: format!("Tagline {}.", i),
                })
                .collect(),
        }));
    }

    #[tokio::test]
    async fn test_typing_and_submit() {
        let mut t = test_app("", None, false);
        for c in "SaaS".chars() {
            handle_event(&mut t.app, press(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(t.app.industry, "SaaS");

        handle_event(&mut t.app, press(KeyCode::Enter)).unwrap();
        assert_eq!(t.app.status, LoadingState::Loading);

        // The result comes back through the event channel
        let event = t.events.recv().await.unwrap();
        assert!(matches!(event, AppEvent::Generated(_)));
        handle_event(&mut t.app, event).unwrap();
        assert_eq!(t.app.status, LoadingState::Error);
    }

    #[tokio::test]
    async fn test_enter_on_blank_does_nothing() {
        let mut t = test_app("  ", None, false);
        handle_event(&mut t.app, press(KeyCode::Enter)).unwrap();
        tokio::task::yield_now().await;
        assert_eq!(t.app.status, LoadingState::Idle);
        assert!(t.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_typing_ignored_while_loading() {
        let mut app = offline_app("Web3");
        handle_event(&mut app, press(KeyCode::Enter)).unwrap();
        handle_event(&mut app, press(KeyCode::Char('x'))).unwrap();
        handle_event(&mut app, press(KeyCode::Backspace)).unwrap();
        assert_eq!(app.industry, "Web3");
    }

    #[test]
    fn test_quick_pick_fills_input_without_submitting() {
        let mut app = offline_app("");
        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.focus, FocusPane::Results);

        handle_event(&mut app, press(KeyCode::Char('1'))).unwrap();
        assert_eq!(app.industry, "Fintech");
        assert_eq!(app.focus, FocusPane::Input);
        assert_eq!(app.status, LoadingState::Idle);
    }

    #[test]
    fn test_copy_marks_selected_card() {
        let mut t = test_app("Fintech", None, false);
        with_results(&mut t.app, 4);
        t.app.focus = FocusPane::Results;

        handle_event(&mut t.app, press(KeyCode::Right)).unwrap();
        handle_event(&mut t.app, press(KeyCode::Char('c'))).unwrap();

        let now = Instant::now();
        assert!(!t.app.results[0].is_copied(now));
        assert!(t.app.results[1].is_copied(now));
        assert_eq!(*t.copied.lock().unwrap(), vec!["Name1"]);
    }

    #[test]
    fn test_error_state_ignores_copy_and_navigation() {
        let mut t = test_app("Fintech", None, false);
        with_results(&mut t.app, 4);
        t.app.begin_generation();
        t.app.finish_generation(Err(GenerationError::EmptyResponse));
        t.app.focus = FocusPane::Results;

        for code in [KeyCode::Char('l'), KeyCode::Char('j'), KeyCode::Char('G')] {
            handle_event(&mut t.app, press(code)).unwrap();
        }
        handle_event(&mut t.app, press(KeyCode::Char('y'))).unwrap();

        assert_eq!(t.app.selected_card, 0);
        assert!(t.app.results.iter().all(|card| card.copied_until.is_none()));
        assert!(t.copied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_reuses_current_industry() {
        let mut app = offline_app("Fintech");
        with_results(&mut app, 2);
        app.focus = FocusPane::Results;

        handle_event(&mut app, press(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.status, LoadingState::Loading);
        // Stale cards stay until the new ones arrive
        assert_eq!(app.results.len(), 2);

        handle_event(&mut app, press(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.status, LoadingState::Loading);
    }

    #[test]
    fn test_api_key_popup_cancel() {
        let mut app = offline_app("Fintech");
        app.focus = FocusPane::Results;

        handle_event(&mut app, press(KeyCode::Char('K'))).unwrap();
        assert!(app.show_api_key_input);

        handle_event(&mut app, press(KeyCode::Char('a'))).unwrap();
        handle_event(&mut app, press(KeyCode::Char('b'))).unwrap();
        handle_event(&mut app, press(KeyCode::Backspace)).unwrap();
        assert_eq!(app.api_key_input, "a");
        assert_eq!(app.industry, "Fintech");

        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert!(!app.show_api_key_input);
        assert!(app.api_key_input.is_empty());
        assert!(!app.client.has_api_key());
    }

    #[test]
    fn test_ctrl_c_quits_from_input() {
        let mut app = offline_app("Fintech");
        let ctrl_c = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        handle_event(&mut app, ctrl_c).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_types_in_input_but_quits_in_results() {
        let mut app = offline_app("");
        handle_event(&mut app, press(KeyCode::Char('q'))).unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.industry, "q");

        handle_event(&mut app, press(KeyCode::Tab)).unwrap();
        handle_event(&mut app, press(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit);
    }
}
