use std::time::{Duration, Instant};
use sparknomad_core::{
    GeminiClient, GenerationResponse, GenerationResult, LoadingState, StartupName,
    GENERATION_FAILED_MESSAGE,
};
use crate::clipboard::ClipboardWriter;
use crate::tui::{spawn_generation, EventSender, GenerationOutcome};

/// Industries offered on the empty start screen
pub const QUICK_PICKS: [&str; 5] = ["Fintech", "SaaS", "E-commerce", "Healthtech", "Web3"];

/// How long a card shows the copied check mark
pub const COPIED_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    Results,
}

/// A generated name plus its transient copy indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupCard {
    pub item: StartupName,
    pub copied_until: Option<Instant>,
}

impl StartupCard {
    pub fn new(item: StartupName) -> Self {
        Self { item, copied_until: None }
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,

    // Industry input
    pub industry: String,
    pub industry_cursor: usize,

    // Generation state
    pub status: LoadingState,
    pub error: Option<String>,
    pub results: Vec<StartupCard>,
    pub client: GeminiClient,
    pub events: EventSender,
    pub clipboard: Box<dyn ClipboardWriter>,

    // Results grid navigation (columns and scroll updated during render)
    pub selected_card: usize,
    pub cards_per_row: usize,
    pub results_row_offset: usize,

    // Animation state
    pub animation_frame: u8,

    // API key input state
    pub show_api_key_input: bool,
    pub api_key_input: String,
    pub api_key_input_cursor: usize,
}

impl App {
    pub fn new(
        client: GeminiClient,
        industry: Option<String>,
        events: EventSender,
        clipboard: Box<dyn ClipboardWriter>,
    ) -> Self {
        let industry = industry.unwrap_or_default();
        let industry_cursor = industry.chars().count();

        Self {
            should_quit: false,
            focus: FocusPane::Input,

            industry,
            industry_cursor,

            status: LoadingState::Idle,
            error: None,
            results: Vec::new(),
            client,
            events,
            clipboard,

            selected_card: 0,
            cards_per_row: 3,
            results_row_offset: 0,

            animation_frame: 0,

            show_api_key_input: false,
            api_key_input: String::new(),
            api_key_input_cursor: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadingState::Loading
    }

    /// Quick picks only show on the untouched start screen
    pub fn show_quick_picks(&self) -> bool {
        self.status == LoadingState::Idle && self.results.is_empty()
    }

    /// Cards are on screen, so they can be navigated and copied
    pub fn results_visible(&self) -> bool {
        matches!(self.status, LoadingState::Success | LoadingState::Loading) && !self.results.is_empty()
    }

    /// Regenerate is offered once a generation has succeeded with results
    pub fn can_regenerate(&self) -> bool {
        self.status == LoadingState::Success && !self.results.is_empty()
    }

    /// Accept a submission. Returns the industry to send, or `None` if the
    /// input is blank or a request is already in flight.
    pub fn begin_generation(&mut self) -> Option<String> {
        if self.industry.trim().is_empty() || self.is_loading() {
            return None;
        }

        self.error = None;
        self.status = LoadingState::Loading;
        Some(self.industry.clone())
    }

    /// Apply the outcome of the in-flight call
    pub fn finish_generation(&mut self, result: GenerationResult<GenerationResponse>) {
        match result {
            Ok(response) => {
                tracing::info!(count = response.names.len(), "generation succeeded");
                self.results = response.names.into_iter().map(StartupCard::new).collect();
                self.selected_card = 0;
                self.results_row_offset = 0;
                self.status = LoadingState::Success;
            }
            Err(e) => self.record_failure(&e, e.user_message()),
        }
    }

    /// Apply whatever a generation task delivered, including a task that died
    pub fn complete_generation(&mut self, outcome: GenerationOutcome) {
        match outcome {
            Ok(result) => self.finish_generation(result),
            Err(join_err) => self.record_failure(&join_err, GENERATION_FAILED_MESSAGE),
        }
    }

    fn record_failure(&mut self, cause: &dyn std::fmt::Display, message: &str) {
        tracing::error!("Generation failed: {}", cause);
        self.error = Some(message.to_string());
        self.status = LoadingState::Error;
    }

    /// Submit the current industry, spawning the client call in the background
    pub fn dispatch_generation(&mut self) -> bool {
        let Some(industry) = self.begin_generation() else {
            return false;
        };

        tracing::info!(industry = %industry, model = self.client.model(), "dispatching generation");
        let client = self.client.clone();
        spawn_generation(self.events.clone(), async move {
            client.generate_startup_names(&industry).await
        });
        true
    }

    /// Re-issue the call with the industry currently held
    pub fn regenerate(&mut self) -> bool {
        if !self.can_regenerate() {
            return false;
        }
        self.dispatch_generation()
    }

    pub fn pick_quick_tag(&mut self, idx: usize) -> bool {
        if !self.show_quick_picks() {
            return false;
        }
        let Some(tag) = QUICK_PICKS.get(idx) else {
            return false;
        };
        self.industry = tag.to_string();
        self.industry_cursor = self.industry.chars().count();
        true
    }

    /// Copy the selected card's name and show the check mark for 2s from the
    /// first press. Presses while it is showing don't extend it.
    pub fn copy_selected(&mut self, now: Instant) -> Option<String> {
        if !self.results_visible() {
            return None;
        }
        let card = self.results.get_mut(self.selected_card)?;
        if !card.is_copied(now) {
            card.copied_until = Some(now + COPIED_DURATION);
        }
        let name = card.item.name.clone();

        if let Err(e) = self.clipboard.set_text(&name) {
            tracing::warn!("Clipboard write failed: {}", e);
        }
        Some(name)
    }

    pub fn expire_copied(&mut self, now: Instant) {
        for card in &mut self.results {
            if card.copied_until.is_some_and(|until| now >= until) {
                card.copied_until = None;
            }
        }
    }

    /// Tick animation frame and copy indicators (called by Tick event)
    pub fn tick(&mut self, now: Instant) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.expire_copied(now);
    }

    // Results grid navigation
    pub fn card_next(&mut self) {
        if !self.results.is_empty() {
            self.selected_card = (self.selected_card + 1).min(self.results.len() - 1);
        }
    }

    pub fn card_prev(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
    }

    pub fn card_down(&mut self) {
        let next = self.selected_card + self.cards_per_row.max(1);
        if next < self.results.len() {
            self.selected_card = next;
        }
    }

    pub fn card_up(&mut self) {
        let cols = self.cards_per_row.max(1);
        if self.selected_card >= cols {
            self.selected_card -= cols;
        }
    }

    pub fn card_first(&mut self) {
        self.selected_card = 0;
    }

    pub fn card_last(&mut self) {
        self.selected_card = self.results.len().saturating_sub(1);
    }

    // Industry input editing, ignored while a request is in flight
    pub fn input_insert(&mut self, c: char) {
        if self.is_loading() {
            return;
        }
        let byte_pos = char_to_byte_index(&self.industry, self.industry_cursor);
        self.industry.insert(byte_pos, c);
        self.industry_cursor += 1;
    }

    pub fn input_backspace(&mut self) {
        if self.is_loading() || self.industry_cursor == 0 {
            return;
        }
        self.industry_cursor -= 1;
        let byte_pos = char_to_byte_index(&self.industry, self.industry_cursor);
        self.industry.remove(byte_pos);
    }

    pub fn input_delete(&mut self) {
        if self.is_loading() {
            return;
        }
        if self.industry_cursor < self.industry.chars().count() {
            let byte_pos = char_to_byte_index(&self.industry, self.industry_cursor);
            self.industry.remove(byte_pos);
        }
    }

    pub fn input_left(&mut self) {
        self.industry_cursor = self.industry_cursor.saturating_sub(1);
    }

    pub fn input_right(&mut self) {
        let char_count = self.industry.chars().count();
        self.industry_cursor = (self.industry_cursor + 1).min(char_count);
    }

    pub fn input_home(&mut self) {
        self.industry_cursor = 0;
    }

    pub fn input_end(&mut self) {
        self.industry_cursor = self.industry.chars().count();
    }

    pub fn open_api_key_input(&mut self) {
        self.show_api_key_input = true;
        self.api_key_input.clear();
        self.api_key_input_cursor = 0;
    }

    pub fn close_api_key_input(&mut self) {
        self.show_api_key_input = false;
        self.api_key_input.clear();
        self.api_key_input_cursor = 0;
    }

    /// Swap in a client using `key`. Persisting it is the caller's job.
    pub fn apply_api_key(&mut self, key: &str) {
        self.client = self.client.with_api_key(key);
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::tui::AppEvent;

    /// An app whose client has no key, so a dispatch fails fast with
    /// MissingApiKey and never touches the network
    pub struct TestApp {
        pub app: App,
        pub events: mpsc::UnboundedReceiver<AppEvent>,
        pub copied: Arc<Mutex<Vec<String>>>,
    }

    pub fn test_app(industry: &str, api_key: Option<&str>, clipboard_fails: bool) -> TestApp {
        let client = GeminiClient::with_base_url(api_key, "gemini-3-flash-preview", "http://127.0.0.1:9");
        let (tx, events) = mpsc::unbounded_channel();
        let clipboard = RecordingClipboard { fail: clipboard_fails, ..Default::default() };
        let copied = clipboard.writes.clone();
        let app = App::new(client, Some(industry.to_string()), tx, Box::new(clipboard));
        TestApp { app, events, copied }
    }

    pub fn offline_app(industry: &str) -> App {
        test_app(industry, None, false).app
    }
}
