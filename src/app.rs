use chrono::{DateTime, Local};
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::display::derive_display;
use crate::feed::{FeedEvent, FeedState, FetchOutcome, StatusFilter};
use crate::model::RawPredictionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
    Quit,
}

#[derive(Debug, Default)]
pub struct App {
    pub should_quit: bool,
    pub feed: FeedState,
    pub state: ListState,
    pub filter: StatusFilter,
    pub fetched_at: Option<DateTime<Local>>,
    in_flight: Option<JoinHandle<()>>,
}

impl App {
    pub fn new() -> Self {
        let mut app = Self::default();
        app.state.select(Some(0));
        app
    }

    pub fn on_key(&mut self, c: char) -> Action {
        match c {
            'q' => {
                self.should_quit = true;
                Action::Quit
            }
            'j' => {
                self.next();
                Action::None
            }
            'k' => {
                self.previous();
                Action::None
            }
            'f' => {
                self.cycle_filter();
                Action::None
            }
            'r' if !self.feed.is_loading() => Action::Refresh,
            _ => Action::None,
        }
    }

    /// Moves the feed into `Loading` and tracks the task doing the fetch.
    pub fn begin_fetch(&mut self, handle: JoinHandle<()>) {
        self.apply(FeedEvent::FetchStarted);
        if let Some(old) = self.in_flight.replace(handle) {
            old.abort();
        }
    }

    pub fn on_fetch_resolved(&mut self, outcome: FetchOutcome) {
        self.in_flight = None;
        match &outcome {
            Ok(records) => {
                info!("loaded {} predictions", records.len());
                for record in records {
                    if let Err(err) = derive_display(record) {
                        warn!("skipping styling for {} vs {}: {}", record.home_team, record.away_team, err);
                    }
                }
                self.fetched_at = Some(Local::now());
            }
            Err(err) => warn!("prediction feed unavailable: {}", err),
        }
        self.apply(FeedEvent::FetchResolved(outcome));
        self.state.select(Some(0));
    }

    /// Aborts the in-flight fetch, if any. Called on teardown.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    pub fn next(&mut self) {
        let len = self.filtered_records().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered_records().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.state.select(Some(0));
    }

    pub fn filtered_records(&self) -> Vec<&RawPredictionRecord> {
        self.feed
            .records()
            .iter()
            .filter(|r| self.filter.matches(r))
            .collect()
    }

    pub fn selected_record(&self) -> Option<&RawPredictionRecord> {
        let records = self.filtered_records();
        records.get(self.state.selected().unwrap_or(0)).copied()
    }

    fn apply(&mut self, event: FeedEvent) {
        self.feed = std::mem::take(&mut self.feed).apply(event);
    }
}
