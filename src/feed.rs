use crate::data::FetchError;
use crate::display::{classify_status, StatusCategory};
use crate::model::RawPredictionRecord;

pub type FetchOutcome = Result<Vec<RawPredictionRecord>, FetchError>;

/// Lifecycle of the prediction list. Only [`FeedState::apply`] moves between states.
#[derive(Debug, Default)]
pub enum FeedState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<RawPredictionRecord>),
    Failed(FetchError),
}

#[derive(Debug)]
pub enum FeedEvent {
    FetchStarted,
    FetchResolved(FetchOutcome),
}

impl FeedState {
    pub fn apply(self, event: FeedEvent) -> FeedState {
        match (self, event) {
            (_, FeedEvent::FetchStarted) => FeedState::Loading,
            (FeedState::Loading, FeedEvent::FetchResolved(Ok(records))) => FeedState::Loaded(records),
            (FeedState::Loading, FeedEvent::FetchResolved(Err(err))) => FeedState::Failed(err),
            // a resolution that arrives outside Loading is stale
            (state, FeedEvent::FetchResolved(_)) => state,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }

    pub fn records(&self) -> &[RawPredictionRecord] {
        match self {
            FeedState::Loaded(records) => records,
            _ => &[],
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(StatusCategory),
}

impl StatusFilter {
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(StatusCategory::Live),
            StatusFilter::Only(StatusCategory::Live) => StatusFilter::Only(StatusCategory::Scheduled),
            StatusFilter::Only(StatusCategory::Scheduled) => StatusFilter::Only(StatusCategory::Final),
            StatusFilter::Only(StatusCategory::Final) => StatusFilter::All,
        }
    }

    pub fn matches(self, record: &RawPredictionRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(category) => classify_status(&record.time) == category,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StatusFilter::All => " GAMES ",
            StatusFilter::Only(StatusCategory::Live) => " LIVE GAMES ",
            StatusFilter::Only(StatusCategory::Scheduled) => " UPCOMING GAMES ",
            StatusFilter::Only(StatusCategory::Final) => " FINAL GAMES ",
        }
    }
}
