use thiserror::Error;

use crate::model::RawPredictionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Scheduled,
    Live,
    Final,
}

impl StatusCategory {
    pub fn label(self) -> &'static str {
        match self {
            StatusCategory::Scheduled => "Scheduled",
            StatusCategory::Live => "Live",
            StatusCategory::Final => "Final",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictedSide {
    Home,
    Away,
}

impl PredictedSide {
    pub fn role(self) -> VisualRole {
        match self {
            PredictedSide::Home => VisualRole::Home,
            PredictedSide::Away => VisualRole::Away,
        }
    }
}

/// Fixed color role of a side. The renderer maps each role to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualRole {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideRoles {
    pub home: VisualRole,
    pub away: VisualRole,
    pub emphasized: VisualRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameDisplayState {
    pub status_category: StatusCategory,
    pub predicted_side: PredictedSide,
    pub scores_visible: bool,
}

impl GameDisplayState {
    pub fn roles(&self) -> SideRoles {
        side_roles(self.predicted_side)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("predicted winner '{prediction}' is neither {home_team} nor {away_team}")]
    UnknownPredictedTeam {
        prediction: String,
        home_team: String,
        away_team: String,
    },
}

/// Classifies the feed's free-form `time` text. First match wins:
///
/// 1. `final` anywhere, ignoring case, is [`StatusCategory::Final`]. A stale
///    `OT` or `Q` token next to it does not make the game live again.
/// 2. `Q` (quarter) or `OT` (overtime), case-sensitive, is [`StatusCategory::Live`].
/// 3. Anything else is a start time, so [`StatusCategory::Scheduled`].
pub fn classify_status(time: &str) -> StatusCategory {
    if time.to_lowercase().contains("final") {
        StatusCategory::Final
    } else if time.contains('Q') || time.contains("OT") {
        StatusCategory::Live
    } else {
        StatusCategory::Scheduled
    }
}

/// Home and away roles, which do not depend on the prediction.
pub fn team_roles() -> (VisualRole, VisualRole) {
    (VisualRole::Home, VisualRole::Away)
}

pub fn side_roles(predicted: PredictedSide) -> SideRoles {
    let (home, away) = team_roles();
    SideRoles {
        home,
        away,
        emphasized: predicted.role(),
    }
}

pub fn scores_visible(record: &RawPredictionRecord) -> bool {
    record.home_score.is_some() && record.away_score.is_some()
}

pub fn predicted_side(record: &RawPredictionRecord) -> Result<PredictedSide, DerivationError> {
    // home is checked first, so a record naming the same team twice resolves to Home
    if record.prediction == record.home_team {
        Ok(PredictedSide::Home)
    } else if record.prediction == record.away_team {
        Ok(PredictedSide::Away)
    } else {
        Err(DerivationError::UnknownPredictedTeam {
            prediction: record.prediction.clone(),
            home_team: record.home_team.clone(),
            away_team: record.away_team.clone(),
        })
    }
}

pub fn derive_display(record: &RawPredictionRecord) -> Result<GameDisplayState, DerivationError> {
    Ok(GameDisplayState {
        status_category: classify_status(&record.time),
        predicted_side: predicted_side(record)?,
        scores_visible: scores_visible(record),
    })
}
