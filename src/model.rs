use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsResponse {
    pub games: Vec<RawPredictionRecord>,
}

/// One game as sent by the prediction feed.
///
/// The backend emits snake_case keys, so every multi-word field also accepts
/// that spelling.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPredictionRecord {
    #[serde(alias = "home_team")]
    pub home_team: String,
    #[serde(alias = "away_team")]
    pub away_team: String,
    pub time: String, // "Q3 8:42", "Final", "7:30 PM ET"
    #[serde(default, alias = "home_score")]
    pub home_score: Option<u32>,
    #[serde(default, alias = "away_score")]
    pub away_score: Option<u32>,
    pub prediction: String,
    pub confidence: f64,
}

/// Body the backend sends alongside a 5xx when the model fails.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
