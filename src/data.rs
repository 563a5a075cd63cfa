use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::model::{ErrorBody, PredictionsResponse, RawPredictionRecord};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },
    #[error("could not decode predictions from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct DataClient {
    client: Client,
}

impl DataClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { client })
    }

    /// GETs the feed and returns its `games` exactly as sent.
    pub async fn fetch_predictions(&self, url: &Url) -> Result<Vec<RawPredictionRecord>, FetchError> {
        let network = |source| FetchError::Network {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url.as_str()).send().await.map_err(network)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(network)?;
        debug!("{} answered {} with {} bytes", url, status, body.len());

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(err) => err.error,
                Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
            };
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let data: PredictionsResponse =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            })?;
        Ok(data.games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{derive_display, PredictedSide, StatusCategory, VisualRole};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_deserialize_sample() {
        let content = fs::read_to_string("predictions_sample.json").expect("Failed to read sample file");
        let data: PredictionsResponse = serde_json::from_str(&content).expect("Failed to deserialize");
        assert!(!data.games.is_empty());
    }

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api/predictions")).unwrap()
    }

    fn client() -> DataClient {
        DataClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn returns_games_in_feed_order() {
        let url = serve(Router::new().route(
            "/api/predictions",
            get(|| async {
                Json(json!({"games": [
                    {"homeTeam": "Lakers", "awayTeam": "Celtics", "time": "Final",
                     "homeScore": 102, "awayScore": 98, "prediction": "Lakers", "confidence": 64.8},
                    {"homeTeam": "Bulls", "awayTeam": "Bucks", "time": "7:30 PM",
                     "homeScore": null, "awayScore": null, "prediction": "Bucks", "confidence": 71.0}
                ]}))
            }),
        ))
        .await;

        let games = client().fetch_predictions(&url).await.unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].home_team, "Lakers");
        assert_eq!(games[0].home_score, Some(102));
        assert_eq!(games[0].confidence, 64.8);
        assert_eq!(games[1].home_team, "Bulls");
        assert_eq!(games[1].away_score, None);
    }

    #[tokio::test]
    async fn empty_games_is_ok() {
        let url = serve(Router::new().route(
            "/api/predictions",
            get(|| async { Json(json!({"games": []})) }),
        ))
        .await;

        let games = client().fetch_predictions(&url).await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let url = serve(Router::new().route("/api/predictions", get(|| async { "<html>oops</html>" }))).await;

        let err = client().fetch_predictions(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn missing_games_is_decode_error() {
        let url = serve(Router::new().route(
            "/api/predictions",
            get(|| async { Json(json!({"predictions": []})) }),
        ))
        .await;

        let err = client().fetch_predictions(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn server_error_carries_backend_message() {
        let url = serve(Router::new().route(
            "/api/predictions",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "model not trained"})),
                )
            }),
        ))
        .await;

        match client().fetch_predictions(&url).await.unwrap_err() {
            FetchError::Status { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model not trained");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_route_is_status_error() {
        let url = serve(Router::new()).await;

        let err = client().fetch_predictions(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn slow_feed_times_out_as_network_error() {
        let url = serve(Router::new().route(
            "/api/predictions",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"games": []}))
            }),
        ))
        .await;

        let client = DataClient::new(Duration::from_millis(200)).unwrap();
        let err = client.fetch_predictions(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn final_game_derives_home_emphasis() {
        let url = serve(Router::new().route(
            "/api/predictions",
            get(|| async {
                Json(json!({"games": [
                    {"homeTeam": "Lakers", "awayTeam": "Celtics", "time": "Final",
                     "homeScore": 102, "awayScore": 98, "prediction": "Lakers", "confidence": 64.8}
                ]}))
            }),
        ))
        .await;

        let games = client().fetch_predictions(&url).await.unwrap();
        assert_eq!(games.len(), 1);
        let state = derive_display(&games[0]).unwrap();
        assert_eq!(state.status_category, StatusCategory::Final);
        assert_eq!(state.predicted_side, PredictedSide::Home);
        assert!(state.scores_visible);
        assert_eq!(state.roles().emphasized, VisualRole::Home);
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = Url::parse(&format!("http://{addr}/api/predictions")).unwrap();

        let err = client().fetch_predictions(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }), "{err:?}");
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
