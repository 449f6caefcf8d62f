use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::USER_AGENT;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::domain::commands::CheckoutCommand;

/// Pulls a `CheckoutCommand` out of a JSON body, along with request
/// metadata that is stored with the resulting events.
pub struct CommandExtractor(pub HashMap<String, String>, pub CheckoutCommand);

#[derive(Error, Debug)]
pub enum CommandExtractionError {
    #[error("could not read request body")]
    Body,
    #[error("invalid command: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl IntoResponse for CommandExtractionError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

impl<S> FromRequest<S> for CommandExtractor
where
    S: Send + Sync,
{
    type Rejection = CommandExtractionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut metadata = HashMap::new();
        metadata.insert("time".to_string(), chrono::Utc::now().to_rfc3339());
        metadata.insert("uri".to_string(), req.uri().to_string());
        if let Some(user_agent) = req.headers().get(USER_AGENT)
            && let Ok(value) = user_agent.to_str()
        {
            metadata.insert(USER_AGENT.to_string(), value.to_string());
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| CommandExtractionError::Body)?;
        let command = serde_json::from_slice(&body)?;
        Ok(CommandExtractor(metadata, command))
    }
}
