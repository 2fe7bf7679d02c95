use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorBody;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed JSON payload.")]
    MalformedPayload,

    #[error("Please provide both name and feedback fields.")]
    MissingFields,

    #[error("Server Error: Unable to save feedback.")]
    Save(#[source] StoreError),

    #[error("Server Error: Unable to fetch feedback list.")]
    Fetch(#[source] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MalformedPayload | AppError::MissingFields => StatusCode::BAD_REQUEST,
            AppError::Save(e) => {
                error!("Error saving feedback: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Fetch(e) => {
                error!("Error fetching feedback: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Fatal conditions before the server starts accepting requests.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("MongoDB connection failed: {0}")]
    Connection(#[from] mongodb::error::Error),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
