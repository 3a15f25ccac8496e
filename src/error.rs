use log::error;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::ModelError;

/// Error type for every API route. Responds with a JSON body of the shape
/// `{"error": "..."}` and a status matching the variant.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("cannot order results by {0:?}")]
    BadOrdering(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("database pool unavailable")]
    PoolUnavailable,
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NoAppeals(_) => ApiError::NotFound,
            ModelError::Database(e) => ApiError::Database(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest(_) | ApiError::BadOrdering(_) => Status::BadRequest,
            ApiError::Unauthorized => Status::Unauthorized,
            ApiError::NotFound => Status::NotFound,
            ApiError::Database(_) | ApiError::PoolUnavailable => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("internal error on {}: {}", req.uri(), self);
        }
        let mut response = Json(json!({ "error": self.to_string() })).respond_to(req)?;
        response.set_status(status);
        Ok(response)
    }
}
