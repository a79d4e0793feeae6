use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mailmask_core::ResolvedEntity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub input_email_body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Original body, rebuilt from the masked text and entity list
    pub input_email_body: String,
    pub list_of_masked_entities: Vec<ResolvedEntity>,
    pub masked_email: String,
    pub category_of_the_email: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("ML Models are not loaded yet. Server is starting up or failed to load models.")]
    ModelsNotLoaded,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::ModelsNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Mask PII, classify the masked body, then demask it for the response
pub async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let classifier = state.classifier.as_ref().ok_or_else(|| {
        tracing::warn!("classify request refused: classifier not loaded");
        ApiError::ModelsNotLoaded
    })?;

    let masked = state.redactor.mask(&request.input_email_body);
    let category = classifier.predict(&masked.masked_text);
    let reconstructed = state.redactor.demask(&masked.masked_text, &masked.entities);

    tracing::info!(
        entities = masked.entities.len(),
        category = %category,
        "classified email"
    );

    Ok(Json(ClassifyResponse {
        input_email_body: reconstructed,
        list_of_masked_entities: masked.entities,
        masked_email: masked.masked_text,
        category_of_the_email: category,
    }))
}
