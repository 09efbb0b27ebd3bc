use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use narration_service::MessageCatalog;
use scan_service::providers::fixed::FixedOcrProvider;
use scan_service::ScanState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Scan request: a captured frame, or a candidate string the user already
/// confirmed in the review modal.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Base64 frame, with or without a data-URL prefix.
    pub image: Option<String>,
    /// Confirmed/edited recognized text for a retry.
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_ingredient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub all_ocr_texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /scan`
///
/// Glue only: recognition runs here (or is bypassed for a confirmed
/// candidate), then an ephemeral scan session resolves and narrates. The
/// unmatched case is a first-class 404 payload, not an error.
pub async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanResponse>), ApiError> {
    let candidates = match (request.text, request.image) {
        (Some(text), _) if !text.trim().is_empty() => vec![text.trim().to_string()],
        (_, Some(image)) => {
            let frame = decode_base64_image(&image)?;
            state.recognizer.recognize(&frame).await?
        }
        _ => return Err(ApiError::bad_request("No image or text provided")),
    };
    debug!(candidates = candidates.len(), "Driving scan session");

    let session = state.new_session(Arc::new(FixedOcrProvider::new(candidates.clone())));
    session.begin_capture()?;
    let outcome = session.submit_frame(&[]).await?;

    let extracted_text = candidates.first().cloned();
    let messages = MessageCatalog::for_language(state.narrator.base_language());

    let (status, response) = match outcome {
        ScanState::Resolved { record, .. } => (
            StatusCode::OK,
            ScanResponse {
                success: true,
                drug_name: Some(record.name.clone()),
                active_ingredient: record.active_ingredient.clone(),
                category: record.category.clone(),
                rx_status: Some("OTC".to_string()),
                page_number: record.page_reference.clone(),
                extracted_text,
                all_ocr_texts: candidates,
                message: None,
            },
        ),
        ScanState::PrescriptionBlocked { name } => (
            StatusCode::OK,
            ScanResponse {
                success: true,
                message: Some(messages.prescription_blocked(&name)),
                drug_name: Some(name),
                active_ingredient: None,
                category: None,
                rx_status: Some("Rx".to_string()),
                page_number: None,
                extracted_text,
                all_ocr_texts: candidates,
            },
        ),
        ScanState::NotFound { recognized } => (
            StatusCode::NOT_FOUND,
            ScanResponse {
                success: false,
                drug_name: None,
                active_ingredient: None,
                category: None,
                rx_status: None,
                page_number: None,
                message: Some(match &recognized {
                    Some(text) => messages.not_found(text),
                    None => messages.no_candidates(),
                }),
                extracted_text,
                all_ocr_texts: candidates,
            },
        ),
        other => {
            return Err(ApiError::internal(format!(
                "Scan ended in non-terminal state {}",
                other.name()
            )))
        }
    };

    Ok((status, Json(response)))
}

fn decode_base64_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    // Tolerate a data-URL prefix.
    let payload = encoded
        .split_once(',')
        .map(|(_, rest)| rest)
        .unwrap_or(encoded);
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| ApiError::bad_request("Invalid image data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_decoding_tolerates_data_urls() {
        let plain = decode_base64_image("aGVsbG8=").unwrap();
        assert_eq!(plain, b"hello");

        let data_url = decode_base64_image("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(data_url, b"hello");

        assert!(decode_base64_image("not base64!!!").is_err());
    }
}
