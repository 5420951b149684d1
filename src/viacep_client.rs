use reqwest::StatusCode;
use url::Url;

use crate::errors::AppError;
use crate::models::CepRecord;
use crate::pipeline::{OutboundRequest, SharedHttpSend};

/// Client for the ViaCEP address-lookup API.
///
/// All requests go through the outbound pipeline (cache, logging, retry), so
/// repeated lookups for the same CEP within the cache TTL never reach the
/// network twice.
#[derive(Clone)]
pub struct ViaCepClient {
    pipeline: SharedHttpSend,
    base_url: String,
    token: String,
}

impl ViaCepClient {
    /// Creates a new `ViaCepClient`.
    ///
    /// # Arguments
    ///
    /// * `pipeline` - The outbound request pipeline to send through.
    /// * `base_url` - The base URL of the ViaCEP API.
    /// * `token` - The read-access token, attached to every outbound call.
    pub fn new(pipeline: SharedHttpSend, base_url: String, token: String) -> Self {
        Self {
            pipeline,
            base_url,
            token,
        }
    }

    /// Looks up the address record for a CEP.
    ///
    /// The CEP is treated as an opaque string; the upstream is authoritative
    /// on its format. Upstream statuses map to typed errors (404 → not found,
    /// 400 → domain, anything else → integration); a body that fails to
    /// deserialize is an unprocessable response, surfaced rather than retried.
    pub async fn get_address_by_cep(&self, cep: &str) -> Result<CepRecord, AppError> {
        let url = Url::parse(&format!(
            "{}/ws/{}/json",
            self.base_url.trim_end_matches('/'),
            cep
        ))
        .map_err(|e| AppError::Domain(format!("Invalid CEP lookup URL: {}", e)))?;

        let request =
            OutboundRequest::get(url.as_str()).with_header("Authorization", self.token.clone());

        let response = self.pipeline.send(&request).await?;

        if !response.status.is_success() {
            let message = upstream_error_message(&response.body, response.status);
            tracing::error!(
                "ViaCEP error: status code: {}, content: {}",
                response.status,
                message
            );
            return Err(match response.status {
                StatusCode::NOT_FOUND => AppError::NotFound(message),
                StatusCode::BAD_REQUEST => AppError::Domain(message),
                status => AppError::Integration {
                    service: "ViaCEP".to_string(),
                    message,
                    status: Some(status.as_u16()),
                },
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            tracing::error!("Failed to deserialize ViaCEP response for CEP {}: {}", cep, e);
            AppError::Unprocessable(format!("Failed to parse ViaCEP response: {}", e))
        })
    }
}

/// Extracts an error message from an upstream error body: the JSON `error`
/// field when present, the raw content otherwise, or a status-code fallback
/// for empty bodies.
fn upstream_error_message(body: &[u8], status: StatusCode) -> String {
    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        return format!("External service error with status code {}", status);
    }

    serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_error_field() {
        let body = br#"{"error": "invalid cep"}"#;
        assert_eq!(
            upstream_error_message(body, StatusCode::BAD_REQUEST),
            "invalid cep"
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_content() {
        let body = b"service temporarily unavailable";
        assert_eq!(
            upstream_error_message(body, StatusCode::SERVICE_UNAVAILABLE),
            "service temporarily unavailable"
        );
    }

    #[test]
    fn error_message_falls_back_to_status_for_empty_body() {
        assert_eq!(
            upstream_error_message(b"", StatusCode::BAD_GATEWAY),
            "External service error with status code 502 Bad Gateway"
        );
    }

    #[test]
    fn error_message_ignores_non_string_error_field() {
        let body = br#"{"error": 42}"#;
        assert_eq!(
            upstream_error_message(body, StatusCode::BAD_REQUEST),
            r#"{"error": 42}"#
        );
    }
}
