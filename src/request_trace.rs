use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// Header used to propagate the trace id from and back to the caller.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static TRACE_ID: String;
}

/// Returns the trace id of the request being served.
///
/// Outside a request scope (startup, background tasks, unit tests) a fresh
/// UUID is generated so correlation ids are never empty.
pub fn current_trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| Uuid::new_v4().to_string())
}

/// Middleware that assigns every inbound request a trace id.
///
/// An `x-request-id` header supplied by the caller is honored; otherwise a
/// UUID is generated. The id is exposed through a task-local for the whole
/// request, so the error translator and the outbound logging layer all report
/// the same identifier, and is echoed on the response.
pub async fn propagate_trace_id(request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = TRACE_ID.scope(trace_id.clone(), next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscoped_trace_id_is_non_empty() {
        assert!(!current_trace_id().is_empty());
    }

    #[test]
    fn unscoped_trace_ids_are_unique() {
        assert_ne!(current_trace_id(), current_trace_id());
    }

    #[tokio::test]
    async fn scoped_trace_id_is_visible_across_awaits() {
        let id = TRACE_ID
            .scope("trace-123".to_string(), async {
                tokio::task::yield_now().await;
                current_trace_id()
            })
            .await;
        assert_eq!(id, "trace-123");
    }
}
