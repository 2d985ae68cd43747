use dd_core::ports::ApiError;
use dd_core::DocumentId;
use reqwest::StatusCode;

pub(crate) fn map_reqwest_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Transport("request timed out".to_string())
    } else if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else if let Some(status) = error.status() {
        map_status(status, "")
    } else {
        ApiError::Transport(error.to_string())
    }
}

/// Error for a non-2xx response. FastAPI puts the reason in `detail`.
pub(crate) fn map_status(status: StatusCode, body: &str) -> ApiError {
    let message = error_detail(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Turn a 404 for a single-document endpoint into [`ApiError::NotFound`].
pub(crate) fn not_found_for(id: &DocumentId) -> impl FnOnce(ApiError) -> ApiError + '_ {
    move |error| match error {
        ApiError::Status { status: 404, .. } => ApiError::NotFound(id.clone()),
        other => other,
    }
}

fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(detail) => Some(detail.to_string()),
            None => Some(body.to_string()),
        },
        _ => Some(body.chars().take(200).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_becomes_message() {
        let err = map_status(StatusCode::BAD_REQUEST, r#"{"detail":"No document data provided"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                message: "No document data provided".to_string()
            }
        );
    }

    #[test]
    fn empty_body_falls_back_to_reason_phrase() {
        let err = map_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "server returned 503: Service Unavailable");
        assert!(err.is_transient());
    }

    #[test]
    fn plain_text_body_is_kept() {
        let err = map_status(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n");
        assert!(matches!(err, ApiError::Status { status: 500, ref message } if message == "Internal Server Error"));
    }

    #[test]
    fn only_404_maps_to_not_found() {
        let id = DocumentId::from("abc");
        let missing = not_found_for(&id)(map_status(StatusCode::NOT_FOUND, ""));
        assert_eq!(missing, ApiError::NotFound(id.clone()));

        let other = not_found_for(&id)(map_status(StatusCode::FORBIDDEN, ""));
        assert!(matches!(other, ApiError::Status { status: 403, .. }));
    }
}
