//! Maps HTTP statuses and transport errors onto `AnswerError`.

use reqwest::StatusCode;

use crate::AnswerError;

/// Classify a non-success HTTP status.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> AnswerError {
    match status {
        StatusCode::NOT_FOUND
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => AnswerError::ServiceUnavailable {
            status: status.as_u16(),
        },
        _ => {
            let body = body.trim();
            if body.is_empty() {
                AnswerError::Unclassified(format!("HTTP {status}"))
            } else {
                AnswerError::Unclassified(format!("HTTP {status}: {body}"))
            }
        }
    }
}

/// Classify an error raised while sending the request or reading the body.
pub(crate) fn classify_transport(err: &reqwest::Error) -> AnswerError {
    if err.is_connect() || err.is_timeout() {
        return AnswerError::NetworkUnreachable(err.to_string());
    }
    if let Some(status) = err.status() {
        return classify_status(status, "");
    }
    AnswerError::Unclassified(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_means_service_unavailable() {
        let err = classify_status(StatusCode::NOT_FOUND, "");
        assert_eq!(err, AnswerError::ServiceUnavailable { status: 404 });
    }

    #[test]
    fn gateway_statuses_mean_service_unavailable() {
        for code in [502u16, 503, 504] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(
                classify_status(status, "upstream down"),
                AnswerError::ServiceUnavailable { status: code }
            );
        }
    }

    #[test]
    fn server_error_is_unclassified_with_body() {
        let err = classify_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"Internal server error"}"#,
        );
        match err {
            AnswerError::Unclassified(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("Internal server error"));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn client_error_without_body() {
        let err = classify_status(StatusCode::UNPROCESSABLE_ENTITY, "  ");
        assert_eq!(
            err,
            AnswerError::Unclassified("HTTP 422 Unprocessable Entity".into())
        );
    }
}
