use axum::{http::StatusCode, response::IntoResponse};

/// Every failure a handler can return. Rendered as
/// `{"message": ..., "error": ...}` with the matching status code.
#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    MalformedForm(String),
    UnsupportedMediaType(String),
    Internal { message: String, error: String },
}

impl ServiceError {
    pub fn internal(message: impl Into<String>, error: impl std::fmt::Display) -> Self {
        ServiceError::Internal {
            message: message.into(),
            error: error.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::MalformedForm(_) => StatusCode::BAD_REQUEST,
            ServiceError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServiceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::MalformedForm(msg) => write!(f, "Invalid form data: {}", msg),
            ServiceError::UnsupportedMediaType(msg) => {
                write!(f, "Unsupported content type: {}", msg)
            }
            ServiceError::Internal { message, error } => write!(f, "{}: {}", message, error),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let status = self.status();
        let (message, error) = match self {
            ServiceError::NotFound(msg) => ("Event not found".to_string(), msg),
            ServiceError::MalformedForm(msg) => ("Invalid form data".to_string(), msg),
            ServiceError::UnsupportedMediaType(msg) => {
                ("Unsupported content type".to_string(), msg)
            }
            ServiceError::Internal { message, error } => (message, error),
        };
        let body = serde_json::json!({ "message": message, "error": error });
        (status, axum::Json(body)).into_response()
    }
}
