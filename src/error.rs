/// Engine-level errors
///
/// None of these escape the orchestrator: every component that talks to the
/// outside world converts them into a degraded result at its own boundary.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Interaction store error: {0}")]
    Store(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::ExternalApi("status 502".to_string());
        assert_eq!(err.to_string(), "External API error: status 502");

        let err = AppError::Store("connection reset".to_string());
        assert_eq!(err.to_string(), "Interaction store error: connection reset");
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
