use thiserror::Error;

/// Every failure is fatal for the run; the variant decides the exit code.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(String),
    #[error("FRED request failed: {0}")]
    Fetch(String),
    #[error("Failed to parse input: {0}")]
    Parse(String),
    #[error("{0}")]
    Data(String),
    #[error("{0}")]
    Io(String),
    #[error("Chart rendering failed: {0}")]
    Render(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Io(_) => 3,
            AppError::Fetch(_) | AppError::Parse(_) | AppError::Data(_) => 4,
            AppError::Render(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_group_by_failure_kind() {
        assert_eq!(AppError::Config("x".into()).exit_code(), 2);
        assert_eq!(AppError::Io("x".into()).exit_code(), 3);
        assert_eq!(AppError::Fetch("x".into()).exit_code(), 4);
        assert_eq!(AppError::Render("x".into()).exit_code(), 5);
        assert_eq!(
            AppError::Fetch("timed out".into()).to_string(),
            "FRED request failed: timed out"
        );
    }
}
