use std::path::PathBuf;

pub type ColorizerResult<T> = Result<T, ColorizerError>;

#[derive(thiserror::Error, Debug)]
pub enum ColorizerError {
    #[error("prefab `{0}` has no renderer")]
    MissingRenderer(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("date formatting failed: {0}")]
    Time(#[from] time::error::Format),
}

impl ColorizerError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_path() {
        let err = ColorizerError::io("/tmp/x.csv", std::io::Error::other("boom"));
        let s = err.to_string();
        assert!(s.contains("/tmp/x.csv"));
        assert!(s.contains("boom"));
    }

    #[test]
    fn missing_renderer_mentions_prefab() {
        let err = ColorizerError::MissingRenderer("cube".into());
        assert!(err.to_string().contains("cube"));
    }
}
