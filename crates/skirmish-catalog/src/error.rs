use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown posture `{0}`")]
    UnknownPosture(String),

    #[error("failed to parse posture spec: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("posture `{posture}` goal #{index}: {reason}")]
    InvalidGoal {
        posture: String,
        index: usize,
        reason: &'static str,
    },
}
