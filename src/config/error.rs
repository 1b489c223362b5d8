use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reflectance_scale must be a positive number")]
    ReflectanceScale,
    #[error("threads must be at least 1")]
    Threads,
}
