use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    #[allow(dead_code)]
    Config(String),
    #[error("ADC error: {0}")]
    Adc(String),
    #[error("DB error: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
