use thiserror::Error;

// custom error, based on 'thiserror' library
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("cannot initialize logger: {0}")]
    Logger(anyhow::Error),
}
