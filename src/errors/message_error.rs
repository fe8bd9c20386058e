use thiserror::Error;

// custom error, based on 'thiserror' library
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("cannot serialize message {sequence}: {source}")]
    Serialize {
        sequence: u32,
        source: serde_json::Error,
    },
}
