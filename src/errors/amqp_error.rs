use thiserror::Error;

// custom error, based on 'thiserror' library
#[derive(Error, Debug)]
pub enum AmqpError {
    #[error("cannot connect to amqp broker at {uri}: {reason}")]
    Connection { uri: String, reason: String },
    #[error("cannot declare amqp queue {queue}: {reason}")]
    Declaration { queue: String, reason: String },
    #[error("cannot publish message {sequence}: {reason}")]
    Publish { sequence: u32, reason: String },
    #[error("message {sequence} was not acknowledged by the broker")]
    Nacked { sequence: u32 },
    #[error("cannot close amqp connection: {0}")]
    Shutdown(String),
}
