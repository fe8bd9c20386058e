use thiserror::Error;

use crate::errors::amqp_error::AmqpError;
use crate::errors::message_error::MessageError;

// custom error, based on 'thiserror' library
#[derive(Error, Debug)]
pub enum PublisherError {
    #[error(transparent)]
    Amqp(#[from] AmqpError),
    #[error(transparent)]
    Message(#[from] MessageError),
}
