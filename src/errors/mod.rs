pub mod amqp_error;
pub mod config_error;
pub mod message_error;
pub mod publisher_error;
