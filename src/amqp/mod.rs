pub mod amqp_client;
pub mod amqp_config;

use async_trait::async_trait;

use crate::errors::amqp_error::AmqpError;

/// The nameless direct exchange: routes by queue name.
pub const DEFAULT_EXCHANGE: &str = "";

/// Operations the publisher needs from a connected broker.
///
/// `close` must be safe to call more than once; only the first call
/// releases the connection.
#[async_trait]
pub trait Broker: Send {
    async fn declare_queue(&mut self, queue_name: &str, durable: bool) -> Result<(), AmqpError>;

    async fn publish(
        &mut self,
        exchange: &str,
        routing_key: &str,
        sequence: u32,
        payload: &[u8],
    ) -> Result<(), AmqpError>;

    async fn close(&mut self) -> Result<(), AmqpError>;
}
