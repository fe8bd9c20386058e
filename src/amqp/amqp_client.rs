use log::{debug, error, info};

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, ConfirmSelectOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};

use crate::amqp::amqp_config::AmqpConfig;
use crate::amqp::Broker;
use crate::errors::amqp_error::AmqpError;

const CLOSE_REPLY_CODE: u16 = 200;
const CLOSE_REPLY_TEXT: &str = "Normal shutdown";

pub struct AmqpClient {
    connection: Connection,
    channel: Channel,
    publisher_confirms: bool,
    closed: bool,
}

impl AmqpClient {
    /// Opens a connection and a channel, without any retry.
    ///
    /// With publisher confirms enabled the channel is switched to confirm mode
    /// before being handed out.
    pub async fn connect(amqp_config: &AmqpConfig) -> Result<Self, AmqpError> {
        let display_uri = amqp_config.display_uri();
        info!(target: "app", "connect - connecting to {}", &display_uri);
        let options = ConnectionProperties::default()
            .with_executor(tokio_executor_trait::Tokio::current())
            .with_reactor(tokio_reactor_trait::Tokio);
        let connection = Connection::connect_uri(amqp_config.uri.clone(), options)
            .await
            .map_err(|err| {
                error!(target: "app", "connect - cannot create AMQP connection. Err = {:?}", err);
                AmqpError::Connection {
                    uri: display_uri.clone(),
                    reason: err.to_string(),
                }
            })?;
        info!(target: "app", "connect - AMQP connection established");
        connection.on_error(|err| {
            error!(target: "app", "connect - AMQP connection error = {:?}", err);
        });

        let channel = match connection.create_channel().await {
            Ok(channel) => channel,
            Err(err) => {
                error!(target: "app", "connect - cannot create AMQP channel. Err = {:?}", err);
                let _ = connection.close(CLOSE_REPLY_CODE, CLOSE_REPLY_TEXT).await;
                return Err(AmqpError::Connection {
                    uri: display_uri,
                    reason: err.to_string(),
                });
            }
        };
        info!(target: "app", "connect - AMQP channel {} created", channel.id());

        if amqp_config.publisher_confirms {
            if let Err(err) = channel.confirm_select(ConfirmSelectOptions::default()).await {
                error!(target: "app", "connect - cannot enable publisher confirms. Err = {:?}", err);
                let _ = connection.close(CLOSE_REPLY_CODE, CLOSE_REPLY_TEXT).await;
                return Err(AmqpError::Connection {
                    uri: display_uri,
                    reason: err.to_string(),
                });
            }
            info!(target: "app", "connect - publisher confirms enabled");
        }

        Ok(Self {
            connection,
            channel,
            publisher_confirms: amqp_config.publisher_confirms,
            closed: false,
        })
    }

    pub fn is_connected(&self) -> bool {
        !self.closed
            && self.connection.status().connected()
            && self.channel.status().connected()
    }
}

#[async_trait]
impl Broker for AmqpClient {
    async fn declare_queue(&mut self, queue_name: &str, durable: bool) -> Result<(), AmqpError> {
        info!(target: "app", "declare_queue - declaring AMQP queue {} (durable = {})", queue_name, durable);
        let options = QueueDeclareOptions {
            durable,
            ..QueueDeclareOptions::default()
        };
        match self
            .channel
            .queue_declare(queue_name, options, FieldTable::default())
            .await
        {
            Ok(queue) => {
                info!(target: "app", "declare_queue - AMQP queue {} ready, {} messages waiting", queue.name(), queue.message_count());
                Ok(())
            }
            Err(err) => {
                error!(target: "app", "declare_queue - cannot declare AMQP queue {}. Err = {:?}", queue_name, err);
                Err(AmqpError::Declaration {
                    queue: queue_name.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    async fn publish(
        &mut self,
        exchange: &str,
        routing_key: &str,
        sequence: u32,
        payload: &[u8],
    ) -> Result<(), AmqpError> {
        debug!(target: "app", "publish - publishing message {} with routing key {}", sequence, routing_key);
        let confirm = self
            .channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default(),
            )
            .await
            .map_err(|err| {
                error!(target: "app", "publish - cannot publish message {}. Err = {:?}", sequence, err);
                AmqpError::Publish {
                    sequence,
                    reason: err.to_string(),
                }
            })?;

        if !self.publisher_confirms {
            return Ok(());
        }
        let confirmation = confirm.await.map_err(|err| {
            error!(target: "app", "publish - no confirmation for message {}. Err = {:?}", sequence, err);
            AmqpError::Publish {
                sequence,
                reason: err.to_string(),
            }
        })?;
        if confirmation.is_nack() {
            error!(target: "app", "publish - message {} nacked by the broker", sequence);
            return Err(AmqpError::Nacked { sequence });
        }
        debug!(target: "app", "publish - message {} confirmed", sequence);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AmqpError> {
        if self.closed {
            debug!(target: "app", "close - AMQP connection already closed");
            return Ok(());
        }
        self.closed = true;
        info!(target: "app", "close - closing AMQP connection");
        self.connection
            .close(CLOSE_REPLY_CODE, CLOSE_REPLY_TEXT)
            .await
            .map_err(|err| {
                error!(target: "app", "close - cannot close AMQP connection. Err = {:?}", err);
                AmqpError::Shutdown(err.to_string())
            })?;
        info!(target: "app", "close - AMQP connection closed");
        Ok(())
    }
}
