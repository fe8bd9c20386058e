pub mod observer;
pub mod publisher_config;

use log::{debug, error, info};

use crate::amqp::amqp_client::AmqpClient;
use crate::amqp::amqp_config::AmqpConfig;
use crate::amqp::{Broker, DEFAULT_EXCHANGE};
use crate::config::Env;
use crate::errors::publisher_error::PublisherError;
use crate::models::message::Message;
use crate::publisher::observer::ProgressObserver;
use crate::publisher::publisher_config::PublisherConfig;

/// Connects to the broker described by `env`, then declares, publishes and closes.
///
/// Nothing is published and no connection is left open when connecting fails.
pub async fn run<O: ProgressObserver>(env: &Env, observer: &mut O) -> Result<(), PublisherError> {
    let amqp_config = AmqpConfig::new(env);
    let publisher_config = PublisherConfig::new(env);
    let mut amqp_client = AmqpClient::connect(&amqp_config).await?;
    execute(&mut amqp_client, &publisher_config, observer).await
}

/// Declares the queue and publishes the batch on an already connected broker.
///
/// The broker is closed exactly once whatever the outcome, and `done` is only
/// reported after a clean close. The first error wins: a declare or publish
/// failure is returned even if closing fails too.
pub async fn execute<B, O>(
    broker: &mut B,
    publisher_config: &PublisherConfig,
    observer: &mut O,
) -> Result<(), PublisherError>
where
    B: Broker,
    O: ProgressObserver,
{
    let result = declare_and_publish(broker, publisher_config, observer).await;
    let close_result = broker.close().await;
    if let Err(err) = &result {
        error!(target: "app", "execute - publishing aborted. Err = {}", err);
    }
    result?;
    close_result?;
    info!(target: "app", "execute - {} messages published to {}", publisher_config.message_count, publisher_config.queue_name);
    observer.done();
    Ok(())
}

async fn declare_and_publish<B, O>(
    broker: &mut B,
    publisher_config: &PublisherConfig,
    observer: &mut O,
) -> Result<(), PublisherError>
where
    B: Broker,
    O: ProgressObserver,
{
    broker
        .declare_queue(&publisher_config.queue_name, publisher_config.durable)
        .await?;
    publish_batch(broker, publisher_config, observer).await
}

/// Publishes messages `1..=message_count` in order; stops at the first failure.
pub async fn publish_batch<B, O>(
    broker: &mut B,
    publisher_config: &PublisherConfig,
    observer: &mut O,
) -> Result<(), PublisherError>
where
    B: Broker,
    O: ProgressObserver,
{
    info!(target: "app", "publish_batch - publishing {} messages to queue {}", publisher_config.message_count, publisher_config.queue_name);
    for sequence in 1..=publisher_config.message_count {
        if sequence > 1 && !publisher_config.publish_interval.is_zero() {
            tokio::time::sleep(publisher_config.publish_interval).await;
        }
        let payload: Vec<u8> = Message::new_as_bytes(&publisher_config.service_name, sequence)?;
        // default exchange, the queue name is the routing key
        broker
            .publish(
                DEFAULT_EXCHANGE,
                &publisher_config.queue_name,
                sequence,
                payload.as_slice(),
            )
            .await?;
        debug!(target: "app", "publish_batch - message {} published", sequence);
        observer.published(sequence);
    }
    Ok(())
}
