use std::string::String;
use std::time::Duration;

use crate::config::Env;

pub struct PublisherConfig {
    pub queue_name: String,
    pub durable: bool,
    pub service_name: String,
    pub message_count: u32,
    pub publish_interval: Duration,
}

impl PublisherConfig {
    pub fn new(env: &Env) -> Self {
        Self {
            queue_name: env.amqp_queue_name.clone(),
            durable: true,
            service_name: env.service_name.clone(),
            message_count: env.message_count,
            publish_interval: Duration::from_millis(env.publish_interval_ms),
        }
    }
}
