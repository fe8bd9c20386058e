use std::path::Path;

use dotenvy::dotenv;
use log::info;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use serde::Deserialize;

use crate::errors::config_error::ConfigError;

const LOG4RS_FILE: &str = "log4rs.yaml";
const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} {t} - {m}{n}";
const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILE_COUNT: u32 = 5;

/// Runtime configuration, read from the environment (and `.env`).
///
/// Every field has a default, so an empty environment publishes the
/// standard five test messages to `telemetry` on a local broker.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Env {
    #[serde(default = "default_amqp_host")]
    pub amqp_host: String,
    #[serde(default = "default_amqp_port")]
    pub amqp_port: u16,
    #[serde(default = "default_amqp_vhost")]
    pub amqp_vhost: String,
    #[serde(default = "default_amqp_user")]
    pub amqp_user: String,
    #[serde(default = "default_amqp_password")]
    pub amqp_password: String,
    #[serde(default = "default_amqp_queue_name")]
    pub amqp_queue_name: String,
    #[serde(default = "default_message_count")]
    pub message_count: u32,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Wait for a broker ack on every publish. Off by default: fire-and-forget.
    #[serde(default)]
    pub publisher_confirms: bool,
    /// Pause between two publishes, in milliseconds.
    #[serde(default)]
    pub publish_interval_ms: u64,
}

fn default_amqp_host() -> String {
    "localhost".to_string()
}

fn default_amqp_port() -> u16 {
    5672
}

fn default_amqp_vhost() -> String {
    "/".to_string()
}

fn default_amqp_user() -> String {
    "observability".to_string()
}

fn default_amqp_password() -> String {
    "local_dev_only".to_string()
}

fn default_amqp_queue_name() -> String {
    "telemetry".to_string()
}

fn default_message_count() -> u32 {
    5
}

fn default_service_name() -> String {
    "test-app".to_string()
}

impl Default for Env {
    fn default() -> Self {
        Self {
            amqp_host: default_amqp_host(),
            amqp_port: default_amqp_port(),
            amqp_vhost: default_amqp_vhost(),
            amqp_user: default_amqp_user(),
            amqp_password: default_amqp_password(),
            amqp_queue_name: default_amqp_queue_name(),
            message_count: default_message_count(),
            service_name: default_service_name(),
            publisher_confirms: false,
            publish_interval_ms: 0,
        }
    }
}

pub fn init() -> Result<Env, ConfigError> {
    // Load the .env file
    dotenv().ok();

    init_logger().map_err(ConfigError::Logger)?;
    info!(target: "app", "Starting application...");

    let env = envy::from_env::<Env>()?;
    print_env(&env);
    Ok(env)
}

// uses ./log4rs.yaml if present, otherwise logs to stderr and ./logs,
// keeping stdout free for progress lines
pub fn init_logger() -> Result<(), anyhow::Error> {
    if Path::new(LOG4RS_FILE).exists() {
        log4rs::init_file(LOG4RS_FILE, Default::default())?;
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let roller = FixedWindowRoller::builder().build("./logs/all.{}.log", LOG_FILE_COUNT)?;
    let policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(LOG_FILE_SIZE)),
        Box::new(roller),
    );
    let debug_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build("./logs/all.log", Box::new(policy))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Info)))
                .build("stderr", Box::new(stderr)),
        )
        .appender(Appender::builder().build("debug_file", Box::new(debug_file)))
        .logger(
            Logger::builder()
                .appender("stderr")
                .appender("debug_file")
                .additive(false)
                .build("app", LevelFilter::Debug),
        )
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}

pub fn print_env(env: &Env) {
    info!(target: "app", "amqp_host = {}", env.amqp_host);
    info!(target: "app", "amqp_port = {}", env.amqp_port);
    info!(target: "app", "amqp_vhost = {}", env.amqp_vhost);
    info!(target: "app", "amqp_user = {}", env.amqp_user);
    info!(target: "app", "amqp_password = ********");
    info!(target: "app", "amqp_queue_name = {}", env.amqp_queue_name);
    info!(target: "app", "message_count = {}", env.message_count);
    info!(target: "app", "service_name = {}", env.service_name);
    info!(target: "app", "publisher_confirms = {}", env.publisher_confirms);
    info!(target: "app", "publish_interval_ms = {}", env.publish_interval_ms);
}
