use std::process;

use anyhow::Context;
use log::{error, info};

use telemetry_publisher::config::{init, Env};
use telemetry_publisher::publisher::observer::ConsoleObserver;
use telemetry_publisher::publisher::run;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Init logger and load the .env file
    let env: Env = match init() {
        Ok(env) => env,
        Err(err) => {
            eprintln!("Error: {:?}", anyhow::Error::from(err));
            process::exit(1);
        }
    };

    // 2. Connect, declare the queue, publish the batch and close
    if let Err(err) = start(&env).await {
        error!(target: "app", "Publisher failed. Err = {:?}", err);
        eprintln!("Error: {:?}", err);
        process::exit(1);
    }
    info!(target: "app", "Publisher completed");
}

async fn start(env: &Env) -> anyhow::Result<()> {
    let mut observer = ConsoleObserver::new();
    run(env, &mut observer)
        .await
        .with_context(|| format!("cannot publish test messages to queue {}", env.amqp_queue_name))
}
