use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::config::Env;
use crate::errors::amqp_error::AmqpError;
use crate::errors::publisher_error::PublisherError;
use crate::publisher::observer::ConsoleObserver;
use crate::publisher::publisher_config::PublisherConfig;
use crate::publisher::{execute, publish_batch};
use crate::tests::broker_stub::{BrokerStub, Call};

fn default_config() -> PublisherConfig {
    PublisherConfig::new(&Env::default())
}

fn expected_payload(sequence: u32) -> String {
    format!(
        r#"{{"type":"log","service":"test-app","message":"Test message {}"}}"#,
        sequence
    )
}

fn output(observer: ConsoleObserver<Vec<u8>>) -> String {
    String::from_utf8(observer.into_inner()).unwrap()
}

#[tokio::test]
async fn ok_execute_publishes_five_messages_in_order() {
    let mut broker = BrokerStub::new();
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    execute(&mut broker, &default_config(), &mut observer)
        .await
        .unwrap();

    let expected: Vec<String> = (1..=5).map(expected_payload).collect();
    assert_eq!(broker.published_payloads(), expected);
    assert_eq!(
        output(observer),
        "Published message 1\nPublished message 2\nPublished message 3\nPublished message 4\nPublished message 5\nDone!\n"
    );
}

#[tokio::test]
async fn ok_execute_call_sequence() {
    let mut broker = BrokerStub::new();
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    execute(&mut broker, &default_config(), &mut observer)
        .await
        .unwrap();

    // declare first, close last and only once
    assert_eq!(
        broker.calls.first(),
        Some(&Call::Declare {
            queue_name: "telemetry".to_string(),
            durable: true,
        })
    );
    assert_eq!(broker.calls.last(), Some(&Call::Close));
    assert_eq!(broker.close_count(), 1);
    assert_eq!(broker.calls.len(), 7);

    for (index, call) in broker.calls[1..6].iter().enumerate() {
        match call {
            Call::Publish {
                exchange,
                routing_key,
                sequence,
                ..
            } => {
                assert_eq!(exchange, "");
                assert_eq!(routing_key, "telemetry");
                assert_eq!(*sequence, index as u32 + 1);
            }
            other => panic!("expected a publish, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn ok_execute_with_existing_durable_queue() {
    let mut broker = BrokerStub::with_queue("telemetry", true);
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    execute(&mut broker, &default_config(), &mut observer)
        .await
        .unwrap();

    assert_eq!(broker.published_payloads().len(), 5);
}

#[tokio::test]
async fn ok_execute_twice_is_additive() {
    let mut broker = BrokerStub::new();

    for _ in 0..2 {
        let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());
        execute(&mut broker, &default_config(), &mut observer)
            .await
            .unwrap();
    }

    assert_eq!(broker.published_payloads().len(), 10);
    assert_eq!(broker.queues.len(), 1);
    assert_eq!(broker.close_count(), 2);
}

#[tokio::test]
async fn ok_execute_custom_service_and_count() {
    let env = Env {
        amqp_queue_name: "telemetry-test".to_string(),
        service_name: "billing".to_string(),
        message_count: 2,
        ..Env::default()
    };
    let mut broker = BrokerStub::new();
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    execute(&mut broker, &PublisherConfig::new(&env), &mut observer)
        .await
        .unwrap();

    assert_eq!(
        broker.published_payloads(),
        vec![
            r#"{"type":"log","service":"billing","message":"Test message 1"}"#.to_string(),
            r#"{"type":"log","service":"billing","message":"Test message 2"}"#.to_string(),
        ]
    );
    assert!(broker.queues.contains_key("telemetry-test"));
    assert_eq!(output(observer), "Published message 1\nPublished message 2\nDone!\n");
}

#[tokio::test]
async fn ok_execute_zero_messages() {
    let env = Env {
        message_count: 0,
        ..Env::default()
    };
    let mut broker = BrokerStub::new();
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    execute(&mut broker, &PublisherConfig::new(&env), &mut observer)
        .await
        .unwrap();

    assert!(broker.published_payloads().is_empty());
    assert_eq!(broker.close_count(), 1);
    assert_eq!(output(observer), "Done!\n");
}

#[tokio::test]
async fn wrong_declare_conflicting_queue_closes_without_publishing() {
    // an existing non-durable queue with the same name
    let mut broker = BrokerStub::with_queue("telemetry", false);
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    let result = execute(&mut broker, &default_config(), &mut observer).await;

    match result {
        Err(PublisherError::Amqp(AmqpError::Declaration { queue, .. })) => {
            assert_eq!(queue, "telemetry")
        }
        other => panic!("expected a declaration error, got {:?}", other),
    }
    assert!(broker.published_payloads().is_empty());
    assert_eq!(broker.close_count(), 1);
    assert_eq!(output(observer), "");
}

#[tokio::test]
async fn wrong_publish_aborts_remaining_batch() {
    let mut broker = BrokerStub {
        fail_publish_at: Some(3),
        ..BrokerStub::new()
    };
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    let result = execute(&mut broker, &default_config(), &mut observer).await;

    match result {
        Err(PublisherError::Amqp(AmqpError::Publish { sequence, .. })) => assert_eq!(sequence, 3),
        other => panic!("expected a publish error, got {:?}", other),
    }
    assert_eq!(
        broker.published_payloads(),
        vec![expected_payload(1), expected_payload(2)]
    );
    assert_eq!(broker.calls.last(), Some(&Call::Close));
    assert_eq!(broker.close_count(), 1);
    assert_eq!(
        output(observer),
        "Published message 1\nPublished message 2\n"
    );
}

#[tokio::test]
async fn wrong_nack_is_surfaced_per_message() {
    let mut broker = BrokerStub {
        nack_at: Some(1),
        ..BrokerStub::new()
    };
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    let result = execute(&mut broker, &default_config(), &mut observer).await;

    match result {
        Err(PublisherError::Amqp(AmqpError::Nacked { sequence })) => assert_eq!(sequence, 1),
        other => panic!("expected a nack error, got {:?}", other),
    }
    assert_eq!(broker.close_count(), 1);
    assert_eq!(output(observer), "");
}

#[tokio::test]
async fn wrong_close_after_successful_batch() {
    let mut broker = BrokerStub {
        fail_close: true,
        ..BrokerStub::new()
    };
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    let result = execute(&mut broker, &default_config(), &mut observer).await;

    assert!(matches!(
        result,
        Err(PublisherError::Amqp(AmqpError::Shutdown(_)))
    ));
    assert_eq!(broker.published_payloads().len(), 5);
    // every message was sent, but no completion line without a clean close
    assert!(!output(observer).contains("Done!"));
}

#[tokio::test]
async fn wrong_publish_error_wins_over_close_error() {
    let mut broker = BrokerStub {
        fail_publish_at: Some(1),
        fail_close: true,
        ..BrokerStub::new()
    };
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    let result = execute(&mut broker, &default_config(), &mut observer).await;

    assert!(matches!(
        result,
        Err(PublisherError::Amqp(AmqpError::Publish { sequence: 1, .. }))
    ));
    assert_eq!(broker.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn ok_publish_batch_waits_between_messages() {
    let env = Env {
        message_count: 3,
        publish_interval_ms: 500,
        ..Env::default()
    };
    let mut broker = BrokerStub::new();
    let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());

    let start = tokio::time::Instant::now();
    publish_batch(&mut broker, &PublisherConfig::new(&env), &mut observer)
        .await
        .unwrap();

    // no pause before the first message, none after the last
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(1500));
    assert_eq!(broker.published_payloads().len(), 3);
}
