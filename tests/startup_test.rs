mod common;

use common::RejectingConnector;
use log_producer::kafka::{connect, RetryPolicy};
use log_producer::probe::{wait_ready, ProbeSettings};
use log_producer::Error;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

/// A localhost port with nothing listening on it.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_probe_times_out_on_closed_port() {
    let port = closed_port().await;
    let settings = ProbeSettings {
        timeout: Duration::from_millis(600),
        interval: Duration::from_millis(200),
        attempt_timeout: Duration::from_millis(200),
    };

    let start = Instant::now();
    let result = wait_ready("127.0.0.1", port, settings).await;
    let elapsed = start.elapsed();

    match result {
        Err(Error::BrokerUnavailable {
            host,
            port: reported_port,
            elapsed: reported,
        }) => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(reported_port, port);
            assert!(reported >= settings.timeout);
        }
        other => panic!("Expected BrokerUnavailable, got {:?}", other),
    }

    assert!(elapsed >= settings.timeout, "gave up early: {:?}", elapsed);
    assert!(
        elapsed < settings.timeout + settings.interval + Duration::from_millis(500),
        "gave up late: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_probe_waits_for_late_listener() {
    let port = closed_port().await;

    let listener_task = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        let _ = listener.accept().await;
    });

    let settings = ProbeSettings {
        timeout: Duration::from_secs(5),
        interval: Duration::from_millis(100),
        attempt_timeout: Duration::from_millis(200),
    };

    wait_ready("127.0.0.1", port, settings).await.unwrap();
    listener_task.abort();
}

#[tokio::test]
async fn test_connect_after_two_rejections() {
    let connector = RejectingConnector::new(2);
    let policy = RetryPolicy {
        max_retries: 5,
        retry_delay: Duration::from_millis(10),
    };

    let connection = connect(&connector, policy, Duration::from_secs(1)).await.unwrap();

    assert_eq!(connector.attempts(), 3);
    connection.close().unwrap();
    assert_eq!(connector.session.flush_count(), 1);
}

#[tokio::test]
async fn test_connect_exhausts_retries() {
    let connector = RejectingConnector::new(u32::MAX);
    let policy = RetryPolicy {
        max_retries: 3,
        retry_delay: Duration::from_millis(10),
    };

    let error = match connect(&connector, policy, Duration::from_secs(1)).await {
        Ok(_) => panic!("connect should fail when the broker always rejects"),
        Err(e) => e,
    };

    assert!(matches!(error, Error::RetriesExhausted { attempts: 3 }));
    assert_eq!(error.exit_code(), 1);
    assert_eq!(connector.attempts(), 3);
}

#[tokio::test]
async fn test_connect_waits_between_attempts() {
    let connector = RejectingConnector::new(2);
    let policy = RetryPolicy {
        max_retries: 3,
        retry_delay: Duration::from_millis(100),
    };

    let start = Instant::now();
    connect(&connector, policy, Duration::from_secs(1))
        .await
        .unwrap()
        .close()
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(200));
}
