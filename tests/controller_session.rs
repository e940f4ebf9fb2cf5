//! Two-channel sessions driven through the controller.

mod common;

use common::*;
use serial_sniff::{Controller, MemorySink, MockConnector, OutputStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn both_channels_print_until_interrupted() {
    let bridge = MockBridge::new();
    let mut tx = bridge.tx.clone();
    let mut rx = bridge.rx.clone();
    tx.enqueue_read(b"AT\r\n");
    rx.enqueue_read(b"OK\r\n");

    let sink = MemorySink::new();
    let mut config = fast_session();
    config.style = OutputStyle::Utf8;
    config.separator = "\\r\\n".parse().unwrap();

    let controller = Controller::new(
        config,
        Arc::new(bridge.connector.clone()),
        Arc::new(sink.clone()),
    );
    let (stop, interrupt) = oneshot::channel::<()>();
    let session = tokio::spawn(controller.run_until(async {
        let _ = interrupt.await;
    }));

    assert!(wait_until_async(Duration::from_secs(5), || sink.len() == 2).await);
    stop.send(()).unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), session)
        .await
        .expect("session did not wind down")
        .expect("session task panicked")
        .expect("session failed");

    assert!(summary.interrupted);
    assert_eq!(summary.tx.frames, 1);
    assert_eq!(summary.rx.frames, 1);
    assert_eq!(lines_for(&sink, "tx"), vec!["tx: AT\n".to_string()]);
    assert_eq!(lines_for(&sink, "rx"), vec!["rx: OK\n".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn frames_keep_order_within_a_channel() {
    let bridge = MockBridge::new();
    let mut tx = bridge.tx.clone();
    let mut rx = bridge.rx.clone();
    for i in 0..20u8 {
        tx.enqueue_read(&[0x30 + i, b'\n']);
        rx.enqueue_read(&[0xa0 + i, b'\n']);
    }

    let sink = MemorySink::new();
    let controller = Controller::new(
        fast_session(),
        Arc::new(bridge.connector.clone()),
        Arc::new(sink.clone()),
    );
    let (stop, interrupt) = oneshot::channel::<()>();
    let session = tokio::spawn(controller.run_until(async {
        let _ = interrupt.await;
    }));

    assert!(wait_until_async(Duration::from_secs(5), || sink.len() == 40).await);
    stop.send(()).unwrap();
    session.await.unwrap().unwrap();

    let expected_tx: Vec<String> = (0..20u8)
        .map(|i| format!("tx: {:02x}\n", 0x30 + i))
        .collect();
    let expected_rx: Vec<String> = (0..20u8)
        .map(|i| format!("rx: {:02x}\n", 0xa0 + i))
        .collect();
    assert_eq!(lines_for(&sink, "tx"), expected_tx);
    assert_eq!(lines_for(&sink, "rx"), expected_rx);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn interrupt_while_both_ports_missing() {
    let connector = MockConnector::new();
    let mut config = fast_session();
    config.backoff = Duration::from_secs(30);

    let controller = Controller::new(
        config,
        Arc::new(connector.clone()),
        Arc::new(MemorySink::new()),
    );
    let (stop, interrupt) = oneshot::channel::<()>();
    let session = tokio::spawn(controller.run_until(async {
        let _ = interrupt.await;
    }));

    assert!(
        wait_until_async(Duration::from_secs(5), || {
            connector.attempts(TX_PORT) >= 1 && connector.attempts(RX_PORT) >= 1
        })
        .await
    );

    let interrupted_at = Instant::now();
    stop.send(()).unwrap();
    let summary = session.await.unwrap().unwrap();

    // Cancellation wakes the backoff sleep, so this is far under one interval.
    assert!(interrupted_at.elapsed() < Duration::from_secs(5));
    assert!(summary.interrupted);
    assert_eq!(summary.tx.frames + summary.rx.frames, 0);
    assert!(summary.tx.connect_failures >= 1);
    assert!(summary.rx.connect_failures >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn colored_lines_use_role_colors() {
    let bridge = MockBridge::new();
    let mut tx = bridge.tx.clone();
    let mut rx = bridge.rx.clone();
    tx.enqueue_read(b"\x01\n");
    rx.enqueue_read(b"\x02\n");

    let mut config = fast_session();
    config.tx_color = Some(serial_sniff::Color::Green);
    config.rx_color = Some(serial_sniff::Color::Yellow);

    let sink = MemorySink::new();
    let controller = Controller::new(
        config,
        Arc::new(bridge.connector.clone()),
        Arc::new(sink.clone()),
    );
    let (stop, interrupt) = oneshot::channel::<()>();
    let session = tokio::spawn(controller.run_until(async {
        let _ = interrupt.await;
    }));

    assert!(wait_until_async(Duration::from_secs(5), || sink.len() == 2).await);
    stop.send(()).unwrap();
    session.await.unwrap().unwrap();

    let mut lines = sink.lines();
    lines.sort();
    assert_eq!(
        lines,
        vec![
            "\x1b[32mtx: 01\x1b[0m\n".to_string(),
            "\x1b[33mrx: 02\x1b[0m\n".to_string(),
        ]
    );
}
