//! Integration tests for the connectivity monitor.

mod common;

use std::net::Ipv4Addr;

use common::{MockBroker, MockLink, context, topic};
use embassy_futures::block_on;
use power_stand::infrastructure::tasks::{ConnectivityMonitor, LinkState};
use power_stand::infrastructure::types::SharedBroker;

const ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 20);

// -----------------------------------------------------------------------------
// Link edges
// -----------------------------------------------------------------------------

#[test]
fn disconnected_link_does_nothing() {
    let context = context();
    let link = MockLink::new();
    let broker = SharedBroker::new(MockBroker::new());
    let mut monitor = ConnectivityMonitor::new(&context, &link, &broker);

    block_on(monitor.tick());

    assert_eq!(monitor.state(), LinkState::Disconnected);
    assert_eq!(block_on(broker.lock()).connects, 0);
    assert_eq!(context.status.lines().network.as_str(), "Disconnected");
    assert!(!context.is_session_up());
}

#[test]
fn connect_edge_opens_session_and_announces() {
    let context = context();
    let link = MockLink::new();
    let broker = SharedBroker::new(MockBroker::new());
    let mut monitor = ConnectivityMonitor::new(&context, &link, &broker);

    link.connect(ADDRESS);
    block_on(monitor.tick());

    assert_eq!(monitor.state(), LinkState::Connected);
    assert!(context.is_session_up());
    assert!(context.clock.is_synced());
    assert_eq!(context.status.lines().network.as_str(), "192.168.1.20");

    let broker = block_on(broker.lock());
    assert_eq!(broker.connects, 1);
    assert_eq!(broker.subscriptions.len(), 10);
    assert!(broker.subscriptions.contains(&topic("/set")));
    assert!(broker.subscriptions.contains(&topic("/effectstatus")));
    assert!(!broker.subscriptions.contains(&topic("/config")));

    let announcements = broker.published_on(&topic("/config"));
    assert_eq!(announcements.len(), 1);
    assert!(announcements[0].retain);
}

#[test]
fn staying_connected_does_not_resubscribe() {
    let context = context();
    let link = MockLink::new();
    let broker = SharedBroker::new(MockBroker::new());
    let mut monitor = ConnectivityMonitor::new(&context, &link, &broker);

    link.connect(ADDRESS);
    block_on(monitor.tick());
    block_on(monitor.tick());
    block_on(monitor.tick());

    let broker = block_on(broker.lock());
    assert_eq!(broker.connects, 1);
    assert_eq!(broker.subscriptions.len(), 10);
    assert_eq!(broker.published_on(&topic("/config")).len(), 1);
    assert_eq!(link.clock_syncs.get(), 1);
}

#[test]
fn reconnect_announces_again() {
    let context = context();
    let link = MockLink::new();
    let broker = SharedBroker::new(MockBroker::new());
    let mut monitor = ConnectivityMonitor::new(&context, &link, &broker);

    link.connect(ADDRESS);
    block_on(monitor.tick());

    link.disconnect();
    block_on(monitor.tick());
    assert_eq!(monitor.state(), LinkState::Disconnected);
    assert!(!context.is_session_up());
    assert_eq!(context.status.lines().network.as_str(), "Disconnected");

    link.connect(ADDRESS);
    block_on(monitor.tick());

    assert!(context.is_session_up());
    let broker = block_on(broker.lock());
    assert_eq!(broker.connects, 2);
    assert_eq!(broker.subscriptions.len(), 20);
    assert_eq!(broker.published_on(&topic("/config")).len(), 2);
    assert_eq!(link.clock_syncs.get(), 2);
}

// -----------------------------------------------------------------------------
// Failures
// -----------------------------------------------------------------------------

#[test]
fn clock_failure_still_opens_session() {
    let context = context();
    let link = MockLink::new();
    link.time.set(None);
    let broker = SharedBroker::new(MockBroker::new());
    let mut monitor = ConnectivityMonitor::new(&context, &link, &broker);

    link.connect(ADDRESS);
    block_on(monitor.tick());

    assert!(!context.clock.is_synced());
    assert!(context.is_session_up());
}

#[test]
fn failed_session_is_retried_after_backoff() {
    let context = context();
    let link = MockLink::new();
    let broker = SharedBroker::new(MockBroker::new());
    block_on(broker.lock()).fail_connect = true;
    let mut monitor = ConnectivityMonitor::new(&context, &link, &broker);

    link.connect(ADDRESS);
    block_on(monitor.tick());
    assert!(!context.is_session_up());
    assert_eq!(monitor.state(), LinkState::Connected);

    block_on(broker.lock()).fail_connect = false;
    for _ in 0..4 {
        block_on(monitor.tick());
        assert!(!context.is_session_up());
    }

    block_on(monitor.tick());
    assert!(context.is_session_up());
    assert_eq!(block_on(broker.lock()).connects, 1);
}

#[test]
fn session_dropped_by_poll_error_is_reopened() {
    let context = context();
    let link = MockLink::new();
    let broker = SharedBroker::new(MockBroker::new());
    let mut monitor = ConnectivityMonitor::new(&context, &link, &broker);

    link.connect(ADDRESS);
    block_on(monitor.tick());
    context.set_session_up(false);

    block_on(monitor.tick());

    assert!(context.is_session_up());
    assert_eq!(block_on(broker.lock()).connects, 2);
}
