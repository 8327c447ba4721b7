//! End-to-end exercises of the control-interface client against a fake
//! daemon bound to a real Unix datagram socket.

use std::time::Duration;

use fabricadm_core::clif::wire::COMMAND_WIRE_SIZE;
use fabricadm_core::{Action, ClifError, Command, DatagramTransport, Dispatcher, Session};
use fabricadm_test_utils::{tracing_setup, FakeBehavior, FakeDaemon, TestConfigBuilder};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn session_round_trip_with_live_daemon() {
    tracing_setup::init_test_tracing();
    let daemon = FakeDaemon::start(FakeBehavior::ReplyStatus(0));

    let session = Session::open(daemon.socket_path()).unwrap();
    let reply = session
        .exchange(&Command::new(Action::Create, "eth0"))
        .await
        .unwrap();
    session.close();

    assert_eq!(reply.status(), 0);

    // The daemon saw exactly one full fixed-size record.
    let received = daemon.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].len(), COMMAND_WIRE_SIZE);

    let decoded = daemon.received_commands().pop().flatten().unwrap();
    assert_eq!(decoded.action(), Action::Create);
    assert_eq!(decoded.ifname(), "eth0");
}

#[tokio::test]
async fn nonzero_daemon_status_comes_back_verbatim() {
    let daemon = FakeDaemon::start(FakeBehavior::ReplyStatus(17));

    let session = Session::open(daemon.socket_path()).unwrap();
    let reply = session
        .exchange(&Command::new(Action::Destroy, "eth1"))
        .await
        .unwrap();
    session.close();

    assert_eq!(reply.status(), 17);
}

#[tokio::test]
async fn garbage_reply_reduces_to_zero() {
    let daemon = FakeDaemon::start(FakeBehavior::ReplyRaw(b"  \t nonsense".to_vec()));

    let session = Session::open(daemon.socket_path()).unwrap();
    let reply = session
        .exchange(&Command::new(Action::Reset, "eth0"))
        .await
        .unwrap();
    session.close();

    assert_eq!(reply.status(), 0);
}

#[tokio::test]
async fn silent_daemon_yields_timeout_not_generic_failure() {
    let daemon = FakeDaemon::start(FakeBehavior::Silent);

    let session = Session::open(daemon.socket_path()).unwrap();
    let err = session
        .exchange_deadline(
            &Command::new(Action::Reset, "eth0"),
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
    session.close();

    assert!(matches!(err, ClifError::TimedOut));
}

#[tokio::test]
async fn dispatcher_end_to_end_over_datagram_transport() {
    tracing_setup::init_test_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let daemon = FakeDaemon::start(FakeBehavior::ReplyStatus(0));

    let config = TestConfigBuilder::new()
        .rooted_at(tmp.path())
        .provision_interface("eth0")
        .socket_path(daemon.socket_path())
        .build();

    let transport = DatagramTransport::new(&config.daemon.socket_path);
    let dispatcher = Dispatcher::new(&config, &transport);

    assert_eq!(dispatcher.create("eth0").await, 0);
    assert_eq!(daemon.received().len(), 1);

    // A failing pre-flight check must not produce another datagram.
    assert_eq!(dispatcher.create("eth3").await, fabricadm_core::STATUS_INVALID);
    assert_eq!(daemon.received().len(), 1);
}

#[tokio::test]
async fn concurrent_invocations_use_distinct_client_sockets() {
    let daemon = FakeDaemon::start(FakeBehavior::ReplyStatus(0));

    let a = Session::open(daemon.socket_path()).unwrap();
    let b = Session::open(daemon.socket_path()).unwrap();
    assert_ne!(a.local_path(), b.local_path());

    let ra = a.exchange(&Command::new(Action::Create, "eth0")).await.unwrap();
    let rb = b.exchange(&Command::new(Action::Create, "eth1")).await.unwrap();
    assert_eq!(ra.status(), 0);
    assert_eq!(rb.status(), 0);

    a.close();
    b.close();
}
