use std::sync::mpsc;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use sf6_csv::{CsvSink, CsvSinkConfig, HEADER};
use sf6_mqtt::{BrokerConfig, ChannelCallbacks, ConnectionState, MqttCallbacks as _};
use sf6_mqtt_ui::{MonitorState, MqttConnection};
use testresult::TestResult;

#[test]
fn payloads_flow_into_state_and_csv() -> TestResult {
    let dir = tempfile::tempdir()?;
    let sink = CsvSink::new(dir.path(), "zone1", "sensor1");
    let (tx, rx) = mpsc::channel();
    let mut callbacks = ChannelCallbacks::new(tx, Some(sink.clone()));

    for payload in [&b"5.2"[..], b"abc", b" 6.1\n", b"", b"NaN"] {
        callbacks.on_message("sf6/pressure", payload)?;
    }

    let mut state = MonitorState::default();
    for msg in rx.try_iter() {
        state.apply(msg);
    }

    assert_eq!(state.latest_value(), 6.1);
    let values: Vec<f64> = state.history().iter().map(|p| p.y).collect();
    assert_eq!(values, vec![5.2, 6.1]);

    let log: Vec<&str> = state.log_buffer().tail(100).collect();
    assert_eq!(log.len(), 5);
    assert!(log[0].ends_with("Message received: 5.2"));
    assert!(log[1].contains("Error parsing message: "));
    assert!(log[2].ends_with("Message received: 6.1"));
    assert!(log[3].contains("Error parsing message: "));
    assert!(log[4].contains("Error parsing message: "));

    let files: Vec<_> = std::fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
    assert_eq!(files.len(), 1);
    let contents = std::fs::read_to_string(files[0].path())?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].ends_with(",5.2"));
    assert!(lines[2].ends_with(",6.1"));
    Ok(())
}

#[test]
fn workers_spawned_never_exceeds_connect_presses() {
    let reachable_config = BrokerConfig {
        broker: "127.0.0.1".to_owned(),
        port: 1,
        use_tls: false,
        ..Default::default()
    };
    let invalid_config = BrokerConfig {
        topic: String::new(),
        ..reachable_config.clone()
    };
    let csv = CsvSinkConfig::default();
    let mut connection = MqttConnection::default();

    let presses = [&reachable_config, &invalid_config, &reachable_config];
    for cfg in presses {
        connection.connect(cfg, &csv);
    }
    assert_eq!(connection.workers_spawned(), 2);
    assert!(connection.workers_spawned() <= presses.len());

    // Nothing listens on port 1, the last listener should give up on its own
    let deadline = Instant::now() + Duration::from_secs(10);
    while connection.listener_active() && Instant::now() < deadline {
        connection.poll();
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(!connection.listener_active());
    assert_eq!(connection.state().connection(), ConnectionState::Failed);

    let log = connection.state().log_buffer().tail_text(100);
    assert_eq!(log.matches("MQTT thread started").count(), 2);
    assert_eq!(log.matches("Invalid configuration: Topic is empty").count(), 1);
    assert!(log.contains("Connection error: "));
}
