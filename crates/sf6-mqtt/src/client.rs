use rumqttc::{
    Client, ConnectReturnCode, Connection, ConnectionError, Event, Packet, QoS, RecvError,
    RecvTimeoutError,
};
use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::broker_config::BrokerConfig;
use crate::callbacks::{DisconnectCause, MqttCallbacks};
use crate::message::{ConnectionState, LogLine};
use crate::util::timestamped_client_id;

const CLIENT_NAME: &str = "sf6-monitor";
const REQUEST_CAPACITY: usize = 100;
/// Upper bound on how long a stop request goes unnoticed while connected
const RECV_TIMEOUT: Duration = Duration::from_millis(250);

/// Wraps the MQTT event loop for a single connection attempt.
///
/// There is no automatic reconnect. Once the connection fails or is closed the loop ends
/// and the user has to press connect again.
pub(crate) struct MqttClient<C> {
    client: Client,
    connection: Connection,
    stop_flag: Arc<AtomicBool>,
    state: ConnectionState,
    topic: String,
    callbacks: C,
}

impl<C: MqttCallbacks> MqttClient<C> {
    fn connected(&mut self) -> anyhow::Result<()> {
        self.state = ConnectionState::Connected;
        self.callbacks.on_connect()?;
        self.callbacks.log(LogLine::info("Connected to broker!"))?;
        match self.client.subscribe(self.topic.clone(), QoS::AtMostOnce) {
            Ok(()) => self
                .callbacks
                .log(LogLine::info(format!("Subscribed to {}", self.topic))),
            Err(e) => self
                .callbacks
                .log(LogLine::error(format!("Subscribe error: {e}"))),
        }
    }

    fn finish(&mut self, cause: DisconnectCause) -> anyhow::Result<ControlFlow<()>> {
        self.state = cause.into();
        self.callbacks.on_disconnect(cause)?;
        Ok(ControlFlow::Break(()))
    }

    fn connection_error(&mut self, e: &ConnectionError) -> anyhow::Result<ControlFlow<()>> {
        let text = match e {
            ConnectionError::ConnectionRefused(code) => {
                format!("Connection failed with code {code:?}")
            }
            e => format!("Connection error: {e}"),
        };
        self.callbacks.log(LogLine::error(text))?;
        self.finish(DisconnectCause::Error)
    }

    /// Poll the event loop once, necessary to receive messages and to keep the connection alive.
    ///
    /// Until the ConnAck arrives the poll blocks. The whole connect handshake runs inside a single
    /// poll, and cutting it short drops the half-open connection and starts over on the next poll.
    /// rumqttc bounds the handshake with its own connection timeout.
    fn poll(&mut self) -> anyhow::Result<ControlFlow<()>> {
        let notification = if self.state.is_connected() {
            match self.connection.recv_timeout(RECV_TIMEOUT) {
                Ok(notification) => notification,
                Err(RecvTimeoutError::Timeout) => return Ok(ControlFlow::Continue(())),
                Err(RecvTimeoutError::Disconnected) => {
                    return self.finish(DisconnectCause::Broker);
                }
            }
        } else {
            match self.connection.recv() {
                Ok(notification) => notification,
                Err(RecvError) => return self.finish(DisconnectCause::Broker),
            }
        };

        match notification {
            Ok(Event::Incoming(packet)) => match packet {
                Packet::ConnAck(conn_ack) => match conn_ack.code {
                    ConnectReturnCode::Success => self.connected()?,
                    code => {
                        self.callbacks.log(LogLine::error(format!(
                            "Connection failed with code {code:?}"
                        )))?;
                        return self.finish(DisconnectCause::Error);
                    }
                },
                Packet::Publish(p) => self.callbacks.on_message(&p.topic, &p.payload)?,
                Packet::Disconnect => {
                    self.callbacks
                        .log(LogLine::warn("Broker closed the connection"))?;
                    return self.finish(DisconnectCause::Broker);
                }
                _ => (),
            },
            Ok(Event::Outgoing(_)) => (),
            Err(e) => return self.connection_error(&e),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn run(mut self) -> anyhow::Result<()> {
        while !self.stop_flag.load(Ordering::Relaxed) {
            if self.poll()?.is_break() {
                return Ok(());
            }
        }
        if self.state.is_connected()
            && let Err(e) = self.client.disconnect()
        {
            log::debug!("Disconnect request failed: {e}");
        }
        self.finish(DisconnectCause::Requested)?;
        Ok(())
    }
}

/// Run [`listen`], treating errors after a stop request as a normal exit.
///
/// The UI stops receiving as soon as it raises the stop flag, so the final messages of a
/// requested stop usually have nowhere to go.
fn run_listener<C: MqttCallbacks>(
    config: &BrokerConfig,
    stop_flag: Arc<AtomicBool>,
    callbacks: C,
) -> anyhow::Result<()> {
    let stop_requested = Arc::clone(&stop_flag);
    match listen(config, stop_flag, callbacks) {
        Err(e) if stop_requested.load(Ordering::Relaxed) => {
            log::debug!("MQTT listener stopped on request: {e}");
            Ok(())
        }
        res => res,
    }
}

/// Set up the client from `config` and run the event loop until it ends or `stop_flag` is raised.
///
/// Setup errors are reported through the callbacks, not returned.
fn listen<C: MqttCallbacks>(
    config: &BrokerConfig,
    stop_flag: Arc<AtomicBool>,
    mut callbacks: C,
) -> anyhow::Result<()> {
    if config.has_credentials() {
        callbacks.log(LogLine::info(format!(
            "Using username '{}'",
            config.username
        )))?;
    }
    let options = match config.mqtt_options(timestamped_client_id(CLIENT_NAME)) {
        Ok(options) => options,
        Err(e) => {
            callbacks.log(LogLine::error(format!("Connection error: {e}")))?;
            return callbacks.on_disconnect(DisconnectCause::Error);
        }
    };

    callbacks.log(LogLine::info(format!(
        "Attempting connect to {}",
        config.address()
    )))?;
    let (client, connection) = Client::new(options, REQUEST_CAPACITY);
    callbacks.log(LogLine::info("Waiting for broker response..."))?;

    MqttClient {
        client,
        connection,
        stop_flag,
        state: ConnectionState::Connecting,
        topic: config.topic().to_owned(),
        callbacks,
    }
    .run()
}

/// Spawn the listener thread for a single connection attempt
pub fn spawn_listener<C: MqttCallbacks + 'static>(
    config: BrokerConfig,
    stop_flag: Arc<AtomicBool>,
    callbacks: C,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("mqtt-listener".into())
        .spawn(move || {
            if let Err(e) = run_listener(&config, stop_flag, callbacks) {
                log::error!("{e}, shutting down MQTT listener...");
            }
        })
}
