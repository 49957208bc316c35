//! rgbw-link - talk to an RGBW lighting controller over its WebSocket
//!
//! Usage:
//!   rgbw-link monitor               Print every message the device sends
//!   rgbw-link color 255 0 128 0     Set the output channels
//!   rgbw-link heap                  Ask for the free heap and print it
//!   rgbw-link endpoints             List REST paths and BLE UUIDs

use anyhow::{bail, Context, Result};
use clap::Parser;
use rgbw_link::ble::Characteristic;
use rgbw_link::cli::{Cli, Command};
use rgbw_link::config::Config;
use rgbw_link::constants::{CHANNEL_CAPACITY, OPEN_TIMEOUT_SECS, SEND_FLUSH_DELAY_MS};
use rgbw_link::error::LinkError;
use rgbw_link::logging;
use rgbw_link::model::HttpCredentials;
use rgbw_link::protocol::{DeviceMessage, MessageType};
use rgbw_link::rest::{ota_upload_path, RestRequest};
use rgbw_link::transport::{HandlerRegistry, Session, SessionHandle};
use std::time::Duration;
use tokio::sync::mpsc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(host) = &cli.host {
        config.device.host = host.clone();
        config.validate()?;
    }

    logging::init_tracing(cli.verbose || config.logs.verbose);

    if cli.command == Command::Endpoints {
        print_endpoints(&config);
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new().map_err(|e| LinkError::Runtime { source: e })?;
    rt.block_on(run(cli.command, config))
}

async fn run(command: Command, config: Config) -> Result<()> {
    let url = config.ws_url();

    // Every inbound message is decoded once and forwarded here
    let (msg_tx, mut msg_rx) = mpsc::channel::<DeviceMessage>(CHANNEL_CAPACITY);
    let registry = HandlerRegistry::forwarding(msg_tx);

    let session = Session::spawn(url.clone(), registry, config.reconnect.policy());

    let outcome = match command {
        Command::Monitor => monitor(&session, &mut msg_rx).await,
        command => one_shot(&session, &command, &mut msg_rx, &url).await,
    };

    session.shutdown().await;
    outcome
}

/// Print messages and state changes until Ctrl-C
async fn monitor(session: &SessionHandle, msg_rx: &mut mpsc::Receiver<DeviceMessage>) -> Result<()> {
    let mut state_rx = session.subscribe();
    eprintln!("Session {} (Ctrl-C to quit)", *state_rx.borrow_and_update());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                eprintln!("Session {}", *state_rx.borrow_and_update());
            }

            msg = msg_rx.recv() => match msg {
                Some(message) => println!("{}", describe(&message)),
                None => break,
            },
        }
    }

    let stats = session.stats();
    eprintln!(
        "rx {} bytes, tx {} bytes, {} dropped frames, {} reconnects",
        stats.rx_bytes, stats.tx_bytes, stats.dropped_frames, stats.reconnects
    );
    Ok(())
}

/// Connect, send one command, and print the reply if it has one
async fn one_shot(
    session: &SessionHandle,
    command: &Command,
    msg_rx: &mut mpsc::Receiver<DeviceMessage>,
    url: &str,
) -> Result<()> {
    let timeout = Duration::from_secs(OPEN_TIMEOUT_SECS);
    session
        .wait_until_open(timeout)
        .await
        .with_context(|| format!("Cannot reach {}", url))?;

    let (sent, reply) = match command {
        Command::Color { r, g, b, w } => (session.send_color([*r, *g, *b, *w]), None),
        Command::DeviceName { name } => (session.send_device_name(name)?, None),
        Command::HttpCredentials { username, password } => (
            session.send_http_credentials(&HttpCredentials {
                username: username.clone(),
                password: password.clone(),
            })?,
            None,
        ),
        Command::WifiConnect(args) => (session.send_wifi_connection_details(&args.details()?)?, None),
        Command::Alexa(args) => (session.send_alexa_settings(&args.settings()?)?, None),
        Command::Ble { state } => (session.send_ble_status(state.ble_status())?, None),
        Command::Scan => (session.request_wifi_scan(), Some(MessageType::WiFiScanStatus)),
        Command::Heap => (session.request_heap(), Some(MessageType::Heap)),
        Command::OtaProgress => (session.request_ota_progress(), Some(MessageType::OtaProgress)),
        Command::Monitor | Command::Endpoints => return Ok(()),
    };

    if !sent {
        bail!("Connection to {} closed before the command was sent", url);
    }

    match reply {
        Some(expected) => {
            let message = tokio::time::timeout(timeout, async {
                while let Some(message) = msg_rx.recv().await {
                    if message.message_type() == expected {
                        return Some(message);
                    }
                }
                None
            })
            .await;
            match message {
                Ok(Some(message)) => println!("{}", describe(&message)),
                _ => bail!("No {} reply from {}", expected, url),
            }
        }
        // No acknowledgement exists; give the socket time to flush
        None => tokio::time::sleep(Duration::from_millis(SEND_FLUSH_DELAY_MS)).await,
    }

    Ok(())
}

fn describe(message: &DeviceMessage) -> String {
    let body = match message {
        DeviceMessage::Color(color) => color
            .channels
            .iter()
            .zip(["r", "g", "b", "w"])
            .map(|(state, name)| {
                format!("{}={}{}", name, state.value, if state.on { "" } else { " (off)" })
            })
            .collect::<Vec<_>>()
            .join(" "),
        DeviceMessage::HttpCredentials(creds) => format!("user={}", creds.username),
        DeviceMessage::DeviceName(name) => name.name.clone(),
        DeviceMessage::Heap(heap) => format!("{} bytes free", heap.free_heap),
        DeviceMessage::BleStatus(status) => format!("{:?}", status),
        DeviceMessage::WiFiStatus(status) => format!("{:?}", status),
        DeviceMessage::WiFiScanStatus(status) => format!("{:?}", status),
        DeviceMessage::WiFiDetails(details) => format!(
            "ssid={} mac={} ip={} gw={} mask={} dns={}",
            details.ssid,
            details.mac,
            details.ip_addr(),
            details.gateway_addr(),
            details.subnet_mask(),
            details.dns_addr()
        ),
        DeviceMessage::OtaProgress(state) => state.to_string(),
        DeviceMessage::AlexaSettings(settings) => format!(
            "{:?} [{}]",
            settings.integration_mode,
            settings.device_names().join(", ")
        ),
    };
    format!("{:<16} {}", message.message_type().name(), body)
}

fn print_endpoints(config: &Config) {
    let host = config.device.host.as_str();
    println!("WebSocket  {}", config.ws_url());
    for request in [
        RestRequest::State,
        RestRequest::Color([255, 255, 255, 255]),
        RestRequest::Bluetooth { enabled: true },
        RestRequest::Restart,
        RestRequest::Reset,
    ] {
        println!("REST       {}", request.url(host));
    }
    println!(
        "OTA        POST http://{}{}",
        host,
        ota_upload_path("firmware", "<md5>")
    );
    for characteristic in Characteristic::ALL {
        println!(
            "BLE        {} {} {:?}",
            characteristic.service().uuid(),
            characteristic.uuid(),
            characteristic
        );
    }
}
