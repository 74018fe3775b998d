//! Joypad monitor
//!
//! Small polling frontend that prints live button state for one joystick
//! and demonstrates the driver's background reconnection. Hold the first
//! and fourth buttons together to exit.

mod config;

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use joypad_hal::Gamepad;
use tracing::{info, warn};

use config::MonitorConfig;

fn main() -> Result<()> {
    setup_logging();

    let config = MonitorConfig::load_default().context("failed to load configuration")?;
    let mut pad = select_gamepad(&config)?;
    info!("watching {}", pad.path().display());

    let interval = Duration::from_millis(config.poll_interval_ms);
    let mut connected = !pad.has_error();
    if !connected {
        warn!(
            "{} not reachable yet ({:?})",
            pad.path().display(),
            pad.status()
        );
    }

    loop {
        pad.refresh();

        if connected && pad.has_error() {
            warn!("device lost ({:?}), waiting for it to return", pad.status());
        } else if !connected && !pad.has_error() {
            info!("device back, resuming live state");
        }
        connected = !pad.has_error();

        if connected {
            render(&pad, &config.button_labels)?;
            // exit combo, matching the two outermost face buttons
            if pad.button(0) != 0 && pad.button(3) != 0 {
                break;
            }
        }

        thread::sleep(interval);
    }

    println!();
    info!("exit combo pressed, shutting down");
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

/// Pick the device from the first CLI argument (a digit selects a joystick
/// index, anything else is a device path), falling back to the
/// configuration file.
fn select_gamepad(config: &MonitorConfig) -> Result<Gamepad> {
    if let Some(arg) = std::env::args().nth(1) {
        return match arg.parse::<u8>() {
            Ok(index) => Gamepad::from_index(index).context("invalid joystick index"),
            Err(_) => Ok(Gamepad::from_path(arg)),
        };
    }

    if let Some(path) = &config.device_path {
        return Ok(Gamepad::from_path(path));
    }

    Gamepad::from_index(config.device_index).context("invalid joystick index in configuration")
}

fn render(pad: &Gamepad, labels: &[String]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r")?;
    for (i, label) in labels.iter().enumerate() {
        write!(stdout, "{label}: {} | ", pad.button(i as i32))?;
    }
    stdout.flush()?;
    Ok(())
}
