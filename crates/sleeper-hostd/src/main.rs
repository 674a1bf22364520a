use std::{env, fs, sync::Arc};

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::Notify,
};
use tracing::{info, warn};

use sleeper_core::{TimerConfig, TimerPlugin, TimerState, expiry_fn};
use sleeper_observe::{LoggerConfig, init_logger};

mod input;
use input::HostInput;

/// Path to an optional JSON `TimerConfig`.
const ENV_CONFIG: &str = "SLEEPER_CONFIG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1) logger
    let log_cfg = LoggerConfig::default().with_env()?;
    init_logger(&log_cfg)?;

    // 2) timer config
    let timer_cfg = load_timer_config()?;
    info!(minute_ms = timer_cfg.minute_ms, presets = ?timer_cfg.presets, "timer config loaded");

    // 3) expiry is marshalled back onto this loop instead of exiting from the worker thread
    let expired = Arc::new(Notify::new());
    let signal = Arc::clone(&expired);
    let mut plugin = TimerPlugin::new(timer_cfg, expiry_fn(move || signal.notify_one()));
    plugin.on_activate()?;

    // 4) event loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help(&plugin);
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    info!("end of input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<HostInput>() {
                    Ok(HostInput::Quit) => break,
                    Ok(input) => handle(&mut plugin, input)?,
                    Err(e) => warn!("{e}"),
                }
            }
            _ = expired.notified() => {
                info!("sleep timer expired, shutting down host");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    // 5) teardown: joining the worker blocks, keep it off the runtime thread
    let status = tokio::task::spawn_blocking(move || plugin.on_deactivate()).await??;
    info!(state = ?status.state, "host exited");
    Ok(())
}

fn handle(plugin: &mut TimerPlugin, input: HostInput) -> anyhow::Result<()> {
    match input {
        HostInput::Preset(preset) => {
            plugin.arm_preset(preset)?;
            info!(%preset, "timer started");
        }
        HostInput::Set(minutes) => {
            plugin.arm_or_default(minutes)?;
            info!(requested = minutes, "adjustable timer started");
        }
        HostInput::Cancel => {
            let cancelable = plugin.controller().is_some_and(|c| c.is_cancelable());
            if cancelable {
                plugin.cancel()?;
                info!("timer cancelled");
            } else {
                warn!("no timer to cancel");
            }
        }
        HostInput::Status => match plugin.status()?.state {
            TimerState::Armed { minutes, deadline } => {
                let left = deadline.saturating_duration_since(std::time::Instant::now());
                info!(%minutes, remaining_s = left.as_secs(), "timer armed");
            }
            state => info!(?state, "timer not armed"),
        },
        HostInput::Help => print_help(plugin),
        HostInput::Quit => {}
    }
    Ok(())
}

fn print_help(plugin: &TimerPlugin) {
    let presets: Vec<String> = plugin.presets().iter().map(ToString::to_string).collect();
    info!(
        "commands: {} | set <minutes> | cancel | status | quit",
        presets.join(" | ")
    );
}

fn load_timer_config() -> anyhow::Result<TimerConfig> {
    let Ok(path) = env::var(ENV_CONFIG) else {
        return Ok(TimerConfig::default());
    };
    let raw = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let cfg: TimerConfig =
        serde_json::from_str(&raw).with_context(|| format!("invalid timer config in {path}"))?;
    cfg.validate()?;
    Ok(cfg)
}
