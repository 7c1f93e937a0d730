use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use teleop_core::{
    CmdVelPublisher, CommandPublisher, ControlSession, GestureHub, PoseMonitor, RosbridgeClient,
    SignalPanel, SpeedControl, TracingPublisher,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod input;

use config::load_settings;
use controller::Panel;

const INPUT_QUEUE_CAPACITY: usize = 256;

#[derive(Parser, Debug)]
#[command(about = "Drive a robot over rosbridge from gesture input on stdin")]
struct Args {
    /// Config file; defaults to ./panel.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bridge_url: Option<String>,
    #[arg(long)]
    cmd_vel_topic: Option<String>,
    #[arg(long)]
    pose_topic: Option<String>,
    /// Initial speed limit.
    #[arg(long)]
    speed_limit: Option<f64>,
    /// Log commands instead of connecting to the bridge.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(v) = args.bridge_url {
        settings.bridge_url = v;
    }
    if let Some(v) = args.cmd_vel_topic {
        settings.cmd_vel_topic = v;
    }
    if let Some(v) = args.pose_topic {
        settings.pose_topic = v;
    }
    if let Some(v) = args.speed_limit {
        settings.speed_initial = v;
    }

    let speed = SpeedControl::new(settings.speed_bounds(), settings.speed_initial)
        .context("invalid speed limit configuration")?;

    let (input_tx, input_rx) = crossbeam_channel::bounded(INPUT_QUEUE_CAPACITY);
    input::spawn_stdin_reader(input_tx);

    if args.dry_run {
        info!("dry run: commands are logged, not sent");
        let publisher: Arc<dyn CommandPublisher> = Arc::new(TracingPublisher);
        let session = ControlSession::new(GestureHub::new(), speed, publisher);
        let panel = Panel::new(session, None, None);
        tokio::task::spawn_blocking(move || controller::run(panel, input_rx)).await?;
        return Ok(());
    }

    let client = RosbridgeClient::connect(&settings.bridge_url)
        .await
        .with_context(|| format!("failed to connect to bridge: {}", settings.bridge_url))?;
    let cmd_vel = CmdVelPublisher::advertise(&client, &settings.cmd_vel_topic)?;
    let signals = SignalPanel::new(&client)?;
    let pose = PoseMonitor::spawn(&client, &settings.pose_topic).await?;
    info!(
        endpoint = %client.endpoint(),
        topic = cmd_vel.topic(),
        speed_limit = speed.current(),
        "velocity commands enabled"
    );

    let session = ControlSession::new(GestureHub::new(), speed, Arc::new(cmd_vel));
    let panel = Panel::new(session, Some(signals), Some(pose));
    tokio::task::spawn_blocking(move || controller::run(panel, input_rx)).await?;

    client.close().await;
    Ok(())
}
