use anyhow::{Context, Result};
use clap::Parser;
use fauxap::capture::pcap_source::PcapIo;
use fauxap::channel::{
    find_monitor_interface, is_monitor_mode, list_wireless_interfaces, set_channel,
    set_monitor_mode,
};
use fauxap::config::{ApConfig, Cli, Commands};
use fauxap::dispatch::Dispatcher;
use fauxap::engine::Engine;
use log::{error, info, warn, LevelFilter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_secs()
        .init();

    if matches!(cli.command, Some(Commands::Scan)) {
        return handle_scan();
    }

    let config = ApConfig::from_cli(&cli).context("invalid configuration")?;

    info!(
        "starting fake AP: ssid={} bssid={} channel={} iface={}",
        fauxap::util::ssid_string(&config.ssid),
        fauxap::util::mac_string(&config.bssid),
        config.channel,
        config.iface
    );

    if cli.set_monitor {
        set_monitor_mode(&config.iface).context("failed to set monitor mode")?;
    } else if !is_monitor_mode(&config.iface).unwrap_or(false) {
        warn!(
            "{} does not appear to be in monitor mode; pass --set-monitor to enable it",
            config.iface
        );
    }

    set_channel(&config.iface, config.channel).context("failed to set channel")?;

    let io = PcapIo::open(&config.iface).context("failed to open capture/injection handle")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nreceived interrupt, shutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to install signal handler")?;

    let dispatcher = Dispatcher::new(config.bssid, config.ssid.clone(), config.channel);
    let mut engine = Engine::new(io, dispatcher, config.beacon_enabled);

    if let Err(e) = engine.run(running) {
        error!("engine stopped with error: {e}");
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

fn handle_scan() -> Result<()> {
    let interfaces = list_wireless_interfaces()?;

    if interfaces.is_empty() {
        println!("No wireless interfaces found.");
        return Ok(());
    }

    for (iface, mode) in &interfaces {
        if mode == "monitor" {
            println!("\x1b[32m[MONITOR]\x1b[0m {}", iface);
        } else {
            println!("\x1b[33m[{}]\x1b[0m {}", mode, iface);
        }
    }

    if let Ok(Some(iface)) = find_monitor_interface() {
        println!("\nMonitor interface found: {}", iface);
        println!("Start with:");
        println!("  sudo fauxap -i {} <ssid>", iface);
    } else {
        println!("\nNo monitor mode interfaces found.");
        println!("Enable one with:");
        println!("  sudo ip link set <iface> down");
        println!("  sudo iw dev <iface> set type monitor");
        println!("  sudo ip link set <iface> up");
    }

    Ok(())
}
