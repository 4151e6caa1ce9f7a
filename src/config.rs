//! CLI grammar and the resolved, immutable-after-startup access-point
//! configuration it produces.

use crate::channel::interface_hw_address;
use crate::util::Mac;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use macaddr::MacAddr6;

#[derive(Parser)]
#[command(name = "fauxap")]
#[command(author = "spikehead")]
#[command(version = "0.1.0")]
#[command(about = "Single-threaded software emulation of an 802.11 access point")]
pub struct Cli {
    /// Network name to advertise (1-32 bytes)
    pub ssid: String,

    /// Monitor-mode interface to bind to
    #[arg(short = 'i', long, default_value = "mon0")]
    pub iface: String,

    /// Channel to tune to at startup
    #[arg(short = 'c', long, default_value_t = 6)]
    pub channel: u8,

    /// BSSID to use (defaults to the interface's hardware address)
    #[arg(short = 'm', long)]
    pub bssid: Option<MacAddr6>,

    /// Emit a beacon every 500ms
    #[arg(short = 'b', long)]
    pub beacon: bool,

    /// Put the interface into monitor mode before tuning it, instead of
    /// assuming it already is one
    #[arg(long)]
    pub set_monitor: bool,

    /// Verbose (debug-level) logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List wireless interfaces and their modes instead of running the AP
    Scan,
}

/// The resolved, validated configuration an `Engine` is built from.
#[derive(Debug, Clone)]
pub struct ApConfig {
    pub ssid: Vec<u8>,
    pub bssid: Mac,
    pub channel: u8,
    pub beacon_enabled: bool,
    pub iface: String,
}

impl ApConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.ssid.is_empty() || cli.ssid.len() > 32 {
            anyhow::bail!("ssid must be 1..=32 bytes, got {}", cli.ssid.len());
        }
        if !(1..=12).contains(&cli.channel) {
            anyhow::bail!("channel must be in [1, 12], got {}", cli.channel);
        }

        let bssid = match cli.bssid {
            Some(mac) => {
                let bytes = mac.as_bytes();
                let mut arr = [0u8; 6];
                arr.copy_from_slice(bytes);
                arr
            }
            None => interface_hw_address(&cli.iface)
                .with_context(|| format!("no --bssid given and could not read {}'s hardware address", cli.iface))?,
        };

        Ok(ApConfig {
            ssid: cli.ssid.clone().into_bytes(),
            bssid,
            channel: cli.channel,
            beacon_enabled: cli.beacon,
            iface: cli.iface.clone(),
        })
    }
}
