//! Interface and channel control: shelling out to `iw`/`ip`, the same way
//! a wireless tool operating a monitor-mode NIC always has to.

use anyhow::{Context, Result};
use log::{info, warn};
use std::process::Command;

/// Tune the radio to `channel` once at startup. Unlike a scanning tool,
/// this system never hops: the configured channel is fixed for the whole
/// run.
pub fn set_channel(interface: &str, channel: u8) -> Result<()> {
    let output = Command::new("iw")
        .args(["dev", interface, "set", "channel", &channel.to_string()])
        .output()
        .context("failed to execute iw command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("iw command failed: {}", stderr);
    }

    info!("{} tuned to channel {}", interface, channel);
    Ok(())
}

/// Put `interface` into monitor mode: down, retype, up.
pub fn set_monitor_mode(interface: &str) -> Result<()> {
    info!("setting {} to monitor mode", interface);

    let output = Command::new("ip")
        .args(["link", "set", interface, "down"])
        .output()
        .context("failed to bring interface down")?;
    if !output.status.success() {
        warn!("failed to bring interface down: {:?}", output.stderr);
    }

    let output = Command::new("iw")
        .args(["dev", interface, "set", "type", "monitor"])
        .output()
        .context("failed to set monitor mode")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("failed to set monitor mode: {}", stderr);
    }

    let output = Command::new("ip")
        .args(["link", "set", interface, "up"])
        .output()
        .context("failed to bring interface up")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("failed to bring interface up: {}", stderr);
    }

    info!("{} is now in monitor mode", interface);
    Ok(())
}

pub fn is_monitor_mode(interface: &str) -> Result<bool> {
    let output = Command::new("iw")
        .args(["dev", interface, "info"])
        .output()
        .context("failed to get interface info")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.contains("type monitor"))
}

pub fn find_monitor_interface() -> Result<Option<String>> {
    let output = Command::new("iw")
        .args(["dev"])
        .output()
        .context("failed to list wireless devices")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut current_interface: Option<String> = None;

    for line in stdout.lines() {
        let line = line.trim();
        if line.starts_with("Interface ") {
            current_interface = Some(line.strip_prefix("Interface ").unwrap_or("").to_string());
        } else if line.starts_with("type ") && line.contains("monitor") {
            if let Some(iface) = current_interface.take() {
                return Ok(Some(iface));
            }
        }
    }

    Ok(None)
}

pub fn list_wireless_interfaces() -> Result<Vec<(String, String)>> {
    let output = Command::new("iw")
        .args(["dev"])
        .output()
        .context("failed to list wireless devices")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut interfaces = Vec::new();
    let mut current_interface: Option<String> = None;
    let mut current_type = String::from("unknown");

    for line in stdout.lines() {
        let line = line.trim();
        if line.starts_with("Interface ") {
            if let Some(iface) = current_interface.take() {
                interfaces.push((iface, current_type.clone()));
            }
            current_interface = Some(line.strip_prefix("Interface ").unwrap_or("").to_string());
            current_type = String::from("unknown");
        } else if line.starts_with("type ") {
            current_type = line.strip_prefix("type ").unwrap_or("unknown").to_string();
        }
    }

    if let Some(iface) = current_interface {
        interfaces.push((iface, current_type));
    }

    Ok(interfaces)
}

/// Read the hardware address of `interface` via `ip link show`, used to
/// derive a default BSSID when none is configured.
pub fn interface_hw_address(interface: &str) -> Result<crate::util::Mac> {
    let output = Command::new("ip")
        .args(["link", "show", interface])
        .output()
        .context("failed to run ip link show")?;

    if !output.status.success() {
        anyhow::bail!("ip link show {} failed", interface);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("link/ether ") {
            let addr = rest.split_whitespace().next().unwrap_or("");
            return parse_mac(addr)
                .with_context(|| format!("could not parse hardware address {addr}"));
        }
    }

    anyhow::bail!("no link/ether address found for {}", interface)
}

fn parse_mac(s: &str) -> Result<crate::util::Mac> {
    let mut mac = [0u8; 6];
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 6 {
        anyhow::bail!("malformed MAC address: {}", s);
    }
    for (i, part) in parts.iter().enumerate() {
        mac[i] = u8::from_str_radix(part, 16).with_context(|| format!("bad octet {}", part))?;
    }
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_separated_mac() {
        let mac = parse_mac("02:aa:bb:cc:dd:ee").unwrap();
        assert_eq!(mac, [0x02, 0xaa, 0xbb, 0xcc, 0xdd, 0xee]);
    }

    #[test]
    fn rejects_wrong_octet_count() {
        assert!(parse_mac("02:aa:bb").is_err());
    }
}
