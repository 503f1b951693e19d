use std::net::{IpAddr, UdpSocket};

const PROBE_TARGET: &str = "8.8.8.8:80";

/// Discover the LAN address other devices can reach us on.
///
/// Connecting a UDP socket only selects a route; no packet is sent. Falls back
/// to `localhost` when there is no route (offline machine, sandbox).
pub fn local_ip() -> String {
    match detect_local_ip() {
        Some(ip) => ip.to_string(),
        None => {
            tracing::debug!("Could not determine LAN address, falling back to localhost");
            "localhost".to_string()
        }
    }
}

fn detect_local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(PROBE_TARGET).ok()?;
    let ip = socket.local_addr().ok()?.ip();

    if ip.is_unspecified() {
        None
    } else {
        Some(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_is_host_or_address() {
        let ip = local_ip();
        assert!(ip == "localhost" || ip.parse::<IpAddr>().is_ok());
    }
}
