//! Bind address selection.

use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use crate::config::AUTO_HOST;
use crate::{LanshareError, Result};

/// Remote address used to pick the outbound interface. Nothing is sent to it.
const PROBE_ADDR: &str = "8.8.8.8:80";

/// Detect the address of the interface used for outbound traffic.
///
/// Falls back to the loopback address when there is no route.
pub fn detect_local_ip() -> IpAddr {
    match probe_local_ip(PROBE_ADDR) {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Err(e) => {
            tracing::warn!(error = %e, "Could not detect local IP, using loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn probe_local_ip(target: &str) -> io::Result<IpAddr> {
    // Connecting a UDP socket only selects a route; no packet leaves the host.
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(target)?;
    Ok(socket.local_addr()?.ip())
}

/// Turn the configured host into an address to bind.
pub fn resolve_host(host: &str) -> Result<IpAddr> {
    if host.eq_ignore_ascii_case(AUTO_HOST) {
        return Ok(detect_local_ip());
    }

    host.parse()
        .map_err(|_| LanshareError::Config(format!("invalid host address: {host}")))
}
