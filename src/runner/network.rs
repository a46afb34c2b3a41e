//! LAN address detection for the TestCafe proxy hostname

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Address used only to pick the outbound interface; nothing is sent
const PROBE_ADDR: &str = "8.8.8.8:80";

/// Best-effort LAN IPv4 address of this machine
///
/// Falls back to loopback when no route is available.
pub fn local_ipv4() -> IpAddr {
    match probe() {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => loopback(),
        Err(e) => {
            tracing::debug!("Could not detect LAN address, using loopback: {}", e);
            loopback()
        }
    }
}

fn probe() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(PROBE_ADDR)?;
    Ok(socket.local_addr()?.ip())
}

fn loopback() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ipv4_is_usable() {
        let ip = local_ipv4();
        assert!(ip.is_ipv4());
        assert!(!ip.is_unspecified());
    }
}
