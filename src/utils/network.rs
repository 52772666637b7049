use std::io;
use std::net::{IpAddr, UdpSocket};

/// Shown in the footer when no address can be found
pub const OFFLINE: &str = "offline";

/// Address of the interface that routes to `probe`.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface.
pub fn local_ip_address(probe: &str) -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(probe)?;
    Ok(socket.local_addr()?.ip())
}
