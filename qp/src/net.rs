//! Network address and header formatters.
//!
//! Each wrapper borrows raw bytes in network order and renders them through
//! `Display`. A buffer too short for what it claims to hold makes `Display`
//! fail, so the probe prints the placeholder instead of reading past the end.
//!
//! ```
//! use qp::net::{Ipv4, Mac};
//!
//! assert_eq!(Mac::new(&[2u8, 3, 4, 5, 6, 7]).to_string(), "02:03:04:05:06:07");
//! assert_eq!(Ipv4::new(&[192u8, 168, 0, 1]).to_string(), "192.168.0.1");
//! ```

use std::fmt;

const MAC_LEN: usize = 6;
const IPV4_LEN: usize = 4;
const IPV6_LEN: usize = 16;

const ETH_HEADER_LEN: usize = 14;
const ARP_FIXED_LEN: usize = 8;
const ARP_ETH_IPV4_LEN: usize = ARP_FIXED_LEN + 2 * (MAC_LEN + IPV4_LEN);
const IPV4_HEADER_LEN: usize = 20;
const IPV6_HEADER_LEN: usize = 40;
const UDP_HEADER_LEN: usize = 8;
const TCP_HEADER_LEN: usize = 20;

/// TCP flag bits in byte 13, in print order.
const TCP_FLAGS: [(u8, &str); 6] = [
    (0x02, "SYN"),
    (0x01, "FIN"),
    (0x04, "RST"),
    (0x10, "ACK"),
    (0x08, "PSH"),
    (0x20, "URG"),
];

fn slice(bytes: &[u8], at: usize, len: usize) -> Result<&[u8], fmt::Error> {
    bytes.get(at..at + len).ok_or(fmt::Error)
}

fn byte(bytes: &[u8], at: usize) -> Result<u8, fmt::Error> {
    bytes.get(at).copied().ok_or(fmt::Error)
}

fn be16(bytes: &[u8], at: usize) -> Result<u16, fmt::Error> {
    let raw = slice(bytes, at, 2)?;
    Ok(u16::from_be_bytes([raw[0], raw[1]]))
}

fn be32(bytes: &[u8], at: usize) -> Result<u32, fmt::Error> {
    let raw = slice(bytes, at, 4)?;
    Ok(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn write_mac(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let mac = slice(bytes, 0, MAC_LEN)?;
    write!(
        f,
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

fn write_ipv4(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let ip = slice(bytes, 0, IPV4_LEN)?;
    write!(f, "{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3])
}

fn write_ipv6(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let ip = slice(bytes, 0, IPV6_LEN)?;
    for (i, pair) in ip.chunks_exact(2).enumerate() {
        if i > 0 {
            f.write_str(":")?;
        }
        write!(f, "{:02x}{:02x}", pair[0], pair[1])?;
    }
    Ok(())
}

macro_rules! byte_view {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a>(&'a [u8]);

        impl<'a> $name<'a> {
            /// Wrap bytes in network order.
            #[must_use]
            pub fn new<T: AsRef<[u8]> + ?Sized>(bytes: &'a T) -> Self {
                Self(bytes.as_ref())
            }
        }
    };
}

byte_view! {
    /// Ethernet address, `02:03:04:05:06:07`.
    Mac
}

byte_view! {
    /// IPv4 address, `192.168.0.1`.
    Ipv4
}

byte_view! {
    /// IPv6 address as eight uncompressed groups, `2001:0db8:0000:...`.
    Ipv6
}

byte_view! {
    /// Ethernet II header.
    EthHeader
}

byte_view! {
    /// ARP header; Ethernet/IPv4 addresses are decoded when present.
    ArpHeader
}

byte_view! {
    /// IPv4 header.
    Ipv4Header
}

byte_view! {
    /// IPv6 fixed header.
    Ipv6Header
}

byte_view! {
    /// IPv4 or IPv6 header, picked by the version nibble.
    IpHeader
}

byte_view! {
    /// UDP header.
    UdpHeader
}

byte_view! {
    /// TCP header with flag names.
    TcpHeader
}

impl fmt::Display for Mac<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_mac(f, self.0)
    }
}

impl fmt::Display for Ipv4<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ipv4(f, self.0)
    }
}

impl fmt::Display for Ipv6<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ipv6(f, self.0)
    }
}

impl fmt::Display for EthHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = slice(self.0, 0, ETH_HEADER_LEN)?;
        write!(f, "ethhdr proto={:04x} dst_mac=", be16(h, 12)?)?;
        write_mac(f, h)?;
        f.write_str(" src_mac=")?;
        write_mac(f, &h[MAC_LEN..])
    }
}

impl fmt::Display for ArpHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        let hlen = byte(h, 4)?;
        let plen = byte(h, 5)?;
        write!(
            f,
            "arphdr htype={:02x} ptype={:02x} hlen={hlen} plen={plen} oper={:02x}",
            be16(h, 0)?,
            be16(h, 2)?,
            be16(h, 6)?,
        )?;
        if usize::from(hlen) != MAC_LEN || usize::from(plen) != IPV4_LEN {
            return f.write_str(" other");
        }
        let body = slice(h, ARP_FIXED_LEN, ARP_ETH_IPV4_LEN - ARP_FIXED_LEN)?;
        f.write_str(" sha=")?;
        write_mac(f, body)?;
        f.write_str(" spa=")?;
        write_ipv4(f, &body[6..])?;
        f.write_str(" tha=")?;
        write_mac(f, &body[10..])?;
        f.write_str(" tpa=")?;
        write_ipv4(f, &body[16..])
    }
}

impl fmt::Display for Ipv4Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = slice(self.0, 0, IPV4_HEADER_LEN)?;
        write!(
            f,
            "iphdr version={} protocol={:x} headerlen={} tot_len={} check={:02x} saddr=",
            h[0] >> 4,
            h[9],
            h[0] & 0x0f,
            be16(h, 2)?,
            be16(h, 10)?,
        )?;
        write_ipv4(f, &h[12..])?;
        f.write_str(" daddr=")?;
        write_ipv4(f, &h[16..])
    }
}

impl fmt::Display for Ipv6Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = slice(self.0, 0, IPV6_HEADER_LEN)?;
        write!(
            f,
            "ipv6hdr version={} priority={} payload_len={} nexthdr={:#x} hop_limit={} saddr=",
            h[0] >> 4,
            h[0] & 0x0f,
            be16(h, 4)?,
            h[6],
            h[7],
        )?;
        write_ipv6(f, &h[8..])?;
        f.write_str(" daddr=")?;
        write_ipv6(f, &h[24..])
    }
}

impl fmt::Display for IpHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match byte(self.0, 0)? >> 4 {
            4 => Ipv4Header(self.0).fmt(f),
            6 => Ipv6Header(self.0).fmt(f),
            _ => f.write_str("no-IP header"),
        }
    }
}

impl fmt::Display for UdpHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = slice(self.0, 0, UDP_HEADER_LEN)?;
        write!(
            f,
            "udphdr sport={} dport={} len={} csum={}",
            be16(h, 0)?,
            be16(h, 2)?,
            be16(h, 4)?,
            be16(h, 6)?,
        )
    }
}

impl fmt::Display for TcpHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = slice(self.0, 0, TCP_HEADER_LEN)?;
        write!(
            f,
            "tcphdr sport={} dport={} seq={} ack={} doff={} flags={:04x}",
            be16(h, 0)?,
            be16(h, 2)?,
            be32(h, 4)?,
            be32(h, 8)?,
            h[12] >> 4,
            be16(h, 12)?,
        )?;
        for (bit, name) in TCP_FLAGS {
            if h[13] & bit != 0 {
                write!(f, " {name}")?;
            }
        }
        write!(
            f,
            " win={} csum={:04x} urg={}",
            be16(h, 14)?,
            be16(h, 16)?,
            be16(h, 18)?,
        )
    }
}
