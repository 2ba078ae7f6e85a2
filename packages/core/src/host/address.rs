//! Pod address parsing
//!
//! Pod members are addressed by private IPv4 address. Operators type them
//! as a comma separated list.

use std::net::Ipv4Addr;

use super::error::HostError;

/// Implicit member of every pod: the host tpux runs on
pub const LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Parse a single private IPv4 address
pub fn parse_private_ipv4(token: &str) -> Result<Ipv4Addr, HostError> {
    let addr: Ipv4Addr = token
        .parse()
        .map_err(|_| HostError::InvalidAddress(token.to_string()))?;

    if !addr.is_private() {
        return Err(HostError::NotPrivate(addr.to_string()));
    }

    Ok(addr)
}

/// Parse a comma separated list of private IPv4 addresses
///
/// Whitespace around each entry is ignored and repeated addresses are kept
/// once, in first-seen order.
pub fn parse_pod_addresses(input: &str) -> Result<Vec<Ipv4Addr>, HostError> {
    if input.trim().is_empty() {
        return Err(HostError::EmptyAddressList);
    }

    let mut addrs: Vec<Ipv4Addr> = Vec::new();
    for token in input.split(',') {
        let addr = parse_private_ipv4(token.trim())?;
        if !addrs.contains(&addr) {
            addrs.push(addr);
        }
    }

    Ok(addrs)
}

/// Format addresses the way they are typed: `10.0.0.2,10.0.0.3`
pub fn format_addresses(addrs: &[Ipv4Addr]) -> String {
    addrs
        .iter()
        .map(|addr| addr.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Prepend [`LOCALHOST`] to a pod address list
pub fn with_localhost(addrs: &[Ipv4Addr]) -> Vec<Ipv4Addr> {
    std::iter::once(LOCALHOST)
        .chain(addrs.iter().copied().filter(|addr| *addr != LOCALHOST))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let addrs = parse_pod_addresses("10.0.0.1, 10.0.0.2").unwrap();
        assert_eq!(
            addrs,
            vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]
        );
    }

    #[test]
    fn test_parse_single_address() {
        let addrs = parse_pod_addresses("  192.168.1.20 ").unwrap();
        assert_eq!(addrs, vec![Ipv4Addr::new(192, 168, 1, 20)]);
    }

    #[test]
    fn test_parse_drops_duplicates() {
        let addrs = parse_pod_addresses("10.0.0.3,10.0.0.2,10.0.0.3").unwrap();
        assert_eq!(
            addrs,
            vec![Ipv4Addr::new(10, 0, 0, 3), Ipv4Addr::new(10, 0, 0, 2)]
        );
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(
            parse_pod_addresses("   "),
            Err(HostError::EmptyAddressList)
        ));
    }

    #[test]
    fn test_parse_rejects_empty_token() {
        assert!(matches!(
            parse_pod_addresses("10.0.0.1,,10.0.0.2"),
            Err(HostError::InvalidAddress(token)) if token.is_empty()
        ));
        assert!(parse_pod_addresses("10.0.0.1,").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["10.0.0", "10.0.0.256", "host-1", "10.0.0.1 10.0.0.2", "::1"] {
            assert!(
                matches!(parse_pod_addresses(input), Err(HostError::InvalidAddress(_))),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_public_and_loopback() {
        for input in ["8.8.8.8", "127.0.0.1", "10.0.0.1,34.120.0.1"] {
            assert!(
                matches!(parse_pod_addresses(input), Err(HostError::NotPrivate(_))),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_all_private_ranges_accepted() {
        assert!(parse_pod_addresses("10.128.0.5,172.16.0.1,172.31.255.254,192.168.0.1").is_ok());
    }

    #[test]
    fn test_display_roundtrip() {
        for addr in [
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(172, 20, 3, 40),
            Ipv4Addr::new(192, 168, 255, 255),
            Ipv4Addr::new(0, 0, 0, 0),
        ] {
            let text = addr.to_string();
            assert_eq!(text.parse::<Ipv4Addr>().unwrap(), addr);
            assert_eq!(text.parse::<Ipv4Addr>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_format_addresses_reparses() {
        let addrs = parse_pod_addresses("10.0.0.2, 10.0.0.3").unwrap();
        let text = format_addresses(&addrs);
        assert_eq!(text, "10.0.0.2,10.0.0.3");
        assert_eq!(parse_pod_addresses(&text).unwrap(), addrs);
    }

    #[test]
    fn test_with_localhost_prepends_once() {
        let addrs = vec![Ipv4Addr::new(10, 0, 0, 2), LOCALHOST];
        assert_eq!(
            with_localhost(&addrs),
            vec![LOCALHOST, Ipv4Addr::new(10, 0, 0, 2)]
        );
    }
}
