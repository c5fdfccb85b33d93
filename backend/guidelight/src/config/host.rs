//! Local-host detection and default scheme selection.

use std::net::IpAddr;

pub const SCHEME_HTTP: &str = "http";
pub const SCHEME_HTTPS: &str = "https";

const LOCALHOST: &str = "localhost";
const LOCAL_DOMAIN_SUFFIX: &str = ".local";

/// True for `localhost`, loopback addresses and `*.local` names.
///
/// Accepts a bare host or a `host:port` authority, including bracketed IPv6.
pub fn is_local_host(authority: &str) -> bool {
    let host = strip_port(authority).to_ascii_lowercase();

    if host == LOCALHOST || host.ends_with(LOCAL_DOMAIN_SUFFIX) {
        return true;
    }

    host.parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

/// `http` for local development hosts, `https` for everything else.
pub fn detect_scheme(authority: &str) -> &'static str {
    if is_local_host(authority) {
        SCHEME_HTTP
    } else {
        SCHEME_HTTPS
    }
}

fn strip_port(authority: &str) -> &str {
    // Credentials in the authority are not part of the host.
    let authority = authority.rsplit_once('@').map_or(authority, |(_, h)| h);

    if let Some(rest) = authority.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(host, _)| host);
    }

    match authority.split_once(':') {
        Some((host, _port)) => host,
        None => authority,
    }
}
