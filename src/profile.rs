//! WireGuard profile rendering and persistence
//!
//! A profile is a plain `wg-quick` configuration document: an `[Interface]`
//! section with the freshly generated private key and a `[Peer]` section
//! pointing at one NordVPN server. Rendered once, written verbatim, never
//! mutated in place.

use crate::api::Server;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Technology identifier a server must advertise to be usable.
pub const WIREGUARD_TECHNOLOGY: &str = "wireguard_udp";

/// NordLynx relay public key, fixed across all NordVPN WireGuard servers.
pub const NORDLYNX_PUBLIC_KEY: &str = "TJsvIqnAqYCHSyyGSdjLmHqtZRrFVbXMvIvZXGyVfn4=";

/// Client-side tunnel address assigned by NordLynx.
pub const INTERFACE_ADDRESS: &str = "10.5.0.2/32";

/// WireGuard port used by all NordVPN servers.
pub const WIREGUARD_PORT: u16 = 51820;

/// DNS servers written into the profile unless overridden.
pub const DEFAULT_DNS: &str = "1.1.1.1,8.8.8.8";

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("No WireGuard endpoint found on {0}")]
    NoWireguardEndpoint(String),
    #[error("Failed to write profile: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a tunnel profile for one server.
///
/// The server must advertise the `wireguard_udp` technology; anything else
/// (including an empty technology list) is a validation error the caller
/// can recover from by picking a different server.
pub fn render(server: &Server, private_key: &str, dns: &str) -> Result<String, ProfileError> {
    let supported = server
        .technologies
        .iter()
        .any(|t| t.identifier == WIREGUARD_TECHNOLOGY);
    if !supported {
        return Err(ProfileError::NoWireguardEndpoint(server.hostname.clone()));
    }

    Ok(format!(
        "[Interface]\n\
         PrivateKey = {private_key}\n\
         Address = {INTERFACE_ADDRESS}\n\
         DNS = {dns}\n\
         \n\
         [Peer]\n\
         PublicKey = {NORDLYNX_PUBLIC_KEY}\n\
         AllowedIPs = 0.0.0.0/0\n\
         Endpoint = {}:{WIREGUARD_PORT}\n",
        server.station,
    ))
}

/// Profile name for a server: the hostname minus its domain suffix
/// (`us1234.nordvpn.com` becomes `us1234`).
pub fn profile_name(hostname: &str) -> String {
    hostname.split('.').next().unwrap_or(hostname).to_string()
}

/// Write a rendered profile to disk, overwriting any existing file.
pub fn save(config: &str, path: &Path) -> Result<(), ProfileError> {
    fs::write(path, config)?;
    info!("Saved profile to {}", path.display());
    Ok(())
}
