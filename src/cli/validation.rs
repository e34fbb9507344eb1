//! Value parsers for CLI arguments
//!
//! Checks that clap cannot express declaratively. Each parser returns the
//! error text clap shows next to the offending argument.

use std::net::IpAddr;
use std::path::PathBuf;

/// Port must be a number in 1..=65535
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!("Port must be a number between 1 and 65535, got: '{port_str}'")
    })?;

    if port == 0 {
        return Err("Port 0 is not allowed; pick a port between 1 and 65535".to_string());
    }

    Ok(port)
}

/// Configuration file must exist, be a readable file and end in `.toml`
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(format!("Configuration file does not exist or is not a file: '{path_str}'"));
    }

    if path.extension().and_then(|e| e.to_str()) != Some("toml") {
        return Err(format!("Configuration file must be a .toml file: '{path_str}'"));
    }

    std::fs::File::open(&path)
        .map_err(|e| format!("Cannot read configuration file '{path_str}': {e}"))?;

    Ok(path)
}

/// Host must be an IP address (v4 or v6) or a DNS hostname
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }

    // Dotted digits that did not parse as an IP are a mistyped address.
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address: '{host}'"));
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !host.split('.').all(valid_label) {
        return Err(format!("Invalid hostname: '{host}'"));
    }

    Ok(host.to_string())
}
