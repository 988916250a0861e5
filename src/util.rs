pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_owned();
    }

    let mut value = bytes as f64;
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

pub fn format_protocol(protocol: &str) -> String {
    if protocol.is_empty() {
        return "Unknown".to_owned();
    }

    match protocol.to_ascii_lowercase().as_str() {
        "h2" => "HTTP/2".to_owned(),
        "h3" => "HTTP/3".to_owned(),
        "http/1.1" => "HTTP/1.1".to_owned(),
        "spdy" => "SPDY".to_owned(),
        "quic" => "QUIC".to_owned(),
        _ => protocol.to_owned(),
    }
}

pub fn host_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme)
}

/// Last path segment of a resource url, without its query string.
pub fn resource_name(url: &str, is_root: bool) -> String {
    let last = url.rsplit('/').next().unwrap_or_default();
    let name = last.split(['?', '#']).next().unwrap_or_default();
    if !name.is_empty() {
        return name.to_owned();
    }

    if is_root {
        let host = host_of(url);
        if !host.is_empty() {
            return host.to_owned();
        }
    }

    "resource".to_owned()
}
