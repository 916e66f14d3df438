use crate::error::FilterError;

/// Sigil of a Matrix user ID: `@localpart:server.name`
pub const USER_ID_SIGIL: char = '@';

/// Sigil of a Matrix room ID: `!opaque_id:server.name`
pub const ROOM_ID_SIGIL: char = '!';

/// Split a sigil-prefixed Matrix identifier into localpart and server name
///
/// Only the first `:` separates the two; the server name keeps any further
/// colons, so `@bob:example.org:8448` has server name `example.org:8448`.
///
/// # Errors
/// * `FilterError::MalformedIdentifier` - wrong sigil, no separator, or an
///   empty localpart or server name
pub fn split_identifier(id: &str, sigil: char) -> Result<(&str, &str), FilterError> {
    let body = id.strip_prefix(sigil).ok_or_else(|| {
        FilterError::malformed_identifier(id, format!("expected '{}' sigil", sigil))
    })?;

    let (localpart, server_name) = body
        .split_once(':')
        .ok_or_else(|| FilterError::malformed_identifier(id, "missing server name"))?;

    if localpart.is_empty() {
        return Err(FilterError::malformed_identifier(id, "empty localpart"));
    }

    if !is_valid_server_name(server_name) {
        return Err(FilterError::malformed_identifier(id, "invalid server name"));
    }

    Ok((localpart, server_name))
}

/// Server name (domain) of a user ID such as `@alice:good.org`
pub fn user_server_name(user_id: &str) -> Result<&str, FilterError> {
    split_identifier(user_id, USER_ID_SIGIL).map(|(_, server_name)| server_name)
}

/// Server name (domain) of a room ID such as `!abc:good.org`
pub fn room_server_name(room_id: &str) -> Result<&str, FilterError> {
    split_identifier(room_id, ROOM_ID_SIGIL).map(|(_, server_name)| server_name)
}

/// Validate Matrix server name format: a hostname or bracketed IPv6
/// literal, optionally followed by `:port`
pub fn is_valid_server_name(server_name: &str) -> bool {
    let (host, port) = match server_name.rsplit_once(':') {
        Some((host, port)) if !host.ends_with(':') && !port.contains(']') => (host, Some(port)),
        _ => (server_name, None),
    };

    if let Some(port) = port
        && (port.is_empty() || port.len() > 5 || !port.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    if let Some(literal) = host.strip_prefix('[') {
        return literal
            .strip_suffix(']')
            .is_some_and(|addr| addr.parse::<std::net::Ipv6Addr>().is_ok());
    }

    !host.is_empty()
        && host.len() <= 255
        && host.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}
