//! Client path to object key resolution
//!
//! Keys follow `user-<id>-files/<relative-path>`; a key ending in `/` is a
//! directory marker, anything else is a file. `parent_prefix` skips exactly
//! one leading segment — the single-segment namespace prefix is a contract,
//! not a coincidence.

use crate::descriptor::UserId;

/// Root prefix of a user's namespace, always ending with `/`
pub fn namespace_prefix(user: UserId) -> String {
    format!("user-{}-files/", user)
}

/// Resolve a user-relative client path to a fully-qualified object key.
///
/// One leading `/` is stripped; the empty path resolves to the namespace root
/// prefix itself.
pub fn full_key(user: UserId, client_path: &str) -> String {
    let relative = client_path.strip_prefix('/').unwrap_or(client_path);
    format!("{}{}", namespace_prefix(user), relative)
}

/// Last `/`-delimited segment of a key; directory keys keep the trailing `/`.
pub fn leaf_name(key: &str) -> String {
    let is_directory = key.ends_with('/');
    let body = if is_directory { &key[..key.len() - 1] } else { key };
    let leaf = body.rsplit('/').next().unwrap_or(body);
    if is_directory {
        format!("{}/", leaf)
    } else {
        leaf.to_string()
    }
}

/// Parent folder of a key relative to the namespace root: every segment except
/// the first (the namespace) and the last, normalized to end with `/`.
/// Top-level resources get `/`.
pub fn parent_prefix(key: &str) -> String {
    let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 2 {
        return "/".to_string();
    }
    let mut parent = segments[1..segments.len() - 1].join("/");
    parent.push('/');
    parent
}
