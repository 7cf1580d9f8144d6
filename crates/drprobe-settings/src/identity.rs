//! Node identity resolution.

/// Identity reported when neither an override nor a host name is available.
pub const UNKNOWN_NODE: &str = "unknown";

/// Resolve this instance's node identity.
///
/// Priority: explicit override, kernel node name, `HOSTNAME`, [`UNKNOWN_NODE`].
pub fn resolve_node_name(explicit: Option<&str>) -> String {
    pick_node_name(
        explicit,
        system_node_name(),
        std::env::var("HOSTNAME").ok(),
    )
}

/// Pure selection logic behind [`resolve_node_name`].
pub fn pick_node_name(
    explicit: Option<&str>,
    system: Option<String>,
    hostname_env: Option<String>,
) -> String {
    explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .or_else(|| system.filter(|s| !s.is_empty()))
        .or_else(|| hostname_env.filter(|s| !s.is_empty()))
        .unwrap_or_else(|| UNKNOWN_NODE.to_string())
}

/// The kernel's node name (`uname -n`).
#[cfg(unix)]
pub fn system_node_name() -> Option<String> {
    let uts = rustix::system::uname();
    uts.nodename().to_str().ok().map(str::to_owned)
}

/// The kernel's node name (`uname -n`).
#[cfg(not(unix))]
pub fn system_node_name() -> Option<String> {
    None
}
