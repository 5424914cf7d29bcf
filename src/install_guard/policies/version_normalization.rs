/// Dist-tag the registry resolves to its newest release
pub const LATEST_TAG: &str = "latest";

/// Normalizes a raw version specifier before it is sent to the registry.
///
/// Only simple prefix qualifiers are handled: a leading `^` or `~` is
/// stripped and a bare `*` becomes the `latest` dist-tag. Anything else,
/// compound ranges included, is passed through for the registry to interpret.
pub fn normalize_version(raw: &str) -> String {
    let raw = raw.trim();

    if raw == "*" {
        return LATEST_TAG.to_string();
    }

    raw.strip_prefix('^')
        .or_else(|| raw.strip_prefix('~'))
        .unwrap_or(raw)
        .to_string()
}
