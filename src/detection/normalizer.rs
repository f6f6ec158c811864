/// Root symbols that absorb their contract variants (micro, mini, month codes).
/// Checked in order; the first substring hit wins.
const ROOT_SYMBOLS: &[&str] = &["NQ", "ES", "CL"];

/// Map a raw instrument symbol to its canonical root.
///
/// Non-alphanumeric characters are stripped first. A cleaned symbol that
/// contains a known root (case-insensitive) collapses to that root, so
/// `MNQM5` and `NQM5` both become `NQ`. Anything else is returned cleaned but
/// otherwise unchanged.
pub fn normalize_instrument(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let upper = cleaned.to_ascii_uppercase();

    for root in ROOT_SYMBOLS {
        if upper.contains(root) {
            return (*root).to_string();
        }
    }

    cleaned
}
