//! Detection of concrete, pinned versions

use crate::parser::types::{VERSION_COMPLEX, VERSION_NOT_SPECIFIED, VERSION_UNKNOWN};

/// Characters that only appear in range or specifier expressions
const RANGE_CHARS: &[char] = &['>', '<', '^', '~', '*', '=', ' ', ',', '|'];

/// Returns true when `version` names exactly one release.
///
/// Ranges, property placeholders (`${...}`), `latest` and the parser
/// sentinels are not pinned.
pub fn is_pinned_version(version: &str) -> bool {
    let version = version.trim();

    if version.is_empty()
        || version.contains("${")
        || version.eq_ignore_ascii_case("latest")
        || [VERSION_UNKNOWN, VERSION_NOT_SPECIFIED, VERSION_COMPLEX].contains(&version)
    {
        return false;
    }

    !version.contains(RANGE_CHARS)
}
