//! Filesystem-safe filename derivation
//!
//! Genos voice names regularly contain characters that are invalid in
//! filenames on at least one supported platform ("Strings & Brass / Octave",
//! "Sweet! Tenor"), so exported presets are named through this sanitizer.

/// Characters that are invalid in filenames on Windows, macOS, or Linux.
const INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Derive a safe base filename (no extension) from a patch display name.
///
/// Each invalid character becomes `-`, runs of whitespace collapse to a
/// single space, and leading/trailing whitespace is dropped. A
/// whitespace-only name maps to `""`. Idempotent. Offers no uniqueness
/// guarantee; collision handling is the export layer's job.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(if INVALID_CHARS.contains(&c) { '-' } else { c });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_chars_become_dashes() {
        assert_eq!(sanitize_filename("A/B:C*D"), "A-B-C-D");
        assert_eq!(sanitize_filename(r#"<>:"/\|?*"#), "---------");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(sanitize_filename("  spaced   out  "), "spaced out");
        assert_eq!(sanitize_filename("tab\there"), "tab here");
        assert_eq!(sanitize_filename("   "), "");
    }

    #[test]
    fn test_plain_names_untouched() {
        assert_eq!(sanitize_filename("Concert Grand"), "Concert Grand");
        assert_eq!(sanitize_filename("Sweet! Tenor Sax"), "Sweet! Tenor Sax");
    }

    #[test]
    fn test_idempotent() {
        for name in ["A/B:C*D", "  spaced   out  ", "Concert Grand", "", " / / "] {
            let once = sanitize_filename(name);
            assert_eq!(sanitize_filename(&once), once);
        }
    }
}
