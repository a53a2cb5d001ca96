//! Button label to sound resource derivation.

use std::sync::OnceLock;

use regex::Regex;

/// Characters kept in a derived file stem: ASCII word characters and `-`.
fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\-]").expect("static pattern is valid"))
}

/// Trims and lowercases a label, then drops everything except `[A-Za-z0-9_-]`.
///
/// `"  Sad Trombone! "` becomes `"sadtrombone"`.
pub fn sanitize_label(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    unsafe_chars().replace_all(&lowered, "").into_owned()
}

/// Derives the sound file name for a label, e.g. `"Applause"` -> `"applause.mp3"`.
pub fn filename_from_label(label: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    format!("{}.{}", sanitize_label(label), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_label() {
        assert_eq!(filename_from_label("Applause", "mp3"), "applause.mp3");
    }

    #[test]
    fn test_spaces_and_punctuation_removed() {
        assert_eq!(filename_from_label("  Sad Trombone! ", "mp3"), "sadtrombone.mp3");
        assert_eq!(filename_from_label("Ba-dum_tss?", "wav"), "ba-dum_tss.wav");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(sanitize_label("Olé"), "ol");
        assert_eq!(sanitize_label("🎉"), "");
    }

    #[test]
    fn test_leading_dot_in_extension() {
        assert_eq!(filename_from_label("Boo", ".ogg"), "boo.ogg");
    }
}
