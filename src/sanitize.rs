//! Text cleanup applied to titles and descriptions before rendering.
//!
//! Card fonts are plain text faces without emoji glyphs, so emoji are
//! removed: characters with emoji presentation, pictographs forced to emoji by
//! U+FE0F, and the skin-tone, ZWJ, keycap, flag and tag sequences built on
//! them. Symbols that default to text presentation (™ © ® ♟ ☀) are kept.
//! The result is then trimmed. An empty result tells the composer to skip
//! that text block.

use regex::Regex;
use std::sync::LazyLock;

static EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        // keycaps: 1️⃣ #️⃣
        r"[0-9#*]\x{FE0F}?\x{20E3}",
        // emoji presentation or VS16 pictograph, optional skin tone,
        // ZWJ-joined, optional tag run
        r"|(?:\p{Emoji_Presentation}\x{FE0F}?|\p{Extended_Pictographic}\x{FE0F})",
        r"[\x{1F3FB}-\x{1F3FF}]?",
        r"(?:\x{200D}\p{Extended_Pictographic}[\x{FE0F}\x{1F3FB}-\x{1F3FF}]?)*",
        r"[\x{E0020}-\x{E007F}]*",
        // regional indicators (flags) and stray skin-tone modifiers
        r"|[\x{1F1E6}-\x{1F1FF}\x{1F3FB}-\x{1F3FF}]",
    ))
    .expect("emoji pattern is valid")
});

/// Remove emoji and trim surrounding whitespace.
pub fn sanitize(text: &str) -> String {
    EMOJI_REGEX.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_single_emoji() {
        assert_eq!(sanitize("Hello 👋"), "Hello");
    }

    #[test]
    fn removes_emoji_between_words_without_collapsing_spaces() {
        assert_eq!(sanitize("Launch 🚀 day"), "Launch  day");
    }

    #[test]
    fn removes_zwj_family_sequence() {
        assert_eq!(sanitize("Family 👨\u{200D}👩\u{200D}👧 trip"), "Family  trip");
    }

    #[test]
    fn removes_skin_tone_modifier_with_base() {
        assert_eq!(sanitize("👍🏽 Thanks"), "Thanks");
    }

    #[test]
    fn removes_flags() {
        assert_eq!(sanitize("Made in 🇳🇴"), "Made in");
    }

    #[test]
    fn removes_keycap_but_keeps_plain_digits() {
        assert_eq!(sanitize("Step 1️⃣ of 3"), "Step  of 3");
    }

    #[test]
    fn removes_variation_selector_emoji() {
        assert_eq!(sanitize("I \u{2764}\u{FE0F} Rust"), "I  Rust");
    }

    #[test]
    fn keeps_text_presentation_symbols() {
        assert_eq!(sanitize("Acme™ Widgets"), "Acme™ Widgets");
        assert_eq!(sanitize("© 2024 Foo Inc."), "© 2024 Foo Inc.");
        assert_eq!(sanitize("Registered® brand"), "Registered® brand");
        assert_eq!(sanitize("Chess ♟ club"), "Chess ♟ club");
        assert_eq!(sanitize("Sunny ☀ days ‼"), "Sunny ☀ days ‼");
    }

    #[test]
    fn removes_symbol_forced_to_emoji_presentation() {
        assert_eq!(sanitize("\u{00A9}\u{FE0F} 2024"), "2024");
        assert_eq!(sanitize("Sunny \u{2600}\u{FE0F}"), "Sunny");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(sanitize("  \n\tPlain title \n"), "Plain title");
    }

    #[test]
    fn keeps_accented_and_cjk_text() {
        assert_eq!(sanitize("Café 東京"), "Café 東京");
    }

    #[test]
    fn emoji_only_becomes_empty() {
        assert_eq!(sanitize(" 🎉🎉 "), "");
    }

    #[test]
    fn output_never_contains_pictographs() {
        let inputs = [
            "🔥 hot take 🔥",
            "a😀b😃c",
            "🏳\u{FE0F}\u{200D}🌈 pride",
            "🏴\u{E0067}\u{E0062}\u{E0073}\u{E0063}\u{E0074}\u{E007F} scotland",
        ];
        for input in inputs {
            let out = sanitize(input);
            assert!(
                !EMOJI_REGEX.is_match(&out),
                "emoji left in {out:?} (from {input:?})"
            );
            assert_eq!(out, out.trim());
        }
    }
}
