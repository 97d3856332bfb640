//! Script filtering for clipboard text.
//!
//! Keeps only the characters that belong to one writing system (Han ideographs
//! by default) so the synthesizer never receives text its voice model cannot
//! pronounce. Everything outside the target script (Latin letters, digits,
//! punctuation, whitespace) is dropped silently.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Writing system whose characters survive filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetScript {
    /// Han ideographs (Chinese hanzi, Japanese kanji, Korean hanja).
    #[default]
    Han,
    /// Japanese hiragana.
    Hiragana,
    /// Japanese katakana, including half-width forms.
    Katakana,
    /// Korean hangul syllables and jamo.
    Hangul,
    /// Cyrillic letters.
    Cyrillic,
}

impl TargetScript {
    /// All supported scripts, in display order.
    pub const ALL: [Self; 5] = [
        Self::Han,
        Self::Hiragana,
        Self::Katakana,
        Self::Hangul,
        Self::Cyrillic,
    ];

    /// Lowercase name used on the command line and in config.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Han => "han",
            Self::Hiragana => "hiragana",
            Self::Katakana => "katakana",
            Self::Hangul => "hangul",
            Self::Cyrillic => "cyrillic",
        }
    }

    /// Whether `c` belongs to this script.
    ///
    /// Ranges follow the Unicode `Scripts.txt` assignments.
    pub const fn contains(self, c: char) -> bool {
        match self {
            Self::Han => is_han(c),
            Self::Hiragana => is_hiragana(c),
            Self::Katakana => is_katakana(c),
            Self::Hangul => is_hangul(c),
            Self::Cyrillic => is_cyrillic(c),
        }
    }
}

impl fmt::Display for TargetScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown script name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown script '{0}' (expected one of: han, hiragana, katakana, hangul, cyrillic)")]
pub struct UnknownScript(pub String);

impl FromStr for TargetScript {
    type Err = UnknownScript;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|script| script.name() == wanted)
            .ok_or_else(|| UnknownScript(s.to_string()))
    }
}

/// Text that passed the script filter.
///
/// Never empty: the only ways to build one are [`filter_script`] and
/// [`FilteredText::new`], both of which refuse empty input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilteredText(String);

impl FilteredText {
    /// Wrap already-filtered text, returning `None` when it is empty.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() { None } else { Some(Self(text)) }
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for FilteredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilteredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep only the characters of `text` that belong to `script`.
///
/// Order is preserved and no separators are inserted. Returns `None` when no
/// character matches.
pub fn filter_script(text: &str, script: TargetScript) -> Option<FilteredText> {
    let mut kept = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| script.contains(c)) {
        kept.push(c);
    }
    FilteredText::new(kept)
}

const fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{2E80}'..='\u{2E99}'     // CJK radicals supplement
            | '\u{2E9B}'..='\u{2EF3}'
            | '\u{2F00}'..='\u{2FD5}' // Kangxi radicals
            | '\u{3005}'              // 々
            | '\u{3007}'              // 〇
            | '\u{3021}'..='\u{3029}' // Hangzhou numerals
            | '\u{3038}'..='\u{303B}'
            | '\u{3400}'..='\u{4DBF}' // Extension A
            | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
            | '\u{F900}'..='\u{FA6D}' // Compatibility ideographs
            | '\u{FA70}'..='\u{FAD9}'
            | '\u{16FE2}'..='\u{16FE3}'
            | '\u{16FF0}'..='\u{16FF1}'
            | '\u{20000}'..='\u{2A6DF}' // Extension B
            | '\u{2A700}'..='\u{2B739}'
            | '\u{2B740}'..='\u{2B81D}'
            | '\u{2B820}'..='\u{2CEA1}'
            | '\u{2CEB0}'..='\u{2EBE0}'
            | '\u{2EBF0}'..='\u{2EE5D}'
            | '\u{2F800}'..='\u{2FA1D}' // Compatibility supplement
            | '\u{30000}'..='\u{3134A}'
            | '\u{31350}'..='\u{323AF}'
    )
}

const fn is_hiragana(c: char) -> bool {
    matches!(
        c,
        '\u{3041}'..='\u{3096}'
            | '\u{309D}'..='\u{309F}'
            | '\u{1B001}'..='\u{1B11F}'
            | '\u{1B132}'
            | '\u{1B150}'..='\u{1B152}'
            | '\u{1F200}'
    )
}

const fn is_katakana(c: char) -> bool {
    matches!(
        c,
        '\u{30A1}'..='\u{30FA}'
            | '\u{30FD}'..='\u{30FF}'
            | '\u{31F0}'..='\u{31FF}'
            | '\u{32D0}'..='\u{32FE}'
            | '\u{3300}'..='\u{3357}'
            | '\u{FF66}'..='\u{FF6F}'
            | '\u{FF71}'..='\u{FF9D}'
            | '\u{1AFF0}'..='\u{1AFF3}'
            | '\u{1AFF5}'..='\u{1AFFB}'
            | '\u{1AFFD}'..='\u{1AFFE}'
            | '\u{1B000}'
            | '\u{1B120}'..='\u{1B122}'
            | '\u{1B155}'
            | '\u{1B164}'..='\u{1B167}'
    )
}

const fn is_hangul(c: char) -> bool {
    matches!(
        c,
        '\u{1100}'..='\u{11FF}'
            | '\u{302E}'..='\u{302F}'
            | '\u{3131}'..='\u{318E}'
            | '\u{3200}'..='\u{321E}'
            | '\u{3260}'..='\u{327E}'
            | '\u{A960}'..='\u{A97C}'
            | '\u{AC00}'..='\u{D7A3}'
            | '\u{D7B0}'..='\u{D7C6}'
            | '\u{D7CB}'..='\u{D7FB}'
            | '\u{FFA0}'..='\u{FFBE}'
            | '\u{FFC2}'..='\u{FFC7}'
            | '\u{FFCA}'..='\u{FFCF}'
            | '\u{FFD2}'..='\u{FFD7}'
            | '\u{FFDA}'..='\u{FFDC}'
    )
}

const fn is_cyrillic(c: char) -> bool {
    matches!(
        c,
        '\u{0400}'..='\u{0484}'
            | '\u{0487}'..='\u{052F}'
            | '\u{1C80}'..='\u{1C88}'
            | '\u{1D2B}'
            | '\u{1D78}'
            | '\u{2DE0}'..='\u{2DFF}'
            | '\u{A640}'..='\u{A69F}'
            | '\u{FE2E}'..='\u{FE2F}'
            | '\u{1E030}'..='\u{1E06D}'
            | '\u{1E08F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_han_from_mixed_text() {
        let filtered = filter_script("你好ABC", TargetScript::Han).unwrap();
        assert_eq!(filtered.as_str(), "你好");
    }

    #[test]
    fn latin_and_digits_filter_to_nothing() {
        assert_eq!(filter_script("ABC123", TargetScript::Han), None);
    }

    #[test]
    fn empty_input_filters_to_nothing() {
        assert_eq!(filter_script("", TargetScript::Han), None);
    }

    #[test]
    fn drops_cjk_punctuation_and_whitespace_between_ideographs() {
        let filtered = filter_script("中文，\n测试。 hello 世界!", TargetScript::Han).unwrap();
        assert_eq!(filtered.as_str(), "中文测试世界");
        assert_eq!(filtered.char_count(), 6);
    }

    #[test]
    fn iteration_mark_and_extension_b_count_as_han() {
        let filtered = filter_script("人々𠀀", TargetScript::Han).unwrap();
        assert_eq!(filtered.as_str(), "人々𠀀");
    }

    #[test]
    fn kana_is_not_han() {
        let text = "日本語のテキスト";
        assert_eq!(filter_script(text, TargetScript::Han).unwrap().as_str(), "日本語");
        assert_eq!(filter_script(text, TargetScript::Hiragana).unwrap().as_str(), "の");
        assert_eq!(
            filter_script(text, TargetScript::Katakana).unwrap().as_str(),
            "テキスト"
        );
    }

    #[test]
    fn hangul_and_cyrillic_targets() {
        assert_eq!(
            filter_script("한국어 text", TargetScript::Hangul).unwrap().as_str(),
            "한국어"
        );
        assert_eq!(
            filter_script("Привет, world", TargetScript::Cyrillic)
                .unwrap()
                .as_str(),
            "Привет"
        );
    }

    #[test]
    fn filtered_text_rejects_empty() {
        assert!(FilteredText::new("").is_none());
        assert_eq!(FilteredText::new("中").unwrap().to_string(), "中");
    }

    #[test]
    fn parses_script_names() {
        assert_eq!("han".parse::<TargetScript>().unwrap(), TargetScript::Han);
        assert_eq!(" Hangul ".parse::<TargetScript>().unwrap(), TargetScript::Hangul);
        let err = "latin".parse::<TargetScript>().unwrap_err();
        assert_eq!(err, UnknownScript("latin".to_string()));
    }

    #[test]
    fn display_matches_parse_name() {
        for script in TargetScript::ALL {
            assert_eq!(script.to_string().parse::<TargetScript>().unwrap(), script);
        }
    }
}
