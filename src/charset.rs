use std::str::FromStr;

use thiserror::Error;

/// Practice characters of a US-layout keyboard. The first half holds the
/// unshifted keys, the second half the same keys with shift held, so the
/// shifted form of `CHARS[i]` is `CHARS[i + CHARS.len() / 2]`.
pub const CHARS: &str =
    r#"1234567890-=\`[];',./qwertyuiopasdfghjklzxcvbnm!@#$%^&*()_+|~{}:"<>?QWERTYUIOPASDFGHJKLZXCVBNM"#;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    #[error("unknown character class '{0}' (expected symbol, number or alphabet)")]
    InvalidClass(String),
    #[error("key {0:?} has no entry in the practice table")]
    CharNotFound(char),
}

/// A selectable slice of the practice table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CharClass {
    Symbol,
    Number,
    Alphabet,
}

impl FromStr for CharClass {
    type Err = CharsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol" => Ok(CharClass::Symbol),
            "number" => Ok(CharClass::Number),
            "alphabet" => Ok(CharClass::Alphabet),
            other => Err(CharsetError::InvalidClass(other.to_string())),
        }
    }
}

impl CharClass {
    fn matches(self, c: char) -> bool {
        match self {
            CharClass::Symbol => {
                matches!(c, ' '..='/' | ':'..='@' | '['..='`' | '{'..='~')
            }
            CharClass::Number => c.is_ascii_digit(),
            CharClass::Alphabet => c.is_ascii_alphabetic(),
        }
    }
}

/// Pulls the characters of the requested classes out of the base table,
/// concatenated in the order the classes were given. Classes are disjoint in
/// the table, so nothing is deduplicated.
pub fn extract(classes: &[CharClass]) -> String {
    let mut pool = String::new();
    for class in classes {
        pool.extend(CHARS.chars().filter(|&c| class.matches(c)));
    }
    pool
}

/// Maps a raw key character to the logical character that was typed.
///
/// With no shift held the character passes through untouched. With shift
/// held, `raw` is expected to be the unshifted key identity; its shifted
/// partner sits half a table away. Characters outside the unshifted half
/// (including shifted glyphs delivered while shift is held) resolve to
/// `CharNotFound` so the caller can drop the keystroke.
pub fn resolve_shift(raw: char, shifted: bool) -> Result<char, CharsetError> {
    if !shifted {
        return Ok(raw);
    }

    let half = CHARS.len() / 2;
    let index = CHARS[..half]
        .chars()
        .position(|c| c == raw)
        .ok_or(CharsetError::CharNotFound(raw))?;

    // The table is pure ASCII, so byte indexing is character indexing.
    Ok(CHARS.as_bytes()[half + index] as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_halves_pair_up() {
        assert_eq!(CHARS.len() % 2, 0);
        assert!(CHARS.is_ascii());

        let chars: Vec<char> = CHARS.chars().collect();
        let dedup: std::collections::HashSet<char> = chars.iter().copied().collect();
        assert_eq!(chars.len(), dedup.len());
    }

    #[test]
    fn extract_symbol() {
        assert_eq!(
            extract(&[CharClass::Symbol]),
            r#"-=\`[];',./!@#$%^&*()_+|~{}:"<>?"#
        );
    }

    #[test]
    fn extract_number() {
        assert_eq!(extract(&[CharClass::Number]), "1234567890");
    }

    #[test]
    fn extract_alphabet() {
        assert_eq!(
            extract(&[CharClass::Alphabet]),
            "qwertyuiopasdfghjklzxcvbnmQWERTYUIOPASDFGHJKLZXCVBNM"
        );
    }

    #[test]
    fn extract_preserves_class_order() {
        assert_eq!(
            extract(&[CharClass::Symbol, CharClass::Number]),
            format!("{}{}", extract(&[CharClass::Symbol]), "1234567890")
        );
        assert_eq!(
            extract(&[CharClass::Number, CharClass::Symbol]),
            format!("{}{}", "1234567890", extract(&[CharClass::Symbol]))
        );
    }

    #[test]
    fn extract_nothing() {
        assert_eq!(extract(&[]), "");
    }

    #[test]
    fn extract_covers_whole_table() {
        let mut all = extract(&[CharClass::Symbol, CharClass::Number, CharClass::Alphabet])
            .chars()
            .collect::<Vec<char>>();
        let mut table = CHARS.chars().collect::<Vec<char>>();
        all.sort_unstable();
        table.sort_unstable();
        assert_eq!(all, table);
    }

    #[test]
    fn class_parsing() {
        assert_eq!("symbol".parse::<CharClass>(), Ok(CharClass::Symbol));
        assert_eq!("number".parse::<CharClass>(), Ok(CharClass::Number));
        assert_eq!("alphabet".parse::<CharClass>(), Ok(CharClass::Alphabet));
        assert_eq!(
            "punctuation".parse::<CharClass>(),
            Err(CharsetError::InvalidClass("punctuation".to_string()))
        );
    }

    #[test]
    fn class_display_round_trips() {
        for class in [CharClass::Symbol, CharClass::Number, CharClass::Alphabet] {
            assert_eq!(class.to_string().parse::<CharClass>(), Ok(class));
        }
    }

    #[test]
    fn resolve_without_shift_passes_through() {
        assert_eq!(resolve_shift('a', false), Ok('a'));
        assert_eq!(resolve_shift('!', false), Ok('!'));
        // Unmapped characters only matter on the shifted path.
        assert_eq!(resolve_shift('é', false), Ok('é'));
    }

    #[test]
    fn resolve_with_shift_uses_table_offset() {
        assert_eq!(resolve_shift('1', true), Ok('!'));
        assert_eq!(resolve_shift('2', true), Ok('@'));
        assert_eq!(resolve_shift('-', true), Ok('_'));
        assert_eq!(resolve_shift('/', true), Ok('?'));
        assert_eq!(resolve_shift('q', true), Ok('Q'));
        assert_eq!(resolve_shift('m', true), Ok('M'));
    }

    #[test]
    fn resolve_is_inverse_of_passthrough() {
        for raw in CHARS[..CHARS.len() / 2].chars() {
            let shifted = resolve_shift(raw, true).unwrap();
            assert_eq!(resolve_shift(shifted, false), Ok(shifted));
        }
    }

    #[test]
    fn resolve_shifted_glyph_under_shift_is_rejected() {
        assert_eq!(resolve_shift('!', true), Err(CharsetError::CharNotFound('!')));
        assert_eq!(resolve_shift('Q', true), Err(CharsetError::CharNotFound('Q')));
    }

    #[test]
    fn resolve_unmapped_key_under_shift_is_rejected() {
        assert_eq!(resolve_shift('é', true), Err(CharsetError::CharNotFound('é')));
        assert_eq!(resolve_shift(' ', true), Err(CharsetError::CharNotFound(' ')));
    }
}
