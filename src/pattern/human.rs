//! Human-name plausibility check.
//!
//! A local part looks like a human name when every piece (split on the usual
//! separators, with trailing digits peeled off) is something a person would
//! pick: a word, a year, a name with a short digit suffix, or a mildly mixed
//! token.

use super::{is_digit, is_letter, is_mark};

/// Whether `local` plausibly spells a human-chosen name.
pub(crate) fn looks_like_human_name(local: &str) -> bool {
    let lowered = local.to_lowercase();

    lowered
        .split(['.', '_', '-', '+'])
        .filter(|piece| !piece.is_empty())
        .flat_map(split_letters_and_trailing_digits)
        .all(|piece| is_valid_name_part(&piece))
}

/// Splits `"john1984"` into `["john", "1984"]`; anything without a pure
/// digit tail stays whole.
fn split_letters_and_trailing_digits(piece: &str) -> Vec<String> {
    let chars: Vec<char> = piece.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let last_letter = chars
        .iter()
        .rposition(|&c| is_letter(c) || is_mark(c));
    let Some(last_letter) = last_letter else {
        return vec![piece.to_string()];
    };

    let digit_start = last_letter + 1;
    let tail_is_digits =
        digit_start < chars.len() && chars[digit_start..].iter().all(|&c| is_digit(c));

    if tail_is_digits && digit_start > 0 {
        vec![
            chars[..digit_start].iter().collect(),
            chars[digit_start..].iter().collect(),
        ]
    } else {
        vec![piece.to_string()]
    }
}

fn is_valid_name_part(part: &str) -> bool {
    if part.is_empty() {
        return false;
    }

    if is_likely_year(part) || is_all_letters(part) || is_name_with_trailing_digits(part) {
        return true;
    }

    if letter_digit_switches(part) > 2 {
        return false;
    }

    let chars: Vec<char> = part.chars().collect();
    if chars.len() > 6 {
        let digits = chars.iter().filter(|&&c| is_digit(c)).count();
        if digits as f64 / chars.len() as f64 > 0.4 {
            return false;
        }
    }

    true
}

/// A four-digit number in 1900..=2030, as birth years and graduation years
/// show up in addresses constantly.
fn is_likely_year(part: &str) -> bool {
    if part.chars().count() != 4 || !part.chars().all(is_digit) {
        return false;
    }
    matches!(part.parse::<u32>(), Ok(year) if (1900..=2030).contains(&year))
}

fn is_all_letters(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| is_letter(c) || is_mark(c))
}

/// `john123` / `mary2000`: at least two letters followed by one to four
/// digits, nothing else.
fn is_name_with_trailing_digits(part: &str) -> bool {
    let mut letters = 0;
    let mut digits = 0;
    let mut in_digit_tail = false;

    for c in part.chars() {
        if is_digit(c) {
            if !in_digit_tail && letters == 0 {
                return false; // starts with digits
            }
            in_digit_tail = true;
            digits += 1;
        } else if is_letter(c) || is_mark(c) {
            if in_digit_tail {
                return false; // letters after digits
            }
            letters += 1;
        } else {
            return false; // separators were already stripped
        }
    }

    letters >= 2 && (1..=4).contains(&digits)
}

/// Number of letter/digit boundary crossings within a piece.
fn letter_digit_switches(part: &str) -> usize {
    let mut switches = 0;
    let mut last_was_letter = false;
    let mut last_was_digit = false;

    for c in part.chars() {
        let letter = is_letter(c) || is_mark(c);
        let digit = is_digit(c);

        if (letter && last_was_digit) || (digit && last_was_letter) {
            switches += 1;
        }

        last_was_letter = letter;
        last_was_digit = digit;
    }

    switches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass() {
        assert!(looks_like_human_name("john"));
        assert!(looks_like_human_name("john.doe"));
        assert!(looks_like_human_name("jean-claude"));
        assert!(looks_like_human_name("étienne_dupont"));
        assert!(looks_like_human_name("Дмитрий"));
    }

    #[test]
    fn names_with_digit_suffixes_pass() {
        assert!(looks_like_human_name("john123"));
        assert!(looks_like_human_name("mary2000"));
        assert!(looks_like_human_name("giorgos1984"));
        assert!(looks_like_human_name("john.doe.1985"));
    }

    #[test]
    fn scrambled_tokens_fail() {
        assert!(!looks_like_human_name("x9z2k8m1"));
        assert!(!looks_like_human_name("a1b2c3d4"));
    }

    #[test]
    fn year_bounds() {
        assert!(is_likely_year("1900"));
        assert!(is_likely_year("2030"));
        assert!(!is_likely_year("1899"));
        assert!(!is_likely_year("2031"));
        assert!(!is_likely_year("123"));
        assert!(!is_likely_year("12345"));
    }

    #[test]
    fn trailing_digit_rules() {
        assert!(is_name_with_trailing_digits("john123"));
        assert!(!is_name_with_trailing_digits("j1")); // single letter
        assert!(!is_name_with_trailing_digits("john12345")); // five digits
        assert!(!is_name_with_trailing_digits("1john")); // leading digit
        assert!(!is_name_with_trailing_digits("jo1hn")); // letters after digits
    }

    #[test]
    fn split_peels_only_pure_digit_tails() {
        assert_eq!(
            split_letters_and_trailing_digits("john1984"),
            vec!["john".to_string(), "1984".to_string()]
        );
        assert_eq!(
            split_letters_and_trailing_digits("jo1hn"),
            vec!["jo1hn".to_string()]
        );
        assert_eq!(
            split_letters_and_trailing_digits("123456"),
            vec!["123456".to_string()]
        );
    }
}
