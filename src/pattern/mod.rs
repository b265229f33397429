//! Local-part pattern heuristics.
//!
//! This module inspects the local part of an email address for machine
//! generated shapes: keyboard walks, erratic casing, long digit runs,
//! excessive punctuation and high-entropy strings that do not resemble a
//! human name. The output is four boolean flags consumed by the risk
//! analyzer.
//!
//! All rules operate on Unicode code points, so accented and non-Latin
//! names are treated the same as ASCII ones.

mod human;

#[cfg(test)]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::config::PatternConfig;
use crate::models::PatternReport;

use human::looks_like_human_name;

/// Shannon entropy above which a local part counts as high entropy.
const HIGH_ENTROPY_THRESHOLD: f64 = 3.5;

/// Minimum length of a keyboard-walk substring.
const MIN_KEYBOARD_SEQ_LENGTH: usize = 4;

/// Keyboard rows checked for walks, forward and reversed.
const KEYBOARD_ROWS: [&str; 6] = [
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm", // English
    "qwertzuiop",
    "yxcvbnm",    // German
    "1234567890", // Numbers
];

/// Shapes a human-chosen local part usually takes: a letter followed by
/// letters, numbers, marks or common separators; a letter plus digits; or a
/// single letter.
static HUMAN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}][\p{L}\p{N}\p{M}._+-]*$|^[\p{L}]\p{N}+$|^[\p{L}]$")
        .expect("human shape pattern is valid")
});

/// Rule engine over the local part of an email address.
pub struct PatternChecker {
    config: PatternConfig,
}

impl Default for PatternChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternChecker {
    pub fn new() -> Self {
        Self::with_config(PatternConfig::default())
    }

    pub fn with_config(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Runs every heuristic over `email`'s local part.
    ///
    /// Fails when the input does not contain exactly one `@` with a
    /// non-empty local part and domain.
    pub fn check(&self, email: &str) -> anyhow::Result<PatternReport> {
        if email.matches('@').count() != 1 {
            anyhow::bail!("invalid email format");
        }
        let at = email.find('@').unwrap_or_default();
        if at == 0 || at == email.len() - 1 {
            anyhow::bail!("invalid email format");
        }

        let local = &email[..at];
        let chars: Vec<char> = local.chars().collect();
        let len = chars.len();

        let mut report = PatternReport {
            short_local_part: len < self.config.min_local_part_length,
            too_many_consecutive_numbers: longest_digit_run(&chars)
                > self.config.max_consecutive_numbers,
            ..PatternReport::default()
        };

        let special_chars = chars
            .iter()
            .filter(|c| !is_letter(**c) && !is_digit(**c) && !is_mark(**c))
            .count();
        if len > 0 && special_chars as f64 / len as f64 > self.config.max_special_char_ratio {
            report.too_many_special_chars = true;
        }

        let high_entropy = len >= 6 && shannon_entropy(&chars) > HIGH_ENTROPY_THRESHOLD;
        let keyboard_walk = has_keyboard_walk(&chars);
        let erratic_casing = len >= 6 && case_switches(&chars) > len / 3;
        let off_shape = !HUMAN_SHAPE.is_match(local) && !is_mostly_letters(&chars);
        let not_human_name = !looks_like_human_name(local);

        if keyboard_walk
            || report.too_many_consecutive_numbers
            || report.too_many_special_chars
            || erratic_casing
            || off_shape
            || (not_human_name && len >= 8)
            || (not_human_name && high_entropy)
        {
            report.has_random_pattern = true;
        }

        Ok(report)
    }
}

impl crate::checker::PatternCheck for PatternChecker {
    fn check(&self, email: &str) -> anyhow::Result<PatternReport> {
        PatternChecker::check(self, email)
    }
}

/// Unicode letter (category L*).
pub(crate) fn is_letter(c: char) -> bool {
    c.general_category_group() == GeneralCategoryGroup::Letter
}

/// Unicode combining mark (category M*).
pub(crate) fn is_mark(c: char) -> bool {
    c.general_category_group() == GeneralCategoryGroup::Mark
}

/// Unicode decimal digit (category Nd).
pub(crate) fn is_digit(c: char) -> bool {
    c.general_category() == GeneralCategory::DecimalNumber
}

/// Length of the longest run of decimal digits.
fn longest_digit_run(chars: &[char]) -> usize {
    let mut run = 0;
    let mut max_run = 0;
    for &c in chars {
        if is_digit(c) {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 0;
        }
    }
    max_run
}

/// More than 60% of the code points are letters or marks.
///
/// Rescues scripts the human-shape pattern cannot anchor, so a fully
/// non-Latin local part is not flagged as random.
fn is_mostly_letters(chars: &[char]) -> bool {
    if chars.is_empty() {
        return false;
    }
    let letters = chars.iter().filter(|c| is_letter(**c) || is_mark(**c)).count();
    letters as f64 / chars.len() as f64 > 0.6
}

/// Shannon entropy over case-folded code points; 0 for inputs of three code
/// points or fewer.
fn shannon_entropy(chars: &[char]) -> f64 {
    if chars.len() <= 3 {
        return 0.0;
    }

    let mut freq = std::collections::HashMap::new();
    for &c in chars {
        let folded = c.to_lowercase().next().unwrap_or(c);
        *freq.entry(folded).or_insert(0usize) += 1;
    }

    let n = chars.len() as f64;
    freq.values()
        .map(|&count| {
            let p = count as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// Whether any 4-code-point window of the lowercased local part appears in a
/// keyboard row or a reversed keyboard row.
fn has_keyboard_walk(chars: &[char]) -> bool {
    if chars.len() < MIN_KEYBOARD_SEQ_LENGTH {
        return false;
    }

    let lowered: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();

    for row in KEYBOARD_ROWS {
        let reversed: String = row.chars().rev().collect();
        for window in lowered.windows(MIN_KEYBOARD_SEQ_LENGTH) {
            let needle: String = window.iter().collect();
            if row.contains(&needle) || reversed.contains(&needle) {
                return true;
            }
        }
    }
    false
}

/// Number of lower/upper transitions between cased code points.
/// Uncased characters (digits, punctuation) neither count nor reset.
fn case_switches(chars: &[char]) -> usize {
    let mut switches = 0;
    let mut last_case: Option<bool> = None; // true = uppercase

    for &c in chars {
        let current = if c.is_uppercase() {
            Some(true)
        } else if c.is_lowercase() {
            Some(false)
        } else {
            None
        };

        if let (Some(last), Some(current)) = (last_case, current) {
            if last != current {
                switches += 1;
            }
        }
        if current.is_some() {
            last_case = current;
        }
    }

    switches
}
