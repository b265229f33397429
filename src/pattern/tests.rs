//! Pattern heuristic tests.

use super::*;
use crate::config::PatternConfig;

struct Case {
    name: &'static str,
    email: &'static str,
    expect_error: bool,
    short_local_part: bool,
    has_random_pattern: bool,
    too_many_consecutive_numbers: bool,
    too_many_special_chars: bool,
}

impl Case {
    fn ok(name: &'static str, email: &'static str) -> Self {
        Self {
            name,
            email,
            expect_error: false,
            short_local_part: false,
            has_random_pattern: false,
            too_many_consecutive_numbers: false,
            too_many_special_chars: false,
        }
    }

    fn err(name: &'static str, email: &'static str) -> Self {
        Self {
            expect_error: true,
            ..Self::ok(name, email)
        }
    }

    fn short(mut self) -> Self {
        self.short_local_part = true;
        self
    }

    fn random(mut self) -> Self {
        self.has_random_pattern = true;
        self
    }

    fn consecutive(mut self) -> Self {
        self.too_many_consecutive_numbers = true;
        self
    }

    fn special(mut self) -> Self {
        self.too_many_special_chars = true;
        self
    }
}

#[test]
fn pattern_flags_across_inputs() {
    let cases = vec![
        // Valid human patterns
        Case::ok("valid human pattern", "john.doe@domain.com"),
        Case::ok("german umlaut", "müller@beispiel.de"),
        Case::ok("german eszett", "groß@beispiel.de"),
        Case::ok("greek name", "Γιώργος@domain.gr"),
        Case::ok("cyrillic user", "Дмитрий@почта.рф"),
        Case::ok("french accents", "étienne_dupont@courriel.fr"),
        Case::ok("spanish accented", "josé-luís@correo.es"),
        Case::ok("name with numbers", "giorgos1984@domain.com"),
        Case::ok("single letter", "a@domain.com").short(),
        Case::ok("two letters", "ab@domain.com").short(),
        Case::ok("simple name with dot", "john.smith@domain.com"),
        Case::ok("name with underscore", "john_doe@domain.com"),
        Case::ok("name with hyphen", "jean-claude@domain.com"),
        Case::ok("name with plus", "john+tag@domain.com"),
        Case::ok("acceptable digit run", "john123@domain.com"),
        Case::ok("single digit suffix", "john1@domain.com"),
        // Random patterns
        Case::ok("erratic casing", "rAnDomCAsE@domain.com").random(),
        Case::ok("keyboard walk qwer", "qwer@domain.com").random(),
        Case::ok("keyboard walk asdf", "asdf@domain.com").random(),
        Case::ok("german qwertz walk", "qwertz@domain.com").random(),
        Case::ok("reversed keyboard walk", "trewq@domain.com").random(),
        Case::ok("long digit run", "user123456@domain.com")
            .random()
            .consecutive(),
        Case::ok("scramble plus keyboard", "x9z2k8m1qwerty@domain.com").random(),
        Case::ok("separator soup", "a.b_c-d+e@domain.com")
            .random()
            .special(),
        // Edge cases
        Case::ok("digits only", "123456@domain.com").random().consecutive(),
        Case::ok("reasonable case switching", "iPhone@domain.com"),
        Case::ok("too many case switches", "aBcDeFgHiJkL@domain.com").random(),
        Case::err("empty local part", "@domain.com"),
        Case::err("no at symbol", "invalidemail"),
        Case::err("multiple at symbols", "test@@domain.com"),
        Case::err("at at end", "test@"),
        // Real-world shapes
        Case::ok("random hotmail", "mx4nh2pw7sq1pc3@hotmail.com").random(),
        Case::ok("random gmail", "m0979689258@gmail.com")
            .random()
            .consecutive(),
        Case::ok("valid gmail", "giorgos1984@gmail.com"),
    ];

    let checker = PatternChecker::new();
    for case in cases {
        let result = checker.check(case.email);

        if case.expect_error {
            assert!(result.is_err(), "{}: expected error for {}", case.name, case.email);
            continue;
        }

        let report = result.unwrap_or_else(|e| panic!("{}: unexpected error: {e}", case.name));
        assert_eq!(
            report.short_local_part, case.short_local_part,
            "{}: short_local_part mismatch for {}",
            case.name, case.email
        );
        assert_eq!(
            report.has_random_pattern, case.has_random_pattern,
            "{}: has_random_pattern mismatch for {}",
            case.name, case.email
        );
        assert_eq!(
            report.too_many_consecutive_numbers, case.too_many_consecutive_numbers,
            "{}: too_many_consecutive_numbers mismatch for {}",
            case.name, case.email
        );
        assert_eq!(
            report.too_many_special_chars, case.too_many_special_chars,
            "{}: too_many_special_chars mismatch for {}",
            case.name, case.email
        );
    }
}

#[test]
fn consecutive_digit_boundary() {
    let checker = PatternChecker::new();

    for (email, expected) in [
        ("john@domain.com", false),
        ("john123@domain.com", false),
        ("john12345@domain.com", false), // exactly at the limit
        ("john123456@domain.com", true), // one over
        ("john123abc456@domain.com", false),
        ("user1234567890@domain.com", true),
    ] {
        let report = checker.check(email).expect("valid email");
        assert_eq!(
            report.too_many_consecutive_numbers, expected,
            "digit run mismatch for {email}"
        );
    }
}

#[test]
fn thresholds_are_configurable() {
    let strict = PatternChecker::with_config(PatternConfig {
        min_local_part_length: 6,
        max_consecutive_numbers: 2,
        max_special_char_ratio: 0.1,
    });

    let report = strict.check("jo.h123@domain.com").expect("valid email");
    assert!(!report.short_local_part, "7 code points is not short here");
    assert!(report.too_many_consecutive_numbers, "123 exceeds the limit of 2");
    assert!(report.too_many_special_chars, "1/7 dots exceeds ratio 0.1");

    let lax = PatternChecker::with_config(PatternConfig {
        min_local_part_length: 10,
        max_consecutive_numbers: 20,
        max_special_char_ratio: 0.9,
    });
    let report = lax.check("user123456@domain.com").expect("valid email");
    assert!(!report.too_many_consecutive_numbers);
    assert!(!report.short_local_part);
}

#[test]
fn entropy_requires_minimum_length() {
    // Short strings report zero entropy, so even wild five-char locals are
    // not flagged by the entropy rule alone.
    let checker = PatternChecker::new();
    let report = checker.check("xq9z2@domain.com").expect("valid email");
    assert!(
        !report.has_random_pattern,
        "five-char local should not trip the entropy rule"
    );
}

#[test]
fn keyboard_walk_needs_four_chars() {
    let checker = PatternChecker::new();
    let report = checker.check("qwe@domain.com").expect("valid email");
    assert!(!report.has_random_pattern, "three-char walk is below the window");
    assert!(!report.short_local_part);
}

#[test]
fn case_switch_counting() {
    assert_eq!(case_switches(&['a', 'B', 'c']), 2);
    assert_eq!(case_switches(&['a', 'a', 'a']), 0);
    assert_eq!(case_switches(&['A', 'A', 'a']), 1);
    // Digits neither count nor reset the run
    assert_eq!(case_switches(&['a', '1', 'B']), 1);
}

#[test]
fn entropy_of_repeated_chars_is_low() {
    let uniform: Vec<char> = "aaaaaaaa".chars().collect();
    assert!(shannon_entropy(&uniform) < 0.01);

    let mixed: Vec<char> = "abcdefghijklmnop".chars().collect();
    assert!(shannon_entropy(&mixed) > HIGH_ENTROPY_THRESHOLD);
}
