//! Validity rules for symbol tag text.
//!
//! Asset tags look like "V-101" or "LI 204"; pipe sizings like `3/4"x1/2"`
//! are detection noise and must not become assets.

use once_cell::sync::Lazy;
use regex::Regex;

static LETTER_THEN_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z].*[0-9]").unwrap());
static DIGIT_THEN_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9].*[a-zA-Z]").unwrap());

static ONLY_NUMBER_OR_FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s]*([0-9]+|[0-9]+/[0-9]+)[\s]*$").unwrap());

// Dimension strings: a number or fraction, optionally suffixed with inches /
// percent / star marks, multiplied with another ("3/4\"x1/2\"", "1\" x 2\"").
static DIMENSION_PRODUCT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([0-9]+|[0-9]+/[0-9]+)["|%*]*[\s]*[xX][\s]*.*([0-9]+|[0-9]+/[0-9]+)["|%*]*.*$"#).unwrap()
});

// A single sizing like "3/4\"" or "1%".
static DIMENSION_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^([0-9]+|[0-9]+/[0-9]+)["%*]+$"#).unwrap());

pub fn contains_letter_and_digit(text: &str) -> bool {
    LETTER_THEN_DIGIT.is_match(text) || DIGIT_THEN_LETTER.is_match(text)
}

pub fn is_only_number_or_fraction(text: &str) -> bool {
    ONLY_NUMBER_OR_FRACTION.is_match(text)
}

pub fn is_symbol_text_invalid(text: &str) -> bool {
    DIMENSION_PRODUCT.is_match(text) || DIMENSION_SINGLE.is_match(text)
}
