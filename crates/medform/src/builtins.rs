//! Built-in validators.
//!
//! Every built-in fails on an absent value. Digits are ASCII `0-9` only.
//! `minLength` and `maxLength` also fail on an empty value whatever the
//! bound, so an optional field must not declare them.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::registry::ValidatorRegistry;
use crate::rules::RuleParam;

/// Non-empty after trimming whitespace.
pub const REQUIRED: &str = "required";
/// Character count at least the parameter.
pub const MIN_LENGTH: &str = "minLength";
/// Character count at most the parameter.
pub const MAX_LENGTH: &str = "maxLength";
/// `local@domain.tld` address.
pub const EMAIL: &str = "email";
/// 15 or 18 character national ID number.
pub const ID_CARD: &str = "idCard";
/// 11 digit mobile number.
pub const PHONE: &str = "phone";
/// Finite floating-point number.
pub const NUMERIC: &str = "numeric";
/// Optionally signed digits.
pub const INTEGER: &str = "integer";
/// Digits with a value above zero.
pub const POSITIVE_INTEGER: &str = "positiveInteger";
/// Number within an inclusive interval.
pub const RANGE: &str = "range";
/// Calendar date or date-time.
pub const DATE: &str = "date";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static ID_CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{15}|[0-9]{18}|[0-9]{17}[0-9Xx])$").expect("valid id pattern")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9][0-9]{9}$").expect("valid phone pattern"));

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("valid integer pattern"));

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid digits pattern"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Registers every built-in validator.
pub fn register_all(registry: &mut ValidatorRegistry) {
    registry.register(REQUIRED, required);
    registry.register(MIN_LENGTH, min_length);
    registry.register(MAX_LENGTH, max_length);
    registry.register(EMAIL, email);
    registry.register(ID_CARD, id_card);
    registry.register(PHONE, phone);
    registry.register(NUMERIC, numeric);
    registry.register(INTEGER, integer);
    registry.register(POSITIVE_INTEGER, positive_integer);
    registry.register(RANGE, range);
    registry.register(DATE, date);
}

/// Value is present and not blank.
pub fn required(value: Option<&str>, _: &RuleParam) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[allow(clippy::cast_precision_loss)]
fn char_count(value: &str) -> f64 {
    value.chars().count() as f64
}

/// Value is non-empty and has at least `param` characters.
pub fn min_length(value: Option<&str>, param: &RuleParam) -> bool {
    match (value, param.as_number()) {
        (Some(v), Some(min)) if !v.is_empty() => char_count(v) >= min,
        _ => false,
    }
}

/// Value is non-empty and has at most `param` characters.
pub fn max_length(value: Option<&str>, param: &RuleParam) -> bool {
    match (value, param.as_number()) {
        (Some(v), Some(max)) if !v.is_empty() => char_count(v) <= max,
        _ => false,
    }
}

/// Value looks like an email address.
pub fn email(value: Option<&str>, _: &RuleParam) -> bool {
    value.is_some_and(|v| EMAIL_RE.is_match(v))
}

/// Value is a 15 digit, 18 digit, or 17 digit plus checksum ID number.
pub fn id_card(value: Option<&str>, _: &RuleParam) -> bool {
    value.is_some_and(|v| ID_CARD_RE.is_match(v))
}

/// Value is an 11 digit mobile number starting with `1[3-9]`.
pub fn phone(value: Option<&str>, _: &RuleParam) -> bool {
    value.is_some_and(|v| PHONE_RE.is_match(v))
}

/// Value parses as a finite number.
pub fn numeric(value: Option<&str>, _: &RuleParam) -> bool {
    parse_number(value).is_some()
}

/// Value is an optionally signed run of digits.
pub fn integer(value: Option<&str>, _: &RuleParam) -> bool {
    value.is_some_and(|v| INTEGER_RE.is_match(v))
}

/// Value is a run of digits greater than zero.
pub fn positive_integer(value: Option<&str>, _: &RuleParam) -> bool {
    value.is_some_and(|v| DIGITS_RE.is_match(v) && v.bytes().any(|b| b != b'0'))
}

/// Value parses as a number within `[min, max]`.
pub fn range(value: Option<&str>, param: &RuleParam) -> bool {
    match (parse_number(value), param.as_range()) {
        (Some(n), Some((min, max))) => n >= min && n <= max,
        _ => false,
    }
}

/// Value parses as a calendar date or date-time.
///
/// Accepted: RFC 3339, ISO dates and date-times, a bare `YYYY` or `YYYY-MM`,
/// `YYYY/MM/DD`, `MM/DD/YYYY` and English month names (`Jan 15, 2024`,
/// `15 Jan 2024`). Free-form text a browser might still guess at is
/// rejected.
pub fn date(value: Option<&str>, _: &RuleParam) -> bool {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return false;
    };

    partial_date(v)
        || DateTime::parse_from_rfc3339(v).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(v, fmt).is_ok())
        || DATE_TIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(v, fmt).is_ok())
}

/// `YYYY` or `YYYY-MM`.
fn partial_date(v: &str) -> bool {
    let padded = match v.len() {
        4 => format!("{v}-01-01"),
        7 => format!("{v}-01"),
        _ => return false,
    };
    v.bytes().take(4).all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(&padded, "%Y-%m-%d").is_ok()
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ON: RuleParam = RuleParam::Flag(true);

    #[test]
    fn test_required() {
        assert!(required(Some("a"), &ON));
        assert!(required(Some("  a  "), &ON));
        assert!(!required(Some(""), &ON));
        assert!(!required(Some("   "), &ON));
        assert!(!required(None, &ON));
    }

    #[test]
    fn test_min_length() {
        let three = RuleParam::Number(3.0);
        assert!(!min_length(Some("ab"), &three));
        assert!(min_length(Some("abc"), &three));
        assert!(!min_length(Some(""), &three));
        assert!(!min_length(Some(""), &RuleParam::Number(0.0)));
        assert!(!min_length(None, &three));
    }

    #[test]
    fn test_max_length() {
        let five = RuleParam::Number(5.0);
        assert!(max_length(Some("hello"), &five));
        assert!(!max_length(Some("hello world"), &five));
        assert!(!max_length(Some(""), &five));
        assert!(!max_length(Some(""), &RuleParam::Number(0.0)));
    }

    #[test]
    fn test_length_counts_characters() {
        let two = RuleParam::Number(2.0);
        assert!(max_length(Some("张三"), &two));
        assert!(min_length(Some("张三"), &two));
    }

    #[test]
    fn test_length_with_text_or_bad_param() {
        assert!(min_length(Some("abcd"), &RuleParam::Text("4".into())));
        assert!(!min_length(Some("abcd"), &ON));
    }

    #[test]
    fn test_email() {
        assert!(email(Some("a@b.co"), &ON));
        assert!(email(Some("user.name+tag@example.co.uk"), &ON));
        assert!(!email(Some("bad"), &ON));
        assert!(!email(Some("user@example"), &ON));
        assert!(!email(Some("user@example.c"), &ON));
        assert!(!email(None, &ON));
    }

    #[test]
    fn test_id_card() {
        assert!(id_card(Some("110105199001011234"), &ON));
        assert!(id_card(Some("11010519900101123X"), &ON));
        assert!(id_card(Some("11010519900101123x"), &ON));
        assert!(id_card(Some("110105900101123"), &ON));
        assert!(!id_card(Some("1101051990010112"), &ON));
        assert!(!id_card(Some("11010519900101123Y"), &ON));
    }

    #[test]
    fn test_phone() {
        assert!(phone(Some("13812345678"), &ON));
        assert!(phone(Some("19912345678"), &ON));
        assert!(!phone(Some("12812345678"), &ON));
        assert!(!phone(Some("1381234567"), &ON));
        assert!(!phone(Some("23812345678"), &ON));
    }

    #[test]
    fn test_numeric() {
        assert!(numeric(Some("42"), &ON));
        assert!(numeric(Some("-3.5"), &ON));
        assert!(numeric(Some("1e3"), &ON));
        assert!(!numeric(Some("abc"), &ON));
        assert!(!numeric(Some(""), &ON));
        assert!(!numeric(Some("inf"), &ON));
        assert!(!numeric(Some("NaN"), &ON));
    }

    #[test]
    fn test_integer() {
        assert!(integer(Some("42"), &ON));
        assert!(integer(Some("-7"), &ON));
        assert!(!integer(Some("+7"), &ON));
        assert!(!integer(Some("4.2"), &ON));
        assert!(!integer(Some(""), &ON));
    }

    #[test]
    fn test_positive_integer() {
        assert!(positive_integer(Some("1"), &ON));
        assert!(positive_integer(Some("007"), &ON));
        assert!(positive_integer(Some("99999999999999999999999"), &ON));
        assert!(!positive_integer(Some("0"), &ON));
        assert!(!positive_integer(Some("000"), &ON));
        assert!(!positive_integer(Some("-1"), &ON));
    }

    #[test]
    fn test_digits_are_ascii_only() {
        assert!(!phone(Some("13８１２３４５６７８"), &ON));
        assert!(!id_card(Some("１１０１０５１９９００１０１１２３４"), &ON));
        assert!(!integer(Some("٣٤"), &ON));
        assert!(!positive_integer(Some("３４"), &ON));
        assert!(!numeric(Some("３４"), &ON));
    }

    #[test]
    fn test_range() {
        let bounds = RuleParam::Range { min: 1.0, max: 10.0 };
        assert!(range(Some("5"), &bounds));
        assert!(range(Some("1"), &bounds));
        assert!(range(Some("10"), &bounds));
        assert!(!range(Some("0"), &bounds));
        assert!(!range(Some("10.5"), &bounds));
        assert!(!range(Some("abc"), &bounds));
        assert!(!range(Some("5"), &RuleParam::Number(5.0)));
    }

    #[test]
    fn test_date() {
        assert!(date(Some("2024-01-15"), &ON));
        assert!(date(Some("2024/01/15"), &ON));
        assert!(date(Some("2024-01-15 08:30"), &ON));
        assert!(date(Some("2024-01-15T08:30:00"), &ON));
        assert!(date(Some("2024-01-15T08:30:00+08:00"), &ON));
        assert!(date(Some("2024"), &ON));
        assert!(date(Some("2024-01"), &ON));
        assert!(date(Some("Jan 15, 2024"), &ON));
        assert!(date(Some("January 15, 2024"), &ON));
        assert!(date(Some("15 Jan 2024"), &ON));
        assert!(date(Some("01/15/2024"), &ON));
        assert!(!date(Some("2024-13"), &ON));
        assert!(!date(Some("24"), &ON));
        assert!(!date(Some("abcd"), &ON));
        assert!(!date(Some("2024-02-30"), &ON));
        assert!(!date(Some("not a date"), &ON));
        assert!(!date(Some(""), &ON));
        assert!(!date(None, &ON));
    }

    #[test]
    fn test_deterministic() {
        let bounds = RuleParam::Range { min: 1.0, max: 10.0 };
        for _ in 0..3 {
            assert!(range(Some("5"), &bounds));
            assert!(!email(Some("bad"), &ON));
        }
    }
}
