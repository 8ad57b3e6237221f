//! Built-in string formats
//!
//! Email addresses are matched with a pragmatic pattern rather than full
//! RFC 5322; URLs go through the `url` crate and must carry a host.

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

// local-part@domain with at least one dot in the domain and a 2+ letter TLD.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[A-Za-z0-9](?:[A-Za-z0-9._%+'-]*[A-Za-z0-9_%+'-])?@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

/// Date format used on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// # Examples
///
/// ```
/// use formwright_schema::formats::is_email;
///
/// assert!(is_email("taro@example.com"));
/// assert!(is_email("first.last+tag@mail.example.co.jp"));
/// assert!(!is_email("taro@localhost"));
/// assert!(!is_email("taro..@example.com"));
/// assert!(!is_email("not an email"));
/// ```
pub fn is_email(value: &str) -> bool {
	EMAIL_REGEX.is_match(value) && !value.contains("..")
}

/// # Examples
///
/// ```
/// use formwright_schema::formats::is_url;
///
/// assert!(is_url("https://example.com/a.png"));
/// assert!(is_url("http://localhost:8080/path?q=1"));
/// assert!(!is_url("example.com"));
/// assert!(!is_url("mailto:taro@example.com"));
/// ```
pub fn is_url(value: &str) -> bool {
	url::Url::parse(value).is_ok_and(|url| url.has_host())
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
	let value = value.trim();
	NaiveDate::parse_from_str(value, DATE_FORMAT)
		.ok()
		.or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn format_date(date: NaiveDate) -> String {
	date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("2020-04-01", Some((2020, 4, 1)))]
	#[case("2020-04-01T09:30:00+09:00", Some((2020, 4, 1)))]
	#[case(" 1999-12-31 ", Some((1999, 12, 31)))]
	#[case("2020-02-30", None)]
	#[case("04/01/2020", None)]
	#[case("", None)]
	fn test_parse_date(#[case] input: &str, #[case] expected: Option<(i32, u32, u32)>) {
		let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
		assert_eq!(parse_date(input), expected);
	}

	#[rstest]
	fn test_format_date_round_trips() {
		let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
		assert_eq!(format_date(date), "2024-01-09");
		assert_eq!(parse_date(&format_date(date)), Some(date));
	}
}
