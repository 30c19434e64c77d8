//! Field-level validation rules shared by create, full update and partial
//! update.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// `local@domain.tld`, ASCII only, TLD of at least two letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
    .expect("email pattern is valid")
});

/// Fixed-width `YYYY-MM-DD`; chrono alone would accept `2024-1-5`.
static DATE_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid")
});

/// Format used for `dateEmbauche` on the wire and in the database.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `true` when `s` is empty or only whitespace.
pub fn is_blank(s: &str) -> bool { s.trim().is_empty() }

/// `true` for a non-blank string matching the email pattern exactly
/// (no surrounding whitespace allowed).
pub fn is_valid_email(email: &str) -> bool {
  !is_blank(email) && EMAIL_RE.is_match(email)
}

/// Parse a hire date strictly. Overflowing days (`2024-02-30`) and
/// non-padded components are rejected rather than normalised.
pub fn parse_hire_date(s: &str) -> Option<NaiveDate> {
  if !DATE_SHAPE_RE.is_match(s) {
    return None;
  }
  NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn format_hire_date(d: NaiveDate) -> String {
  d.format(DATE_FORMAT).to_string()
}
