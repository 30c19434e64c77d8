//! Encoding and decoding helpers between [`Person`] and its SQLite row.
//!
//! Hire dates are stored as `YYYY-MM-DD` text. Everything else maps onto a
//! native SQLite type.

use chrono::NaiveDate;
use personnel_core::{
  person::Person,
  validate::{DATE_FORMAT, format_hire_date},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> { d.map(format_hire_date) }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE ────────────────────────────────────────────────────────────────────

/// Build a `%text%` pattern in which `%`, `_` and `\` match literally.
/// Pair with `ESCAPE '\'`.
pub fn contains_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A `persons` row as read from SQLite, before the hire date is parsed.
pub struct RawPerson {
  pub id:            i64,
  pub name:          String,
  pub age:           i32,
  pub nom:           String,
  pub prenom:        String,
  pub email:         String,
  pub telephone:     Option<String>,
  pub poste:         Option<String>,
  pub departement:   Option<String>,
  pub date_embauche: Option<String>,
}

impl RawPerson {
  /// Row mapper for statements selecting [`PERSON_COLUMNS`] in order.
  ///
  /// [`PERSON_COLUMNS`]: crate::schema::PERSON_COLUMNS
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPerson {
      id:            row.get(0)?,
      name:          row.get(1)?,
      age:           row.get(2)?,
      nom:           row.get(3)?,
      prenom:        row.get(4)?,
      email:         row.get(5)?,
      telephone:     row.get(6)?,
      poste:         row.get(7)?,
      departement:   row.get(8)?,
      date_embauche: row.get(9)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:            self.id,
      name:          self.name,
      age:           self.age,
      nom:           self.nom,
      prenom:        self.prenom,
      email:         self.email,
      telephone:     self.telephone,
      poste:         self.poste,
      departement:   self.departement,
      date_embauche: self.date_embauche.as_deref().map(decode_date).transpose()?,
    })
  }
}
