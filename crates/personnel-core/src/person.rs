//! The `Person` entity and the body accepted by create and full update.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  validate::{is_blank, is_valid_email, parse_hire_date},
};

// ─── Entity ──────────────────────────────────────────────────────────────────

/// An employee record as stored and as returned by the API.
///
/// Unset optional fields serialise as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  /// Assigned by the store on creation; never changes afterwards.
  pub id:            i64,
  pub name:          String,
  pub age:           i32,
  /// Family name.
  pub nom:           String,
  /// Given name.
  pub prenom:        String,
  pub email:         String,
  pub telephone:     Option<String>,
  /// Job title.
  pub poste:         Option<String>,
  pub departement:   Option<String>,
  /// Hire date, serialised as `YYYY-MM-DD`.
  pub date_embauche: Option<NaiveDate>,
}

/// A validated person that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  pub name:          String,
  pub age:           i32,
  pub nom:           String,
  pub prenom:        String,
  pub email:         String,
  pub telephone:     Option<String>,
  pub poste:         Option<String>,
  pub departement:   Option<String>,
  pub date_embauche: Option<NaiveDate>,
}

impl NewPerson {
  /// Attach an id, producing a full record. Used by the store after insert
  /// and by full update, which keeps the existing id.
  pub fn into_person(self, id: i64) -> Person {
    Person {
      id,
      name:          self.name,
      age:           self.age,
      nom:           self.nom,
      prenom:        self.prenom,
      email:         self.email,
      telephone:     self.telephone,
      poste:         self.poste,
      departement:   self.departement,
      date_embauche: self.date_embauche,
    }
  }
}

// ─── Age ─────────────────────────────────────────────────────────────────────

/// An age as it arrives on the wire: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeValue {
  Number(i64),
  /// Truncated toward zero, so `30.9` is 30.
  Fractional(f64),
  Text(String),
}

impl AgeValue {
  /// Resolve to a positive `i32`.
  pub fn resolve(&self) -> Result<i32> {
    let n = match self {
      AgeValue::Number(n) => *n,
      AgeValue::Fractional(f) if f.is_finite() => f.trunc() as i64,
      AgeValue::Fractional(_) => return Err(Error::validation("Invalid age format")),
      AgeValue::Text(s) => s
        .parse::<i64>()
        .map_err(|_| Error::validation("Invalid age format"))?,
    };
    if n <= 0 {
      return Err(Error::validation("Age must be a positive number"));
    }
    i32::try_from(n).map_err(|_| Error::validation("Invalid age format"))
  }
}

impl From<i64> for AgeValue {
  fn from(n: i64) -> Self { AgeValue::Number(n) }
}

// ─── Create / replace body ───────────────────────────────────────────────────

/// Request body for `POST /persons` and `PUT /persons/{id}`.
///
/// Every field is optional at the parsing stage so that a missing field is
/// reported with its own message by [`PersonInput::validate`]. An `id` in the
/// body is ignored. Text fields also take JSON numbers and booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub name:          Option<String>,
  pub age:           Option<AgeValue>,
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub nom:           Option<String>,
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub prenom:        Option<String>,
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub email:         Option<String>,
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub telephone:     Option<String>,
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub poste:         Option<String>,
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub departement:   Option<String>,
  #[serde(default, deserialize_with = "crate::scalar::text")]
  pub date_embauche: Option<String>,
}

impl PersonInput {
  /// Apply the create/replace rules in order and return the first failure.
  ///
  /// String fields are kept exactly as supplied. A blank `dateEmbauche` is
  /// treated as unset. Email uniqueness needs the store and is checked by
  /// the caller.
  pub fn validate(self) -> Result<NewPerson> {
    let name = required(self.name, "Name is required")?;
    let age = self
      .age
      .as_ref()
      .ok_or_else(|| Error::validation("Age must be a positive number"))?
      .resolve()?;
    let nom = required(self.nom, "Nom (last name) is required")?;
    let prenom = required(self.prenom, "Prenom (first name) is required")?;
    let email = required(self.email, "Email is required")?;
    if !is_valid_email(&email) {
      return Err(Error::validation("Invalid email format"));
    }

    let date_embauche = match self.date_embauche.filter(|d| !is_blank(d)) {
      None => None,
      Some(d) => Some(parse_hire_date(&d).ok_or_else(|| {
        Error::validation("Invalid date format for dateEmbauche. Use yyyy-MM-dd")
      })?),
    };

    Ok(NewPerson {
      name,
      age,
      nom,
      prenom,
      email,
      telephone: self.telephone,
      poste: self.poste,
      departement: self.departement,
      date_embauche,
    })
  }
}

fn required(value: Option<String>, message: &str) -> Result<String> {
  match value {
    Some(v) if !is_blank(&v) => Ok(v),
    _ => Err(Error::validation(message)),
  }
}
