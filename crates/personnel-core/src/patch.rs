//! Partial update request for `PATCH /persons/{id}`.
//!
//! Each field distinguishes three states: absent (leave untouched), explicit
//! `null`, and a value. Keys that do not name a field are collected so an
//! empty body can be told apart from one that only carries unknown keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::{
  Error, Result,
  person::{AgeValue, Person},
  validate::{is_blank, is_valid_email, parse_hire_date},
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub name:          Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub age:           Option<Option<AgeValue>>,
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub nom:           Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub prenom:        Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub email:         Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub telephone:     Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub poste:         Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub departement:   Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::scalar::present_text")]
  pub date_embauche: Option<Option<String>>,
  /// Keys that match no field. Never applied.
  #[serde(flatten)]
  pub unrecognized:  BTreeMap<String, serde_json::Value>,
}

/// Maps a present key to `Some(..)` even when its value is `null`; absent
/// keys fall back to `Default` (`None`).
fn present<'de, D, T>(d: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(d).map(Some)
}

impl PersonPatch {
  /// `true` when the body carried no keys at all.
  pub fn is_empty(&self) -> bool {
    !self.has_recognized_fields() && self.unrecognized.is_empty()
  }

  pub fn has_recognized_fields(&self) -> bool {
    self.name.is_some()
      || self.age.is_some()
      || self.nom.is_some()
      || self.prenom.is_some()
      || self.email.is_some()
      || self.telephone.is_some()
      || self.poste.is_some()
      || self.departement.is_some()
      || self.date_embauche.is_some()
  }

  /// Validate and apply every present field, returning the patched record.
  /// `person` itself is never modified, so a rejected patch leaves it
  /// intact.
  pub fn apply(self, person: &Person) -> Result<Person> {
    self.stage(person)?.finish()
  }

  /// Check and apply the fields up to and including `email`. The rest are
  /// held back until [`StagedPatch::finish`], so a caller can check email
  /// uniqueness before any later field is looked at.
  pub fn stage(self, person: &Person) -> Result<StagedPatch> {
    if self.is_empty() {
      return Err(Error::validation("No fields provided for update"));
    }
    if !self.has_recognized_fields() {
      return Err(Error::validation("No valid fields provided for update"));
    }

    let mut out = person.clone();

    if let Some(name) = self.name {
      out.name = non_blank(name, "Name cannot be empty")?;
    }
    if let Some(age) = self.age {
      out.age = age
        .ok_or_else(|| Error::validation("Age must be a positive number"))?
        .resolve()?;
    }
    if let Some(nom) = self.nom {
      out.nom = non_blank(nom, "Nom cannot be empty")?;
    }
    if let Some(prenom) = self.prenom {
      out.prenom = non_blank(prenom, "Prenom cannot be empty")?;
    }
    let email_set = self.email.is_some();
    if let Some(email) = self.email {
      let email = non_blank(email, "Email cannot be empty")?;
      if !is_valid_email(&email) {
        return Err(Error::validation("Invalid email format"));
      }
      out.email = email;
    }

    Ok(StagedPatch {
      person: out,
      email_set,
      telephone: self.telephone,
      poste: self.poste,
      departement: self.departement,
      date_embauche: self.date_embauche,
    })
  }
}

/// A patch whose leading fields have passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedPatch {
  person:        Person,
  email_set:     bool,
  telephone:     Option<Option<String>>,
  poste:         Option<Option<String>>,
  departement:   Option<Option<String>>,
  date_embauche: Option<Option<String>>,
}

impl StagedPatch {
  /// The email this patch sets, trimmed and format-checked. Uniqueness is
  /// the caller's job.
  pub fn email(&self) -> Option<&str> {
    self.email_set.then_some(self.person.email.as_str())
  }

  /// Apply the remaining fields.
  ///
  /// Strings are stored trimmed. `telephone`, `poste` and `departement`
  /// accept anything, `null` clears them. A `null` or blank `dateEmbauche`
  /// clears the hire date.
  pub fn finish(self) -> Result<Person> {
    let mut out = self.person;

    if let Some(telephone) = self.telephone {
      out.telephone = trimmed(telephone);
    }
    if let Some(poste) = self.poste {
      out.poste = trimmed(poste);
    }
    if let Some(departement) = self.departement {
      out.departement = trimmed(departement);
    }
    if let Some(date) = self.date_embauche {
      out.date_embauche = match trimmed(date).filter(|d| !is_blank(d)) {
        None => None,
        Some(d) => Some(parse_hire_date(&d).ok_or_else(|| {
          Error::validation("Invalid date format. Use yyyy-MM-dd (e.g., 2024-01-15)")
        })?),
      };
    }

    Ok(out)
  }
}

fn trimmed(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_owned())
}

fn non_blank(value: Option<String>, message: &str) -> Result<String> {
  match trimmed(value) {
    Some(v) if !v.is_empty() => Ok(v),
    _ => Err(Error::validation(message)),
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use serde_json::json;

  use super::*;

  fn patch(value: serde_json::Value) -> PersonPatch {
    serde_json::from_value(value).expect("valid PersonPatch json")
  }

  fn bob() -> Person {
    Person {
      id:            3,
      name:          "Bob Martin".into(),
      age:           41,
      nom:           "Martin".into(),
      prenom:        "Bob".into(),
      email:         "bob@example.com".into(),
      telephone:     Some("0102030405".into()),
      poste:         Some("Accountant".into()),
      departement:   Some("Finance".into()),
      date_embauche: NaiveDate::from_ymd_opt(2019, 4, 1),
    }
  }

  fn err(value: serde_json::Value) -> String {
    match patch(value).apply(&bob()) {
      Err(Error::Validation(m)) => m,
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn absent_null_and_value_are_distinct() {
    let p = patch(json!({ "telephone": null, "poste": "Lead" }));
    assert_eq!(p.telephone, Some(None));
    assert_eq!(p.poste, Some(Some("Lead".into())));
    assert_eq!(p.departement, None);
  }

  #[test]
  fn empty_body_and_unknown_keys_are_rejected() {
    assert!(patch(json!({})).is_empty());
    assert_eq!(err(json!({})), "No fields provided for update");
    assert_eq!(err(json!({ "salary": 1000 })), "No valid fields provided for update");
    assert_eq!(err(json!({ "id": 12 })), "No valid fields provided for update");
  }

  #[test]
  fn only_present_fields_change() {
    let updated = patch(json!({ "age": 42, "poste": "  Controller " }))
      .apply(&bob())
      .unwrap();
    assert_eq!(updated.age, 42);
    assert_eq!(updated.poste.as_deref(), Some("Controller"));
    assert_eq!(updated, Person { age: 42, poste: Some("Controller".into()), ..bob() });
  }

  #[test]
  fn unknown_keys_alongside_known_ones_are_ignored() {
    let updated = patch(json!({ "nom": "Dupont", "shoeSize": 44 }))
      .apply(&bob())
      .unwrap();
    assert_eq!(updated.nom, "Dupont");
  }

  #[test]
  fn required_strings_cannot_be_blanked() {
    assert_eq!(err(json!({ "name": "  " })), "Name cannot be empty");
    assert_eq!(err(json!({ "name": null })), "Name cannot be empty");
    assert_eq!(err(json!({ "nom": "" })), "Nom cannot be empty");
    assert_eq!(err(json!({ "prenom": null })), "Prenom cannot be empty");
    assert_eq!(err(json!({ "email": "" })), "Email cannot be empty");
  }

  #[test]
  fn required_strings_are_trimmed() {
    let updated = patch(json!({ "name": "  Robert Martin ", "email": " rob@example.com " }))
      .apply(&bob())
      .unwrap();
    assert_eq!(updated.name, "Robert Martin");
    assert_eq!(updated.email, "rob@example.com");
  }

  #[test]
  fn age_must_be_positive() {
    assert_eq!(err(json!({ "age": -1 })), "Age must be a positive number");
    assert_eq!(err(json!({ "age": 0 })), "Age must be a positive number");
    assert_eq!(err(json!({ "age": null })), "Age must be a positive number");
    assert_eq!(err(json!({ "age": "abc" })), "Invalid age format");
    assert_eq!(patch(json!({ "age": "50" })).apply(&bob()).unwrap().age, 50);
  }

  #[test]
  fn email_format_is_checked() {
    assert_eq!(err(json!({ "email": "bob.example.com" })), "Invalid email format");
    let staged = patch(json!({ "email": " new@example.com " })).stage(&bob()).unwrap();
    assert_eq!(staged.email(), Some("new@example.com"));
    assert_eq!(patch(json!({ "age": 3 })).stage(&bob()).unwrap().email(), None);
  }

  #[test]
  fn optional_strings_can_be_cleared() {
    let updated = patch(json!({ "telephone": null, "departement": null }))
      .apply(&bob())
      .unwrap();
    assert_eq!(updated.telephone, None);
    assert_eq!(updated.departement, None);
    assert_eq!(updated.poste.as_deref(), Some("Accountant"));
  }

  #[test]
  fn hire_date_rules() {
    let cleared = patch(json!({ "dateEmbauche": "" })).apply(&bob()).unwrap();
    assert_eq!(cleared.date_embauche, None);

    let cleared = patch(json!({ "dateEmbauche": null })).apply(&bob()).unwrap();
    assert_eq!(cleared.date_embauche, None);

    let set = patch(json!({ "dateEmbauche": " 2024-01-15 " })).apply(&bob()).unwrap();
    assert_eq!(set.date_embauche, NaiveDate::from_ymd_opt(2024, 1, 15));

    assert_eq!(
      err(json!({ "dateEmbauche": "2024-02-30" })),
      "Invalid date format. Use yyyy-MM-dd (e.g., 2024-01-15)"
    );
  }

  #[test]
  fn first_failing_field_wins_and_source_is_untouched() {
    let original = bob();
    let r = patch(json!({ "name": "Ok", "age": -5, "nom": "" })).apply(&original);
    assert_eq!(r, Err(Error::validation("Age must be a positive number")));
    assert_eq!(original, bob());
  }

  #[test]
  fn staging_stops_at_email_and_defers_the_rest() {
    let staged = patch(json!({ "email": "new@example.com", "dateEmbauche": "2024-02-30" }))
      .stage(&bob())
      .unwrap();
    assert_eq!(staged.email(), Some("new@example.com"));
    assert_eq!(
      staged.finish(),
      Err(Error::validation("Invalid date format. Use yyyy-MM-dd (e.g., 2024-01-15)"))
    );

    let r = patch(json!({ "prenom": " ", "dateEmbauche": "2024-02-30" })).stage(&bob());
    assert_eq!(r.err(), Some(Error::validation("Prenom cannot be empty")));
  }

  #[test]
  fn applying_twice_is_idempotent() {
    let body = json!({ "poste": "CFO", "dateEmbauche": "2020-02-02", "telephone": null });
    let once = patch(body.clone()).apply(&bob()).unwrap();
    let twice = patch(body).apply(&once).unwrap();
    assert_eq!(once, twice);
  }
}
