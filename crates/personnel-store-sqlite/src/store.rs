//! SQLite implementation of [`PersonStore`] via [`SqliteStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};

use personnel_core::{
  person::{NewPerson, Person},
  store::PersonStore,
};

use crate::{
  Error, Result,
  encode::{RawPerson, contains_pattern, encode_date},
  schema::{PERSON_COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. Call
/// [`SqliteStore::close`] once at shutdown; clones used afterwards fail with
/// a closed-connection error.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection, waiting for queued calls to finish.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` of [`PERSON_COLUMNS`] and decode every row.
  async fn query_persons(&self, sql: String, params: Vec<Value>) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  /// Run a single-column text `SELECT`.
  async fn query_strings(&self, sql: &'static str) -> Result<Vec<String>> {
    let values = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(values)
  }

  /// Run a `SELECT COUNT(*)`.
  async fn query_count(&self, sql: &'static str, params: Vec<Value>) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(sql, rusqlite::params_from_iter(params), |r| r.get(0))?)
      })
      .await?;
    Ok(u64::try_from(n).unwrap_or_default())
  }
}

/// `true` when a write hit the `UNIQUE` constraint on `persons.email`, the
/// only unique column besides the rowid.
fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

/// Classify a failed transactional write. Duplicate emails surface as the
/// core error so callers report them like the application-level check.
fn write_error(action: &'static str, email: &str, e: tokio_rusqlite::Error) -> Error {
  if is_unique_violation(&e) {
    Error::Core(personnel_core::Error::EmailTaken(email.to_owned()))
  } else {
    Error::Write { action, source: e }
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_all(&self) -> Result<Vec<Person>> {
    self
      .query_persons(format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY id DESC"), vec![])
      .await
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
            rusqlite::params![id],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn find_by_name(&self, text: &str) -> Result<Vec<Person>> {
    let pattern = contains_pattern(text);
    self
      .query_persons(
        format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE LOWER(name)   LIKE LOWER(?1) ESCAPE '\\'
              OR LOWER(nom)    LIKE LOWER(?1) ESCAPE '\\'
              OR LOWER(prenom) LIKE LOWER(?1) ESCAPE '\\'
           ORDER BY id DESC"
        ),
        vec![Value::Text(pattern)],
      )
      .await
  }

  async fn find_by_departement(&self, departement: &str) -> Result<Vec<Person>> {
    self
      .query_persons(
        format!("SELECT {PERSON_COLUMNS} FROM persons WHERE departement = ?1 ORDER BY id DESC"),
        vec![Value::Text(departement.to_owned())],
      )
      .await
  }

  async fn find_with_pagination(&self, page: u32, page_size: u32) -> Result<Vec<Person>> {
    let offset = i64::from(page.max(1) - 1).saturating_mul(i64::from(page_size));
    self
      .query_persons(
        format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY id DESC LIMIT ?1 OFFSET ?2"),
        vec![Value::Integer(i64::from(page_size)), Value::Integer(offset)],
      )
      .await
  }

  async fn exists_by_email(&self, email: &str) -> Result<bool> {
    let n = self
      .query_count(
        "SELECT COUNT(*) FROM persons WHERE LOWER(email) = LOWER(?1)",
        vec![Value::Text(email.to_owned())],
      )
      .await?;
    Ok(n > 0)
  }

  async fn exists_by_email_excluding_id(&self, email: &str, exclude_id: i64) -> Result<bool> {
    let n = self
      .query_count(
        "SELECT COUNT(*) FROM persons WHERE LOWER(email) = LOWER(?1) AND id != ?2",
        vec![Value::Text(email.to_owned()), Value::Integer(exclude_id)],
      )
      .await?;
    Ok(n > 0)
  }

  async fn count(&self) -> Result<u64> {
    self.query_count("SELECT COUNT(*) FROM persons", vec![]).await
  }

  async fn count_by_departement(&self, departement: &str) -> Result<u64> {
    self
      .query_count(
        "SELECT COUNT(*) FROM persons WHERE departement = ?1",
        vec![Value::Text(departement.to_owned())],
      )
      .await
  }

  async fn all_departements(&self) -> Result<Vec<String>> {
    self
      .query_strings(
        "SELECT DISTINCT departement FROM persons
         WHERE departement IS NOT NULL ORDER BY departement",
      )
      .await
  }

  async fn all_postes(&self) -> Result<Vec<String>> {
    self
      .query_strings("SELECT DISTINCT poste FROM persons WHERE poste IS NOT NULL ORDER BY poste")
      .await
  }

  // ── Writes ────────────────────────────────────────────────────────────────
  //
  // Each write runs in one transaction. An early return drops `tx` without
  // committing, which rolls it back.

  async fn create(&self, person: NewPerson) -> Result<Person> {
    let email = person.email.clone();
    let row = person.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO persons (
             name, age, nom, prenom, email,
             telephone, poste, departement, date_embauche
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            row.name,
            row.age,
            row.nom,
            row.prenom,
            row.email,
            row.telephone,
            row.poste,
            row.departement,
            encode_date(row.date_embauche),
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
      })
      .await
      .map_err(|e| write_error("creating", &email, e))?;

    Ok(person.into_person(id))
  }

  async fn update(&self, person: &Person) -> Result<()> {
    let id = person.id;
    let row = person.clone();

    let found: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE persons SET
             name = ?2, age = ?3, nom = ?4, prenom = ?5, email = ?6,
             telephone = ?7, poste = ?8, departement = ?9, date_embauche = ?10
           WHERE id = ?1",
          rusqlite::params![
            row.id,
            row.name,
            row.age,
            row.nom,
            row.prenom,
            row.email,
            row.telephone,
            row.poste,
            row.departement,
            encode_date(row.date_embauche),
          ],
        )?;
        if changed == 0 {
          return Ok(false);
        }
        tx.commit()?;
        Ok(true)
      })
      .await
      .map_err(|e| write_error("updating", &person.email, e))?;

    if !found {
      return Err(personnel_core::Error::PersonNotFound(id).into());
    }
    Ok(())
  }

  async fn delete(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM persons WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(|e| Error::Write { action: "deleting", source: e })?;
    Ok(())
  }
}
