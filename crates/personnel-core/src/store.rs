//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `personnel-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::person::{NewPerson, Person};

// ─── Error classification ────────────────────────────────────────────────────

/// Implemented by backend error types so callers can recover the
/// domain-level cause (duplicate email, vanished row) without knowing the
/// backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn as_core(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a person store backend.
///
/// Every method is one self-contained unit of work: it acquires whatever
/// connection it needs and releases it before returning. Writes are atomic.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: StoreError;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All persons, newest (highest id) first.
  fn find_all(&self) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Persons whose `name`, `nom` or `prenom` contains `text`, ignoring case.
  fn find_by_name<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Persons whose department equals `departement` exactly.
  fn find_by_departement<'a>(
    &'a self,
    departement: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// One page of [`find_all`](Self::find_all). `page` is 1-indexed; a page
  /// past the end is empty.
  fn find_with_pagination(
    &self,
    page: u32,
    page_size: u32,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Case-insensitive exact match on email.
  fn exists_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Like [`exists_by_email`](Self::exists_by_email) but ignores the person
  /// with `exclude_id`.
  fn exists_by_email_excluding_id<'a>(
    &'a self,
    email: &'a str,
    exclude_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn count_by_departement<'a>(
    &'a self,
    departement: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Distinct non-null departments, sorted ascending.
  fn all_departements(&self)
  -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Distinct non-null job titles, sorted ascending.
  fn all_postes(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new person and return it with its assigned id.
  fn create(
    &self,
    person: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Replace every mutable column of the row with `person.id`.
  fn update<'a>(
    &'a self,
    person: &'a Person,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove the person with `id`. Removing an absent id is not an error.
  fn delete(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
