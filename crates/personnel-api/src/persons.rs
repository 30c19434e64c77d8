//! Handlers for `/persons` and `/persons/{id}`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | Newest first; optional `?page=&pageSize=` |
//! | `POST`   | `/persons` | Body: [`PersonInput`]; returns 201 + stored person |
//! | `GET`    | `/persons/{id}` | 404 if not found |
//! | `PUT`    | `/persons/{id}` | Full replace; body: [`PersonInput`] |
//! | `PATCH`  | `/persons/{id}` | Body: [`PersonPatch`] |
//! | `DELETE` | `/persons/{id}` | Returns `{"message", "id"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use personnel_core::{
  patch::PersonPatch,
  person::{NewPerson, Person, PersonInput},
  store::PersonStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const RETRIEVE_ALL: &str = "Error retrieving persons";
const RETRIEVE_ONE: &str = "Error retrieving person";
const CREATE: &str = "Error creating person";
const UPDATE: &str = "Error updating person";
const DELETE: &str = "Error deleting person";

/// Page size used when `page` is given without `pageSize`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

fn not_found(id: i64) -> ApiError { personnel_core::Error::PersonNotFound(id).into() }

/// Fetch the person or fail with 404; storage errors carry `context`.
async fn existing<S: PersonStore>(
  store: &S,
  id: i64,
  context: &'static str,
) -> Result<Person, ApiError> {
  store
    .find_by_id(id)
    .await
    .map_err(|e| ApiError::from_store(context, e))?
    .ok_or_else(|| not_found(id))
}

/// Unwrap a create/replace body and run the field rules.
fn validated(body: Result<Json<Option<PersonInput>>, JsonRejection>) -> Result<NewPerson, ApiError> {
  let Json(body) = body?;
  let input = body.ok_or_else(|| ApiError::BadRequest("Person data is required".into()))?;
  Ok(input.validate()?)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub page:      Option<u32>,
  pub page_size: Option<u32>,
}

/// `GET /persons[?page=<n>&pageSize=<n>]`
///
/// Without paging parameters every person is returned.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
{
  let Query(params) = params?;

  let persons = if params.page.is_none() && params.page_size.is_none() {
    store.find_all().await
  } else {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page == 0 || page_size == 0 {
      return Err(ApiError::BadRequest(
        "Query parameters 'page' and 'pageSize' must be positive".into(),
      ));
    }
    store.find_with_pagination(page, page_size).await
  }
  .map_err(|e| ApiError::from_store(RETRIEVE_ALL, e))?;

  Ok(Json(persons))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  let Path(id) = id?;
  Ok(Json(existing(&*store, id, RETRIEVE_ONE).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`: returns 201 + the stored person with its new id.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<Option<PersonInput>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
{
  let person = validated(body)?;

  let taken = store
    .exists_by_email(&person.email)
    .await
    .map_err(|e| ApiError::from_store(CREATE, e))?;
  if taken {
    return Err(personnel_core::Error::EmailTaken(person.email).into());
  }

  let created = store
    .create(person)
    .await
    .map_err(|e| ApiError::from_store(CREATE, e))?;
  tracing::info!(id = created.id, "person created");
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Full update ──────────────────────────────────────────────────────────────

/// `PUT /persons/{id}`: replaces every mutable field. Optional fields
/// missing from the body become `null`.
pub async fn replace<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<Option<PersonInput>>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  let Path(id) = id?;
  let current = existing(&*store, id, UPDATE).await?;
  let person = validated(body)?;

  if !current.email.eq_ignore_ascii_case(&person.email) {
    let taken = store
      .exists_by_email_excluding_id(&person.email, id)
      .await
      .map_err(|e| ApiError::from_store(UPDATE, e))?;
    if taken {
      return Err(personnel_core::Error::EmailTaken(person.email).into());
    }
  }

  let updated = person.into_person(id);
  store
    .update(&updated)
    .await
    .map_err(|e| ApiError::from_store(UPDATE, e))?;
  tracing::info!(id, "person replaced");
  Ok(Json(updated))
}

// ─── Partial update ───────────────────────────────────────────────────────────

/// `PATCH /persons/{id}`: only the keys present in the body are touched.
/// A taken email is reported before any field after it is checked.
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<Option<PersonPatch>>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  let Path(id) = id?;
  let current = existing(&*store, id, UPDATE).await?;
  let Json(changes) = body?;
  let changes = changes.unwrap_or_default();

  let staged = changes.stage(&current)?;

  if let Some(email) = staged.email()
    && !current.email.eq_ignore_ascii_case(email)
  {
    let taken = store
      .exists_by_email_excluding_id(email, id)
      .await
      .map_err(|e| ApiError::from_store(UPDATE, e))?;
    if taken {
      return Err(personnel_core::Error::EmailTaken(email.to_owned()).into());
    }
  }

  let updated = staged.finish()?;
  store
    .update(&updated)
    .await
    .map_err(|e| ApiError::from_store(UPDATE, e))?;
  tracing::info!(id, "person patched");
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
  pub message: String,
  /// The removed id, as a string.
  pub id:      String,
}

/// `DELETE /persons/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deleted>, ApiError>
where
  S: PersonStore,
{
  let Path(id) = id?;
  existing(&*store, id, DELETE).await?;

  store
    .delete(id)
    .await
    .map_err(|e| ApiError::from_store(DELETE, e))?;
  tracing::info!(id, "person deleted");

  Ok(Json(Deleted {
    message: "Person deleted successfully".into(),
    id:      id.to_string(),
  }))
}
