//! Handlers for `GET /persons/search` and `GET /persons/department`.
//!
//! Both take the search term in a `name` query parameter and reject a missing
//! or blank term with 400.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use personnel_core::{person::Person, store::PersonStore, validate::is_blank};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct NameParams {
  pub name: Option<String>,
}

impl NameParams {
  fn required(self, message: &str) -> Result<String, ApiError> {
    self
      .name
      .filter(|n| !is_blank(n))
      .ok_or_else(|| ApiError::BadRequest(message.to_owned()))
  }
}

/// `GET /persons/search?name=<text>`: substring match over `name`, `nom`
/// and `prenom`, ignoring case.
pub async fn by_name<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<NameParams>, QueryRejection>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
{
  let Query(params) = params?;
  let name = params.required("Search parameter 'name' is required")?;

  let persons = store
    .find_by_name(&name)
    .await
    .map_err(|e| ApiError::from_store("Error searching persons", e))?;
  Ok(Json(persons))
}

/// `GET /persons/department?name=<departement>`: exact match.
pub async fn by_department<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<NameParams>, QueryRejection>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
{
  let Query(params) = params?;
  let departement = params.required("Query parameter 'name' is required")?;

  let persons = store
    .find_by_departement(&departement)
    .await
    .map_err(|e| ApiError::from_store("Error searching persons by department", e))?;
  Ok(Json(persons))
}
