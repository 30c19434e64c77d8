//! Aggregate reads: counts and the distinct department / job title lists.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use personnel_core::{store::PersonStore, validate::is_blank};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct CountParams {
  /// Restrict the count to one department (exact match).
  pub departement: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Count {
  pub count: u64,
}

/// `GET /persons/count[?departement=<name>]`
pub async fn count<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<CountParams>, QueryRejection>,
) -> Result<Json<Count>, ApiError>
where
  S: PersonStore,
{
  let Query(params) = params?;

  let count = match params.departement.filter(|d| !is_blank(d)) {
    Some(d) => store.count_by_departement(&d).await,
    None => store.count().await,
  }
  .map_err(|e| ApiError::from_store("Error counting persons", e))?;

  Ok(Json(Count { count }))
}

/// `GET /persons/departements`: distinct departments, sorted.
pub async fn departements<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<String>>, ApiError>
where
  S: PersonStore,
{
  let values = store
    .all_departements()
    .await
    .map_err(|e| ApiError::from_store("Error retrieving departements", e))?;
  Ok(Json(values))
}

/// `GET /persons/postes`: distinct job titles, sorted.
pub async fn postes<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<String>>, ApiError>
where
  S: PersonStore,
{
  let values = store
    .all_postes()
    .await
    .map_err(|e| ApiError::from_store("Error retrieving postes", e))?;
  Ok(Json(values))
}
