//! JSON REST API for person records.
//!
//! Exposes an axum [`Router`] backed by any [`PersonStore`]. CORS, tracing
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = personnel_api::api_router(Arc::new(store));
//! ```

pub mod error;
pub mod persons;
pub mod search;
pub mod stats;

use std::sync::Arc;

use axum::{Router, routing::get};
use personnel_core::store::PersonStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested or merged into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonStore + 'static,
{
  Router::new()
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::replace::<S>)
        .patch(persons::patch::<S>)
        .delete(persons::delete::<S>),
    )
    // Search
    .route("/persons/search", get(search::by_name::<S>))
    .route("/persons/department", get(search::by_department::<S>))
    // Aggregates
    .route("/persons/count", get(stats::count::<S>))
    .route("/persons/departements", get(stats::departements::<S>))
    .route("/persons/postes", get(stats::postes::<S>))
    .with_state(store)
}
