//! Permissive CORS filter.
//!
//! Every response gets the same fixed set of `Access-Control-*` headers, and
//! any `OPTIONS` request is answered `200` with an empty body before it
//! reaches a handler.

use axum::{
  extract::Request,
  http::{HeaderMap, HeaderValue, Method, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};

pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, PATCH, HEAD";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With, Accept, Origin, \
                                 Access-Control-Request-Method, Access-Control-Request-Headers";
pub const EXPOSE_HEADERS: &str = "Location, Content-Disposition";
/// Preflight cache lifetime, in seconds.
pub const MAX_AGE: &str = "3600";

/// Middleware for [`axum::middleware::from_fn`].
pub async fn cors(req: Request, next: Next) -> Response {
  let mut res = if req.method() == Method::OPTIONS {
    StatusCode::OK.into_response()
  } else {
    next.run(req).await
  };
  insert_headers(res.headers_mut());
  res
}

fn insert_headers(headers: &mut HeaderMap) {
  headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
  headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
  headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
  headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
  headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static(EXPOSE_HEADERS));
}
