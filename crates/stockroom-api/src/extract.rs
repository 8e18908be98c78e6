//! Extractors whose rejections render as [`ApiError`] JSON bodies.

use axum::extract::{FromRequest, FromRequestParts};
use serde::Deserialize;

use crate::error::ApiError;

/// JSON body; malformed input is a 400 with `{ "error": ... }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string; malformed input is a 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Item id from the path. A non-integer id is reported as a missing item.
#[derive(FromRequestParts, Deserialize)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ItemId(pub i64);
