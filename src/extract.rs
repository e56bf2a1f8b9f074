// src/extract.rs
//! Extractors whose rejections render through [`PollError`], so malformed
//! queries and bodies get the same JSON error shape as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::PollError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(PollError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(PollError))]
pub struct QueryParams<T>(pub T);
