//! Shared response envelope for API handlers.
//!
//! Every business response is `{ "code": ..., "msg": ..., "data": ... }`.
//! Handled outcomes -- including "not found" on update/delete and bad
//! credentials -- ride on HTTP 200 with the outcome in `code`, so the
//! calling UI never chokes on a transport-level error status. Transport
//! statuses are reserved for infrastructure failures and auth rejections
//! (see [`crate::error::AppError`]).

use serde::Serialize;

/// Envelope code for a successful outcome.
pub const CODE_OK: u16 = 200;
/// Envelope code for a client-input problem (missing file, bad code, ...).
pub const CODE_BAD_REQUEST: u16 = 400;
/// Envelope code for an unauthenticated request.
pub const CODE_UNAUTHORIZED: u16 = 401;
/// Envelope code for a soft "not found" (unknown project id on update/delete).
pub const CODE_NOT_FOUND: u16 = 404;
/// Envelope code for an internal failure.
pub const CODE_INTERNAL: u16 = 500;

/// Standard `{ code, msg, data }` response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub code: u16,
    pub msg: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful outcome with a payload.
    pub fn ok(msg: impl Into<String>, data: T) -> Self {
        Self {
            code: CODE_OK,
            msg: msg.into(),
            data: Some(data),
        }
    }

    /// Soft failure: success-shaped response carrying an error code.
    pub fn soft(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

impl Envelope<()> {
    /// Successful outcome with no payload.
    pub fn ok_empty(msg: impl Into<String>) -> Self {
        Self {
            code: CODE_OK,
            msg: msg.into(),
            data: None,
        }
    }
}
