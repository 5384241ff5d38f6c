//! `ResponseError` for the domain [`Error`].
//!
//! Client errors are returned as produced. Internal errors are logged with
//! their real message and replaced by a generic one on the wire; the trace
//! id survives redaction so operators can correlate the two.

use std::borrow::Cow;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The payload clients may see.
fn wire_view(err: &Error) -> Cow<'_, Error> {
    if err.code() != ErrorCode::InternalError {
        return Cow::Borrowed(err);
    }
    error!(
        trace_id = err.trace_id().unwrap_or("-"),
        message = err.message(),
        details = ?err.details(),
        "internal error redacted from response"
    );
    let redacted = || Error::internal(REDACTED_MESSAGE);
    Cow::Owned(
        err.trace_id()
            .map_or_else(redacted, |id| redacted().with_trace_id(id)),
    )
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(wire_view(self))
    }
}
