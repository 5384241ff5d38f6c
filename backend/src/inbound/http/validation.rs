//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` [`Error`] whose `details`
//! name the offending field, echo the rejected value and carry a stable code.

use std::str::FromStr;

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, ExplorationId, ExplorationValidationError, SourceId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    InvalidBody,
    EmptyName,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::InvalidBody => "invalid_body",
            Self::EmptyName => "empty_name",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const SOURCE_ID: Self = Self::new("sourceId");
    pub(crate) const USER_ID: Self = Self::new("userId");
    pub(crate) const EXPLORATION_ID: Self = Self::new("explorationId");

    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a non-negative integer")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidId.as_str(),
    }))
}

fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value.parse().map_err(|_| invalid_id_error(field, value))
}

/// Parse a source identifier path segment.
pub(crate) fn parse_source_id(value: &str) -> Result<SourceId, Error> {
    parse_id(value, FieldName::SOURCE_ID)
}

/// Parse a user identifier path segment.
pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    parse_id(value, FieldName::USER_ID)
}

/// Parse an exploration identifier path segment.
pub(crate) fn parse_exploration_id(value: &str) -> Result<ExplorationId, Error> {
    parse_id(value, FieldName::EXPLORATION_ID)
}

/// Map exploration content validation onto a field-level error.
pub(crate) fn exploration_content_error(err: &ExplorationValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "name",
        "code": ErrorCode::EmptyName.as_str(),
    }))
}

fn invalid_body_error(reason: &impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("request body is not valid JSON: {reason}")).with_details(
        json!({
            "field": "body",
            "code": ErrorCode::InvalidBody.as_str(),
        }),
    )
}

/// Decode a body that may legitimately be absent.
///
/// An empty body or a JSON `null` yields `None`; anything else must decode
/// as `T`.
pub(crate) fn parse_optional_json<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map_err(|err| invalid_body_error(&err))
}

/// JSON extractor configuration returning structured `invalid_request`
/// errors for malformed bodies.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use chronograf::inbound::http::validation::json_config;
///
/// let app = App::new().app_data(json_config());
/// # let _ = app;
/// ```
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        debug!(path = %req.path(), error = %err, "rejected request body");
        invalid_body_error(&err).into()
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Body {
        name: String,
    }

    #[rstest]
    #[case("abc")]
    #[case("-1")]
    #[case("")]
    #[case("1.5")]
    fn user_ids_must_be_non_negative_integers(#[case] raw: &str) {
        let err = parse_user_id(raw).expect_err("invalid id");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(err.message(), "userId must be a non-negative integer");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "userId", "value": raw, "code": "invalid_id"}))
        );
    }

    #[rstest]
    fn each_path_field_has_its_own_message() {
        let messages = [
            parse_source_id("x").expect_err("source").message().to_owned(),
            parse_user_id("x").expect_err("user").message().to_owned(),
            parse_exploration_id("x")
                .expect_err("exploration")
                .message()
                .to_owned(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[rstest]
    fn valid_ids_parse() {
        assert_eq!(parse_exploration_id("17").expect("valid"), ExplorationId::new(17));
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"  \n".as_slice())]
    #[case(b"null".as_slice())]
    fn absent_bodies_decode_to_none(#[case] raw: &[u8]) {
        let parsed: Option<Body> = parse_optional_json(raw).expect("absent body");
        assert_eq!(parsed, None);
    }

    #[rstest]
    fn present_bodies_decode() {
        let parsed: Option<Body> = parse_optional_json(br#"{"name":"q1"}"#).expect("valid body");
        assert_eq!(
            parsed,
            Some(Body {
                name: "q1".to_owned()
            })
        );
    }

    #[rstest]
    fn malformed_bodies_are_invalid_requests() {
        let err = parse_optional_json::<Body>(b"{").expect_err("malformed");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("invalid_body"))
        );
    }
}
