//! HTTP inbound adapter exposing the REST endpoints under `/chronograf/v1`.

pub mod error;
pub mod explorations;
pub mod health;
pub mod schemas;
pub mod sources;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
