//! Typed views of a captured response body.
//!
//! Two modes: `deserialize_unchecked` trusts the body and never fails,
//! `deserialize_validated` checks it against an explicit `Schema` first and
//! reports a mismatch once, as `ApiError::Validation`. Both are stateless;
//! the schema is chosen by the caller for each response, usually through a
//! `StatusSchemas` table keyed by status code.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::assertions::assert_fail;
use crate::error::{ApiError, ValidationError};
use crate::http::HttpResponse;
use crate::schema::Schema;

/// Read the body as `T` without checking its shape.
///
/// A body that does not fit `T` yields `T::default()` and a warning. The
/// fallback is all or nothing: one mismatched field discards every field,
/// including the ones that did fit.
pub fn deserialize_unchecked<T: DeserializeOwned + Default>(response: &HttpResponse) -> T {
    info!("Deserializing response to the target model without schema checking");
    match serde_json::from_value(response.body.clone()) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                status = response.status,
                body = %response.body,
                "Response does not fit the target model, every field falls back to its default: {e}"
            );
            T::default()
        }
    }
}

/// Validate the body against `schema`, then read the validated value as `T`.
pub fn deserialize_validated<T: DeserializeOwned>(response: &HttpResponse, schema: &Schema) -> Result<T, ApiError> {
    info!("Safely deserializing response against schema {schema}");
    let validated = schema.validate(&response.body).map_err(|issues| {
        warn!(status = response.status, issues = issues.len(), "Response rejected by schema");
        ValidationError {
            schema: schema.to_string(),
            body: response.body.clone(),
            issues,
        }
    })?;
    serde_json::from_value(validated).map_err(|e| {
        ApiError::Configuration(format!(
            "schema {schema} accepted the body but the target type rejected it: {e}"
        ))
    })
}

type Build<T> = Box<dyn Fn(Value) -> Result<T, serde_json::Error> + Send + Sync>;

struct Arm<T> {
    status: u16,
    schema: Schema,
    build: Build<T>,
}

/// Per-endpoint table from status code to the schema and model of the body
/// that status carries. A status with no entry fails as an unhandled branch.
pub struct StatusSchemas<T> {
    arms: Vec<Arm<T>>,
}

impl<T> Default for StatusSchemas<T> {
    fn default() -> Self {
        Self { arms: Vec::new() }
    }
}

impl<T: 'static> StatusSchemas<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// On `status`, validate against `schema`, read the body as `M` and
    /// wrap it with `wrap`.
    pub fn on<M: DeserializeOwned + 'static>(mut self, status: u16, schema: Schema, wrap: fn(M) -> T) -> Self {
        let build: Build<T> = Box::new(move |value| serde_json::from_value::<M>(value).map(wrap));
        self.arms.push(Arm { status, schema, build });
        self
    }

    pub fn schema_for(&self, status: u16) -> Option<&Schema> {
        self.arms.iter().find(|arm| arm.status == status).map(|arm| &arm.schema)
    }

    pub fn deserialize(&self, response: &HttpResponse) -> Result<T, ApiError> {
        let arm = match self.arms.iter().find(|arm| arm.status == response.status) {
            Some(arm) => arm,
            None => assert_fail(&format!("Unhandled status code: {}", response.status))?,
        };
        let validated: Value = deserialize_validated(response, &arm.schema)?;
        (arm.build)(validated).map_err(|e| {
            ApiError::Configuration(format!(
                "schema {} accepted the body but the target type rejected it: {e}",
                arm.schema
            ))
        })
    }
}
