//! Gateway-proxy response interpretation.

use lambdasim_core::{
    EXECUTED_VERSION_HEADER, Headers, LOG_RESULT_HEADER, MultiValueHeaders, ResponseEnvelope,
};
use serde_json::{Value, json};
use thiserror::Error;

/// Body returned when the handler's proxy response is unusable.
pub const MALFORMED_RESPONSE: &str = "malformed Lambda proxy response";
/// Body returned when the handler's proxy response has no body.
pub const MISSING_BODY: &str = "ERROR: body is missing";

/// Ways a handler can break the proxy response contract.
#[derive(Error, Debug)]
pub enum ContractViolation {
    /// `statusCode` is not an integer status.
    #[error("statusCode must be an integer HTTP status, got {0}")]
    StatusCode(Value),

    /// `body` is present but not a string.
    #[error("body must be a JSON-encoded string")]
    BodyNotString,

    /// `body` is a string that does not parse as JSON.
    #[error("body is not valid JSON: {0}")]
    BodyNotJson(#[source] serde_json::Error),
}

/// Interpret the engine's body as a proxy response.
///
/// The outer log and version headers are dropped; headers declared by the
/// handler override the remaining outer ones. Array entries of
/// `multiValueHeaders` keep their individual values for the transport.
pub(crate) fn proxy_response(
    body: Option<&Value>,
    outer: &Headers,
) -> Result<ResponseEnvelope, ContractViolation> {
    let mut headers = outer.clone();
    headers.remove(LOG_RESULT_HEADER);
    headers.remove(EXECUTED_VERSION_HEADER);

    let Some(declared) = body else {
        return Ok(ResponseEnvelope::new(200, Some(json!(MISSING_BODY)), headers));
    };

    let status_code = match declared.get("statusCode") {
        None | Some(Value::Null) => 200,
        Some(value) => value
            .as_u64()
            .and_then(|code| u16::try_from(code).ok())
            .ok_or_else(|| ContractViolation::StatusCode(value.clone()))?,
    };

    let mut multi_value_headers = MultiValueHeaders::new();
    if let Some(Value::Object(multi)) = declared.get("multiValueHeaders") {
        for (name, values) in multi {
            match values {
                Value::Array(values) => {
                    let values: Vec<String> = values.iter().map(header_text).collect();
                    headers.insert(name.clone(), values.join(", "));
                    multi_value_headers.insert(name.clone(), values);
                }
                other => {
                    headers.insert(name.clone(), header_text(other));
                }
            }
        }
    }
    if let Some(Value::Object(single)) = declared.get("headers") {
        for (name, value) in single {
            headers.insert(name.clone(), header_text(value));
            multi_value_headers.remove(name);
        }
    }

    let body = match declared.get("body") {
        None | Some(Value::Null) => json!(MISSING_BODY),
        Some(Value::String(text)) => {
            serde_json::from_str(text).map_err(ContractViolation::BodyNotJson)?
        }
        Some(_) => return Err(ContractViolation::BodyNotString),
    };

    let envelope = multi_value_headers.into_iter().fold(
        ResponseEnvelope::new(status_code, Some(body), headers),
        |envelope, (name, values)| envelope.with_multi_value_header(name, values),
    );
    Ok(envelope)
}

fn header_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
