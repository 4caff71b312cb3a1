//! Inbound request as seen by the engine and its transforms.

use crate::envelope::Headers;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Query parameter name to value mapping.
pub type QueryParams = BTreeMap<String, String>;

/// One inbound request, already decoded by the transport.
///
/// `body` is the parsed JSON body; transports substitute `{}` for an empty or
/// unparseable payload.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    method: String,
    url: String,
    body: Value,
    headers: Headers,
    query: QueryParams,
}

impl InboundRequest {
    /// Create a request. The query string is parsed from `url`.
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        body: Value,
        headers: Headers,
    ) -> Self {
        let url = url.into();
        let query = parse_query(&url);
        Self {
            method: method.into(),
            url,
            body,
            headers,
            query,
        }
    }

    /// HTTP method as supplied.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Raw URL including any query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL without the query string.
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }

    /// Parsed JSON body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Decoded query parameters.
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Build the event handed to a handler when no transform reshapes it.
    ///
    /// Query parameters are merged under an object body, so body fields win.
    /// A `null` body yields the query parameters alone; any other non-object
    /// body is passed through unchanged.
    pub fn default_event(&self) -> Value {
        match &self.body {
            Value::Object(fields) => {
                let mut event = query_object(&self.query);
                for (key, value) in fields {
                    event.insert(key.clone(), value.clone());
                }
                Value::Object(event)
            }
            Value::Null => Value::Object(query_object(&self.query)),
            other => other.clone(),
        }
    }
}

fn query_object(query: &QueryParams) -> Map<String, Value> {
    query
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}

/// Parse the query part of `url`. Later duplicates overwrite earlier ones.
pub fn parse_query(url: &str) -> QueryParams {
    let Some((_, query)) = url.split_once('?') else {
        return QueryParams::new();
    };
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}
