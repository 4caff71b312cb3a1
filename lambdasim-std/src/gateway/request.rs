//! Gateway-proxy event construction.

use super::template::{PathParams, PathTemplate};
use lambdasim_core::{Headers, InboundRequest, MultiValueHeaders};
use serde_json::{Value, json};

/// Split every header value on `,`, trimming each segment.
pub fn multi_value_headers(headers: &Headers) -> MultiValueHeaders {
    headers
        .iter()
        .map(|(name, value)| {
            let values = value.split(',').map(|part| part.trim().to_string()).collect();
            (name.clone(), values)
        })
        .collect()
}

/// Build the proxy event for `request`.
pub(crate) fn proxy_event(request: &InboundRequest, template: Option<&PathTemplate>) -> Value {
    let path_parameters = template
        .map(|template| template.extract(request.path()))
        .unwrap_or_else(PathParams::new);

    json!({
        "resource": template.map(PathTemplate::as_str),
        "httpMethod": request.method(),
        "path": request.url(),
        "body": request.body().to_string(),
        "pathParameters": path_parameters,
        "queryStringParameters": request.query(),
        "headers": request.headers(),
        "multiValueHeaders": multi_value_headers(request.headers()),
        "isBase64Encoded": false,
    })
}
