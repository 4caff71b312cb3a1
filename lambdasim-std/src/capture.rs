//! `tracing` layer feeding handler log events into invocation transcripts.
//!
//! Handlers may log through their context (`context.log().info(..)`) or with
//! plain `tracing` macros. The engine runs every handler inside an
//! `invocation` span carrying the request id; this layer finds that span for
//! each event and, while the invocation's capture window is open, appends the
//! event to the matching transcript.
//!
//! Events outside any invocation span (a task spawned by the handler, another
//! thread) are attributed to the invocation this layer is observing when
//! exactly one has an open window. With overlapping invocations such events
//! are ambiguous and dropped.

use lambdasim_core::{INVOCATION_SPAN, InvocationLog, LOG_TARGET, REQUEST_ID_FIELD};
use std::{
    collections::BTreeSet,
    fmt::Write as _,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id},
};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// Request id remembered on an invocation span.
struct InvocationId(String);

/// A layer that copies events emitted during an invocation into its transcript.
///
/// Lines already written through an [`InvocationLog`] are forwarded to
/// `tracing` under [`LOG_TARGET`]; those are skipped so nothing is recorded
/// twice.
#[derive(Debug, Clone, Default)]
pub struct CaptureLayer {
    observed: Arc<Mutex<BTreeSet<String>>>,
}

impl CaptureLayer {
    /// Create the layer.
    pub fn new() -> Self {
        Self::default()
    }

    fn observed(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The only observed invocation with an open window, if there is exactly one.
    fn sole_open_invocation(&self) -> Option<InvocationLog> {
        let observed = self.observed();
        let mut open = observed
            .iter()
            .filter_map(|request_id| InvocationLog::active(request_id));
        match (open.next(), open.next()) {
            (Some(log), None) => Some(log),
            _ => None,
        }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if attrs.metadata().name() != INVOCATION_SPAN {
            return;
        }
        let mut visitor = RequestIdVisitor::default();
        attrs.record(&mut visitor);

        let (Some(request_id), Some(span)) = (visitor.request_id, ctx.span(id)) else {
            return;
        };
        self.observed().insert(request_id.clone());
        span.extensions_mut().insert(InvocationId(request_id));
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        if let Some(InvocationId(request_id)) = span.extensions().get::<InvocationId>() {
            self.observed().remove(request_id);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if event.metadata().target() == LOG_TARGET {
            return;
        }

        let in_span = ctx.event_scope(event).and_then(|mut scope| {
            scope.find_map(|span| {
                let extensions = span.extensions();
                extensions
                    .get::<InvocationId>()
                    .map(|InvocationId(request_id)| request_id.clone())
            })
        });
        let log = match in_span {
            Some(request_id) => InvocationLog::active(&request_id),
            None => self.sole_open_invocation(),
        };

        if let Some(log) = log {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            log.capture(*event.metadata().level(), &visitor.finish());
        }
    }
}

#[derive(Default)]
struct RequestIdVisitor {
    request_id: Option<String>,
}

impl Visit for RequestIdVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == REQUEST_ID_FIELD {
            self.request_id = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == REQUEST_ID_FIELD {
            self.request_id = Some(value.to_string());
        }
    }
}

/// Renders an event as its message followed by `name=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        let mut line = self.message;
        for (name, value) in self.fields {
            if !line.is_empty() {
                line.push(' ');
            }
            let _ = write!(line, "{name}={value}");
        }
        line
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }
}
