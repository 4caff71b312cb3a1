//! URL templates with named path parameters.

use lambdasim_core::TemplateError;
use matchit::Router as InnerRouter;
use std::{collections::BTreeMap, fmt};

/// Path parameter name to value mapping.
pub type PathParams = BTreeMap<String, String>;

/// A compiled URL template such as `/resource/:id/sub/:subId`.
///
/// Segments may be written `:name`, `{name}`, or `{name+}` for a greedy
/// parameter spanning the rest of the path.
pub struct PathTemplate {
    template: String,
    router: InnerRouter<()>,
}

impl PathTemplate {
    /// Compile `template`.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut router = InnerRouter::new();
        router
            .insert(to_route(template), ())
            .map_err(|e| TemplateError::Invalid {
                template: template.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            template: template.to_string(),
            router,
        })
    }

    /// The template as supplied.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Named parameters of `path`; empty when the path does not match.
    pub fn extract(&self, path: &str) -> PathParams {
        match self.router.at(path) {
            Ok(matched) => matched
                .params
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            Err(_) => PathParams::new(),
        }
    }
}

impl fmt::Debug for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathTemplate").field(&self.template).finish()
    }
}

/// Rewrite a template into matchit's route syntax.
fn to_route(template: &str) -> String {
    template
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix("+}"))
            {
                format!("{{*{name}}}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
