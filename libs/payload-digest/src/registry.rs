use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CustomFields;
use crate::extractor::{Extractor, ExtractorContext};
use crate::extractors::default_extractors;
use crate::DigestError;

/// Summary produced for one payload, tagged with the extractor that made it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification<'r> {
    pub extractor: &'r str,
    pub summary: Value,
}

/// Runs the first extractor in `extractors` whose `matches` accepts the payload.
///
/// Ties are broken purely by order. An empty match is reported as
/// [`DigestError::NoMatchingExtractor`]; registries that end with the generic
/// fallback never hit it.
pub fn classify<'r>(
    ctx: &ExtractorContext<'_>,
    extractors: &'r [Box<dyn Extractor>],
) -> Result<Classification<'r>, DigestError> {
    let Some(extractor) = extractors.iter().find(|extractor| extractor.matches(ctx)) else {
        warn!(
            registered = extractors.len(),
            "no extractor matched payload; is a fallback registered?"
        );
        return Err(DigestError::NoMatchingExtractor);
    };

    debug!(extractor = extractor.name(), "payload classified");
    Ok(Classification {
        extractor: extractor.name(),
        summary: extractor.summarize(ctx),
    })
}

/// Ordered, immutable set of extractors with unique names.
pub struct Registry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Registry {
    /// Empty registry. Without a fallback, unmatched payloads are errors.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// The built-in extractors in default priority order.
    pub fn with_defaults() -> Self {
        Self {
            extractors: default_extractors(),
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Appends `extractor` at the lowest priority.
    pub fn register<E>(&mut self, extractor: E) -> Result<(), DigestError>
    where
        E: Extractor + 'static,
    {
        self.push(Box::new(extractor))
    }

    fn push(&mut self, extractor: Box<dyn Extractor>) -> Result<(), DigestError> {
        if self.get(extractor.name()).is_some() {
            return Err(DigestError::DuplicateExtractor {
                name: extractor.name().to_string(),
            });
        }
        self.extractors.push(extractor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.name() == name)
            .map(|extractor| extractor.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.extractors.iter().map(|extractor| extractor.name())
    }

    pub fn extractors(&self) -> &[Box<dyn Extractor>] {
        &self.extractors
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    pub fn classify(
        &self,
        body: &Value,
        custom_fields: &CustomFields,
    ) -> Result<Classification<'_>, DigestError> {
        classify(&ExtractorContext::new(body, custom_fields), &self.extractors)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("extractors", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Process-wide registry holding the built-in extractors.
pub fn default_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::with_defaults)
}

/// Builds a registry where caller extractors take priority over the built-ins.
pub struct RegistryBuilder {
    custom: Vec<Box<dyn Extractor>>,
    include_defaults: bool,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            custom: Vec::new(),
            include_defaults: true,
        }
    }
}

impl RegistryBuilder {
    pub fn extractor<E>(mut self, extractor: E) -> Self
    where
        E: Extractor + 'static,
    {
        self.custom.push(Box::new(extractor));
        self
    }

    /// Leave out the built-in extractors, including the generic fallback.
    pub fn without_defaults(mut self) -> Self {
        self.include_defaults = false;
        self
    }

    pub fn build(self) -> Result<Registry, DigestError> {
        let mut registry = Registry::new();
        let defaults = if self.include_defaults {
            default_extractors()
        } else {
            Vec::new()
        };

        for extractor in self.custom.into_iter().chain(defaults) {
            registry.push(extractor)?;
        }

        debug!(extractors = registry.len(), "extractor registry built");
        Ok(registry)
    }
}
