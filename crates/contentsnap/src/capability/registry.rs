//! Named registry of summarization capabilities.
//!
//! Built once at startup and read-only afterwards. Share it across workers
//! behind an `Arc`; lookups never mutate.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{info, warn};

use super::{LeadCapability, OpenRouterCapability, OpenRouterConfig, SummarizationCapability};
use crate::error::{Result, SummaryError};
use crate::model::OutputFormat;

/// Name of the default, large-context capability.
pub const PRIMARY: &str = "primary";
/// Name of the lighter capability used for `simplified` output.
pub const LIGHT: &str = "light";
/// Alias consulted first for long documents.
pub const LONG_TEXT: &str = "long_text";

/// Documents longer than this (in characters) prefer [`LONG_TEXT`].
pub const LONG_TEXT_THRESHOLD: usize = 1500;

/// Immutable name → capability map with aliases.
pub struct CapabilityRegistry {
    entries: BTreeMap<String, Arc<dyn SummarizationCapability>>,
    aliases: BTreeMap<String, String>,
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl CapabilityRegistry {
    pub fn builder() -> CapabilityRegistryBuilder {
        CapabilityRegistryBuilder::default()
    }

    /// Registry for offline use: [`LeadCapability`] as [`PRIMARY`], with
    /// [`LONG_TEXT`] aliased to it.
    pub fn offline() -> Result<Self> {
        Self::builder()
            .register(PRIMARY, Arc::new(LeadCapability::new(PRIMARY)))
            .alias(LONG_TEXT, PRIMARY)
            .build()
    }

    /// OpenRouter-backed registry: `config.model` as [`PRIMARY`] (also
    /// serving [`LONG_TEXT`]) and `light_model` as [`LIGHT`].
    pub fn openrouter(
        api_key: &str,
        config: OpenRouterConfig,
        light_model: &str,
        runtime: Handle,
    ) -> Result<Self> {
        let light_config = config.clone().with_model(light_model);
        let primary = OpenRouterCapability::new(PRIMARY, api_key, config, runtime.clone())
            .map_err(SummaryError::CapabilitySetup)?;
        let light = OpenRouterCapability::new(LIGHT, api_key, light_config, runtime)
            .map_err(SummaryError::CapabilitySetup)?;
        info!(
            primary = primary.model(),
            light = light.model(),
            "configured OpenRouter capabilities"
        );
        Self::builder()
            .register(PRIMARY, Arc::new(primary))
            .register(LIGHT, Arc::new(light))
            .alias(LONG_TEXT, PRIMARY)
            .build()
    }

    /// Resolve a name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SummarizationCapability>> {
        let target = self.aliases.get(name).map_or(name, String::as_str);
        self.entries.get(target).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names followed by aliases, each group sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .keys()
            .chain(self.aliases.keys())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the capability to use for a document of `text_len`
    /// characters rendered as `format`.
    ///
    /// Long documents prefer [`LONG_TEXT`], `simplified` prefers [`LIGHT`],
    /// and everything else uses [`PRIMARY`]. Missing preferences fall back
    /// to [`PRIMARY`], and a registry without [`PRIMARY`] falls back to its
    /// first entry.
    pub fn select_name(&self, text_len: usize, format: &OutputFormat) -> &str {
        let preferred = if text_len > LONG_TEXT_THRESHOLD {
            LONG_TEXT
        } else if *format == OutputFormat::Simplified {
            LIGHT
        } else {
            PRIMARY
        };
        let candidates: [&str; 2] = [preferred, PRIMARY];
        candidates
            .into_iter()
            .find(|name| self.contains(name))
            .or_else(|| self.entries.keys().next().map(String::as_str))
            .unwrap_or(PRIMARY)
    }

    /// Resolve the capability for a request.
    pub fn select(
        &self,
        text_len: usize,
        format: &OutputFormat,
    ) -> Result<Arc<dyn SummarizationCapability>> {
        let name = self.select_name(text_len, format);
        self.get(name)
            .ok_or_else(|| SummaryError::UnknownCapability(name.to_string()))
    }
}

/// Collects capabilities and aliases, then validates them in [`build`](Self::build).
#[derive(Default)]
pub struct CapabilityRegistryBuilder {
    entries: BTreeMap<String, Arc<dyn SummarizationCapability>>,
    aliases: BTreeMap<String, String>,
}

impl CapabilityRegistryBuilder {
    /// Register a capability under `name`, replacing any previous entry.
    pub fn register(
        mut self,
        name: impl Into<String>,
        capability: Arc<dyn SummarizationCapability>,
    ) -> Self {
        self.entries.insert(name.into(), capability);
        self
    }

    /// Make `alias` resolve to `target`.
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    /// Finish the registry. Fails if nothing was registered.
    ///
    /// Aliases pointing at unregistered names are dropped with a warning.
    pub fn build(self) -> Result<CapabilityRegistry> {
        if self.entries.is_empty() {
            return Err(SummaryError::NoCapabilityAvailable);
        }
        let entries = self.entries;
        let aliases: BTreeMap<String, String> = self
            .aliases
            .into_iter()
            .filter(|(alias, target)| {
                let known = entries.contains_key(target);
                if !known {
                    warn!(%alias, %target, "dropping alias to unregistered capability");
                }
                known
            })
            .collect();

        info!(
            capabilities = ?entries.keys().collect::<Vec<_>>(),
            aliases = ?aliases,
            "capability registry ready"
        );
        Ok(CapabilityRegistry { entries, aliases })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::SummaryBudget;
    use crate::capability::InvokeOptions;

    struct Named(&'static str);

    impl SummarizationCapability for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn invoke(
            &self,
            _: &str,
            _: SummaryBudget,
            _: &InvokeOptions,
        ) -> std::result::Result<String, String> {
            Ok(self.0.to_string())
        }
    }

    fn registry_with(names: &[&'static str]) -> CapabilityRegistry {
        names
            .iter()
            .fold(CapabilityRegistry::builder(), |b, name| {
                b.register(*name, Arc::new(Named(*name)))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn empty_registry_fails_fast() {
        let err = CapabilityRegistry::builder().build().unwrap_err();
        assert_eq!(err, SummaryError::NoCapabilityAvailable);
    }

    #[test]
    fn alias_resolves_to_target() {
        let registry = CapabilityRegistry::builder()
            .register(PRIMARY, Arc::new(Named("big")))
            .alias(LONG_TEXT, PRIMARY)
            .build()
            .unwrap();
        assert_eq!(registry.get(LONG_TEXT).unwrap().name(), "big");
        assert_eq!(registry.names(), vec!["primary", "long_text"]);
    }

    #[test]
    fn dangling_alias_is_dropped() {
        let registry = CapabilityRegistry::builder()
            .register(PRIMARY, Arc::new(Named("big")))
            .alias(LONG_TEXT, "missing")
            .build()
            .unwrap();
        assert!(!registry.contains(LONG_TEXT));
    }

    #[test]
    fn simplified_prefers_light_capability() {
        let registry = registry_with(&[PRIMARY, LIGHT]);
        assert_eq!(registry.select_name(800, &OutputFormat::Simplified), LIGHT);
        assert_eq!(registry.select_name(800, &OutputFormat::Tldr), PRIMARY);
        assert_eq!(registry.select_name(800, &OutputFormat::BulletPoints), PRIMARY);
    }

    #[test]
    fn long_text_wins_over_format() {
        let registry = registry_with(&[PRIMARY, LIGHT, LONG_TEXT]);
        assert_eq!(registry.select_name(5000, &OutputFormat::Simplified), LONG_TEXT);

        let without_long = registry_with(&[PRIMARY, LIGHT]);
        assert_eq!(
            without_long.select_name(5000, &OutputFormat::Simplified),
            PRIMARY
        );
    }

    #[test]
    fn offline_registry_serves_every_selection() {
        let registry = CapabilityRegistry::offline().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.select(5000, &OutputFormat::Tldr).unwrap().name(), PRIMARY);
        assert_eq!(
            registry.select(800, &OutputFormat::Simplified).unwrap().name(),
            PRIMARY
        );
    }

    #[test]
    fn openrouter_registry_routes_simplified_to_light_model() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let registry = CapabilityRegistry::openrouter(
            "sk-test",
            OpenRouterConfig::default(),
            "small/model",
            rt.handle().clone(),
        )
        .unwrap();
        assert_eq!(registry.names(), vec!["light", "primary", "long_text"]);
        assert_eq!(registry.select(800, &OutputFormat::Simplified).unwrap().name(), LIGHT);
        assert_eq!(registry.select(5000, &OutputFormat::Simplified).unwrap().name(), PRIMARY);
    }

    #[test]
    fn missing_primary_falls_back_to_first_entry() {
        let registry = registry_with(&["offline"]);
        let capability = registry.select(800, &OutputFormat::Tldr).unwrap();
        assert_eq!(capability.name(), "offline");
    }
}
