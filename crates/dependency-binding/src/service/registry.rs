//! # Binding Registry
//!
//! Owns the bindings declared by a [`RegistryConfig`] and wires them to a
//! [`SessionLifecycle`].

use super::DependencyBinding;
use crate::adapters::TracingDiagnosticSink;
use crate::config::RegistryConfig;
use crate::domain::TypeCatalog;
use crate::error::ConfigError;
use crate::lifecycle::{SessionAttachment, SessionLifecycle};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::DiagnosticSink;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Named bindings sharing one type catalog.
pub struct BindingRegistry {
    catalog: Arc<TypeCatalog>,

    /// Bindings in declaration order.
    bindings: Vec<Arc<DependencyBinding>>,

    /// Name -> index into `bindings`.
    index: HashMap<String, usize>,

    /// Live lifecycle attachments; dropped with the registry.
    attachments: Mutex<Vec<SessionAttachment>>,
}

impl BindingRegistry {
    /// Build every binding in `config`, reporting through `tracing`.
    ///
    /// # Errors
    ///
    /// Any [`RegistryConfig::validate`] failure.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        Self::from_config_with(config, Arc::new(TracingDiagnosticSink), Arc::new(NoOpMetrics))
    }

    /// Build every binding in `config` with a shared sink and recorder.
    ///
    /// # Errors
    ///
    /// Any [`RegistryConfig::validate`] failure.
    pub fn from_config_with(
        config: &RegistryConfig,
        sink: Arc<dyn DiagnosticSink>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, ConfigError> {
        let catalog = config.build_catalog()?;
        config.validate_bindings(&catalog)?;
        let catalog = Arc::new(catalog);

        let mut bindings = Vec::with_capacity(config.bindings.len());
        let mut index = HashMap::with_capacity(config.bindings.len());
        for definition in &config.bindings {
            let binding = DependencyBinding::builder(
                definition.name.as_str(),
                definition.expected_type.clone(),
                Arc::clone(&catalog),
            )
            .sink(Arc::clone(&sink))
            .metrics(Arc::clone(&metrics))
            .build();

            index.insert(definition.name.clone(), bindings.len());
            bindings.push(Arc::new(binding));
        }

        info!(
            types = catalog.len(),
            bindings = bindings.len(),
            "Binding registry initialized"
        );

        Ok(Self {
            catalog,
            bindings,
            index,
            attachments: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<DependencyBinding>> {
        self.index
            .get(name)
            .map(|&position| Arc::clone(&self.bindings[position]))
    }

    /// Binding names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.bindings.iter().map(|binding| binding.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DependencyBinding>> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Attach every binding to `lifecycle`.
    ///
    /// Attachments live until [`detach`](Self::detach) or until the registry
    /// is dropped. Returns the number of bindings attached.
    pub fn attach(&self, lifecycle: &SessionLifecycle) -> usize {
        let mut attachments = self.attachments.lock();
        for binding in &self.bindings {
            attachments.push(binding.attach_to(lifecycle));
        }
        debug!(bindings = self.bindings.len(), "Registry attached to session lifecycle");
        self.bindings.len()
    }

    /// Detach every binding from every lifecycle it was attached to.
    pub fn detach(&self) {
        self.attachments.lock().clear();
    }

    /// Reset every binding. Returns the total number of callbacks dropped.
    pub fn reset_all(&self) -> usize {
        self.bindings.iter().map(|binding| binding.reset()).sum()
    }
}
