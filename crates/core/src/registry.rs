//! Algorithm registry
//!
//! Maps each [`AlgorithmId`] to the implementation that serves it. A
//! registry is assembled once with [`RegistryBuilder`] and is read-only
//! afterwards, so lookups need no synchronization.

use once_cell::sync::Lazy;
use webcrypt_algorithms::{register_all, ImplementationMap};
use webcrypt_api::{AlgorithmId, AlgorithmImplementation, Error, Result};

/// Process-wide registry holding every family enabled at compile time
static GLOBAL: Lazy<AlgorithmRegistry> = Lazy::new(|| {
    let registry = RegistryBuilder::with_defaults().build();
    tracing::debug!(algorithms = registry.len(), "global algorithm registry built");
    registry
});

/// Immutable table of algorithm implementations
pub struct AlgorithmRegistry {
    implementations: ImplementationMap,
}

impl AlgorithmRegistry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The process-wide default registry
    pub fn global() -> &'static AlgorithmRegistry {
        &GLOBAL
    }

    /// Implementation registered for `id`
    ///
    /// Fails with [`Error::NotSupported`] when nothing is registered.
    pub fn lookup(&self, id: AlgorithmId) -> Result<&dyn AlgorithmImplementation> {
        match self.implementations.get(&id) {
            Some(implementation) => Ok(implementation.as_ref()),
            None => {
                tracing::debug!(algorithm = %id, "no implementation registered");
                Err(Error::not_supported(id.name()))
            }
        }
    }

    /// Whether `id` has an implementation
    pub fn contains(&self, id: AlgorithmId) -> bool {
        self.implementations.contains_key(&id)
    }

    /// Registered identifiers, sorted
    pub fn supported(&self) -> Vec<AlgorithmId> {
        let mut ids: Vec<_> = self.implementations.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered implementations
    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("supported", &self.supported())
            .finish()
    }
}

/// Assembles an [`AlgorithmRegistry`]
#[derive(Default)]
pub struct RegistryBuilder {
    implementations: ImplementationMap,
}

impl RegistryBuilder {
    /// An empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder holding every family enabled at compile time
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        register_all(&mut builder.implementations);
        builder
    }

    /// Install `implementation` for `id`, replacing any previous one
    pub fn register<I>(&mut self, id: AlgorithmId, implementation: I) -> &mut Self
    where
        I: AlgorithmImplementation + 'static,
    {
        if self
            .implementations
            .insert(id, Box::new(implementation))
            .is_some()
        {
            tracing::debug!(algorithm = %id, "replaced registered implementation");
        }
        self
    }

    /// By-value form of [`RegistryBuilder::register`]
    pub fn with<I>(mut self, id: AlgorithmId, implementation: I) -> Self
    where
        I: AlgorithmImplementation + 'static,
    {
        self.register(id, implementation);
        self
    }

    /// Drop the implementation for `id`, if any
    pub fn without(mut self, id: AlgorithmId) -> Self {
        self.implementations.remove(&id);
        self
    }

    /// Freeze the registry
    pub fn build(self) -> AlgorithmRegistry {
        AlgorithmRegistry {
            implementations: self.implementations,
        }
    }
}
