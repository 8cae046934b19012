use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dimension::Dimension;
use crate::error::RegistryError;
use crate::tag::Tag;

/// Built-in dimension set for protocol versions that stopped sending it.
const DEFAULT_DIMENSION_TYPES: &str = include_str!("default_dimension_types.json");

/// Registry configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Namespace assumed for bare identifiers.
    pub default_namespace: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_namespace: "minecraft".to_string(),
        }
    }
}

/// Named dimension types plus the currently active one.
///
/// Owned by the session rather than held in a global, so independent sessions
/// never observe each other's dimension. Writes happen during login and
/// respawn; reads happen continuously afterwards.
#[derive(Debug)]
pub struct DimensionRegistry {
    config: RegistryConfig,
    dimensions: RwLock<BTreeMap<String, Arc<Dimension>>>,
    current: RwLock<Arc<Dimension>>,
}

impl Default for DimensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            dimensions: RwLock::new(BTreeMap::new()),
            current: RwLock::new(Arc::new(Dimension::default())),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Prefix `name` with the default namespace unless it already has one.
    pub fn namespaced(&self, name: &str) -> String {
        if name.contains(':') {
            name.to_string()
        } else {
            format!("{}:{}", self.config.default_namespace, name)
        }
    }

    /// Store every dimension type of a registry payload.
    ///
    /// The payload is a compound holding a `<namespace>:dimension_type` (or bare
    /// `dimension_type`) compound whose `value` list contains `{name, element}`
    /// entries. Bare entry names are namespaced. Nothing is inserted unless
    /// every entry parses. Returns the number of dimensions stored.
    pub fn store_dimension_list(&self, payload: &Tag) -> Result<usize, RegistryError> {
        let _span = tracing::debug_span!("store_dimension_list").entered();

        let registry_key = self.namespaced("dimension_type");
        let root = payload.expect_compound("registry")?;
        let section = root
            .get(&registry_key)
            .or_else(|| root.get("dimension_type"))
            .ok_or(RegistryError::MissingKey(registry_key))?;
        let entries = section.expect_key("value")?.expect_list("value")?;

        let parsed = entries
            .iter()
            .map(|entry| {
                let name = entry.expect_key("name")?.expect_str("name")?;
                let element = entry.expect_key("element")?;
                Dimension::from_tag(self.namespaced(name), element)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = parsed.len();
        let mut dimensions = self.dimensions.write();
        for dim in parsed {
            tracing::trace!(name = %dim.name, min_y = dim.min_y, height = dim.height, "dimension type");
            dimensions.insert(dim.name.clone(), Arc::new(dim));
        }
        tracing::debug!(count, total = dimensions.len(), "stored dimension list");
        Ok(count)
    }

    /// Parse one definition and store it under `name`, replacing any prior entry.
    pub fn store_one_dimension(&self, name: &str, definition: &Tag) -> Result<(), RegistryError> {
        let dim = Dimension::from_tag(name, definition)?;
        tracing::debug!(name, "stored dimension");
        self.dimensions.write().insert(name.to_string(), Arc::new(dim));
        Ok(())
    }

    /// Seed the registry with the built-in overworld, caves, end and nether types.
    pub fn load_default_dimensions(&self) -> Result<usize, RegistryError> {
        let payload = Tag::from_json_str(DEFAULT_DIMENSION_TYPES)?;
        self.store_dimension_list(&payload)
    }

    /// Make `name` the current dimension.
    ///
    /// Tries `name` verbatim, then with the default namespace prepended.
    pub fn set_dimension(&self, name: &str) -> Result<Arc<Dimension>, RegistryError> {
        let dim = {
            let dimensions = self.dimensions.read();
            dimensions
                .get(name)
                .or_else(|| dimensions.get(&self.namespaced(name)))
                .cloned()
        }
        .ok_or_else(|| RegistryError::DimensionNotFound(name.to_string()))?;

        tracing::debug!(requested = name, resolved = %dim.name, "dimension set");
        *self.current.write() = Arc::clone(&dim);
        Ok(dim)
    }

    /// The current dimension. Before any [`set_dimension`](Self::set_dimension)
    /// this is [`Dimension::default`].
    pub fn dimension(&self) -> Arc<Dimension> {
        self.current.read().clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Dimension>> {
        self.dimensions.read().get(name).cloned()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.dimensions.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.dimensions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.read().is_empty()
    }

    /// Drop every entry and reset the current dimension to the default.
    pub fn clear(&self) {
        self.dimensions.write().clear();
        *self.current.write() = Arc::new(Dimension::default());
    }
}
