//! Name-keyed registry of entity definitions and compiled entities.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::entity::{Entity, EntityParams};
use crate::error::{ModelError, ModelResult};
use crate::field::Field;

type FieldMap = Arc<dyn Fn() -> Vec<Field> + Send + Sync>;

struct Definition {
    params: EntityParams,
    map: FieldMap,
}

/// Shared metadata registry.
///
/// Entities are compiled lazily on first [`get_instance`](Self::get_instance)
/// and cached for the registry's lifetime. Compilation runs outside the
/// locks; when two threads race on the same name the first insert wins and
/// both get the same `Arc`.
pub struct EntityRegistry {
    config: ModelConfig,
    definitions: RwLock<HashMap<String, Arc<Definition>>>,
    entities: RwLock<HashMap<String, Arc<Entity>>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        info!(
            table_prefix = %config.table_prefix,
            secret_length = config.secret_length,
            "entity registry created"
        );
        Self {
            config,
            definitions: RwLock::new(HashMap::new()),
            entities: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Registers a field map to compile on first lookup.
    pub fn define<F>(&self, name: &str, params: EntityParams, map: F) -> ModelResult<()>
    where
        F: Fn() -> Vec<Field> + Send + Sync + 'static,
    {
        let name = Entity::normalize_name(name);
        if self.entities.read().contains_key(&name) {
            return Err(ModelError::DuplicateEntity(name));
        }
        let mut definitions = self.definitions.write();
        if definitions.contains_key(&name) {
            return Err(ModelError::DuplicateEntity(name));
        }
        debug!(entity = %name, "entity defined");
        definitions.insert(
            name,
            Arc::new(Definition {
                params,
                map: Arc::new(map),
            }),
        );
        Ok(())
    }

    /// Whether `name` is defined or compiled.
    pub fn has(&self, name: &str) -> bool {
        let name = Entity::normalize_name(name);
        self.entities.read().contains_key(&name) || self.definitions.read().contains_key(&name)
    }

    pub fn is_compiled(&self, name: &str) -> bool {
        self.entities
            .read()
            .contains_key(&Entity::normalize_name(name))
    }

    /// Returns the compiled entity, compiling its definition on first use.
    pub fn get_instance(&self, name: &str) -> ModelResult<Arc<Entity>> {
        let name = Entity::normalize_name(name);
        if let Some(entity) = self.entities.read().get(&name) {
            return Ok(Arc::clone(entity));
        }

        let definition = self
            .definitions
            .read()
            .get(&name)
            .cloned()
            .ok_or_else(|| ModelError::EntityNotFound(name.clone()))?;

        let compiled = Arc::new(Entity::compile(
            &name,
            (definition.map)(),
            definition.params.clone(),
            &self.config,
        )?);

        let mut entities = self.entities.write();
        Ok(Arc::clone(entities.entry(name).or_insert(compiled)))
    }

    /// Compiles and registers an entity from fields supplied directly.
    ///
    /// Fails if the name is already defined or compiled.
    pub fn compile_entity(
        &self,
        name: &str,
        fields: Vec<Field>,
        params: EntityParams,
    ) -> ModelResult<Arc<Entity>> {
        let name = Entity::normalize_name(name);
        if self.has(&name) {
            return Err(ModelError::DuplicateEntity(name));
        }
        let compiled = Arc::new(Entity::compile(&name, fields, params, &self.config)?);

        let mut entities = self.entities.write();
        if entities.contains_key(&name) {
            return Err(ModelError::DuplicateEntity(name));
        }
        entities.insert(name, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Names of all compiled entities, sorted.
    pub fn compiled_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entities.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("config", &self.config)
            .field("definitions", &self.definitions.read().len())
            .field("entities", &self.compiled_names())
            .finish()
    }
}
