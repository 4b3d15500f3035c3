//! Many-to-many relation through a mediator entity.
//!
//! Unless a registered mediator entity was named explicitly, one is generated
//! on first use from the mediator table name. Its fields, in order:
//!
//! - one primary-key field per primary key of the owner, named
//!   `<LOCAL_REF>_<PK>` unless overridden,
//! - a [`Reference`] to the owner joining those columns to its keys,
//! - the same two steps for the target, with `<REMOTE_REF>_<PK>`.
//!
//! `LOCAL_REF` and `REMOTE_REF` default to the upper snake-case short names
//! of the owner and target (`BookAuthor` becomes `BOOK_AUTHOR`).

use std::collections::BTreeMap;
use std::sync::Arc;

use convert_case::{Case, Casing};
use once_cell::sync::OnceCell;
use relmap_types::Value;
use tracing::info;

use super::{CascadePolicy, ConfigureRelation, JoinCondition, Reference, RelationBase};
use crate::entity::{Entity, EntityParams};
use crate::error::{ModelError, ModelResult};
use crate::field::{ConfigureField, Direction, Field, FieldBase};
use crate::registry::EntityRegistry;

#[derive(Debug)]
pub struct ManyToMany {
    base: FieldBase,
    relation: RelationBase,
    mediator_entity_name: Option<String>,
    mediator_table_name: Option<String>,
    local_primary_names: BTreeMap<String, String>,
    remote_primary_names: BTreeMap<String, String>,
    local_reference_name: Option<String>,
    remote_reference_name: Option<String>,
    mediator: OnceCell<Arc<Entity>>,
}

impl ManyToMany {
    /// Defaults: `LEFT` join, `NO_ACTION` on save and delete.
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            base: FieldBase::new(name),
            relation: RelationBase::new(target, CascadePolicy::NoAction, CascadePolicy::NoAction),
            mediator_entity_name: None,
            mediator_table_name: None,
            local_primary_names: BTreeMap::new(),
            remote_primary_names: BTreeMap::new(),
            local_reference_name: None,
            remote_reference_name: None,
            mediator: OnceCell::new(),
        }
    }

    pub fn base(&self) -> &FieldBase {
        &self.base
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn relation(&self) -> &RelationBase {
        &self.relation
    }

    pub fn ref_entity(&self, registry: &EntityRegistry) -> ModelResult<&Arc<Entity>> {
        self.relation.ref_entity(registry)
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Uses a registered entity as mediator instead of generating one.
    pub fn configure_mediator_entity(mut self, name: impl Into<String>) -> Self {
        self.mediator_entity_name = Some(Entity::normalize_name(&name.into()));
        self
    }

    pub fn configure_mediator_table_name(mut self, table: impl Into<String>) -> Self {
        self.mediator_table_name = Some(table.into());
        self
    }

    /// Alias of [`configure_mediator_table_name`](Self::configure_mediator_table_name).
    pub fn configure_table_name(self, table: impl Into<String>) -> Self {
        self.configure_mediator_table_name(table)
    }

    /// Names the mediator column that mirrors the owner's primary key `primary`.
    pub fn configure_local_primary(
        mut self,
        primary: impl Into<String>,
        mediator_field: impl Into<String>,
    ) -> Self {
        self.local_primary_names
            .insert(primary.into(), mediator_field.into());
        self
    }

    pub fn configure_remote_primary(
        mut self,
        primary: impl Into<String>,
        mediator_field: impl Into<String>,
    ) -> Self {
        self.remote_primary_names
            .insert(primary.into(), mediator_field.into());
        self
    }

    pub fn configure_local_reference(mut self, name: impl Into<String>) -> Self {
        self.local_reference_name = Some(name.into());
        self
    }

    pub fn configure_remote_reference(mut self, name: impl Into<String>) -> Self {
        self.remote_reference_name = Some(name.into());
        self
    }

    // ── Naming ───────────────────────────────────────────────────────

    pub fn mediator_table_name(&self) -> Option<&str> {
        self.mediator_table_name.as_deref()
    }

    fn owner_name(&self) -> ModelResult<&str> {
        self.base.bound_entity()
    }

    /// `MediatorFrom<Owner>To<Target>Via<FieldName>`, unless configured.
    ///
    /// The field name is kept verbatim, so distinct relations between the
    /// same pair of entities get distinct mediators.
    pub fn mediator_entity_name(&self) -> ModelResult<String> {
        if let Some(name) = &self.mediator_entity_name {
            return Ok(name.clone());
        }
        Ok(format!(
            "MediatorFrom{}To{}Via{}",
            Entity::short_name_of(self.owner_name()?),
            Entity::short_name_of(self.relation.target_name()),
            self.name()
        ))
    }

    /// Name of the mediator field that references the owner.
    pub fn local_reference_name(&self) -> ModelResult<String> {
        match &self.local_reference_name {
            Some(name) => Ok(name.clone()),
            None => Ok(reference_name_for(self.owner_name()?)),
        }
    }

    /// Name of the mediator field that references the target.
    pub fn remote_reference_name(&self) -> String {
        self.remote_reference_name
            .clone()
            .unwrap_or_else(|| reference_name_for(self.relation.target_name()))
    }

    // ── Resolution ───────────────────────────────────────────────────

    /// Whether the mediator entity has been resolved.
    pub fn is_mediator_resolved(&self) -> bool {
        self.mediator.get().is_some()
    }

    /// Resolves or generates the mediator entity, once.
    pub fn mediator_entity(&self, registry: &EntityRegistry) -> ModelResult<&Arc<Entity>> {
        self.mediator.get_or_try_init(|| self.resolve_mediator(registry))
    }

    /// The mediator's reference to the owner.
    pub fn local_reference(&self, registry: &EntityRegistry) -> ModelResult<&Reference> {
        let name = self.local_reference_name()?;
        self.mediator_reference(registry, &name)
    }

    /// The mediator's reference to the target.
    pub fn remote_reference(&self, registry: &EntityRegistry) -> ModelResult<&Reference> {
        let name = self.remote_reference_name();
        self.mediator_reference(registry, &name)
    }

    fn mediator_reference(&self, registry: &EntityRegistry, name: &str) -> ModelResult<&Reference> {
        let mediator = self.mediator_entity(registry)?;
        mediator
            .field(name)
            .and_then(Field::as_reference)
            .ok_or_else(|| ModelError::FieldNotFound {
                entity: mediator.name().to_string(),
                field: name.to_string(),
            })
    }

    fn resolve_mediator(&self, registry: &EntityRegistry) -> ModelResult<Arc<Entity>> {
        let owner_name = self.owner_name()?;
        let mediator_name = self.mediator_entity_name()?;
        // Only an explicitly named mediator may be taken from the registry as is.
        if self.mediator_entity_name.is_some() && registry.has(&mediator_name) {
            return registry.get_instance(&mediator_name);
        }

        let Some(table) = &self.mediator_table_name else {
            return Err(ModelError::MissingMediatorTable {
                relation: self.name().to_string(),
                owner: owner_name.to_string(),
                target: self.relation.target_name().to_string(),
            });
        };

        let owner = registry.get_instance(owner_name)?;
        let target = Arc::clone(self.ref_entity(registry)?);
        let local_name = self.local_reference_name()?;
        let remote_name = self.remote_reference_name();
        let join_type = self.relation.join_type();

        let mut fields = Vec::new();
        let local_conditions =
            mirror_primary(&owner, &self.local_primary_names, &local_name, &mut fields);
        fields.push(
            Reference::to_entity(local_name.as_str(), &owner, local_conditions)
                .with_join_type(join_type)
                .into(),
        );
        let remote_conditions =
            mirror_primary(&target, &self.remote_primary_names, &remote_name, &mut fields);
        fields.push(
            Reference::to_entity(remote_name.as_str(), &target, remote_conditions)
                .with_join_type(join_type)
                .into(),
        );

        let params = EntityParams::table(table.clone());
        let mediator = match registry.compile_entity(&mediator_name, fields, params) {
            Err(ModelError::DuplicateEntity(_)) => {
                // Another instance of this relation may have generated it first.
                let existing = registry.get_instance(&mediator_name)?;
                let generated_here = existing.table_name() == table
                    && existing.reference(&local_name).is_some()
                    && existing.reference(&remote_name).is_some();
                if !generated_here {
                    return Err(ModelError::DuplicateEntity(mediator_name));
                }
                return Ok(existing);
            }
            other => other?,
        };
        info!(
            relation = %self.name(),
            owner = %owner_name,
            target = %self.relation.target_name(),
            mediator = %mediator_name,
            table = %table,
            "generated mediator entity"
        );
        Ok(mediator)
    }

    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Save, value, None)
    }

    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Fetch, value, None)
    }
}

fn reference_name_for(entity_name: &str) -> String {
    Entity::short_name_of(entity_name).to_case(Case::UpperSnake)
}

/// Adds a mediator primary field for each primary key of `entity` and
/// returns the join conditions linking them back.
fn mirror_primary(
    entity: &Entity,
    overrides: &BTreeMap<String, String>,
    reference_name: &str,
    fields: &mut Vec<Field>,
) -> Vec<JoinCondition> {
    let mut conditions = Vec::with_capacity(entity.primary().len());
    for source in entity.fields().iter().filter(|f| f.is_primary()) {
        let primary = source.name();
        let mediator_field = overrides
            .get(primary)
            .cloned()
            .unwrap_or_else(|| format!("{reference_name}_{primary}"));
        // Primary keys are always column kinds.
        let Some(copy) = source.blank_copy(&mediator_field) else {
            continue;
        };
        fields.push(copy);
        conditions.push(JoinCondition::new(mediator_field, primary));
    }
    conditions
}

impl ConfigureField for ManyToMany {
    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }
}

impl ConfigureRelation for ManyToMany {
    fn relation_mut(&mut self) -> &mut RelationBase {
        &mut self.relation
    }

    fn relation_base(&self) -> &RelationBase {
        &self.relation
    }
}
