//! The inverse side of a [`Reference`](super::Reference).

use std::sync::Arc;

use relmap_types::Value;

use super::{CascadePolicy, ConfigureRelation, RelationBase};
use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use crate::field::{ConfigureField, Direction, FieldBase};
use crate::registry::EntityRegistry;

/// Collection of target rows whose reference field points at the owner.
#[derive(Debug)]
pub struct OneToMany {
    base: FieldBase,
    relation: RelationBase,
    ref_field: String,
}

impl OneToMany {
    /// `ref_field` names the [`Reference`](super::Reference) on the target
    /// entity that points back at the owner.
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        ref_field: impl Into<String>,
    ) -> Self {
        Self {
            base: FieldBase::new(name),
            relation: RelationBase::new(target, CascadePolicy::FollowOrphans, CascadePolicy::NoAction),
            ref_field: ref_field.into(),
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

    pub fn ref_field_name(&self) -> &str {
        &self.ref_field
    }

    pub fn ref_entity(&self, registry: &EntityRegistry) -> ModelResult<&Arc<Entity>> {
        self.relation.ref_entity(registry)
    }

    /// Resolves the target and checks that its back-reference points at the owner.
    pub fn back_reference<'a>(
        &'a self,
        registry: &EntityRegistry,
    ) -> ModelResult<&'a super::Reference> {
        let owner = self.base.bound_entity()?;
        let target = self.ref_entity(registry)?;
        let invalid = || ModelError::InvalidBackReference {
            relation: self.name().to_string(),
            owner: owner.to_string(),
            target: target.name().to_string(),
            field: self.ref_field.clone(),
        };
        let reference = target
            .field(&self.ref_field)
            .and_then(|field| field.as_reference())
            .ok_or_else(invalid)?;
        if reference.relation().target_name() != owner {
            return Err(invalid());
        }
        Ok(reference)
    }

    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Save, value, None)
    }

    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Fetch, value, None)
    }
}

impl ConfigureField for OneToMany {
    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }
}

impl ConfigureRelation for OneToMany {
    fn relation_mut(&mut self) -> &mut RelationBase {
        &mut self.relation
    }

    fn relation_base(&self) -> &RelationBase {
        &self.relation
    }
}
