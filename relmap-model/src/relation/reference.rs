//! Many-to-one relation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{CascadePolicy, ConfigureRelation, RelationBase};
use crate::entity::Entity;
use crate::error::ModelResult;
use crate::field::{ConfigureField, Direction, FieldBase};
use crate::registry::EntityRegistry;
use relmap_types::Value;

/// Equality between a column of the owning entity (`this`) and a column of
/// the target entity (`reference`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinCondition {
    pub this: String,
    pub reference: String,
}

impl JoinCondition {
    pub fn new(this: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            this: this.into(),
            reference: reference.into(),
        }
    }
}

/// Points from the owning entity at one row of the target entity.
///
/// Defaults: `LEFT` join, save cascade `FOLLOW_ORPHANS`, delete cascade
/// `NO_ACTION`.
#[derive(Debug)]
pub struct Reference {
    base: FieldBase,
    relation: RelationBase,
    conditions: Vec<JoinCondition>,
}

impl Reference {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        conditions: impl IntoIterator<Item = JoinCondition>,
    ) -> Self {
        Self {
            base: FieldBase::new(name),
            relation: RelationBase::new(target, CascadePolicy::FollowOrphans, CascadePolicy::NoAction),
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Reference to an entity that is already compiled.
    pub fn to_entity(
        name: impl Into<String>,
        target: &Arc<Entity>,
        conditions: impl IntoIterator<Item = JoinCondition>,
    ) -> Self {
        Self {
            base: FieldBase::new(name),
            relation: RelationBase::bound_to(
                target,
                CascadePolicy::FollowOrphans,
                CascadePolicy::NoAction,
            ),
            conditions: conditions.into_iter().collect(),
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

    pub fn conditions(&self) -> &[JoinCondition] {
        &self.conditions
    }

    pub fn ref_entity(&self, registry: &EntityRegistry) -> ModelResult<&Arc<Entity>> {
        self.relation.ref_entity(registry)
    }

    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Save, value, None)
    }

    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Fetch, value, None)
    }
}

impl ConfigureField for Reference {
    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }
}

impl ConfigureRelation for Reference {
    fn relation_mut(&mut self) -> &mut RelationBase {
        &mut self.relation
    }

    fn relation_base(&self) -> &RelationBase {
        &self.relation
    }
}
