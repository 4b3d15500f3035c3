//! Relation fields.
//!
//! A relation names its target entity and resolves it lazily through an
//! [`EntityRegistry`]. The first successful resolution is cached, so every
//! later call returns the same shared [`Entity`].

mod many_to_many;
mod one_to_many;
mod reference;

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use relmap_types::JoinType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use crate::field::ConfigureField;
use crate::registry::EntityRegistry;

pub use many_to_many::ManyToMany;
pub use one_to_many::OneToMany;
pub use reference::{JoinCondition, Reference};

/// What happens to related objects when the owner is saved or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadePolicy {
    NoAction,
    SetNull,
    Follow,
    FollowOrphans,
}

/// Target, join type and cascade policies shared by all relation kinds.
pub struct RelationBase {
    target_name: String,
    target: OnceCell<Arc<Entity>>,
    join_type: JoinType,
    cascade_save: CascadePolicy,
    cascade_delete: CascadePolicy,
}

impl RelationBase {
    pub(crate) fn new(
        target: impl Into<String>,
        cascade_save: CascadePolicy,
        cascade_delete: CascadePolicy,
    ) -> Self {
        Self {
            target_name: Entity::normalize_name(&target.into()),
            target: OnceCell::new(),
            join_type: JoinType::Left,
            cascade_save,
            cascade_delete,
        }
    }

    /// A relation whose target is already known.
    pub(crate) fn bound_to(
        target: &Arc<Entity>,
        cascade_save: CascadePolicy,
        cascade_delete: CascadePolicy,
    ) -> Self {
        let relation = Self::new(target.name(), cascade_save, cascade_delete);
        // A fresh cell is always empty.
        let _ = relation.target.set(Arc::clone(target));
        relation
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn cascade_save_policy(&self) -> CascadePolicy {
        self.cascade_save
    }

    pub fn cascade_delete_policy(&self) -> CascadePolicy {
        self.cascade_delete
    }

    /// Whether the target entity has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    /// Resolves the target entity, once.
    pub fn ref_entity(&self, registry: &EntityRegistry) -> ModelResult<&Arc<Entity>> {
        self.target.get_or_try_init(|| {
            let entity = registry.get_instance(&self.target_name)?;
            debug!(target_entity = %self.target_name, "resolved relation target");
            Ok(entity)
        })
    }
}

impl fmt::Debug for RelationBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Targets may point back at the owner; print names only.
        f.debug_struct("RelationBase")
            .field("target_name", &self.target_name)
            .field("resolved", &self.is_resolved())
            .field("join_type", &self.join_type)
            .field("cascade_save", &self.cascade_save)
            .field("cascade_delete", &self.cascade_delete)
            .finish()
    }
}

/// Builder methods for relation kinds.
pub trait ConfigureRelation: ConfigureField {
    #[doc(hidden)]
    fn relation_mut(&mut self) -> &mut RelationBase;

    #[doc(hidden)]
    fn relation_base(&self) -> &RelationBase;

    /// Sets the join type from a token such as `"inner"` or `"LEFT"`.
    fn configure_join_type(mut self, join_type: &str) -> ModelResult<Self> {
        match join_type.parse::<JoinType>() {
            Ok(parsed) => {
                self.relation_mut().join_type = parsed;
                Ok(self)
            }
            Err(_) => {
                let field = self.base_mut().name().to_string();
                Err(ModelError::UnknownJoinType {
                    join_type: join_type.trim().to_uppercase(),
                    field,
                    target: self.relation_base().target_name.clone(),
                })
            }
        }
    }

    fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.relation_mut().join_type = join_type;
        self
    }

    fn configure_cascade_save_policy(mut self, policy: CascadePolicy) -> Self {
        self.relation_mut().cascade_save = policy;
        self
    }

    fn configure_cascade_delete_policy(mut self, policy: CascadePolicy) -> Self {
        self.relation_mut().cascade_delete = policy;
        self
    }
}
