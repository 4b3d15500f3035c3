//! Compiled entity metadata.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use crate::field::Field;
use crate::relation::{ManyToMany, OneToMany, Reference};

/// Options passed alongside an entity's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityParams {
    /// Explicit table name. Derived from the entity name when absent.
    pub table_name: Option<String>,
}

impl EntityParams {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table_name: Some(name.into()),
        }
    }
}

/// An immutable description of one storage table and its fields.
///
/// Entities are built by the [`EntityRegistry`](crate::EntityRegistry) and
/// shared behind `Arc`; nothing changes after compilation except the lazy
/// caches inside relation fields.
#[derive(Debug)]
pub struct Entity {
    name: String,
    table_name: String,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    primary: Vec<String>,
}

impl Entity {
    pub(crate) fn compile(
        name: &str,
        fields: Vec<Field>,
        params: EntityParams,
        config: &ModelConfig,
    ) -> ModelResult<Self> {
        let name = Self::normalize_name(name);
        let mut index = HashMap::with_capacity(fields.len());
        let mut primary = Vec::new();
        let mut compiled = Vec::with_capacity(fields.len());

        for mut field in fields {
            let field_name = field.name().to_string();
            if index.contains_key(&field_name) {
                return Err(ModelError::DuplicateField {
                    entity: name,
                    field: field_name,
                });
            }
            field.bind(&name);
            field.apply_config(config);
            if field.is_primary() {
                primary.push(field_name.clone());
            }
            index.insert(field_name, compiled.len());
            compiled.push(field);
        }

        if primary.is_empty() {
            return Err(ModelError::NoPrimaryKey(name));
        }

        let table_name = params.table_name.unwrap_or_else(|| {
            format!(
                "{}{}",
                config.table_prefix,
                Self::short_name_of(&name).to_case(Case::Snake)
            )
        });

        debug!(
            entity = %name,
            table = %table_name,
            fields = compiled.len(),
            primary = ?primary,
            "compiled entity"
        );

        Ok(Self {
            name,
            table_name,
            fields: compiled,
            index,
            primary,
        })
    }

    /// Canonical form of an entity name: trimmed, without a leading path separator.
    pub fn normalize_name(name: &str) -> String {
        name.trim()
            .trim_start_matches("::")
            .trim_start_matches('\\')
            .to_string()
    }

    /// Last path segment of `name` without a trailing `Table`.
    ///
    /// `app::catalog::BookTable` and `App\Catalog\Book` both give `Book`.
    pub fn short_name_of(name: &str) -> String {
        let last = name
            .rsplit(|c: char| c == '\\' || c == ':')
            .next()
            .unwrap_or(name);
        match last.strip_suffix("Table") {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => last.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> String {
        Self::short_name_of(&self.name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn require_field(&self, name: &str) -> ModelResult<&Field> {
        self.field(name).ok_or_else(|| ModelError::FieldNotFound {
            entity: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Names of the primary-key fields in declaration order.
    pub fn primary(&self) -> &[String] {
        &self.primary
    }

    pub fn is_composite_primary(&self) -> bool {
        self.primary.len() > 1
    }

    /// Fields that map to a column.
    pub fn scalar_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.as_scalar().is_some())
    }

    pub fn relations(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_relation())
    }

    pub fn reference(&self, name: &str) -> Option<&Reference> {
        self.field(name).and_then(Field::as_reference)
    }

    pub fn one_to_many(&self, name: &str) -> Option<&OneToMany> {
        self.field(name).and_then(Field::as_one_to_many)
    }

    pub fn many_to_many(&self, name: &str) -> Option<&ManyToMany> {
        self.field(name).and_then(Field::as_many_to_many)
    }
}
