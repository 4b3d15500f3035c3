//! `JOIN` clauses for relations.
//!
//! Conditions are stored as field names; they are mapped to column names
//! through the owning and target entities when those are known.

use relmap_db::SqlHelper;
use relmap_model::{Entity, EntityRegistry, JoinCondition, ManyToMany, Reference};
use tracing::debug;

use crate::{Operand, Operator, QueryResult};

fn column_of<'a>(entity: Option<&'a Entity>, field: &'a str) -> &'a str {
    entity
        .and_then(|e| e.field(field))
        .and_then(|f| f.column_name())
        .unwrap_or(field)
}

fn qualified<H: SqlHelper + ?Sized>(helper: &H, alias: &str, column: &str) -> String {
    format!("{}.{}", helper.quote(alias), helper.quote(column))
}

/// Renders conditions as `"this"."A" = "ref"."B" AND ...`.
///
/// `this` and `reference` supply column names for the two sides; a missing
/// entity or field falls back to the condition's own name.
pub fn on_clause<H: SqlHelper + ?Sized>(
    helper: &H,
    this_alias: &str,
    this: Option<&Entity>,
    ref_alias: &str,
    reference: Option<&Entity>,
    conditions: &[JoinCondition],
) -> String {
    conditions
        .iter()
        .map(|condition| {
            let left = qualified(helper, this_alias, column_of(this, &condition.this));
            let right = qualified(helper, ref_alias, column_of(reference, &condition.reference));
            Operator::Eq.compile(helper, &left, &Operand::Sql(right))
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// `<TYPE> JOIN <table> <alias> ON ...` for a reference field.
pub fn reference_join<H: SqlHelper + ?Sized>(
    helper: &H,
    registry: &EntityRegistry,
    reference: &Reference,
    this_alias: &str,
    ref_alias: &str,
) -> QueryResult<String> {
    let owner = match reference.base().entity_name() {
        Some(name) => Some(registry.get_instance(name)?),
        None => None,
    };
    let target = reference.ref_entity(registry)?;
    let clause = format!(
        "{} JOIN {} {} ON {}",
        reference.relation().join_type(),
        helper.quote(target.table_name()),
        helper.quote(ref_alias),
        on_clause(
            helper,
            this_alias,
            owner.as_deref(),
            ref_alias,
            Some(target.as_ref()),
            reference.conditions(),
        )
    );
    debug!(field = %reference.name(), %clause, "rendered reference join");
    Ok(clause)
}

/// The two joins of a many-to-many relation: owner to mediator, then
/// mediator to target.
pub fn many_to_many_joins<H: SqlHelper + ?Sized>(
    helper: &H,
    registry: &EntityRegistry,
    relation: &ManyToMany,
    owner_alias: &str,
    mediator_alias: &str,
    target_alias: &str,
) -> QueryResult<[String; 2]> {
    let mediator = relation.mediator_entity(registry)?;
    let local = relation.local_reference(registry)?;
    let owner = local.ref_entity(registry)?;

    let to_mediator = format!(
        "{} JOIN {} {} ON {}",
        relation.relation().join_type(),
        helper.quote(mediator.table_name()),
        helper.quote(mediator_alias),
        on_clause(
            helper,
            mediator_alias,
            Some(mediator.as_ref()),
            owner_alias,
            Some(owner.as_ref()),
            local.conditions(),
        )
    );
    let remote = relation.remote_reference(registry)?;
    let to_target = reference_join(helper, registry, remote, mediator_alias, target_alias)?;
    debug!(field = %relation.name(), mediator = %mediator.name(), "rendered many-to-many joins");
    Ok([to_mediator, to_target])
}
