//! Schema-driven change planning.
//!
//! The planned state starts from the prior state and takes every attribute
//! the configuration sets. Optional+computed attributes missing from the
//! configuration keep whatever the warehouse reported last time, so they never
//! show up as changes on their own.

use serde_json::{Map, Value};

use crate::schema::{Attribute, AttributeType, Schema};
use crate::types::{AttributeChange, PlanResult};

/// Plan the transition from `prior` to the (already normalized) `config`.
///
/// `config` of `Value::Null` plans a delete. Computed-only attributes are
/// carried over from `prior` and never diffed.
pub fn plan_changes(schema: &Schema, prior: Option<&Value>, config: &Value) -> PlanResult {
    let prior_obj = prior.and_then(Value::as_object);

    let Some(config_obj) = config.as_object() else {
        return plan_delete(prior_obj);
    };

    let mut planned = Map::new();
    let mut changes = Vec::new();

    for (name, attr) in &schema.attributes {
        let before = prior_obj.and_then(|p| non_null(p.get(name)));
        let configured = non_null(config_obj.get(name));

        let after = if is_computed_only(attr) {
            before
        } else if configured.is_some() {
            configured
        } else if attr.flags.computed {
            before
        } else {
            None
        };

        if let Some(value) = after {
            planned.insert(name.clone(), value.clone());
        }

        if is_computed_only(attr) || same_value(attr, before, after) {
            continue;
        }

        let change = match (before, after) {
            (None, Some(a)) => AttributeChange::added(name.as_str(), a.clone()),
            (Some(b), None) => AttributeChange::removed(name.as_str(), b.clone()),
            (Some(b), Some(a)) => AttributeChange::modified(name.as_str(), b.clone(), a.clone()),
            (None, None) => continue,
        };

        changes.push(if attr.force_new && prior_obj.is_some() {
            change.forcing_replacement()
        } else {
            change
        });
    }

    PlanResult::with_changes(Value::Object(planned), changes)
}

fn plan_delete(prior: Option<&Map<String, Value>>) -> PlanResult {
    let changes = prior
        .into_iter()
        .flatten()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| AttributeChange::removed(name.as_str(), value.clone()))
        .collect();

    PlanResult::with_changes(Value::Null, changes)
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn is_computed_only(attr: &Attribute) -> bool {
    attr.flags.computed && !attr.flags.optional && !attr.flags.required
}

// Unset and empty strings are the same to the warehouse.
fn same_value(attr: &Attribute, before: Option<&Value>, after: Option<&Value>) -> bool {
    let empty = |v: Option<&Value>| match v {
        None => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };

    if attr.attr_type == AttributeType::String && empty(before) && empty(after) {
        return true;
    }
    before == after
}
