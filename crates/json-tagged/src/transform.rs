//! Copy-on-write deep tree transformer.
//!
//! Walks a [`Value`] tree depth first, offering every node to a visit
//! callback before any descent. A [`Visit::Replace`] short-circuits the
//! whole subtree; [`Visit::Proceed`] keeps walking. A container is cloned
//! shallowly at most once, on the first child that actually changed, so
//! every untouched subtree keeps its `Rc` identity between input and
//! output.

use std::convert::Infallible;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

/// Outcome of a visit callback for a single node.
pub enum Visit {
    /// Keep walking into this node's children, if it has any.
    Proceed,
    /// Substitute this value for the node; its subtree is not entered.
    Replace(Rc<Value>),
}

/// Infallible [`try_transform_deep`].
pub fn transform_deep<F>(value: &Rc<Value>, visit: &mut F) -> Rc<Value>
where
    F: FnMut(&Value) -> Visit,
{
    let result: Result<Rc<Value>, Infallible> =
        try_transform_deep(value, &mut |node| Ok(visit(node)));
    match result {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Rewrites `value` with `visit`, cloning only the branches that changed.
///
/// The input is never mutated. The returned `Rc` is pointer-identical to
/// `value` when no descendant was replaced; in particular non-containers
/// and empty arrays always come back as the same reference. Recursion depth
/// is bounded only by input nesting.
pub fn try_transform_deep<F, E>(value: &Rc<Value>, visit: &mut F) -> Result<Rc<Value>, E>
where
    F: FnMut(&Value) -> Result<Visit, E>,
{
    if let Visit::Replace(replacement) = visit(value)? {
        return Ok(replacement);
    }

    match value.as_ref() {
        Value::Arr(items) if !items.is_empty() => {
            let mut cloned: Option<Vec<Rc<Value>>> = None;
            for (index, item) in items.iter().enumerate() {
                let out = try_transform_deep(item, visit)?;
                if Rc::ptr_eq(&out, item) {
                    continue;
                }
                cloned.get_or_insert_with(|| items.clone())[index] = out;
            }
            Ok(match cloned {
                Some(items) => Rc::new(Value::Arr(items)),
                None => Rc::clone(value),
            })
        }
        Value::Obj(entries) => {
            let mut cloned: Option<IndexMap<String, Rc<Value>>> = None;
            for (key, item) in entries {
                let out = try_transform_deep(item, visit)?;
                if Rc::ptr_eq(&out, item) {
                    continue;
                }
                // insert on an existing key keeps its position
                cloned
                    .get_or_insert_with(|| entries.clone())
                    .insert(key.clone(), out);
            }
            Ok(match cloned {
                Some(entries) => Rc::new(Value::Obj(entries)),
                None => Rc::clone(value),
            })
        }
        _ => Ok(Rc::clone(value)),
    }
}
