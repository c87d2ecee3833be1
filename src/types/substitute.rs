// src/types/substitute.rs
//
// Replace TypeVar / LambdaParam occurrences by name. Used when an applied
// type's arguments are pushed into a member's declared type, and when sig
// type parameters are instantiated.

use rustc_hash::FxHashMap;

use crate::globals::GlobalState;
use crate::names::NameRef;
use crate::types::Type;

pub fn substitute(gs: &GlobalState, ty: &Type, map: &FxHashMap<NameRef, Type>) -> Type {
    match ty {
        Type::TypeVar(sym) | Type::LambdaParam(sym) => {
            let name = gs.symbol(*sym).name;
            map.get(&name).cloned().unwrap_or_else(|| ty.clone())
        }
        Type::Applied { class, targs } => Type::Applied {
            class: *class,
            targs: targs.iter().map(|t| substitute(gs, t, map)).collect(),
        },
        Type::Tuple(elems) => {
            Type::Tuple(elems.iter().map(|t| substitute(gs, t, map)).collect())
        }
        Type::Shape { keys, values } => Type::Shape {
            keys: keys.clone(),
            values: values.iter().map(|t| substitute(gs, t, map)).collect(),
        },
        // Rebuilding through the constructors re-canonicalizes in case a
        // substitution collapsed two components into one.
        Type::Or(l, r) => Type::any(substitute(gs, l, map), substitute(gs, r, map)),
        Type::And(l, r) => Type::all(substitute(gs, l, map), substitute(gs, r, map)),
        Type::Meta(inner) => Type::Meta(Box::new(substitute(gs, inner, map))),
        _ => ty.clone(),
    }
}
