// src/types/dispatch.rs
//
// Method dispatch over type terms. The lattice core only needs this at
// signature-parse time, where generic instantiation `C[...]` is expressed
// as a synthetic `[]` call on C's singleton class; routing it through
// dispatch means user-defined generics take exactly the same path as the
// typed stdlib wrappers.

use rustc_hash::FxHashMap;

use crate::diagnostics::{Diagnostic, ErrorCategory};
use crate::frontend::Loc;
use crate::globals::GlobalState;
use crate::names::NameRef;
use crate::symbols::SymbolRef;
use crate::types::subtyping::lub;
use crate::types::substitute::substitute;
use crate::types::Type;

/// One positional argument to a dispatched call.
#[derive(Debug, Clone)]
pub struct DispatchArg {
    pub ty: Type,
    pub loc: Loc,
}

/// A call being dispatched.
#[derive(Debug, Clone)]
pub struct DispatchArgs {
    pub name: NameRef,
    pub call_loc: Loc,
    pub recv_loc: Loc,
    pub args: Vec<DispatchArg>,
}

/// Outcome of a dispatch: the return type plus any structured errors the
/// caller should surface into the diagnostic buffer.
#[derive(Debug)]
pub struct Dispatched {
    pub return_type: Type,
    pub errors: Vec<Diagnostic>,
}

/// Statically allocated dispatch handler attached to a method symbol.
pub trait IntrinsicMethod: Sync {
    /// Returns None to fall through to ordinary result-type dispatch.
    fn apply(
        &self,
        gs: &GlobalState,
        recv: &Type,
        args: &DispatchArgs,
        errors: &mut Vec<Diagnostic>,
    ) -> Option<Type>;
}

/// `Generic[...]`: arity-check against the receiver's attached class and
/// wrap the instantiation in a meta type.
pub struct GenericInstantiation;

pub static GENERIC_INSTANTIATION: GenericInstantiation = GenericInstantiation;

impl IntrinsicMethod for GenericInstantiation {
    fn apply(
        &self,
        gs: &GlobalState,
        recv: &Type,
        args: &DispatchArgs,
        errors: &mut Vec<Diagnostic>,
    ) -> Option<Type> {
        let Type::Class(singleton) = recv else {
            return None;
        };
        let attached = gs.attached_class_of(*singleton)?;
        let arity = gs.type_arity(attached);
        if args.args.len() != arity {
            errors.push(Diagnostic::new(
                args.call_loc,
                ErrorCategory::InvalidTypeDeclaration,
                format!(
                    "Wrong number of type parameters for `{}`. Expected: `{}`, got: `{}`",
                    gs.full_name(attached),
                    arity,
                    args.args.len()
                ),
            ));
            return Some(Type::untyped_untracked());
        }

        let mut provided = args.args.iter();
        let targs = gs
            .symbol(attached)
            .type_members()
            .iter()
            .map(|&member| {
                let data = gs.symbol(member);
                if data.is_fixed() {
                    return data
                        .result_type
                        .clone()
                        .unwrap_or_else(Type::untyped_untracked);
                }
                let arg = provided.next().expect("arity was checked above");
                match &arg.ty {
                    Type::Meta(inner) => (**inner).clone(),
                    t if t.is_untyped() => t.clone(),
                    _ => {
                        errors.push(Diagnostic::new(
                            arg.loc,
                            ErrorCategory::InvalidTypeDeclaration,
                            "Expected a type as a type argument".to_string(),
                        ));
                        Type::untyped_untracked()
                    }
                }
            })
            .collect();

        Some(Type::Meta(Box::new(Type::Applied {
            class: attached,
            targs,
        })))
    }
}

/// Resolve a call against a receiver type.
pub fn dispatch_call(gs: &GlobalState, recv: &Type, args: &DispatchArgs) -> Dispatched {
    let mut errors = Vec::new();
    let return_type = dispatch_inner(gs, recv, args, &mut errors);
    Dispatched {
        return_type,
        errors,
    }
}

fn dispatch_inner(
    gs: &GlobalState,
    recv: &Type,
    args: &DispatchArgs,
    errors: &mut Vec<Diagnostic>,
) -> Type {
    match recv {
        Type::Untyped { .. } => recv.clone(),
        Type::Class(sym) => dispatch_on_class(gs, *sym, recv, args, errors),
        Type::Applied { class, targs } => {
            let raw = dispatch_on_class(gs, *class, recv, args, errors);
            // Push the instantiation into the member's declared type.
            let mut map = FxHashMap::default();
            for (&member, targ) in gs.symbol(*class).type_members().iter().zip(targs.iter()) {
                map.insert(gs.symbol(member).name, targ.clone());
            }
            substitute(gs, &raw, &map)
        }
        Type::Or(l, r) => {
            let left = dispatch_inner(gs, l, args, errors);
            let right = dispatch_inner(gs, r, args, errors);
            lub(gs, &left, &right)
        }
        Type::And(l, r) => {
            // The first side that responds wins.
            let mut left_errors = Vec::new();
            let left = dispatch_inner(gs, l, args, &mut left_errors);
            if left_errors.is_empty() {
                return left;
            }
            dispatch_inner(gs, r, args, errors)
        }
        Type::Meta(_) => {
            panic!(
                "dispatch on a meta type: `{}` called on `{}`",
                gs.show_name(args.name),
                recv.show(gs)
            );
        }
        _ => {
            errors.push(Diagnostic::new(
                args.call_loc,
                ErrorCategory::Resolver,
                format!(
                    "Method `{}` cannot be dispatched on `{}`",
                    gs.show_name(args.name),
                    recv.show(gs)
                ),
            ));
            Type::untyped_untracked()
        }
    }
}

fn dispatch_on_class(
    gs: &GlobalState,
    class: SymbolRef,
    recv: &Type,
    args: &DispatchArgs,
    errors: &mut Vec<Diagnostic>,
) -> Type {
    let method = gs.find_member_transitive(class, args.name);
    if method.exists() {
        if let Some(intrinsic) = gs.symbol(method).intrinsic {
            if let Some(result) = intrinsic.apply(gs, recv, args, errors) {
                return result;
            }
        }
        return gs
            .symbol(method)
            .result_type
            .clone()
            .unwrap_or_else(Type::untyped_untracked);
    }

    // User-defined generics have no synthetic `[]` method; route their
    // instantiation through the shared intrinsic.
    if args.name == gs.wk_names.square_brackets {
        let attached = gs.attached_class(class);
        if attached.exists() && gs.type_arity(attached) > 0 {
            if let Some(result) = GENERIC_INSTANTIATION.apply(gs, recv, args, errors) {
                return result;
            }
        }
    }

    tracing::trace!(
        receiver = %recv.show(gs),
        method = %gs.show_name(args.name),
        "dispatch missed"
    );
    errors.push(Diagnostic::new(
        args.call_loc,
        ErrorCategory::Resolver,
        format!(
            "Method `{}` does not exist on `{}`",
            gs.show_name(args.name),
            recv.show(gs)
        ),
    ));
    Type::untyped_untracked()
}
