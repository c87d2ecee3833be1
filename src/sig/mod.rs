// src/sig/mod.rs
//
// Structured signatures. The parser in this module's `parser` file reads a
// `sig { ... }` / `T.proc...` expression chain and fills in a ParsedSig; the
// resolver collaborator then writes it back onto the method symbol via
// `apply_to_method`.

pub mod parser;

pub use parser::{get_result_type, is_sig, parse_sig};

use crate::checker_assert;
use crate::frontend::Loc;
use crate::globals::GlobalState;
use crate::names::NameRef;
use crate::symbols::{SymbolRef, Variance};
use crate::types::Type;

/// Which DSL verbs were observed while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeenFlags {
    pub sig: bool,
    pub proc: bool,
    pub params: bool,
    pub returns: bool,
    pub void: bool,
    pub abstract_: bool,
    pub override_: bool,
    pub overridable: bool,
    pub implementation: bool,
    pub incompatible_override: bool,
    pub final_: bool,
    pub generated: bool,
    pub checked: bool,
    pub soft: bool,
    pub bind: bool,
}

/// One `params` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    pub loc: Loc,
    pub name: NameRef,
    pub ty: Type,
    pub rebind: SymbolRef,
}

/// One `type_parameters` entry. `ty` starts as a fresh type variable
/// pointing at the todo symbol and is replaced during inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeArgSpec {
    pub name: NameRef,
    pub loc: Loc,
    pub ty: Option<Type>,
}

/// The parsed form of one signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSig {
    pub seen: SeenFlags,
    pub arg_types: Vec<ArgSpec>,
    pub returns: Option<Type>,
    pub type_args: Vec<TypeArgSpec>,
    pub bind: SymbolRef,
}

impl Default for ParsedSig {
    fn default() -> Self {
        Self {
            seen: SeenFlags::default(),
            arg_types: Vec::new(),
            returns: None,
            type_args: Vec::new(),
            bind: SymbolRef::NO_SYMBOL,
        }
    }
}

impl ParsedSig {
    /// The type-arg slot for `name`, created on first mention.
    pub fn enter_type_arg_by_name(&mut self, name: NameRef) -> &mut TypeArgSpec {
        if let Some(at) = self.type_args.iter().position(|spec| spec.name == name) {
            return &mut self.type_args[at];
        }
        self.type_args.push(TypeArgSpec {
            name,
            loc: Loc::none(),
            ty: None,
        });
        self.type_args.last_mut().expect("just pushed")
    }

    pub fn find_type_arg_by_name(&self, name: NameRef) -> Option<&TypeArgSpec> {
        self.type_args.iter().find(|spec| spec.name == name)
    }

    /// Write the parsed signature back onto its method symbol: result type,
    /// per-argument types matched by name, method flags, type arguments and
    /// the rebind target.
    pub fn apply_to_method(&self, gs: &mut GlobalState, method: SymbolRef) {
        checker_assert!(
            gs.symbol(method).is_method(),
            "signature applied to a non-method"
        );

        for spec in &self.type_args {
            let entered = gs
                .enter_type_argument(method, spec.name, spec.loc, Variance::Invariant)
                .expect("type argument name collided with a non-type-argument member");
            if gs.symbol(entered).result_type.is_none() {
                gs.symbol_mut(entered).result_type = spec.ty.clone();
            }
        }

        {
            let data = gs.symbol_mut(method);
            if !self.type_args.is_empty() {
                data.set_generic_method();
            }
            if self.seen.abstract_ {
                data.set_abstract();
            }
            if self.seen.override_ {
                data.set_override();
            }
            if self.seen.overridable {
                data.set_overridable();
            }
            if self.seen.implementation {
                data.set_implementation();
            }
            if self.seen.incompatible_override {
                data.set_incompatible_override();
            }
            if self.seen.final_ {
                data.set_final_method();
            }
            if self.seen.generated {
                data.set_has_generated_sig();
            }
            if self.bind.exists() {
                data.set_rebind(self.bind);
            }
            if let Some(returns) = &self.returns {
                data.result_type = Some(returns.clone());
            }
        }

        for spec in &self.arg_types {
            let data = gs.symbol_mut(method);
            if let Some(arg) = data.arguments.iter_mut().find(|a| a.name == spec.name) {
                arg.arg_type = Some(spec.ty.clone());
                if spec.rebind.exists() {
                    arg.rebind = spec.rebind;
                }
            }
        }
    }
}
