// src/sig/parser.rs
//
// The signature DSL parser. Walks the receiver chain of each statement in a
// `sig { ... }` block (or a bare `T.proc...` chain) and produces a
// ParsedSig. Type-syntax errors never abort the parse; the failing term
// becomes untyped and parsing continues.

use crate::checker_assert;
use crate::context::MutableContext;
use crate::diagnostics::{ErrorCategory, ErrorSection};
use crate::frontend::{ConstantLit, Expr, LitValue, Send};
use crate::globals::GlobalState;
use crate::sig::{ArgSpec, ParsedSig};
use crate::symbols::SymbolRef;
use crate::types::dispatch::{dispatch_call, DispatchArg, DispatchArgs};
use crate::types::{LiteralValue, Type};
use crate::well_known;

/// The result of parsing one type expression: the type, plus a rebind
/// carried out of a nested `T.proc.bind`.
#[derive(Debug, Clone)]
pub struct ResultType {
    pub ty: Type,
    pub rebind: SymbolRef,
}

/// Lazily formatted one-header diagnostic; skips formatting entirely when
/// the category is suppressed.
fn report<F: FnOnce() -> String>(
    gs: &GlobalState,
    loc: crate::frontend::Loc,
    category: ErrorCategory,
    header: F,
) {
    if let Some(mut e) = gs.diagnostics.begin_error(loc, category) {
        e.set_header(header());
    }
}

/// Recognize `sig { ... }`: no positional args, a block, and a receiver
/// that is either `self` or the sig gate module.
pub fn is_sig(gs: &GlobalState, send: &Send) -> bool {
    if send.fun != gs.wk_names.sig {
        return false;
    }
    if send.block.is_none() || !send.args.is_empty() {
        return false;
    }
    if send.recv.is_self_reference() {
        return true;
    }
    matches!(send.recv.as_constant(), Some(c) if c.symbol == well_known::SIG_GATE)
}

/// Whether the chain bottoms out in `T.proc`.
fn is_t_proc(gs: &GlobalState, send: &Send) -> bool {
    let mut cur = Some(send);
    while let Some(s) = cur {
        if s.fun == gs.wk_names.proc {
            if let Some(c) = s.recv.as_constant() {
                if c.symbol == well_known::T {
                    return true;
                }
            }
        }
        cur = s.recv.as_send();
    }
    false
}

/// Parse a signature send (`sig { ... }` or a `T.proc` chain). `parent` is
/// the enclosing signature when parsing a nested proc; type parameters
/// resolve against it.
pub fn parse_sig(
    ctx: &mut MutableContext,
    sig_send: &Send,
    parent: Option<&ParsedSig>,
    allow_self_type: bool,
    untyped_blame: SymbolRef,
) -> ParsedSig {
    let wk = ctx.state.wk_names.clone();
    let mut sig = ParsedSig::default();

    let mut sends: Vec<&Send> = Vec::new();
    if is_t_proc(ctx.state, sig_send) {
        sends.push(sig_send);
    } else {
        sig.seen.sig = true;
        checker_assert!(sig_send.fun == wk.sig, "parse_sig on a non-sig send");
        let block = match sig_send.block.as_deref() {
            Some(Expr::Block(block)) => block,
            _ => panic!("sig send without a block"),
        };
        match &*block.body {
            Expr::Send(s) => sends.push(s),
            Expr::InsSeq(seq) => {
                for stat in &seq.stats {
                    match stat {
                        Expr::Send(s) => sends.push(s),
                        _ => return sig,
                    }
                }
                match &*seq.expr {
                    Expr::Send(s) => sends.push(s),
                    _ => return sig,
                }
            }
            _ => return sig,
        }
    }
    tracing::debug!(statements = sends.len(), "parsing signature");

    // Pre-pass: extract type parameters before any type expression needs
    // to mention them.
    for send in &sends {
        let mut cur = Some(*send);
        while let Some(s) = cur {
            if s.fun == wk.type_parameters {
                if parent.is_some() {
                    report(ctx.state, s.loc, ErrorCategory::InvalidMethodSignature, || {
                        "Malformed signature; Type parameters can only be specified in outer sig"
                            .to_string()
                    });
                    break;
                }
                for arg in &s.args {
                    let symbol = arg.as_literal().and_then(|lit| lit.as_symbol());
                    match symbol {
                        Some(name) => {
                            let shown = ctx.state.show_name(name);
                            let spec = sig.enter_type_arg_by_name(name);
                            if spec.ty.is_some() {
                                report(
                                    ctx.state,
                                    arg.loc(),
                                    ErrorCategory::InvalidMethodSignature,
                                    || {
                                        format!(
                                        "Malformed signature; Type argument `{shown}` was specified twice"
                                    )
                                    },
                                );
                            }
                            spec.ty = Some(Type::TypeVar(well_known::TODO_SYM));
                            spec.loc = arg.loc();
                        }
                        None => {
                            report(
                                ctx.state,
                                arg.loc(),
                                ErrorCategory::InvalidMethodSignature,
                                || {
                                    "Malformed signature; Type parameters are specified with symbols"
                                        .to_string()
                                },
                            );
                        }
                    }
                }
            }
            cur = s.recv.as_send();
        }
    }

    // Main pass: walk each statement's receiver chain leaf-to-root.
    for send in &sends {
        let mut cur = Some(*send);
        while let Some(s) = cur {
            let mut reported_invalid_method = false;
            let fun = s.fun;

            if fun == wk.proc {
                sig.seen.proc = true;
            } else if fun == wk.bind {
                if sig.seen.bind {
                    report(ctx.state, s.loc, ErrorCategory::InvalidMethodSignature, || {
                        "Malformed `bind`: Multiple calls to `.bind`".to_string()
                    });
                    sig.bind = SymbolRef::NO_SYMBOL;
                }
                sig.seen.bind = true;

                if s.args.len() != 1 {
                    let got = s.args.len();
                    report(ctx.state, s.loc, ErrorCategory::InvalidMethodSignature, || {
                        format!("Wrong number of args to `bind`. Expected: `1`, got: `{got}`")
                    });
                } else {
                    let bound = get_result_type(
                        ctx,
                        &s.args[0],
                        parent.unwrap_or(&sig),
                        allow_self_type,
                        untyped_blame,
                    );
                    match bound {
                        Type::Class(sym) => sig.bind = sym,
                        _ => {
                            report(
                                ctx.state,
                                s.loc,
                                ErrorCategory::InvalidMethodSignature,
                                || "Malformed `bind`: Can only bind to simple class names".to_string(),
                            );
                        }
                    }
                }
            } else if fun == wk.params {
                if sig.seen.params {
                    report(ctx.state, s.loc, ErrorCategory::InvalidMethodSignature, || {
                        "Malformed `params`: Multiple calls to `.params`".to_string()
                    });
                    sig.arg_types.clear();
                }
                sig.seen.params = true;

                if !s.args.is_empty() {
                    if s.args.len() > 1 {
                        let got = s.args.len();
                        report(ctx.state, s.loc, ErrorCategory::InvalidMethodSignature, || {
                            format!(
                                "Wrong number of args to `params`. Expected: `0-1`, got: `{got}`"
                            )
                        });
                    }
                    match &s.args[0] {
                        Expr::Hash(hash) => {
                            for (key, value) in hash.keys.iter().zip(hash.values.iter()) {
                                let name = key.as_literal().and_then(|lit| lit.as_symbol());
                                if let Some(name) = name {
                                    let parsed = get_result_type_and_bind(
                                        ctx,
                                        value,
                                        parent.unwrap_or(&sig),
                                        allow_self_type,
                                        true,
                                        untyped_blame,
                                    );
                                    sig.arg_types.push(ArgSpec {
                                        loc: key.loc(),
                                        name,
                                        ty: parsed.ty,
                                        rebind: parsed.rebind,
                                    });
                                }
                            }
                        }
                        _ => {
                            if let Some(mut e) = ctx
                                .state
                                .diagnostics
                                .begin_error(s.loc, ErrorCategory::InvalidMethodSignature)
                            {
                                e.set_header("`params` expects keyword arguments");
                                e.add_section(ErrorSection {
                                    header: "All parameters must be given names in `params` \
                                             even if they are positional"
                                        .to_string(),
                                    lines: Vec::new(),
                                });
                            }
                        }
                    }
                }
            } else if fun == wk.type_parameters {
                // Handled in the pre-pass.
            } else if fun == wk.abstract_ {
                sig.seen.abstract_ = true;
            } else if fun == wk.override_ {
                sig.seen.override_ = true;
            } else if fun == wk.overridable {
                sig.seen.overridable = true;
            } else if fun == wk.implementation {
                sig.seen.implementation = true;
            } else if fun == wk.incompatible_override {
                sig.seen.incompatible_override = true;
            } else if fun == wk.final_ {
                sig.seen.final_ = true;
            } else if fun == wk.generated {
                sig.seen.generated = true;
            } else if fun == wk.checked {
                sig.seen.checked = true;
            } else if fun == wk.soft {
                sig.seen.soft = true;
            } else if fun == wk.returns {
                sig.seen.returns = true;
                if s.args.len() != 1 {
                    let got = s.args.len();
                    report(ctx.state, s.loc, ErrorCategory::InvalidMethodSignature, || {
                        format!("Wrong number of args to `returns`. Expected: `1`, got: `{got}`")
                    });
                } else if matches!(s.args[0].as_literal(), Some(lit) if lit.is_nil()) {
                    report(
                        ctx.state,
                        s.args[0].loc(),
                        ErrorCategory::InvalidMethodSignature,
                        || "You probably meant .returns(NilClass)".to_string(),
                    );
                    sig.returns = Some(Type::nil_class());
                } else {
                    sig.returns = Some(get_result_type(
                        ctx,
                        &s.args[0],
                        parent.unwrap_or(&sig),
                        allow_self_type,
                        untyped_blame,
                    ));
                }
            } else if fun == wk.void {
                sig.seen.void = true;
                sig.returns = Some(Type::void());
            } else {
                if let Some(mut e) = ctx
                    .state
                    .diagnostics
                    .begin_error(s.loc, ErrorCategory::InvalidMethodSignature)
                {
                    reported_invalid_method = true;
                    e.set_header(format!(
                        "Malformed signature: `{}` is invalid in this context",
                        ctx.state.show_name(fun)
                    ));
                    e.add_error_line(s.loc, "Consult the signature syntax reference");
                }
            }

            let recv = s.recv.as_send();
            if recv.is_none() {
                // One error per statement: skip the receiver complaint when
                // the unknown-verb error already fired.
                if !reported_invalid_method && !s.recv.is_self_reference() && !sig.seen.proc {
                    report(ctx.state, s.loc, ErrorCategory::InvalidMethodSignature, || {
                        format!(
                            "Malformed signature: `{}` being invoked on an invalid receiver",
                            ctx.state.show_name(fun)
                        )
                    });
                }
                break;
            }
            cur = recv;
        }
    }

    debug_assert!(sig.seen.sig || sig.seen.proc);
    sig
}

/// Parse a type expression, discarding any rebind.
pub fn get_result_type(
    ctx: &mut MutableContext,
    expr: &Expr,
    sig_being_parsed: &ParsedSig,
    allow_self_type: bool,
    untyped_blame: SymbolRef,
) -> Type {
    get_result_type_and_bind(ctx, expr, sig_being_parsed, allow_self_type, false, untyped_blame).ty
}

/// Parse a type expression; `allow_rebind` additionally permits a `bind`
/// carried out of a nested `T.proc` (only `params` values allow it).
pub fn get_result_type_and_bind(
    ctx: &mut MutableContext,
    expr: &Expr,
    sig_being_parsed: &ParsedSig,
    allow_self_type: bool,
    allow_rebind: bool,
    untyped_blame: SymbolRef,
) -> ResultType {
    checker_assert!(
        ctx.owner_data().is_class(),
        "type syntax must be parsed with a class owner"
    );

    let mut result = ResultType {
        ty: Type::untyped_untracked(),
        rebind: SymbolRef::NO_SYMBOL,
    };
    match expr {
        Expr::Array(arr) => {
            let elems = arr
                .elems
                .iter()
                .map(|el| get_result_type(ctx, el, sig_being_parsed, false, untyped_blame))
                .collect();
            result.ty = Type::Tuple(elems);
        }
        Expr::Hash(hash) => {
            let mut keys = Vec::new();
            let mut values = Vec::new();
            for (key, value) in hash.keys.iter().zip(hash.values.iter()) {
                let val = get_result_type(ctx, value, sig_being_parsed, false, untyped_blame);
                match key.as_literal().map(|lit| lit.value) {
                    Some(LitValue::Symbol(name)) => {
                        keys.push(LiteralValue::Sym(name));
                        values.push(val);
                    }
                    Some(LitValue::String(name)) => {
                        keys.push(LiteralValue::Str(name));
                        values.push(val);
                    }
                    _ => {
                        report(
                            ctx.state,
                            key.loc(),
                            ErrorCategory::InvalidTypeDeclaration,
                            || "Malformed type declaration. Shape keys must be literals".to_string(),
                        );
                    }
                }
            }
            result.ty = Type::Shape { keys, values };
        }
        Expr::ConstantLit(constant) => {
            result.ty = constant_result_type(ctx, constant);
        }
        Expr::Send(s) => {
            result = send_result_type(
                ctx,
                s,
                sig_being_parsed,
                allow_self_type,
                allow_rebind,
                untyped_blame,
            );
        }
        Expr::Local(local) if local.is_self_reference() => {
            result.ty = ctx.state.self_type(ctx.owner);
        }
        _ => {
            report(ctx.state, expr.loc(), ErrorCategory::InvalidTypeDeclaration, || {
                "Unsupported type syntax".to_string()
            });
        }
    }
    result.ty.sanity_check(ctx.state);
    result
}

fn constant_result_type(ctx: &mut MutableContext, constant: &ConstantLit) -> Type {
    let maybe_aliased = constant.symbol;
    checker_assert!(maybe_aliased.exists(), "unresolved constant reached the sig parser");

    if ctx.state.symbol(maybe_aliased).is_type_alias() {
        return ctx
            .state
            .symbol(maybe_aliased)
            .result_type
            .clone()
            .unwrap_or_else(Type::untyped_untracked);
    }

    let silence_generic_error = ctx
        .state
        .config
        .stdlib_generic_exemptions
        .contains(&maybe_aliased);
    let sym = ctx.state.dealias(maybe_aliased);
    let data = ctx.state.symbol(sym);

    if data.is_class() {
        if ctx.state.type_arity(sym) > 0 && !silence_generic_error {
            report(
                ctx.state,
                constant.loc,
                ErrorCategory::InvalidTypeDeclaration,
                || {
                    format!(
                        "Malformed type declaration. Generic class without type arguments `{}`",
                        ctx.state.full_name(maybe_aliased)
                    )
                },
            );
        }
        if sym == well_known::STUB_CLASS {
            // Stubs are kept verbatim rather than widened to untyped so
            // that re-check hashes can tell different unresolved
            // spellings apart.
            let (scope, names) = constant
                .unresolved_path
                .clone()
                .expect("stub constant without an unresolved path");
            return Type::UnresolvedClass { scope, names };
        }
        return ctx.state.external_type(sym);
    }

    if data.is_type_member() {
        return type_member_result_type(ctx, constant, sym);
    }

    if data.is_static_field() {
        let declared_at = data.loc();
        if let Some(mut e) = ctx
            .state
            .diagnostics
            .begin_error(constant.loc, ErrorCategory::InvalidTypeDeclaration)
        {
            e.set_header(format!(
                "Constant `{}` is not a class or type alias",
                ctx.state.full_name(maybe_aliased)
            ));
            e.add_error_line(
                declared_at,
                "If you are trying to define a type alias, you should use `type_alias` here",
            );
        }
        return Type::untyped_untracked();
    }

    report(ctx.state, constant.loc, ErrorCategory::InvalidTypeDeclaration, || {
        format!(
            "Malformed type declaration. Not a class type `{}`",
            ctx.state.full_name(maybe_aliased)
        )
    });
    Type::untyped_untracked()
}

/// A type member is usable only inside its defining class, and only from
/// the matching side: members from instance methods, templates from
/// singleton methods.
fn type_member_result_type(ctx: &mut MutableContext, constant: &ConstantLit, sym: SymbolRef) -> Type {
    let sym_owner = ctx.state.symbol(sym).owner;
    let is_type_template = ctx.state.is_singleton_class(sym_owner);
    let ctx_is_singleton = ctx.state.is_singleton_class(ctx.owner);

    // Compare the classes behind any singleton wrappers.
    let member_class = ctx.state.top_attached_class(sym_owner);
    let ctx_class = ctx.state.top_attached_class(ctx.owner);
    let used_on_source_class = member_class == ctx_class;

    let side_matches = if is_type_template {
        ctx_is_singleton
    } else {
        !ctx_is_singleton
    };
    if used_on_source_class && side_matches {
        return Type::LambdaParam(sym);
    }

    let type_source = if is_type_template {
        "type_template"
    } else {
        "type_member"
    };
    report(
        ctx.state,
        constant.loc,
        ErrorCategory::InvalidTypeDeclarationTyped,
        || {
            let type_str = ctx.state.full_name(sym);
            if used_on_source_class {
                if ctx_is_singleton {
                    format!("`{type_source}` type `{type_str}` used in a singleton method definition")
                } else {
                    format!("`{type_source}` type `{type_str}` used in an instance method definition")
                }
            } else {
                format!("`{type_source}` type `{type_str}` used outside of the class definition")
            }
        },
    );
    Type::untyped_untracked()
}

fn send_result_type(
    ctx: &mut MutableContext,
    s: &Send,
    sig_being_parsed: &ParsedSig,
    allow_self_type: bool,
    allow_rebind: bool,
    untyped_blame: SymbolRef,
) -> ResultType {
    let wk = ctx.state.wk_names.clone();
    let mut result = ResultType {
        ty: Type::untyped_untracked(),
        rebind: SymbolRef::NO_SYMBOL,
    };

    if is_t_proc(ctx.state, s) {
        let proc_sig = parse_sig(ctx, s, Some(sig_being_parsed), false, untyped_blame);
        if proc_sig.bind.exists() {
            if allow_rebind {
                result.rebind = proc_sig.bind;
            } else {
                report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                    "Using `bind` is not permitted here".to_string()
                });
            }
        }

        let mut targs = Vec::with_capacity(proc_sig.arg_types.len() + 1);
        match &proc_sig.returns {
            Some(returns) => targs.push(returns.clone()),
            None => {
                report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                    "Malformed T.proc: You must specify a return type".to_string()
                });
                targs.push(Type::untyped_untracked());
            }
        }
        for arg in &proc_sig.arg_types {
            targs.push(arg.ty.clone());
        }

        let arity = targs.len() - 1;
        if arity > well_known::MAX_PROC_ARITY {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                format!(
                    "Malformed T.proc: Too many arguments (max `{}`)",
                    well_known::MAX_PROC_ARITY
                )
            });
            return result;
        }
        result.ty = Type::Applied {
            class: well_known::proc_with_arity(arity),
            targs,
        };
        return result;
    }

    let Some(recvi) = s.recv.as_constant() else {
        report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
            "Malformed type declaration. Unknown type syntax. Expected a ClassName or T.<func>"
                .to_string()
        });
        return result;
    };

    if recvi.symbol == well_known::T {
        result.ty = interpret_t_combinator(ctx, s, sig_being_parsed, allow_self_type, untyped_blame);
        return result;
    }

    if recvi.symbol == well_known::MAGIC && s.fun == wk.call_with_splat {
        report(
            ctx.state,
            recvi.loc,
            ErrorCategory::InvalidTypeDeclarationTyped,
            || "Splats are unsupported by the static checker and banned in typed code".to_string(),
        );
        return result;
    }

    if s.fun != wk.square_brackets {
        report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
            "Malformed type declaration. Unknown type syntax. Expected a ClassName or T.<func>"
                .to_string()
        });
        return result;
    }

    if s.has_splat {
        report(
            ctx.state,
            s.loc,
            ErrorCategory::InvalidTypeDeclarationTyped,
            || "Splats are unsupported by the static checker and banned in typed code".to_string(),
        );
        return result;
    }

    // `Array[...]` and friends have typed counterparts; using the bare
    // stdlib class in a signature is a fixable mistake, not a type.
    let corrected = if recvi.symbol == well_known::ARRAY {
        well_known::T_ARRAY
    } else if recvi.symbol == well_known::HASH {
        well_known::T_HASH
    } else if recvi.symbol == well_known::ENUMERABLE {
        well_known::T_ENUMERABLE
    } else if recvi.symbol == well_known::ENUMERATOR {
        well_known::T_ENUMERATOR
    } else if recvi.symbol == well_known::RANGE {
        well_known::T_RANGE
    } else if recvi.symbol == well_known::SET {
        well_known::T_SET
    } else {
        SymbolRef::NO_SYMBOL
    };
    if corrected.exists() {
        if let Some(mut e) = ctx
            .state
            .diagnostics
            .begin_error(s.loc, ErrorCategory::BadStdlibGeneric)
        {
            let wanted = ctx.state.full_name(corrected);
            let legacy = ctx.state.full_name(recvi.symbol);
            e.set_header(format!(
                "Use `{wanted}[...]`, not `{legacy}[...]` to declare a typed `{legacy}`"
            ));
            e.add_section(ErrorSection {
                header: format!("`{legacy}[...]` will not work in the runtime type system."),
                lines: Vec::new(),
            });
        }
        return result;
    }

    let corrected = ctx.state.dealias(recvi.symbol);
    if !ctx.state.symbol(corrected).is_class() {
        report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
            "Expected a class or module".to_string()
        });
        return result;
    }

    // Generic instantiation rides the lattice's dispatch machinery: a
    // synthetic `[]` on the singleton with each argument as a meta type.
    let mut args = Vec::with_capacity(s.args.len());
    for arg in &s.args {
        let ty = get_result_type(ctx, arg, sig_being_parsed, false, untyped_blame);
        args.push(DispatchArg {
            ty: Type::Meta(Box::new(ty)),
            loc: arg.loc(),
        });
    }
    let singleton = ctx.state.singleton_class(corrected);
    let recv_type = Type::Class(singleton);
    let dispatch_args = DispatchArgs {
        name: wk.square_brackets,
        call_loc: s.loc,
        recv_loc: recvi.loc,
        args,
    };
    let dispatched = dispatch_call(ctx.state, &recv_type, &dispatch_args);
    ctx.state.diagnostics.absorb(dispatched.errors);

    match dispatched.return_type {
        out @ Type::Untyped { .. } => result.ty = out,
        Type::Meta(inner) => result.ty = *inner,
        _ => {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "Malformed type declaration. Unknown type syntax. Expected a ClassName or T.<func>"
                    .to_string()
            });
        }
    }
    result
}

fn interpret_t_combinator(
    ctx: &mut MutableContext,
    s: &Send,
    sig: &ParsedSig,
    allow_self_type: bool,
    untyped_blame: SymbolRef,
) -> Type {
    let wk = ctx.state.wk_names.clone();
    let fun = s.fun;

    if fun == wk.nilable {
        if s.args.len() != 1 {
            // Arity errors on combinators are reported downstream.
            return Type::untyped_untracked();
        }
        let inner = get_result_type(ctx, &s.args[0], sig, allow_self_type, untyped_blame);
        return Type::any(inner, Type::nil_class());
    }

    if fun == wk.all || fun == wk.any {
        if s.args.is_empty() {
            return Type::untyped_untracked();
        }
        let mut result = get_result_type(ctx, &s.args[0], sig, allow_self_type, untyped_blame);
        for arg in &s.args[1..] {
            let next = get_result_type(ctx, arg, sig, allow_self_type, untyped_blame);
            result = if fun == wk.all {
                Type::all(result, next)
            } else {
                Type::any(result, next)
            };
        }
        return result;
    }

    if fun == wk.type_parameter {
        if s.args.len() != 1 {
            return Type::untyped_untracked();
        }
        let Some(name) = s.args[0].as_literal().and_then(|lit| lit.as_symbol()) else {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "type_parameter requires a symbol".to_string()
            });
            return Type::untyped_untracked();
        };
        match sig.find_type_arg_by_name(name).and_then(|spec| spec.ty.clone()) {
            Some(ty) => return ty,
            None => {
                report(
                    ctx.state,
                    s.args[0].loc(),
                    ErrorCategory::InvalidTypeDeclaration,
                    || "Unspecified type parameter".to_string(),
                );
                return Type::untyped_untracked();
            }
        }
    }

    if fun == wk.enum_ {
        if s.args.len() != 1 {
            return Type::untyped_untracked();
        }
        let Expr::Array(arr) = &s.args[0] else {
            // The legacy behavior silently produced Object here; keep the
            // result but surface a deprecation when the flag asks for it.
            if ctx.state.config.deprecate_bare_enum {
                report(ctx.state, s.loc, ErrorCategory::DeprecatedSyntax, || {
                    "enum must be passed a literal array. e.g. enum([1,\"foo\",MyClass])"
                        .to_string()
                });
            }
            return ctx.state.external_type(well_known::OBJECT);
        };
        if arr.elems.is_empty() {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "enum([]) is invalid".to_string()
            });
            return Type::untyped_untracked();
        }
        let mut result = get_result_literal(ctx, &arr.elems[0]);
        for elem in &arr.elems[1..] {
            let next = get_result_literal(ctx, elem);
            result = Type::any(result, next);
        }
        return result;
    }

    if fun == wk.class_of {
        if s.args.len() != 1 {
            return Type::untyped_untracked();
        }
        let Some(obj) = s.args[0].as_constant() else {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "T.class_of needs a Class as its argument".to_string()
            });
            return Type::untyped_untracked();
        };
        let maybe_aliased = obj.symbol;
        if ctx.state.symbol(maybe_aliased).is_type_alias() {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "T.class_of can't be used with a type alias".to_string()
            });
            return Type::untyped_untracked();
        }
        if ctx.state.symbol(maybe_aliased).is_type_member() {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "T.class_of can't be used with a type member".to_string()
            });
            return Type::untyped_untracked();
        }
        let sym = ctx.state.dealias(maybe_aliased);
        if ctx.state.symbol(sym).is_static_field() {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "T.class_of can't be used with a constant field".to_string()
            });
            return Type::untyped_untracked();
        }
        if !ctx.state.symbol(sym).is_class() {
            report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
                "Unknown class".to_string()
            });
            return Type::untyped_untracked();
        }
        return Type::Class(ctx.state.singleton_class(sym));
    }

    if fun == wk.untyped {
        return Type::untyped(ctx.state, untyped_blame);
    }

    if fun == wk.self_type {
        if allow_self_type {
            return Type::SelfType;
        }
        report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
            "Only top-level T.self_type is supported".to_string()
        });
        return Type::untyped_untracked();
    }

    if fun == wk.noreturn {
        return Type::Bottom;
    }

    report(ctx.state, s.loc, ErrorCategory::InvalidTypeDeclaration, || {
        format!("Unsupported method `T.{}`", ctx.state.show_name(fun))
    });
    Type::untyped_untracked()
}

/// Literal elements of `T.enum([...])`.
fn get_result_literal(ctx: &mut MutableContext, expr: &Expr) -> Type {
    match expr.as_literal() {
        Some(lit) => {
            let ty = match lit.value {
                LitValue::Integer(v) => Type::Literal(LiteralValue::Integer(v)),
                LitValue::Float(v) => Type::Literal(LiteralValue::Float(v)),
                LitValue::Symbol(name) => Type::Literal(LiteralValue::Sym(name)),
                LitValue::String(name) => Type::Literal(LiteralValue::Str(name)),
                LitValue::True => Type::Literal(LiteralValue::True),
                LitValue::False => Type::Literal(LiteralValue::False),
                LitValue::Nil => Type::nil_class(),
            };
            ty.sanity_check(ctx.state);
            ty
        }
        None => {
            report(ctx.state, expr.loc(), ErrorCategory::InvalidTypeDeclaration, || {
                "Unsupported type literal".to_string()
            });
            Type::untyped_untracked()
        }
    }
}
