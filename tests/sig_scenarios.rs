// tests/sig_scenarios.rs
//! End-to-end signature parsing: build expression trees the way the parser
//! collaborator would, run them through the sig parser against a real
//! GlobalState, and check the resulting types, flags and write-backs.

use stoat::frontend::ast::{ArrayLit, BlockExpr, ConstantLit, Expr, HashLit, LitValue, Literal, Local, Send};
use stoat::frontend::Loc;
use stoat::sig::parser::{get_result_type, is_sig, parse_sig};
use stoat::sig::ParsedSig;
use stoat::types::subtyping::is_subtype;
use stoat::well_known;
use stoat::{
    ArgInfo, ArgKind, CheckerConfig, ErrorCategory, GlobalState, MutableContext, NameRef,
    SymbolRef, Type,
};

fn lit(value: LitValue) -> Expr {
    Expr::Literal(Literal {
        loc: Loc::none(),
        value,
    })
}

fn constant(symbol: SymbolRef) -> Expr {
    Expr::ConstantLit(ConstantLit {
        loc: Loc::none(),
        symbol,
        unresolved_path: None,
    })
}

fn self_ref() -> Expr {
    Expr::Local(Local {
        loc: Loc::none(),
        name: NameRef::NONE,
        is_self: true,
    })
}

fn send(recv: Expr, fun: NameRef, args: Vec<Expr>) -> Expr {
    Expr::Send(Send {
        loc: Loc::none(),
        recv: Box::new(recv),
        fun,
        args,
        block: None,
        has_splat: false,
    })
}

fn hash(pairs: Vec<(NameRef, Expr)>) -> Expr {
    let (keys, values) = pairs
        .into_iter()
        .map(|(name, value)| (lit(LitValue::Symbol(name)), value))
        .unzip();
    Expr::Hash(HashLit {
        loc: Loc::none(),
        keys,
        values,
    })
}

fn array(elems: Vec<Expr>) -> Expr {
    Expr::Array(ArrayLit {
        loc: Loc::none(),
        elems,
    })
}

fn sig_send(gs: &GlobalState, body: Expr) -> Send {
    Send {
        loc: Loc::none(),
        recv: Box::new(self_ref()),
        fun: gs.wk_names.sig,
        args: vec![],
        block: Some(Box::new(Expr::Block(BlockExpr {
            loc: Loc::none(),
            body: Box::new(body),
        }))),
        has_splat: false,
    }
}

/// A class plus a method with keyword parameters, the way the resolver
/// would have entered them.
fn class_with_method(
    gs: &mut GlobalState,
    class_name: &str,
    method_name: &str,
    params: &[&str],
) -> (SymbolRef, SymbolRef) {
    let cname = gs.intern_name(class_name);
    let class = gs
        .enter_class(well_known::ROOT, cname, Loc::none())
        .unwrap();
    gs.symbol_mut(class).set_is_module(false);
    gs.symbol_mut(class).set_superclass(well_known::OBJECT);

    let mname = gs.intern_name(method_name);
    let method = gs.enter_method(class, mname, Loc::none()).unwrap();
    for param in params {
        let pname = gs.intern_name(param);
        gs.symbol_mut(method)
            .arguments
            .push(ArgInfo::new(pname, Loc::none(), ArgKind::Keyword));
    }
    (class, method)
}

fn parse(gs: &mut GlobalState, owner: SymbolRef, body: Expr) -> ParsedSig {
    let sig = sig_send(gs, body);
    assert!(is_sig(gs, &sig));
    let mut ctx = MutableContext::new(gs, owner);
    parse_sig(&mut ctx, &sig, None, true, SymbolRef::NO_SYMBOL)
}

fn int() -> Type {
    Type::Class(well_known::INTEGER)
}

fn string() -> Type {
    Type::Class(well_known::STRING)
}

#[test]
fn params_and_returns_round_trip_onto_the_method() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, method) = class_with_method(&mut gs, "Calculator", "add", &["x", "y"]);
    let params = gs.wk_names.params;
    let returns = gs.wk_names.returns;
    let x = gs.intern_name("x");
    let y = gs.intern_name("y");

    // sig { params(x: Integer, y: String).returns(Integer) }
    let body = send(
        send(
            self_ref(),
            params,
            vec![hash(vec![
                (x, constant(well_known::INTEGER)),
                (y, constant(well_known::STRING)),
            ])],
        ),
        returns,
        vec![constant(well_known::INTEGER)],
    );

    let parsed = parse(&mut gs, class, body);
    assert!(gs.diagnostics.is_empty());
    assert!(parsed.seen.sig && parsed.seen.params && parsed.seen.returns);
    assert_eq!(parsed.returns, Some(int()));
    assert_eq!(parsed.arg_types.len(), 2);
    assert_eq!(parsed.arg_types[0].name, x);
    assert_eq!(parsed.arg_types[0].ty, int());
    assert_eq!(parsed.arg_types[1].name, y);
    assert_eq!(parsed.arg_types[1].ty, string());

    parsed.apply_to_method(&mut gs, method);
    let data = gs.symbol(method);
    assert_eq!(data.result_type, Some(int()));
    assert_eq!(data.arguments[0].arg_type, Some(int()));
    assert_eq!(data.arguments[1].arg_type, Some(string()));
}

#[test]
fn abstract_void_with_nilable_param() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, method) = class_with_method(&mut gs, "Renderer", "draw", &["x"]);
    let abstract_ = gs.wk_names.abstract_;
    let params = gs.wk_names.params;
    let void = gs.wk_names.void;
    let nilable = gs.wk_names.nilable;
    let x = gs.intern_name("x");

    // sig { abstract.params(x: T.nilable(Integer)).void }
    let body = send(
        send(
            send(self_ref(), abstract_, vec![]),
            params,
            vec![hash(vec![(
                x,
                send(constant(well_known::T), nilable, vec![constant(well_known::INTEGER)]),
            )])],
        ),
        void,
        vec![],
    );

    let parsed = parse(&mut gs, class, body);
    assert!(gs.diagnostics.is_empty());
    assert!(parsed.seen.abstract_ && parsed.seen.void);
    assert_eq!(parsed.returns, Some(Type::void()));
    // The parsed nilable equals the directly constructed union.
    assert_eq!(
        parsed.arg_types[0].ty,
        Type::any(int(), Type::nil_class())
    );

    parsed.apply_to_method(&mut gs, method);
    assert!(gs.symbol(method).is_abstract());
    assert_eq!(gs.symbol(method).result_type, Some(Type::void()));
}

#[test]
fn type_parameters_thread_through_generics() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, method) = class_with_method(&mut gs, "Collection", "first_of", &["xs"]);
    let type_parameters = gs.wk_names.type_parameters;
    let type_parameter = gs.wk_names.type_parameter;
    let params = gs.wk_names.params;
    let returns = gs.wk_names.returns;
    let square_brackets = gs.wk_names.square_brackets;
    let u = gs.intern_name("U");
    let xs = gs.intern_name("xs");

    // sig do
    //   type_parameters(:U)
    //     .params(xs: T::Array[T.type_parameter(:U)])
    //     .returns(T.type_parameter(:U))
    // end
    let t_param = || {
        send(
            constant(well_known::T),
            type_parameter,
            vec![lit(LitValue::Symbol(u))],
        )
    };
    let body = send(
        send(
            send(self_ref(), type_parameters, vec![lit(LitValue::Symbol(u))]),
            params,
            vec![hash(vec![(
                xs,
                send(constant(well_known::T_ARRAY), square_brackets, vec![t_param()]),
            )])],
        ),
        returns,
        vec![t_param()],
    );

    let parsed = parse(&mut gs, class, body);
    assert!(gs.diagnostics.is_empty());
    assert_eq!(parsed.type_args.len(), 1);
    assert_eq!(parsed.type_args[0].name, u);
    let fresh = Type::TypeVar(well_known::TODO_SYM);
    assert_eq!(parsed.type_args[0].ty, Some(fresh.clone()));
    assert_eq!(
        parsed.arg_types[0].ty,
        Type::Applied {
            class: well_known::T_ARRAY,
            targs: vec![fresh.clone()],
        }
    );
    // The return type is the same variable.
    assert_eq!(parsed.returns, Some(fresh));

    parsed.apply_to_method(&mut gs, method);
    assert!(gs.symbol(method).is_generic_method());
    assert_eq!(gs.symbol(method).type_arguments().len(), 1);
}

#[test]
fn returns_nil_suggests_nil_class_but_recovers() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, _) = class_with_method(&mut gs, "Quiet", "nothing", &[]);
    let returns = gs.wk_names.returns;

    let body = send(self_ref(), returns, vec![lit(LitValue::Nil)]);
    let parsed = parse(&mut gs, class, body);

    assert_eq!(parsed.returns, Some(Type::nil_class()));
    let errors = gs.diagnostics.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].header.contains("You probably meant .returns(NilClass)"));
    assert_eq!(errors[0].category, ErrorCategory::InvalidMethodSignature);
}

#[test]
fn standalone_proc_types_build_applied_procs() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, _) = class_with_method(&mut gs, "Caller", "call_it", &[]);
    let proc = gs.wk_names.proc;
    let params = gs.wk_names.params;
    let returns = gs.wk_names.returns;
    let x = gs.intern_name("x");

    // T.proc.params(x: Integer).returns(String)
    let expr = send(
        send(
            send(constant(well_known::T), proc, vec![]),
            params,
            vec![hash(vec![(x, constant(well_known::INTEGER))])],
        ),
        returns,
        vec![constant(well_known::STRING)],
    );

    let sig = ParsedSig::default();
    let mut ctx = MutableContext::new(&mut gs, class);
    let ty = get_result_type(&mut ctx, &expr, &sig, true, SymbolRef::NO_SYMBOL);

    assert!(gs.diagnostics.is_empty());
    assert_eq!(
        ty,
        Type::Applied {
            class: well_known::proc_with_arity(1),
            targs: vec![string(), int()],
        }
    );
}

#[test]
fn legacy_stdlib_generics_are_fixable_errors() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, _) = class_with_method(&mut gs, "Holder", "items", &[]);
    let returns = gs.wk_names.returns;
    let square_brackets = gs.wk_names.square_brackets;

    // sig { returns(Array[Integer]) }
    let body = send(
        self_ref(),
        returns,
        vec![send(
            constant(well_known::ARRAY),
            square_brackets,
            vec![constant(well_known::INTEGER)],
        )],
    );
    let parsed = parse(&mut gs, class, body);
    assert!(parsed.returns.as_ref().is_some_and(Type::is_untyped));
    let errors = gs.diagnostics.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].category, ErrorCategory::BadStdlibGeneric);
    assert!(errors[0].header.contains("T::Array"));

    // sig { returns(T::Array[Integer]) } is the fixed spelling.
    let body = send(
        self_ref(),
        returns,
        vec![send(
            constant(well_known::T_ARRAY),
            square_brackets,
            vec![constant(well_known::INTEGER)],
        )],
    );
    let parsed = parse(&mut gs, class, body);
    assert_eq!(
        parsed.returns,
        Some(Type::Applied {
            class: well_known::T_ARRAY,
            targs: vec![int()],
        })
    );
    assert_eq!(gs.diagnostics.len(), 1);
}

#[test]
fn parsed_returns_participate_in_the_lattice() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, _) = class_with_method(&mut gs, "Mixer", "pick", &[]);
    let returns = gs.wk_names.returns;
    let nilable = gs.wk_names.nilable;

    let body = send(
        self_ref(),
        returns,
        vec![send(constant(well_known::T), nilable, vec![constant(well_known::INTEGER)])],
    );
    let parsed = parse(&mut gs, class, body);
    let ty = parsed.returns.unwrap();

    assert!(is_subtype(&gs, &int(), &ty));
    assert!(is_subtype(&gs, &Type::nil_class(), &ty));
    assert!(is_subtype(&gs, &ty, &Type::Class(well_known::OBJECT)));
    assert!(!is_subtype(&gs, &ty, &int()));
    // Reflexivity and commutativity on the parsed term.
    assert!(is_subtype(&gs, &ty, &ty));
    assert_eq!(ty, Type::any(Type::nil_class(), int()));
}

#[test]
fn bind_resolves_to_a_class_symbol() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, method) = class_with_method(&mut gs, "Dsl", "configure", &[]);
    let bind = gs.wk_names.bind;
    let void = gs.wk_names.void;

    // sig { bind(String).void }
    let body = send(
        send(self_ref(), bind, vec![constant(well_known::STRING)]),
        void,
        vec![],
    );
    let parsed = parse(&mut gs, class, body);
    assert!(gs.diagnostics.is_empty());
    assert!(parsed.seen.bind);
    assert_eq!(parsed.bind, well_known::STRING);

    parsed.apply_to_method(&mut gs, method);
    assert_eq!(gs.symbol(method).rebind(), well_known::STRING);
}

#[test]
fn class_of_in_signatures_uses_singletons() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, _) = class_with_method(&mut gs, "Factory", "produces", &[]);
    let returns = gs.wk_names.returns;
    let class_of = gs.wk_names.class_of;

    let body = send(
        self_ref(),
        returns,
        vec![send(constant(well_known::T), class_of, vec![constant(class)])],
    );
    let parsed = parse(&mut gs, class, body);
    assert!(gs.diagnostics.is_empty());

    let singleton = gs.lookup_singleton_class(class);
    assert!(singleton.exists());
    assert_eq!(parsed.returns, Some(Type::Class(singleton)));
    assert_eq!(gs.attached_class(singleton), class);
}

#[test]
fn enum_of_literals_builds_a_union_of_literal_types() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, _) = class_with_method(&mut gs, "Chooser", "mode", &[]);
    let returns = gs.wk_names.returns;
    let enum_ = gs.wk_names.enum_;
    let fast = gs.intern_name("fast");
    let slow = gs.intern_name("slow");

    let body = send(
        self_ref(),
        returns,
        vec![send(
            constant(well_known::T),
            enum_,
            vec![array(vec![
                lit(LitValue::Symbol(fast)),
                lit(LitValue::Symbol(slow)),
            ])],
        )],
    );
    let parsed = parse(&mut gs, class, body);
    assert!(gs.diagnostics.is_empty());

    let ty = parsed.returns.unwrap();
    let fast_lit = Type::Literal(stoat::LiteralValue::Sym(fast));
    assert!(is_subtype(&gs, &fast_lit, &ty));
    assert!(is_subtype(&gs, &ty, &Type::Class(well_known::SYMBOL_CLASS)));
}

#[test]
fn every_sig_sets_sig_or_proc_and_returns_tracks_seen() {
    let mut gs = GlobalState::new(CheckerConfig::default());
    let (class, _) = class_with_method(&mut gs, "Props", "check", &[]);
    let returns = gs.wk_names.returns;
    let void = gs.wk_names.void;
    let overridable = gs.wk_names.overridable;

    let cases = vec![
        send(self_ref(), returns, vec![constant(well_known::INTEGER)]),
        send(self_ref(), void, vec![]),
        send(self_ref(), overridable, vec![]),
    ];
    for body in cases {
        let parsed = parse(&mut gs, class, body);
        assert!(parsed.seen.sig || parsed.seen.proc);
        assert_eq!(
            parsed.returns.is_some(),
            parsed.seen.returns || parsed.seen.void
        );
    }
}
