// src/types/mod.rs
//
// The type lattice: algebraic type terms plus the canonicalizing
// constructors. Types are immutable values; compound terms box their
// children. All union/intersection construction in checker code goes
// through `Type::any` / `Type::all` so stored terms are always canonical.

pub mod dispatch;
pub mod substitute;
pub mod subtyping;

use std::cmp::Ordering;

use crate::checker_assert;
use crate::globals::GlobalState;
use crate::names::NameRef;
use crate::symbols::SymbolRef;
use crate::well_known;

/// Payload of a literal type: the value and (implicitly) the primitive
/// class it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Integer(i64),
    Float(f64),
    Sym(NameRef),
    Str(NameRef),
    True,
    False,
}

// Floats are compared bitwise for canonicalization purposes; literal float
// types never hold NaN (the parser rejects it).
impl Eq for LiteralValue {}

impl LiteralValue {
    /// The class a literal of this value derives from.
    pub fn underlying_class(&self) -> SymbolRef {
        match self {
            LiteralValue::Integer(_) => well_known::INTEGER,
            LiteralValue::Float(_) => well_known::FLOAT,
            LiteralValue::Sym(_) => well_known::SYMBOL_CLASS,
            LiteralValue::Str(_) => well_known::STRING,
            LiteralValue::True => well_known::TRUE_CLASS,
            LiteralValue::False => well_known::FALSE_CLASS,
        }
    }
}

/// A type term. See the module docs for construction discipline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A nominal, unparameterized class or module instance type.
    Class(SymbolRef),
    /// A generic class applied to type arguments.
    Applied { class: SymbolRef, targs: Vec<Type> },
    /// Fixed-arity heterogeneous array literal type.
    Tuple(Vec<Type>),
    /// Hash literal type with literal keys; `keys` and `values` are parallel.
    Shape {
        keys: Vec<LiteralValue>,
        values: Vec<Type>,
    },
    Literal(LiteralValue),
    /// Canonical union node. Built left-leaning by `Type::any`; the right
    /// child is never itself an `Or`.
    Or(Box<Type>, Box<Type>),
    /// Canonical intersection node, mirroring `Or`.
    And(Box<Type>, Box<Type>),
    /// An unresolved inference variable belonging to a type-argument symbol.
    TypeVar(SymbolRef),
    /// Reference to an in-scope type member or type template.
    LambdaParam(SymbolRef),
    SelfType,
    /// The type of a value that is itself a type.
    Meta(Box<Type>),
    /// A reference to a constant that never resolved. Kept verbatim so
    /// content hashes distinguish different unresolved spellings.
    UnresolvedClass {
        scope: SymbolRef,
        names: Vec<NameRef>,
    },
    /// Simultaneously top and bottom for checker purposes. `blame` is the
    /// method charged with the untyped flow, or `no_symbol`.
    Untyped { blame: SymbolRef },
    Bottom,
    Top,
}

impl Type {
    pub fn untyped_untracked() -> Type {
        Type::Untyped {
            blame: SymbolRef::NO_SYMBOL,
        }
    }

    /// An untyped term blaming `blame`, subject to the config toggle.
    pub fn untyped(gs: &GlobalState, blame: SymbolRef) -> Type {
        if gs.config.track_untyped_blame {
            Type::Untyped { blame }
        } else {
            Type::untyped_untracked()
        }
    }

    pub fn nil_class() -> Type {
        Type::Class(well_known::NIL_CLASS)
    }

    pub fn void() -> Type {
        Type::Class(well_known::VOID)
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, Type::Untyped { .. })
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Type::Bottom)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Type::Top)
    }

    pub fn is_nil_class(&self) -> bool {
        matches!(self, Type::Class(sym) if *sym == well_known::NIL_CLASS)
    }

    /// Union constructor: absorption, identity, untyped propagation,
    /// flattening, dedup, deterministic component order.
    pub fn any(a: Type, b: Type) -> Type {
        if a.is_untyped() {
            return a;
        }
        if b.is_untyped() {
            return b;
        }
        if a.is_top() || b.is_top() {
            return Type::Top;
        }
        let mut components = Vec::new();
        collect_or(a, &mut components);
        collect_or(b, &mut components);
        components.retain(|c| !c.is_bottom());
        if components.is_empty() {
            return Type::Bottom;
        }
        canonical_fold(components, Type::Or)
    }

    /// Intersection constructor, dual to `any`.
    pub fn all(a: Type, b: Type) -> Type {
        if a.is_untyped() {
            return a;
        }
        if b.is_untyped() {
            return b;
        }
        if a.is_bottom() || b.is_bottom() {
            return Type::Bottom;
        }
        let mut components = Vec::new();
        collect_and(a, &mut components);
        collect_and(b, &mut components);
        components.retain(|c| !c.is_top());
        if components.is_empty() {
            return Type::Top;
        }
        canonical_fold(components, Type::And)
    }

    /// The flattened components of a union (a single element for non-unions).
    pub fn or_components(&self) -> Vec<&Type> {
        let mut out = Vec::new();
        fn walk<'a>(t: &'a Type, out: &mut Vec<&'a Type>) {
            match t {
                Type::Or(l, r) => {
                    walk(l, out);
                    walk(r, out);
                }
                other => out.push(other),
            }
        }
        walk(self, &mut out);
        out
    }

    pub fn and_components(&self) -> Vec<&Type> {
        let mut out = Vec::new();
        fn walk<'a>(t: &'a Type, out: &mut Vec<&'a Type>) {
            match t {
                Type::And(l, r) => {
                    walk(l, out);
                    walk(r, out);
                }
                other => out.push(other),
            }
        }
        walk(self, &mut out);
        out
    }

    /// Debug-build structural validation of normalization invariants.
    pub fn sanity_check(&self, gs: &GlobalState) {
        if !cfg!(debug_assertions) {
            return;
        }
        match self {
            Type::Or(l, r) => {
                checker_assert!(
                    !matches!(**r, Type::Or(..)),
                    "union is not left-leaning: {}",
                    self.show(gs)
                );
                checker_assert!(
                    !l.is_untyped() && !r.is_untyped(),
                    "untyped inside a union: {}",
                    self.show(gs)
                );
                l.sanity_check(gs);
                r.sanity_check(gs);
            }
            Type::And(l, r) => {
                checker_assert!(
                    !matches!(**r, Type::And(..)),
                    "intersection is not left-leaning: {}",
                    self.show(gs)
                );
                checker_assert!(
                    !l.is_untyped() && !r.is_untyped(),
                    "untyped inside an intersection: {}",
                    self.show(gs)
                );
                l.sanity_check(gs);
                r.sanity_check(gs);
            }
            Type::Applied { class, targs } => {
                checker_assert!(class.exists(), "applied type with no class");
                for t in targs {
                    t.sanity_check(gs);
                }
            }
            Type::Tuple(elems) => {
                for t in elems {
                    t.sanity_check(gs);
                }
            }
            Type::Shape { keys, values } => {
                checker_assert!(keys.len() == values.len(), "shape keys/values disagree");
                for t in values {
                    t.sanity_check(gs);
                }
            }
            Type::Meta(inner) => {
                checker_assert!(
                    !matches!(**inner, Type::Meta(..)),
                    "nested meta type: {}",
                    self.show(gs)
                );
                inner.sanity_check(gs);
            }
            _ => {}
        }
    }

    /// Human-readable rendering for diagnostics.
    pub fn show(&self, gs: &GlobalState) -> String {
        match self {
            Type::Class(sym) => {
                if let Some(attached) = gs.attached_class_of(*sym) {
                    format!("T.class_of({})", gs.full_name(attached))
                } else {
                    gs.full_name(*sym)
                }
            }
            Type::Applied { class, targs } => {
                let args: Vec<String> = targs.iter().map(|t| t.show(gs)).collect();
                format!("{}[{}]", gs.full_name(*class), args.join(", "))
            }
            Type::Tuple(elems) => {
                let parts: Vec<String> = elems.iter().map(|t| t.show(gs)).collect();
                format!("[{}]", parts.join(", "))
            }
            Type::Shape { keys, values } => {
                let parts: Vec<String> = keys
                    .iter()
                    .zip(values.iter())
                    .map(|(k, v)| format!("{} => {}", show_literal(gs, k), v.show(gs)))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Type::Literal(lit) => show_literal(gs, lit),
            Type::Or(..) => {
                let parts: Vec<String> =
                    self.or_components().iter().map(|t| t.show(gs)).collect();
                format!("T.any({})", parts.join(", "))
            }
            Type::And(..) => {
                let parts: Vec<String> =
                    self.and_components().iter().map(|t| t.show(gs)).collect();
                format!("T.all({})", parts.join(", "))
            }
            Type::TypeVar(sym) => format!("T.type_parameter({})", gs.show_name(gs.symbol(*sym).name)),
            Type::LambdaParam(sym) => gs.show_name(gs.symbol(*sym).name),
            Type::SelfType => "T.self_type".to_string(),
            Type::Meta(inner) => format!("<Type: {}>", inner.show(gs)),
            Type::UnresolvedClass { scope, names } => {
                let mut out = gs.full_name(*scope);
                for name in names {
                    if !out.is_empty() {
                        out.push_str("::");
                    }
                    out.push_str(&gs.show_name(*name));
                }
                format!("{out} (unresolved)")
            }
            Type::Untyped { .. } => "T.untyped".to_string(),
            Type::Bottom => "T.noreturn".to_string(),
            Type::Top => "<top>".to_string(),
        }
    }
}

fn show_literal(gs: &GlobalState, lit: &LiteralValue) -> String {
    match lit {
        LiteralValue::Integer(v) => format!("Integer({v})"),
        LiteralValue::Float(v) => format!("Float({v})"),
        LiteralValue::Sym(name) => format!(":{}", gs.show_name(*name)),
        LiteralValue::Str(name) => format!("String(\"{}\")", gs.show_name(*name)),
        LiteralValue::True => "TrueClass".to_string(),
        LiteralValue::False => "FalseClass".to_string(),
    }
}

fn collect_or(t: Type, out: &mut Vec<Type>) {
    match t {
        Type::Or(l, r) => {
            collect_or(*l, out);
            collect_or(*r, out);
        }
        other => out.push(other),
    }
}

fn collect_and(t: Type, out: &mut Vec<Type>) {
    match t {
        Type::And(l, r) => {
            collect_and(*l, out);
            collect_and(*r, out);
        }
        other => out.push(other),
    }
}

/// Sort, dedup and rebuild a left-leaning tree with `node`.
fn canonical_fold(mut components: Vec<Type>, node: fn(Box<Type>, Box<Type>) -> Type) -> Type {
    components.sort_by(type_cmp);
    components.dedup();
    let mut iter = components.into_iter();
    let first = iter.next().expect("canonical_fold on empty component list");
    iter.fold(first, |acc, next| node(Box::new(acc), Box::new(next)))
}

fn variant_rank(t: &Type) -> u8 {
    match t {
        Type::Bottom => 0,
        Type::Literal(_) => 1,
        Type::Class(_) => 2,
        Type::Applied { .. } => 3,
        Type::Tuple(_) => 4,
        Type::Shape { .. } => 5,
        Type::TypeVar(_) => 6,
        Type::LambdaParam(_) => 7,
        Type::SelfType => 8,
        Type::Meta(_) => 9,
        Type::UnresolvedClass { .. } => 10,
        Type::Or(..) => 11,
        Type::And(..) => 12,
        Type::Untyped { .. } => 13,
        Type::Top => 14,
    }
}

fn literal_cmp(a: &LiteralValue, b: &LiteralValue) -> Ordering {
    fn rank(l: &LiteralValue) -> u8 {
        match l {
            LiteralValue::Integer(_) => 0,
            LiteralValue::Float(_) => 1,
            LiteralValue::Sym(_) => 2,
            LiteralValue::Str(_) => 3,
            LiteralValue::True => 4,
            LiteralValue::False => 5,
        }
    }
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (LiteralValue::Integer(x), LiteralValue::Integer(y)) => x.cmp(y),
        (LiteralValue::Float(x), LiteralValue::Float(y)) => x.to_bits().cmp(&y.to_bits()),
        (LiteralValue::Sym(x), LiteralValue::Sym(y)) => x.cmp(y),
        (LiteralValue::Str(x), LiteralValue::Str(y)) => x.cmp(y),
        _ => Ordering::Equal,
    })
}

fn seq_cmp(a: &[Type], b: &[Type]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = type_cmp(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Total structural order over type terms; drives canonical component
/// ordering so union/intersection construction commutes.
pub(crate) fn type_cmp(a: &Type, b: &Type) -> Ordering {
    let by_rank = variant_rank(a).cmp(&variant_rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }
    match (a, b) {
        (Type::Class(x), Type::Class(y)) => x.index().cmp(&y.index()),
        (
            Type::Applied {
                class: ca,
                targs: ta,
            },
            Type::Applied {
                class: cb,
                targs: tb,
            },
        ) => ca.index().cmp(&cb.index()).then_with(|| seq_cmp(ta, tb)),
        (Type::Tuple(x), Type::Tuple(y)) => seq_cmp(x, y),
        (
            Type::Shape {
                keys: ka,
                values: va,
            },
            Type::Shape {
                keys: kb,
                values: vb,
            },
        ) => {
            for (x, y) in ka.iter().zip(kb.iter()) {
                let ord = literal_cmp(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            ka.len().cmp(&kb.len()).then_with(|| seq_cmp(va, vb))
        }
        (Type::Literal(x), Type::Literal(y)) => literal_cmp(x, y),
        (Type::Or(la, ra), Type::Or(lb, rb)) | (Type::And(la, ra), Type::And(lb, rb)) => {
            type_cmp(la, lb).then_with(|| type_cmp(ra, rb))
        }
        (Type::TypeVar(x), Type::TypeVar(y)) => x.index().cmp(&y.index()),
        (Type::LambdaParam(x), Type::LambdaParam(y)) => x.index().cmp(&y.index()),
        (Type::Meta(x), Type::Meta(y)) => type_cmp(x, y),
        (
            Type::UnresolvedClass {
                scope: sa,
                names: na,
            },
            Type::UnresolvedClass {
                scope: sb,
                names: nb,
            },
        ) => sa.index().cmp(&sb.index()).then_with(|| na.cmp(nb)),
        (Type::Untyped { blame: x }, Type::Untyped { blame: y }) => x.index().cmp(&y.index()),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globals::GlobalState;

    fn int() -> Type {
        Type::Class(well_known::INTEGER)
    }

    fn string() -> Type {
        Type::Class(well_known::STRING)
    }

    #[test]
    fn any_is_commutative_after_canonicalization() {
        assert_eq!(
            Type::any(int(), string()),
            Type::any(string(), int())
        );
        assert_eq!(
            Type::all(int(), string()),
            Type::all(string(), int())
        );
    }

    #[test]
    fn any_collapses_duplicates() {
        assert_eq!(Type::any(int(), int()), int());
        assert_eq!(Type::all(string(), string()), string());
    }

    #[test]
    fn any_identity_and_absorption() {
        assert_eq!(Type::any(int(), Type::Bottom), int());
        assert_eq!(Type::any(int(), Type::Top), Type::Top);
        assert_eq!(Type::all(int(), Type::Top), int());
        assert_eq!(Type::all(int(), Type::Bottom), Type::Bottom);
    }

    #[test]
    fn untyped_short_circuits() {
        let untyped = Type::untyped_untracked();
        assert!(Type::any(int(), untyped.clone()).is_untyped());
        assert!(Type::all(untyped.clone(), int()).is_untyped());
        assert!(Type::any(untyped.clone(), Type::Bottom).is_untyped());
    }

    #[test]
    fn unions_flatten() {
        let nested = Type::any(Type::any(int(), string()), Type::nil_class());
        let flat = nested.or_components();
        assert_eq!(flat.len(), 3);
        // Re-joining in another order produces the identical term.
        let other = Type::any(Type::nil_class(), Type::any(string(), int()));
        assert_eq!(nested, other);
    }

    #[test]
    fn sanity_check_accepts_canonical_terms() {
        let gs = GlobalState::new(Default::default());
        let t = Type::any(int(), Type::any(string(), Type::nil_class()));
        t.sanity_check(&gs);
    }

    #[test]
    fn show_renders_unions_and_tuples() {
        let gs = GlobalState::new(Default::default());
        let t = Type::any(int(), Type::nil_class());
        assert_eq!(t.show(&gs), "T.any(Integer, NilClass)");
        let tup = Type::Tuple(vec![int(), string()]);
        assert_eq!(tup.show(&gs), "[Integer, String]");
    }

    #[test]
    fn literal_underlying_classes() {
        assert_eq!(
            LiteralValue::Integer(3).underlying_class(),
            well_known::INTEGER
        );
        assert_eq!(LiteralValue::True.underlying_class(), well_known::TRUE_CLASS);
    }
}
