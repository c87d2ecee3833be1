// src/types/subtyping.rs
//
// Structural subtyping, join and meet. `Untyped` is deliberately both top
// and bottom: once a diagnostic has poisoned a term, every later comparison
// involving it succeeds so analysis keeps moving.

use crate::globals::GlobalState;
use crate::symbols::Variance;
use crate::types::Type;
use crate::well_known;

pub fn is_subtype(gs: &GlobalState, a: &Type, b: &Type) -> bool {
    if a == b {
        return true;
    }
    if a.is_untyped() || b.is_untyped() {
        return true;
    }
    if a.is_bottom() || b.is_top() {
        return true;
    }

    // Unions on the left and intersections on the right decompose
    // conjunctively; then the disjunctive directions get their chance.
    if let Type::Or(l, r) = a {
        return is_subtype(gs, l, b) && is_subtype(gs, r, b);
    }
    if let Type::And(l, r) = b {
        return is_subtype(gs, a, l) && is_subtype(gs, a, r);
    }
    if let Type::Or(l, r) = b {
        if is_subtype(gs, a, l) || is_subtype(gs, a, r) {
            return true;
        }
    }
    if let Type::And(l, r) = a {
        if is_subtype(gs, l, b) || is_subtype(gs, r, b) {
            return true;
        }
    }

    match (a, b) {
        (Type::Literal(x), Type::Literal(y)) => x == y,
        (Type::Literal(x), Type::Class(c)) => gs.derives_from(x.underlying_class(), *c),

        (Type::Class(x), Type::Class(y)) => gs.derives_from(*x, *y),
        (Type::Applied { class, .. }, Type::Class(y)) => gs.derives_from(*class, *y),
        // An unapplied class only fits an applied target whose arguments
        // constrain nothing.
        (Type::Class(x), Type::Applied { class, targs }) => {
            gs.derives_from(*x, *class) && targs.iter().all(Type::is_untyped)
        }
        (
            Type::Applied {
                class: ca,
                targs: ta,
            },
            Type::Applied {
                class: cb,
                targs: tb,
            },
        ) => {
            if ca == cb {
                let members = gs.symbol(*cb).type_members().to_vec();
                if members.len() != ta.len() || ta.len() != tb.len() {
                    return false;
                }
                members.iter().zip(ta.iter().zip(tb.iter())).all(
                    |(&member, (ai, bi))| match gs.symbol(member).variance() {
                        Variance::CoVariant => is_subtype(gs, ai, bi),
                        Variance::ContraVariant => is_subtype(gs, bi, ai),
                        Variance::Invariant => {
                            is_subtype(gs, ai, bi) && is_subtype(gs, bi, ai)
                        }
                    },
                )
            } else {
                gs.derives_from(*ca, *cb) && tb.iter().all(Type::is_untyped)
            }
        }

        (Type::Tuple(xs), Type::Tuple(ys)) => {
            xs.len() == ys.len()
                && xs.iter().zip(ys.iter()).all(|(x, y)| is_subtype(gs, x, y))
        }
        // A tuple is an array of the join of its elements.
        (Type::Tuple(xs), Type::Applied { class, targs }) => {
            *class == well_known::T_ARRAY
                && targs.len() == 1
                && is_subtype(gs, &lub_all(gs, xs), &targs[0])
        }
        (Type::Tuple(_), Type::Class(y)) => gs.derives_from(well_known::ARRAY, *y),

        // Shape keys widen (a shape with more keys is more specific);
        // values are covariant per key.
        (
            Type::Shape {
                keys: ka,
                values: va,
            },
            Type::Shape {
                keys: kb,
                values: vb,
            },
        ) => kb.iter().zip(vb.iter()).all(|(key, want)| {
            ka.iter()
                .position(|k| k == key)
                .is_some_and(|at| is_subtype(gs, &va[at], want))
        }),
        (Type::Shape { .. }, Type::Class(y)) => gs.derives_from(well_known::HASH, *y),

        _ => false,
    }
}

/// Least upper bound: subsumption fast paths, then a canonical union.
pub fn lub(gs: &GlobalState, a: &Type, b: &Type) -> Type {
    if is_subtype(gs, a, b) {
        return b.clone();
    }
    if is_subtype(gs, b, a) {
        return a.clone();
    }
    Type::any(a.clone(), b.clone())
}

/// Greatest lower bound, dual to `lub`.
pub fn glb(gs: &GlobalState, a: &Type, b: &Type) -> Type {
    if is_subtype(gs, a, b) {
        return a.clone();
    }
    if is_subtype(gs, b, a) {
        return b.clone();
    }
    Type::all(a.clone(), b.clone())
}

/// Join of a whole sequence; the join of nothing is `Bottom`.
pub fn lub_all(gs: &GlobalState, types: &[Type]) -> Type {
    types
        .iter()
        .fold(Type::Bottom, |acc, next| lub(gs, &acc, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Loc;
    use crate::globals::GlobalState;
    use crate::symbols::SymbolRef;
    use crate::types::LiteralValue;

    fn int() -> Type {
        Type::Class(well_known::INTEGER)
    }

    fn string() -> Type {
        Type::Class(well_known::STRING)
    }

    fn object() -> Type {
        Type::Class(well_known::OBJECT)
    }

    fn applied(class: SymbolRef, targs: Vec<Type>) -> Type {
        Type::Applied { class, targs }
    }

    #[test]
    fn reflexivity_over_varied_terms() {
        let gs = GlobalState::new(Default::default());
        let terms = vec![
            int(),
            Type::any(int(), Type::nil_class()),
            Type::all(int(), string()),
            Type::Tuple(vec![int(), string()]),
            Type::Shape {
                keys: vec![LiteralValue::Integer(1)],
                values: vec![int()],
            },
            Type::SelfType,
            Type::Meta(Box::new(int())),
            Type::untyped_untracked(),
            Type::Bottom,
            Type::Top,
            applied(well_known::T_ARRAY, vec![int()]),
        ];
        for t in &terms {
            assert!(is_subtype(&gs, t, t), "not reflexive: {}", t.show(&gs));
        }
    }

    #[test]
    fn untyped_is_top_and_bottom() {
        let gs = GlobalState::new(Default::default());
        let untyped = Type::untyped_untracked();
        assert!(is_subtype(&gs, &untyped, &int()));
        assert!(is_subtype(&gs, &int(), &untyped));
    }

    #[test]
    fn bottom_and_top_bracket_everything() {
        let gs = GlobalState::new(Default::default());
        assert!(is_subtype(&gs, &Type::Bottom, &int()));
        assert!(is_subtype(&gs, &int(), &Type::Top));
        assert!(!is_subtype(&gs, &int(), &Type::Bottom));
        assert!(!is_subtype(&gs, &Type::Top, &int()));
    }

    #[test]
    fn class_subtyping_follows_ancestry() {
        let gs = GlobalState::new(Default::default());
        assert!(is_subtype(&gs, &int(), &object()));
        assert!(!is_subtype(&gs, &object(), &int()));
        assert!(!is_subtype(&gs, &int(), &string()));
    }

    #[test]
    fn literals_sit_below_their_class() {
        let gs = GlobalState::new(Default::default());
        let three = Type::Literal(LiteralValue::Integer(3));
        assert!(is_subtype(&gs, &three, &int()));
        assert!(is_subtype(&gs, &three, &object()));
        assert!(!is_subtype(&gs, &three, &string()));
        assert!(!is_subtype(&gs, &int(), &three));
    }

    #[test]
    fn union_rules() {
        let gs = GlobalState::new(Default::default());
        let int_or_nil = Type::any(int(), Type::nil_class());
        assert!(is_subtype(&gs, &int(), &int_or_nil));
        assert!(is_subtype(&gs, &int_or_nil, &object()));
        assert!(!is_subtype(&gs, &int_or_nil, &int()));
        assert!(!is_subtype(&gs, &string(), &int_or_nil));
    }

    #[test]
    fn intersection_rules() {
        let gs = GlobalState::new(Default::default());
        let both = Type::all(int(), string());
        assert!(is_subtype(&gs, &both, &int()));
        assert!(is_subtype(&gs, &both, &string()));
        assert!(!is_subtype(&gs, &int(), &both));
    }

    #[test]
    fn applied_invariance_for_stdlib_arrays() {
        let gs = GlobalState::new(Default::default());
        let ints = applied(well_known::T_ARRAY, vec![int()]);
        let objects = applied(well_known::T_ARRAY, vec![object()]);
        assert!(!is_subtype(&gs, &ints, &objects));
        assert!(!is_subtype(&gs, &objects, &ints));
        assert!(is_subtype(&gs, &ints, &ints));
    }

    #[test]
    fn applied_covariance_for_enumerables() {
        let gs = GlobalState::new(Default::default());
        let ints = applied(well_known::T_ENUMERABLE, vec![int()]);
        let objects = applied(well_known::T_ENUMERABLE, vec![object()]);
        assert!(is_subtype(&gs, &ints, &objects));
        assert!(!is_subtype(&gs, &objects, &ints));
    }

    #[test]
    fn applied_contravariance() {
        let mut gs = GlobalState::new(Default::default());
        let name = gs.intern_name("Sink");
        let sink = gs.enter_class(well_known::ROOT, name, Loc::none()).unwrap();
        gs.symbol_mut(sink).set_is_module(false);
        gs.symbol_mut(sink).set_superclass(well_known::OBJECT);
        let input = gs.intern_name("Input");
        gs.enter_type_member(sink, input, Loc::none(), crate::symbols::Variance::ContraVariant)
            .unwrap();

        let takes_objects = applied(sink, vec![object()]);
        let takes_ints = applied(sink, vec![int()]);
        assert!(is_subtype(&gs, &takes_objects, &takes_ints));
        assert!(!is_subtype(&gs, &takes_ints, &takes_objects));
    }

    #[test]
    fn tuples_are_elementwise_covariant() {
        let gs = GlobalState::new(Default::default());
        let narrow = Type::Tuple(vec![int(), string()]);
        let wide = Type::Tuple(vec![object(), object()]);
        assert!(is_subtype(&gs, &narrow, &wide));
        assert!(!is_subtype(&gs, &wide, &narrow));
        let short = Type::Tuple(vec![int()]);
        assert!(!is_subtype(&gs, &short, &narrow));
    }

    #[test]
    fn tuple_widens_to_array_of_join() {
        let gs = GlobalState::new(Default::default());
        let tup = Type::Tuple(vec![int(), string()]);
        let arr_obj = applied(well_known::T_ARRAY, vec![object()]);
        let arr_join = applied(well_known::T_ARRAY, vec![Type::any(int(), string())]);
        assert!(is_subtype(&gs, &tup, &arr_join));
        assert!(is_subtype(&gs, &tup, &arr_obj));
        let arr_int = applied(well_known::T_ARRAY, vec![int()]);
        assert!(!is_subtype(&gs, &tup, &arr_int));
    }

    #[test]
    fn shape_keys_superset_rule() {
        let gs = GlobalState::new(Default::default());
        let k_a = LiteralValue::Integer(1);
        let k_b = LiteralValue::Integer(2);
        let more = Type::Shape {
            keys: vec![k_a, k_b],
            values: vec![int(), string()],
        };
        let fewer = Type::Shape {
            keys: vec![k_a],
            values: vec![object()],
        };
        // Extra keys are fine; missing keys are not.
        assert!(is_subtype(&gs, &more, &fewer));
        assert!(!is_subtype(&gs, &fewer, &more));
    }

    #[test]
    fn lub_and_glb_use_subsumption() {
        let gs = GlobalState::new(Default::default());
        assert_eq!(lub(&gs, &int(), &object()), object());
        assert_eq!(glb(&gs, &int(), &object()), int());
        assert_eq!(
            lub(&gs, &int(), &string()),
            Type::any(int(), string())
        );
        assert_eq!(
            glb(&gs, &int(), &string()),
            Type::all(int(), string())
        );
    }

    #[test]
    fn lub_all_of_empty_is_bottom() {
        let gs = GlobalState::new(Default::default());
        assert_eq!(lub_all(&gs, &[]), Type::Bottom);
        assert_eq!(lub_all(&gs, &[int()]), int());
    }
}
