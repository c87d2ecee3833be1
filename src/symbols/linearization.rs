// src/symbols/linearization.rs
//
// Mixin linearization. Rewrites a class's declared mixin list into its full
// flattened mixin ancestry: most recently included first, each mixin
// expanded through its own linearization, deduplicated so the
// highest-precedence occurrence wins. The superclass chain stays out of the
// list; ancestry walks append it after the mixins.

use smallvec::SmallVec;

use crate::checker_assert;
use crate::globals::GlobalState;
use crate::symbols::SymbolRef;
use crate::well_known;

const MAX_LINEARIZATION_DEPTH: u32 = 100;

impl GlobalState {
    /// Compute and store the linearization of `sym` and everything it
    /// reaches. Idempotent; sets `CLASS_LINEARIZATION_COMPUTED`.
    pub fn linearize(&mut self, sym: SymbolRef) {
        let data = self.symbol(sym);
        checker_assert!(data.is_class(), "linearize of a non-class: {data:?}");
        checker_assert!(
            data.is_class_module_set(),
            "module/class must be decided before linearization: {data:?}"
        );
        self.linearize_with_depth(sym, MAX_LINEARIZATION_DEPTH);
    }

    fn linearize_with_depth(&mut self, sym: SymbolRef, depth: u32) {
        if depth == 0 {
            tracing::warn!(
                symbol = %self.full_name(sym),
                "linearization hit the depth bound; mixin graph is likely cyclic"
            );
            return;
        }
        if self.symbol(sym).is_linearization_computed() {
            return;
        }

        let declared: Vec<SymbolRef> = self.symbol(sym).mixins().to_vec();
        for &mixin in &declared {
            if self.symbol(mixin).is_class() && self.symbol(mixin).is_class_module_set() {
                self.linearize_with_depth(mixin, depth - 1);
            }
        }
        let superclass = self.symbol(sym).superclass();
        if superclass.exists() && superclass != well_known::TODO_SYM {
            self.linearize_with_depth(superclass, depth - 1);
        }

        // Later includes take precedence: walk declarations in reverse and
        // keep the first occurrence of each ancestor.
        let mut flattened: Vec<SymbolRef> = Vec::with_capacity(declared.len());
        for &mixin in declared.iter().rev() {
            if !flattened.contains(&mixin) {
                flattened.push(mixin);
            }
            for &ancestor in self.symbol(mixin).mixins() {
                if !flattened.contains(&ancestor) {
                    flattened.push(ancestor);
                }
            }
        }

        tracing::debug!(
            symbol = %self.full_name(sym),
            mixins = flattened.len(),
            "linearization computed"
        );
        let data = self.symbol_mut(sym);
        data.mixins = SmallVec::from_vec(flattened);
        data.set_linearization_computed();
    }
}

#[cfg(test)]
mod tests {
    use crate::frontend::Loc;
    use crate::globals::GlobalState;
    use crate::symbols::SymbolRef;
    use crate::well_known;

    fn class(gs: &mut GlobalState, name: &str, superclass: SymbolRef) -> SymbolRef {
        let name = gs.intern_name(name);
        let sym = gs.enter_class(well_known::ROOT, name, Loc::none()).unwrap();
        gs.symbol_mut(sym).set_is_module(false);
        if superclass.exists() {
            gs.symbol_mut(sym).set_superclass(superclass);
        }
        sym
    }

    fn module(gs: &mut GlobalState, name: &str) -> SymbolRef {
        let name = gs.intern_name(name);
        let sym = gs.enter_class(well_known::ROOT, name, Loc::none()).unwrap();
        gs.symbol_mut(sym).set_is_module(true);
        sym
    }

    #[test]
    fn linearization_flattens_transitive_mixins() {
        let mut gs = GlobalState::new(Default::default());
        let inner = module(&mut gs, "Inner");
        let outer = module(&mut gs, "Outer");
        gs.symbol_mut(outer).add_mixin(inner);
        let widget = class(&mut gs, "Widget", well_known::OBJECT);
        gs.symbol_mut(widget).add_mixin(outer);

        gs.linearize(widget);
        assert!(gs.symbol(widget).is_linearization_computed());
        assert_eq!(gs.symbol(widget).mixins(), &[outer, inner]);
        assert!(gs.symbol(outer).is_linearization_computed());
    }

    #[test]
    fn later_includes_take_precedence() {
        let mut gs = GlobalState::new(Default::default());
        let first = module(&mut gs, "First");
        let second = module(&mut gs, "Second");
        let widget = class(&mut gs, "Widget", well_known::OBJECT);
        gs.symbol_mut(widget).add_mixin(first);
        gs.symbol_mut(widget).add_mixin(second);

        gs.linearize(widget);
        assert_eq!(gs.symbol(widget).mixins(), &[second, first]);
    }

    #[test]
    fn shared_mixins_dedup_to_highest_precedence() {
        let mut gs = GlobalState::new(Default::default());
        let shared = module(&mut gs, "Shared");
        let a = module(&mut gs, "A");
        gs.symbol_mut(a).add_mixin(shared);
        let b = module(&mut gs, "B");
        gs.symbol_mut(b).add_mixin(shared);
        let widget = class(&mut gs, "Widget", well_known::OBJECT);
        gs.symbol_mut(widget).add_mixin(a);
        gs.symbol_mut(widget).add_mixin(b);

        gs.linearize(widget);
        assert_eq!(gs.symbol(widget).mixins(), &[b, shared, a]);
    }

    #[test]
    fn linearize_is_idempotent() {
        let mut gs = GlobalState::new(Default::default());
        let mixin = module(&mut gs, "Mixin");
        let widget = class(&mut gs, "Widget", well_known::OBJECT);
        gs.symbol_mut(widget).add_mixin(mixin);

        gs.linearize(widget);
        let first = gs.symbol(widget).mixins().to_vec();
        gs.linearize(widget);
        assert_eq!(gs.symbol(widget).mixins(), first.as_slice());
    }

    #[test]
    fn derives_from_matches_linearization_membership() {
        let mut gs = GlobalState::new(Default::default());
        let inner = module(&mut gs, "Inner");
        let outer = module(&mut gs, "Outer");
        gs.symbol_mut(outer).add_mixin(inner);
        let base = class(&mut gs, "Base", well_known::OBJECT);
        let widget = class(&mut gs, "Widget", base);
        gs.symbol_mut(widget).add_mixin(outer);

        gs.linearize(widget);
        let ancestors = gs.linearization_of(widget);
        for &candidate in &[
            widget,
            outer,
            inner,
            base,
            well_known::OBJECT,
            well_known::BASIC_OBJECT,
        ] {
            assert!(
                ancestors.contains(&candidate),
                "{} missing from linearization",
                gs.full_name(candidate)
            );
            assert!(gs.derives_from(widget, candidate));
        }
        assert!(!ancestors.contains(&well_known::INTEGER));
        assert!(!gs.derives_from(widget, well_known::INTEGER));
    }

    #[test]
    fn cyclic_mixins_terminate() {
        let mut gs = GlobalState::new(Default::default());
        let a = module(&mut gs, "A");
        let b = module(&mut gs, "B");
        gs.symbol_mut(a).add_mixin(b);
        gs.symbol_mut(b).add_mixin(a);
        let widget = class(&mut gs, "Widget", well_known::OBJECT);
        gs.symbol_mut(widget).add_mixin(a);

        gs.linearize(widget);
        assert!(gs.symbol(widget).is_linearization_computed());
    }
}
