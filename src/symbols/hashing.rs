// src/symbols/hashing.rs
//
// Content hashes for incremental re-checking. `symbol_hash` digests
// everything a downstream pass can observe about a symbol; two sessions
// that produce the same hashes need no re-check. Members contribute their
// name and flag word only, which keeps the singleton/attached cycle from
// recursing. `method_shape_hash` keeps just the call shape.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::checker_assert;
use crate::globals::GlobalState;
use crate::symbols::{ArgKind, SymbolRef};
use crate::types::Type;

fn arg_kind_tag(kind: ArgKind) -> u8 {
    match kind {
        ArgKind::Required => 0,
        ArgKind::Optional => 1,
        ArgKind::Rest => 2,
        ArgKind::Keyword => 3,
        ArgKind::KeywordRest => 4,
        ArgKind::Block => 5,
    }
}

impl GlobalState {
    fn hash_type(&self, hasher: &mut FxHasher, ty: Option<&Type>) {
        match ty {
            // The rendering is stable across sessions, unlike raw symbol ids
            // from differently ordered shards.
            Some(t) => t.show(self).hash(hasher),
            None => "<none>".hash(hasher),
        }
    }

    /// Content hash over name, flags, arguments, result type, superclass,
    /// mixins, and stable-ordered members.
    pub fn symbol_hash(&self, sym: SymbolRef) -> u64 {
        let mut hasher = FxHasher::default();
        let data = self.symbol(sym);

        self.names.show(data.name).hash(&mut hasher);
        data.flags_raw().hash(&mut hasher);

        for arg in &data.arguments {
            self.names.show(arg.name).hash(&mut hasher);
            arg_kind_tag(arg.kind).hash(&mut hasher);
            arg.has_default.hash(&mut hasher);
            self.hash_type(&mut hasher, arg.arg_type.as_ref());
        }
        self.hash_type(&mut hasher, data.result_type.as_ref());

        if data.is_class() {
            self.full_name(data.superclass()).hash(&mut hasher);
            for &mixin in data.mixins() {
                self.full_name(mixin).hash(&mut hasher);
            }
        }

        for (name, member) in self.members_stable_order_slow(sym) {
            self.names.show(name).hash(&mut hasher);
            self.symbol(member).flags_raw().hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Hash of a method's call shape only: flags, arity, argument kinds and
    /// defaults. Renaming or retyping a parameter leaves this unchanged.
    pub fn method_shape_hash(&self, sym: SymbolRef) -> u64 {
        let data = self.symbol(sym);
        checker_assert!(data.is_method(), "method_shape_hash of a non-method: {data:?}");

        let mut hasher = FxHasher::default();
        self.names.show(data.name).hash(&mut hasher);
        data.flags_raw().hash(&mut hasher);
        data.arguments.len().hash(&mut hasher);
        for arg in &data.arguments {
            arg_kind_tag(arg.kind).hash(&mut hasher);
            arg.has_default.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::frontend::Loc;
    use crate::globals::GlobalState;
    use crate::symbols::{ArgInfo, ArgKind, SymbolRef};
    use crate::types::Type;
    use crate::well_known;

    fn method_with_arg(gs: &mut GlobalState, name: &str, arg: &str) -> SymbolRef {
        let mname = gs.intern_name(name);
        let method = gs
            .enter_method(well_known::OBJECT, mname, Loc::none())
            .unwrap();
        let aname = gs.intern_name(arg);
        gs.symbol_mut(method)
            .arguments
            .push(ArgInfo::new(aname, Loc::none(), ArgKind::Keyword));
        method
    }

    #[test]
    fn symbol_hash_is_stable_across_identical_states() {
        let mut a = GlobalState::new(Default::default());
        let mut b = GlobalState::new(Default::default());
        let ma = method_with_arg(&mut a, "compute", "x");
        let mb = method_with_arg(&mut b, "compute", "x");
        assert_eq!(a.symbol_hash(ma), b.symbol_hash(mb));
        assert_eq!(a.method_shape_hash(ma), b.method_shape_hash(mb));
    }

    #[test]
    fn symbol_hash_sees_type_changes_shape_hash_does_not() {
        let mut gs = GlobalState::new(Default::default());
        let method = method_with_arg(&mut gs, "compute", "x");
        let before_full = gs.symbol_hash(method);
        let before_shape = gs.method_shape_hash(method);

        gs.symbol_mut(method).arguments[0].arg_type = Some(Type::Class(well_known::INTEGER));
        gs.symbol_mut(method).result_type = Some(Type::Class(well_known::STRING));

        assert_ne!(gs.symbol_hash(method), before_full);
        assert_eq!(gs.method_shape_hash(method), before_shape);
    }

    #[test]
    fn shape_hash_sees_arity_and_kind_changes() {
        let mut gs = GlobalState::new(Default::default());
        let method = method_with_arg(&mut gs, "compute", "x");
        let before = gs.method_shape_hash(method);

        let extra = gs.intern_name("y");
        gs.symbol_mut(method)
            .arguments
            .push(ArgInfo::new(extra, Loc::none(), ArgKind::Block));
        assert_ne!(gs.method_shape_hash(method), before);
    }

    #[test]
    fn class_hash_sees_superclass_and_mixins() {
        let mut gs = GlobalState::new(Default::default());
        let name = gs.intern_name("Widget");
        let widget = gs.enter_class(well_known::ROOT, name, Loc::none()).unwrap();
        gs.symbol_mut(widget).set_is_module(false);
        gs.symbol_mut(widget).set_superclass(well_known::OBJECT);
        let before = gs.symbol_hash(widget);

        gs.symbol_mut(widget).add_mixin(well_known::ENUMERABLE);
        let with_mixin = gs.symbol_hash(widget);
        assert_ne!(before, with_mixin);

        gs.symbol_mut(widget).set_superclass(well_known::BASIC_OBJECT);
        assert_ne!(gs.symbol_hash(widget), with_mixin);
    }

    #[test]
    fn singleton_cycle_does_not_recurse() {
        let mut gs = GlobalState::new(Default::default());
        let name = gs.intern_name("Widget");
        let widget = gs.enter_class(well_known::ROOT, name, Loc::none()).unwrap();
        gs.symbol_mut(widget).set_is_module(false);
        gs.symbol_mut(widget).set_superclass(well_known::OBJECT);
        let singleton = gs.singleton_class(widget);

        // Hashing both sides of the cycle terminates.
        let _ = gs.symbol_hash(widget);
        let _ = gs.symbol_hash(singleton);
    }

    #[test]
    fn unresolved_stub_types_hash_distinctly() {
        let mut gs = GlobalState::new(Default::default());
        let foo = gs.intern_name("Foo");
        let bar = gs.intern_name("Bar");
        let name = gs.intern_name("lookup");
        let method = gs
            .enter_method(well_known::OBJECT, name, Loc::none())
            .unwrap();

        gs.symbol_mut(method).result_type = Some(Type::UnresolvedClass {
            scope: well_known::ROOT,
            names: vec![foo],
        });
        let with_foo = gs.symbol_hash(method);

        gs.symbol_mut(method).result_type = Some(Type::UnresolvedClass {
            scope: well_known::ROOT,
            names: vec![bar],
        });
        assert_ne!(gs.symbol_hash(method), with_foo);
    }
}
