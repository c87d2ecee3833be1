// src/symbols/lookup.rs
//
// Member lookup: direct, transitive over the ancestry, and the
// concrete-methods-only variant. Lookups never fail; absence is
// `SymbolRef::NO_SYMBOL`. Walks are depth-bounded so malformed cyclic
// hierarchies terminate.

use crate::globals::GlobalState;
use crate::names::NameRef;
use crate::symbols::SymbolRef;

/// Bound on ancestry walks.
const MAX_LOOKUP_DEPTH: u32 = 100;

impl GlobalState {
    /// O(1) lookup on the local member map.
    pub fn find_member(&self, sym: SymbolRef, name: NameRef) -> SymbolRef {
        self.symbol(sym)
            .members()
            .get(&name)
            .copied()
            .unwrap_or(SymbolRef::NO_SYMBOL)
    }

    /// Walk self, then mixins in linearization order, then the superclass
    /// chain. Static-field aliases are chased on each hit.
    pub fn find_member_transitive(&self, sym: SymbolRef, name: NameRef) -> SymbolRef {
        self.find_member_transitive_internal(sym, name, false, MAX_LOOKUP_DEPTH)
    }

    /// Like `find_member_transitive` but skips abstract methods, yielding
    /// the implementation an actual call would reach.
    pub fn find_concrete_method_transitive(&self, sym: SymbolRef, name: NameRef) -> SymbolRef {
        self.find_member_transitive_internal(sym, name, true, MAX_LOOKUP_DEPTH)
    }

    fn find_member_transitive_internal(
        &self,
        sym: SymbolRef,
        name: NameRef,
        skip_abstract: bool,
        depth: u32,
    ) -> SymbolRef {
        if depth == 0 {
            tracing::warn!(
                symbol = %self.full_name(sym),
                "member lookup hit the depth bound; hierarchy is likely cyclic"
            );
            return SymbolRef::NO_SYMBOL;
        }

        let direct = self.find_member(sym, name);
        if direct.exists() {
            let resolved = self.dealias(direct);
            if self.accepts(resolved, skip_abstract) {
                return resolved;
            }
        }

        let data = self.symbol(sym);
        if !data.is_class() {
            return SymbolRef::NO_SYMBOL;
        }

        let linearized = data.is_class_module_set() && data.is_linearization_computed();
        for &mixin in data.mixins() {
            let found = if linearized {
                // The mixin list is already flattened; a direct probe per
                // entry covers the whole mixin ancestry.
                let hit = self.find_member(mixin, name);
                if hit.exists() {
                    self.dealias(hit)
                } else {
                    SymbolRef::NO_SYMBOL
                }
            } else {
                self.find_member_transitive_internal(mixin, name, skip_abstract, depth - 1)
            };
            if found.exists() && self.accepts(found, skip_abstract) {
                return found;
            }
        }

        let superclass = data.superclass();
        if superclass.exists() {
            return self.find_member_transitive_internal(superclass, name, skip_abstract, depth - 1);
        }
        SymbolRef::NO_SYMBOL
    }

    fn accepts(&self, sym: SymbolRef, skip_abstract: bool) -> bool {
        if !skip_abstract {
            return true;
        }
        let data = self.symbol(sym);
        !(data.is_method() && data.is_abstract())
    }

    /// Reflexive, transitive ancestry check. With the linearization
    /// computed this is a membership probe plus the superclass chain.
    pub fn derives_from(&self, sub: SymbolRef, superclass: SymbolRef) -> bool {
        self.derives_from_internal(sub, superclass, MAX_LOOKUP_DEPTH)
    }

    fn derives_from_internal(&self, sub: SymbolRef, target: SymbolRef, depth: u32) -> bool {
        if depth == 0 || !sub.exists() {
            return false;
        }
        if sub == target {
            return true;
        }
        let data = self.symbol(sub);
        if !data.is_class() {
            return false;
        }
        let linearized = data.is_class_module_set() && data.is_linearization_computed();
        for &mixin in data.mixins() {
            if mixin == target {
                return true;
            }
            if !linearized && self.derives_from_internal(mixin, target, depth - 1) {
                return true;
            }
        }
        let superclass = data.superclass();
        superclass.exists() && self.derives_from_internal(superclass, target, depth - 1)
    }

    /// The full ancestor order: self, mixins, then the superclass chain
    /// (each with its own mixins), first occurrence winning.
    pub fn linearization_of(&self, sym: SymbolRef) -> Vec<SymbolRef> {
        let mut out = Vec::new();
        self.collect_ancestors(sym, &mut out, MAX_LOOKUP_DEPTH);
        let mut seen = rustc_hash::FxHashSet::default();
        out.retain(|&s| seen.insert(s));
        out
    }

    fn collect_ancestors(&self, sym: SymbolRef, out: &mut Vec<SymbolRef>, depth: u32) {
        if depth == 0 || !sym.exists() {
            return;
        }
        out.push(sym);
        let data = self.symbol(sym);
        if !data.is_class() {
            return;
        }
        let linearized = data.is_class_module_set() && data.is_linearization_computed();
        for &mixin in data.mixins() {
            if linearized {
                out.push(mixin);
            } else {
                self.collect_ancestors(mixin, out, depth - 1);
            }
        }
        let superclass = data.superclass();
        if superclass.exists() {
            self.collect_ancestors(superclass, out, depth - 1);
        }
    }
}
