// src/globals.rs
//
// GlobalState owns everything: the name table, the symbol arena, the
// diagnostic buffer and the checker configuration. Handles (NameRef,
// SymbolRef) are plain indices into the arenas; symbols freely form cycles
// (owner/singleton/attached, super/mixin) because the arena breaks ownership.
//
// All mutation goes through &mut GlobalState. The state is single-threaded;
// sharded checking deep-copies it per worker and merges deltas back.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::checker_assert;
use crate::diagnostics::{DiagnosticBuffer, ErrorCategory};
use crate::frontend::Loc;
use crate::names::{NameRef, NameTable, UniqueNameKind};
use crate::symbols::{Symbol, SymbolKind, SymbolRef, Variance};
use crate::types::dispatch::GENERIC_INSTANTIATION;
use crate::types::Type;
use crate::well_known;

/// Feature flags and policy knobs.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Record which method to blame on untyped flows.
    pub track_untyped_blame: bool,
    /// Diagnose `T.enum` applied to a non-array argument instead of silently
    /// producing `Object`.
    pub deprecate_bare_enum: bool,
    /// Categories that `begin_error` drops at the source.
    pub suppressed_categories: FxHashSet<ErrorCategory>,
    /// Stdlib classes exempt from the "generic class without type arguments"
    /// diagnostic. Closed set, revisit before growing it.
    pub stdlib_generic_exemptions: FxHashSet<SymbolRef>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        let mut stdlib_generic_exemptions = FxHashSet::default();
        for sym in [
            well_known::HASH,
            well_known::ARRAY,
            well_known::SET,
            well_known::STRUCT,
            well_known::FILE,
        ] {
            stdlib_generic_exemptions.insert(sym);
        }
        Self {
            track_untyped_blame: false,
            deprecate_bare_enum: false,
            suppressed_categories: FxHashSet::default(),
            stdlib_generic_exemptions,
        }
    }
}

/// Interned handles for the names the checker consults constantly, cached
/// once at startup.
#[derive(Debug, Clone)]
pub struct WellKnownNames {
    pub sig: NameRef,
    pub proc: NameRef,
    pub params: NameRef,
    pub returns: NameRef,
    pub void: NameRef,
    pub abstract_: NameRef,
    pub override_: NameRef,
    pub overridable: NameRef,
    pub implementation: NameRef,
    pub incompatible_override: NameRef,
    pub final_: NameRef,
    pub generated: NameRef,
    pub checked: NameRef,
    pub soft: NameRef,
    pub bind: NameRef,
    pub type_parameters: NameRef,
    pub type_parameter: NameRef,
    pub nilable: NameRef,
    pub any: NameRef,
    pub all: NameRef,
    pub untyped: NameRef,
    pub noreturn: NameRef,
    pub self_type: NameRef,
    pub class_of: NameRef,
    pub enum_: NameRef,
    pub square_brackets: NameRef,
    pub call_with_splat: NameRef,
    /// Reserved member name linking a singleton class back to its class.
    pub attached_class: NameRef,
}

impl WellKnownNames {
    fn populate(names: &mut NameTable) -> Self {
        Self {
            sig: names.intern("sig"),
            proc: names.intern("proc"),
            params: names.intern("params"),
            returns: names.intern("returns"),
            void: names.intern("void"),
            abstract_: names.intern("abstract"),
            override_: names.intern("override"),
            overridable: names.intern("overridable"),
            implementation: names.intern("implementation"),
            incompatible_override: names.intern("incompatible_override"),
            final_: names.intern("final"),
            generated: names.intern("generated"),
            checked: names.intern("checked"),
            soft: names.intern("soft"),
            bind: names.intern("bind"),
            type_parameters: names.intern("type_parameters"),
            type_parameter: names.intern("type_parameter"),
            nilable: names.intern("nilable"),
            any: names.intern("any"),
            all: names.intern("all"),
            untyped: names.intern("untyped"),
            noreturn: names.intern("noreturn"),
            self_type: names.intern("self_type"),
            class_of: names.intern("class_of"),
            enum_: names.intern("enum"),
            square_brackets: names.intern("[]"),
            call_with_splat: names.intern("call_with_splat"),
            attached_class: names.intern("<attached class>"),
        }
    }
}

/// Failures of the append-only symbol-table API. Lookups never produce
/// these; only conflicting declarations do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    #[error("`{name}` is already declared as a {existing:?}, cannot redeclare as a {requested:?}")]
    DuplicateSymbol {
        name: String,
        existing: SymbolKind,
        requested: SymbolKind,
    },
}

/// Process-wide container for one check session.
pub struct GlobalState {
    pub(crate) names: NameTable,
    pub(crate) symbols: Vec<Symbol>,
    pub diagnostics: DiagnosticBuffer,
    pub config: CheckerConfig,
    pub wk_names: WellKnownNames,
}

impl GlobalState {
    pub fn new(config: CheckerConfig) -> Self {
        let mut names = NameTable::new();
        let wk_names = WellKnownNames::populate(&mut names);
        let diagnostics = DiagnosticBuffer::with_suppressed(config.suppressed_categories.clone());
        let mut gs = Self {
            names,
            symbols: Vec::with_capacity(well_known::FIXED_SYMBOL_COUNT as usize + 32),
            diagnostics,
            config,
            wk_names,
        };
        gs.bootstrap();
        gs
    }

    // --- arena access ---

    pub fn symbol(&self, sym: SymbolRef) -> &Symbol {
        &self.symbols[sym.index() as usize]
    }

    pub fn symbol_mut(&mut self, sym: SymbolRef) -> &mut Symbol {
        &mut self.symbols[sym.index() as usize]
    }

    pub fn symbols_used(&self) -> usize {
        self.symbols.len()
    }

    // --- names ---

    pub fn intern_name(&mut self, s: &str) -> NameRef {
        self.names.intern(s)
    }

    pub fn lookup_name(&self, s: &str) -> Option<NameRef> {
        self.names.lookup(s)
    }

    pub fn show_name(&self, name: NameRef) -> String {
        self.names.show(name)
    }

    /// A fresh synthetic name scoped to `owner`, advancing its counter.
    /// The namer uses these for desugared temporaries and anonymous members.
    pub fn next_unique_name(&mut self, owner: SymbolRef) -> NameRef {
        let data = self.symbol_mut(owner);
        let num = data.unique_counter;
        data.unique_counter += 1;
        let base = self.symbol(owner).name;
        self.names.unique(UniqueNameKind::Namer, base, num)
    }

    // --- symbol creation ---

    fn create_symbol(&mut self, owner: SymbolRef, name: NameRef, kind: SymbolKind) -> SymbolRef {
        let sym = SymbolRef::from_raw(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(owner, name, kind));
        sym
    }

    /// Idempotent entry point for declarations. Returns the existing symbol
    /// when a member of the same name and kind is already present; fails on
    /// a kind conflict.
    pub fn enter_symbol(
        &mut self,
        owner: SymbolRef,
        name: NameRef,
        kind: SymbolKind,
        loc: Loc,
    ) -> Result<SymbolRef, SymbolTableError> {
        checker_assert!(owner.exists(), "cannot enter a symbol under no_symbol");
        if let Some(&existing) = self.symbol(owner).members().get(&name) {
            let existing_kind = self.symbol(existing).kind();
            if existing_kind == kind {
                if loc != Loc::none() {
                    self.symbol_mut(existing).add_loc(loc);
                }
                return Ok(existing);
            }
            return Err(SymbolTableError::DuplicateSymbol {
                name: self.names.show(name),
                existing: existing_kind,
                requested: kind,
            });
        }
        let sym = self.create_symbol(owner, name, kind);
        if loc != Loc::none() {
            self.symbol_mut(sym).add_loc(loc);
        }
        self.symbol_mut(owner).members.insert(name, sym);
        if matches!(kind, SymbolKind::TypeMember | SymbolKind::TypeArgument) {
            self.symbol_mut(owner).type_params.push(sym);
        }
        Ok(sym)
    }

    pub fn enter_class(
        &mut self,
        owner: SymbolRef,
        name: NameRef,
        loc: Loc,
    ) -> Result<SymbolRef, SymbolTableError> {
        self.enter_symbol(owner, name, SymbolKind::Class, loc)
    }

    pub fn enter_method(
        &mut self,
        owner: SymbolRef,
        name: NameRef,
        loc: Loc,
    ) -> Result<SymbolRef, SymbolTableError> {
        self.enter_symbol(owner, name, SymbolKind::Method, loc)
    }

    pub fn enter_field(
        &mut self,
        owner: SymbolRef,
        name: NameRef,
        loc: Loc,
    ) -> Result<SymbolRef, SymbolTableError> {
        self.enter_symbol(owner, name, SymbolKind::Field, loc)
    }

    pub fn enter_static_field(
        &mut self,
        owner: SymbolRef,
        name: NameRef,
        loc: Loc,
    ) -> Result<SymbolRef, SymbolTableError> {
        self.enter_symbol(owner, name, SymbolKind::StaticField, loc)
    }

    pub fn enter_type_member(
        &mut self,
        owner: SymbolRef,
        name: NameRef,
        loc: Loc,
        variance: Variance,
    ) -> Result<SymbolRef, SymbolTableError> {
        let sym = self.enter_symbol(owner, name, SymbolKind::TypeMember, loc)?;
        self.set_variance(sym, variance);
        Ok(sym)
    }

    pub fn enter_type_argument(
        &mut self,
        owner: SymbolRef,
        name: NameRef,
        loc: Loc,
        variance: Variance,
    ) -> Result<SymbolRef, SymbolTableError> {
        let sym = self.enter_symbol(owner, name, SymbolKind::TypeArgument, loc)?;
        self.set_variance(sym, variance);
        Ok(sym)
    }

    fn set_variance(&mut self, sym: SymbolRef, variance: Variance) {
        let data = self.symbol_mut(sym);
        let already = match variance {
            Variance::CoVariant => data.is_covariant(),
            Variance::ContraVariant => data.is_contravariant(),
            Variance::Invariant => data.is_invariant(),
        };
        if already {
            return;
        }
        match variance {
            Variance::CoVariant => data.set_covariant(),
            Variance::ContraVariant => data.set_contravariant(),
            Variance::Invariant => data.set_invariant(),
        }
    }

    // --- singleton / attached classes ---

    /// The singleton class of `sym`, created lazily on first request and
    /// cached as a member under the reserved synthetic name.
    pub fn singleton_class(&mut self, sym: SymbolRef) -> SymbolRef {
        let data = self.symbol(sym);
        checker_assert!(data.is_class(), "singleton_class of a non-class: {data:?}");
        let class_name = data.name;
        let singleton_name = self.names.unique(UniqueNameKind::Singleton, class_name, 1);
        if let Some(&existing) = self.symbol(sym).members().get(&singleton_name) {
            return existing;
        }
        let owner = self.symbol(sym).owner;
        let singleton = self.create_symbol(owner, singleton_name, SymbolKind::Class);
        self.symbol_mut(singleton).set_is_module(false);
        self.symbol_mut(singleton).set_synthesized();
        self.symbol_mut(sym).members.insert(singleton_name, singleton);
        let attached_name = self.wk_names.attached_class;
        self.symbol_mut(singleton).members.insert(attached_name, sym);

        // The singleton hierarchy shadows the attached hierarchy.
        let attached_super = {
            let data = self.symbol(sym);
            if data.is_class_module_set() && data.is_class_module() {
                SymbolRef::NO_SYMBOL
            } else {
                data.superclass()
            }
        };
        let singleton_super = if attached_super.exists() && attached_super != well_known::TODO_SYM
        {
            self.singleton_class(attached_super)
        } else {
            well_known::OBJECT
        };
        self.symbol_mut(singleton).set_superclass(singleton_super);
        singleton
    }

    /// The singleton class if it was already created, `no_symbol` otherwise.
    pub fn lookup_singleton_class(&self, sym: SymbolRef) -> SymbolRef {
        let data = self.symbol(sym);
        if !data.is_class() {
            return SymbolRef::NO_SYMBOL;
        }
        let Some(singleton_name) =
            self.names
                .lookup_unique(UniqueNameKind::Singleton, data.name, 1)
        else {
            return SymbolRef::NO_SYMBOL;
        };
        data.members()
            .get(&singleton_name)
            .copied()
            .unwrap_or(SymbolRef::NO_SYMBOL)
    }

    pub fn is_singleton_class(&self, sym: SymbolRef) -> bool {
        self.attached_class_of(sym).is_some()
    }

    /// The class a singleton class is attached to, if `sym` is a singleton.
    pub fn attached_class_of(&self, sym: SymbolRef) -> Option<SymbolRef> {
        let data = self.symbol(sym);
        if !data.is_class() {
            return None;
        }
        if self.names.unique_kind(data.name) != Some(UniqueNameKind::Singleton) {
            return None;
        }
        data.members().get(&self.wk_names.attached_class).copied()
    }

    pub fn attached_class(&self, sym: SymbolRef) -> SymbolRef {
        self.attached_class_of(sym).unwrap_or(SymbolRef::NO_SYMBOL)
    }

    /// Iterate `attached_class` to its fixpoint.
    pub fn top_attached_class(&self, sym: SymbolRef) -> SymbolRef {
        let mut cur = sym;
        while let Some(attached) = self.attached_class_of(cur) {
            cur = attached;
        }
        cur
    }

    // --- scope walks ---

    pub fn enclosing_class(&self, sym: SymbolRef) -> SymbolRef {
        let mut cur = sym;
        let mut depth = 0;
        while cur.exists() && depth < 100 {
            if self.symbol(cur).is_class() {
                return cur;
            }
            cur = self.symbol(cur).owner;
            depth += 1;
        }
        SymbolRef::NO_SYMBOL
    }

    pub fn enclosing_method(&self, sym: SymbolRef) -> SymbolRef {
        let mut cur = sym;
        let mut depth = 0;
        while cur.exists() && depth < 100 {
            if self.symbol(cur).is_method() {
                return cur;
            }
            cur = self.symbol(cur).owner;
            depth += 1;
        }
        SymbolRef::NO_SYMBOL
    }

    /// Chase static-field aliases, bounded so alias cycles terminate.
    pub fn dealias(&self, sym: SymbolRef) -> SymbolRef {
        self.dealias_with_limit(sym, 42)
    }

    fn dealias_with_limit(&self, sym: SymbolRef, limit: u32) -> SymbolRef {
        if !sym.exists() || limit == 0 {
            return sym;
        }
        let data = self.symbol(sym);
        if data.is_static_field() && !data.is_type_alias() && data.alias_target().exists() {
            return self.dealias_with_limit(data.alias_target(), limit - 1);
        }
        sym
    }

    // --- instance types ---

    /// Count of type parameters an instantiation must supply.
    pub fn type_arity(&self, sym: SymbolRef) -> usize {
        self.symbol(sym)
            .type_members()
            .iter()
            .filter(|&&tm| !self.symbol(tm).is_fixed())
            .count()
    }

    /// The instance type of `sym` as seen from inside the class body:
    /// generics stay abstract as lambda params.
    pub fn self_type_args(&self, sym: SymbolRef) -> Vec<Type> {
        self.symbol(sym)
            .type_members()
            .iter()
            .map(|&tm| Type::LambdaParam(tm))
            .collect()
    }

    pub fn self_type(&self, sym: SymbolRef) -> Type {
        let targs = self.self_type_args(sym);
        if targs.is_empty() {
            Type::Class(sym)
        } else {
            Type::Applied { class: sym, targs }
        }
    }

    /// The instance type of `sym` as seen from outside: unapplied generics
    /// become untyped (or their fixed bound).
    pub fn external_type(&self, sym: SymbolRef) -> Type {
        let data = self.symbol(sym);
        if data.type_members().is_empty() {
            return Type::Class(sym);
        }
        let targs = data
            .type_members()
            .iter()
            .map(|&tm| {
                let member = self.symbol(tm);
                if member.is_fixed() {
                    member
                        .result_type
                        .clone()
                        .unwrap_or_else(Type::untyped_untracked)
                } else {
                    Type::untyped_untracked()
                }
            })
            .collect();
        Type::Applied { class: sym, targs }
    }

    // --- serialization support ---

    /// Members in a stable order for the serializer and for hashing.
    pub fn members_stable_order_slow(&self, sym: SymbolRef) -> Vec<(NameRef, SymbolRef)> {
        let mut out: Vec<(NameRef, SymbolRef)> = self
            .symbol(sym)
            .members()
            .iter()
            .map(|(&name, &member)| (name, member))
            .collect();
        out.sort_by(|a, b| {
            self.names
                .show(a.0)
                .cmp(&self.names.show(b.0))
                .then(a.1.index().cmp(&b.1.index()))
        });
        out
    }

    /// Render `Owner::Name`, eliding the root scope.
    pub fn full_name(&self, sym: SymbolRef) -> String {
        if !sym.exists() {
            return "<none>".to_string();
        }
        let data = self.symbol(sym);
        let name = self.names.show(data.name);
        if data.owner == well_known::ROOT || data.owner == sym || !data.owner.exists() {
            name
        } else {
            format!("{}::{}", self.full_name(data.owner), name)
        }
    }

    /// Per-worker copy for sharded checking.
    pub fn deep_copy(&self) -> GlobalState {
        GlobalState {
            names: self.names.clone(),
            symbols: self.symbols.clone(),
            diagnostics: self.diagnostics.clone(),
            config: self.config.clone(),
            wk_names: self.wk_names.clone(),
        }
    }

    /// Debug-build validation of every symbol in the arena.
    pub fn sanity_check(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        for (index, symbol) in self.symbols.iter().enumerate() {
            checker_assert!(
                (symbol.owner.index() as usize) < self.symbols.len(),
                "symbol {index} has an out-of-range owner"
            );
            symbol.sanity_check();
        }
    }

    // --- bootstrap ---

    fn bootstrap(&mut self) {
        let none_name = self.names.intern("<none>");
        let no_symbol = self.create_symbol(SymbolRef::NO_SYMBOL, none_name, SymbolKind::Class);
        self.symbol_mut(no_symbol).set_synthesized();
        debug_assert_eq!(no_symbol, well_known::NO_SYMBOL);

        let root_name = self.names.intern("<root>");
        let root = self.create_symbol(well_known::ROOT, root_name, SymbolKind::Class);
        self.symbol_mut(root).set_is_module(true);
        self.symbol_mut(root).set_synthesized();
        debug_assert_eq!(root, well_known::ROOT);

        let todo_name = self.names.intern("<todo>");
        let todo = self.create_symbol(root, todo_name, SymbolKind::Class);
        self.symbol_mut(todo).set_synthesized();
        debug_assert_eq!(todo, well_known::TODO_SYM);

        let stub_name = self.names.intern("<stub>");
        let stub = self.create_symbol(root, stub_name, SymbolKind::Class);
        self.symbol_mut(stub).set_is_module(true);
        self.symbol_mut(stub).set_synthesized();
        debug_assert_eq!(stub, well_known::STUB_CLASS);

        let basic_object =
            self.enter_builtin(root, "BasicObject", SymbolRef::NO_SYMBOL, false);
        debug_assert_eq!(basic_object, well_known::BASIC_OBJECT);
        let object = self.enter_builtin(root, "Object", basic_object, false);
        debug_assert_eq!(object, well_known::OBJECT);

        for (name, expected) in [
            ("Integer", well_known::INTEGER),
            ("Float", well_known::FLOAT),
            ("String", well_known::STRING),
            ("Symbol", well_known::SYMBOL_CLASS),
            ("NilClass", well_known::NIL_CLASS),
            ("TrueClass", well_known::TRUE_CLASS),
            ("FalseClass", well_known::FALSE_CLASS),
            ("Array", well_known::ARRAY),
            ("Hash", well_known::HASH),
            ("Set", well_known::SET),
            ("Struct", well_known::STRUCT),
            ("File", well_known::FILE),
            ("Range", well_known::RANGE),
        ] {
            let sym = self.enter_builtin(root, name, object, false);
            debug_assert_eq!(sym, expected);
        }

        let enumerable = self.enter_builtin(root, "Enumerable", SymbolRef::NO_SYMBOL, true);
        debug_assert_eq!(enumerable, well_known::ENUMERABLE);
        let enumerator = self.enter_builtin(root, "Enumerator", object, false);
        debug_assert_eq!(enumerator, well_known::ENUMERATOR);
        let proc = self.enter_builtin(root, "Proc", object, false);
        debug_assert_eq!(proc, well_known::PROC);
        let magic = self.enter_builtin(root, "Magic", object, false);
        debug_assert_eq!(magic, well_known::MAGIC);
        let sig_gate = self.enter_builtin(root, "Sig", SymbolRef::NO_SYMBOL, true);
        debug_assert_eq!(sig_gate, well_known::SIG_GATE);
        let t_module = self.enter_builtin(root, "T", SymbolRef::NO_SYMBOL, true);
        debug_assert_eq!(t_module, well_known::T);

        // Typed stdlib generics under T, each with its type members.
        let t_array = self.enter_builtin(t_module, "Array", well_known::ARRAY, false);
        debug_assert_eq!(t_array, well_known::T_ARRAY);
        let elem = self.enter_builtin_type_member(t_array, "Elem", Variance::Invariant);
        debug_assert_eq!(elem, well_known::T_ARRAY_ELEM);

        let t_hash = self.enter_builtin(t_module, "Hash", well_known::HASH, false);
        debug_assert_eq!(t_hash, well_known::T_HASH);
        let key = self.enter_builtin_type_member(t_hash, "K", Variance::Invariant);
        debug_assert_eq!(key, well_known::T_HASH_KEY);
        let value = self.enter_builtin_type_member(t_hash, "V", Variance::Invariant);
        debug_assert_eq!(value, well_known::T_HASH_VALUE);

        let t_set = self.enter_builtin(t_module, "Set", well_known::SET, false);
        debug_assert_eq!(t_set, well_known::T_SET);
        let elem = self.enter_builtin_type_member(t_set, "Elem", Variance::Invariant);
        debug_assert_eq!(elem, well_known::T_SET_ELEM);

        let t_range = self.enter_builtin(t_module, "Range", well_known::RANGE, false);
        debug_assert_eq!(t_range, well_known::T_RANGE);
        let elem = self.enter_builtin_type_member(t_range, "Elem", Variance::Invariant);
        debug_assert_eq!(elem, well_known::T_RANGE_ELEM);

        let t_enumerable =
            self.enter_builtin(t_module, "Enumerable", SymbolRef::NO_SYMBOL, true);
        debug_assert_eq!(t_enumerable, well_known::T_ENUMERABLE);
        let elem = self.enter_builtin_type_member(t_enumerable, "Elem", Variance::CoVariant);
        debug_assert_eq!(elem, well_known::T_ENUMERABLE_ELEM);

        let t_enumerator = self.enter_builtin(t_module, "Enumerator", enumerator, false);
        debug_assert_eq!(t_enumerator, well_known::T_ENUMERATOR);
        let elem = self.enter_builtin_type_member(t_enumerator, "Elem", Variance::CoVariant);
        debug_assert_eq!(elem, well_known::T_ENUMERATOR_ELEM);

        let void = self.enter_builtin(sig_gate, "Void", object, false);
        debug_assert_eq!(void, well_known::VOID);

        for arity in 0..=well_known::MAX_PROC_ARITY {
            let name = format!("Proc{arity}");
            let sym = self.enter_builtin(root, &name, proc, false);
            debug_assert_eq!(sym, well_known::proc_with_arity(arity));
        }

        // Generic instantiation: `[]` on each typed generic's singleton,
        // backed by the statically allocated intrinsic.
        for generic in [
            well_known::T_ARRAY,
            well_known::T_HASH,
            well_known::T_SET,
            well_known::T_RANGE,
            well_known::T_ENUMERABLE,
            well_known::T_ENUMERATOR,
        ] {
            let singleton = self.singleton_class(generic);
            let name = self.wk_names.square_brackets;
            let method = self
                .enter_method(singleton, name, Loc::none())
                .expect("builtin [] collided with an existing member");
            let data = self.symbol_mut(method);
            data.set_synthesized();
            data.intrinsic = Some(&GENERIC_INSTANTIATION);
        }
    }

    fn enter_builtin(
        &mut self,
        owner: SymbolRef,
        name: &str,
        superclass: SymbolRef,
        is_module: bool,
    ) -> SymbolRef {
        let name = self.names.intern(name);
        let sym = self
            .enter_class(owner, name, Loc::none())
            .expect("builtin class collided with an existing member");
        let data = self.symbol_mut(sym);
        data.set_is_module(is_module);
        data.set_synthesized();
        if superclass.exists() {
            data.set_superclass(superclass);
        }
        sym
    }

    fn enter_builtin_type_member(
        &mut self,
        owner: SymbolRef,
        name: &str,
        variance: Variance,
    ) -> SymbolRef {
        let name = self.names.intern(name);
        let sym = self
            .enter_type_member(owner, name, Loc::none(), variance)
            .expect("builtin type member collided with an existing member");
        self.symbol_mut(sym).set_synthesized();
        sym
    }
}
