// src/symbols/mod.rs
//
// Symbol records. One Symbol per declared entity, addressed by SymbolRef
// handles into the GlobalState arena. Flags are a packed u32 whose layout is
// load-bearing: content hashes stream the raw word, so bit positions must
// stay put across releases. Only named accessors touch the bits.
//
// Kind-mismatched accessors are programming errors in the checker itself and
// abort; lookups never fail, they return `SymbolRef::NO_SYMBOL`.

pub mod fuzzy;
pub mod hashing;
pub mod linearization;
pub mod lookup;

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::checker_assert;
use crate::frontend::Loc;
use crate::names::NameRef;
use crate::types::dispatch::IntrinsicMethod;
use crate::types::Type;

/// Handle addressing a Symbol in the GlobalState arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolRef(u32);

impl SymbolRef {
    /// Absence. Lookup misses return this; it is never a valid arena index
    /// for user code to dereference meaningfully.
    pub const NO_SYMBOL: SymbolRef = SymbolRef(0);

    pub(crate) const fn from_raw(raw: u32) -> SymbolRef {
        SymbolRef(raw)
    }

    pub fn exists(self) -> bool {
        self.0 != 0
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Exactly one kind per symbol; fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Method,
    Field,
    StaticField,
    TypeMember,
    TypeArgument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    CoVariant,
    ContraVariant,
    Invariant,
}

/// Parameter passing convention of a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Required,
    Optional,
    Rest,
    Keyword,
    KeywordRest,
    Block,
}

/// Per-parameter record on a method symbol.
#[derive(Debug, Clone)]
pub struct ArgInfo {
    pub name: NameRef,
    pub loc: Loc,
    pub kind: ArgKind,
    pub has_default: bool,
    pub arg_type: Option<Type>,
    pub rebind: SymbolRef,
}

impl ArgInfo {
    pub fn new(name: NameRef, loc: Loc, kind: ArgKind) -> Self {
        Self {
            name,
            loc,
            kind,
            has_default: false,
            arg_type: None,
            rebind: SymbolRef::NO_SYMBOL,
        }
    }
}

// Bit layout: kind bits grow down from the MSB, shared bits sit at the very
// bottom, per-kind attribute bits grow up from 0x10. The same attribute bit
// position means different things for different kinds.
mod flags {
    pub const CLASS: u32 = 0x8000_0000;
    pub const METHOD: u32 = 0x4000_0000;
    pub const FIELD: u32 = 0x2000_0000;
    pub const STATIC_FIELD: u32 = 0x1000_0000;
    pub const TYPE_ARGUMENT: u32 = 0x0800_0000;
    pub const TYPE_MEMBER: u32 = 0x0400_0000;

    pub const KIND_MASK: u32 = CLASS | METHOD | FIELD | STATIC_FIELD | TYPE_ARGUMENT | TYPE_MEMBER;

    // Applies to every kind.
    pub const SYNTHESIZED: u32 = 0x0000_0001;

    // Class attributes.
    pub const CLASS_CLASS: u32 = 0x0000_0010;
    pub const CLASS_MODULE: u32 = 0x0000_0020;
    pub const CLASS_ABSTRACT: u32 = 0x0000_0040;
    pub const CLASS_INTERFACE: u32 = 0x0000_0080;
    pub const CLASS_LINEARIZATION_COMPUTED: u32 = 0x0000_0100;

    // Method attributes.
    pub const METHOD_PROTECTED: u32 = 0x0000_0010;
    pub const METHOD_PRIVATE: u32 = 0x0000_0020;
    pub const METHOD_OVERLOADED: u32 = 0x0000_0040;
    pub const METHOD_ABSTRACT: u32 = 0x0000_0080;
    pub const METHOD_GENERIC: u32 = 0x0000_0100;
    pub const METHOD_GENERATED_SIG: u32 = 0x0000_0200;
    pub const METHOD_OVERRIDABLE: u32 = 0x0000_0400;
    pub const METHOD_FINAL: u32 = 0x0000_0800;
    pub const METHOD_OVERRIDE: u32 = 0x0000_1000;
    pub const METHOD_IMPLEMENTATION: u32 = 0x0000_2000;
    pub const METHOD_INCOMPATIBLE_OVERRIDE: u32 = 0x0000_4000;

    // Type member / type argument attributes.
    pub const TYPE_COVARIANT: u32 = 0x0000_0010;
    pub const TYPE_INVARIANT: u32 = 0x0000_0020;
    pub const TYPE_CONTRAVARIANT: u32 = 0x0000_0040;
    pub const TYPE_FIXED: u32 = 0x0000_0080;

    // Static field attributes.
    pub const STATIC_FIELD_TYPE_ALIAS: u32 = 0x0000_0010;
}

/// One record per declared entity.
#[derive(Clone)]
pub struct Symbol {
    pub owner: SymbolRef,
    pub name: NameRef,
    flags: u32,
    /// Classes keep their superclass here, methods their rebind target,
    /// static-field aliases their alias target. The slot is otherwise
    /// `NO_SYMBOL`.
    pub(crate) super_or_rebind: SymbolRef,
    pub(crate) mixins: SmallVec<[SymbolRef; 4]>,
    /// Type members for classes, type arguments for methods.
    pub(crate) type_params: SmallVec<[SymbolRef; 4]>,
    pub(crate) members: FxHashMap<NameRef, SymbolRef>,
    pub arguments: Vec<ArgInfo>,
    pub result_type: Option<Type>,
    pub(crate) locs: SmallVec<[Loc; 2]>,
    /// Allocator for synthetic child names.
    pub unique_counter: u32,
    /// Statically allocated dispatch handler, if any.
    pub intrinsic: Option<&'static dyn IntrinsicMethod>,
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("flags", &format_args!("{:#010x}", self.flags))
            .field("super_or_rebind", &self.super_or_rebind)
            .field("members", &self.members.len())
            .field("arguments", &self.arguments.len())
            .finish()
    }
}

impl Symbol {
    pub(crate) fn new(owner: SymbolRef, name: NameRef, kind: SymbolKind) -> Self {
        let kind_bit = match kind {
            SymbolKind::Class => flags::CLASS,
            SymbolKind::Method => flags::METHOD,
            SymbolKind::Field => flags::FIELD,
            SymbolKind::StaticField => flags::STATIC_FIELD,
            SymbolKind::TypeMember => flags::TYPE_MEMBER,
            SymbolKind::TypeArgument => flags::TYPE_ARGUMENT,
        };
        Self {
            owner,
            name,
            flags: kind_bit,
            super_or_rebind: SymbolRef::NO_SYMBOL,
            mixins: SmallVec::new(),
            type_params: SmallVec::new(),
            members: FxHashMap::default(),
            arguments: Vec::new(),
            result_type: None,
            locs: SmallVec::new(),
            unique_counter: 1,
            intrinsic: None,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self.flags & flags::KIND_MASK {
            flags::CLASS => SymbolKind::Class,
            flags::METHOD => SymbolKind::Method,
            flags::FIELD => SymbolKind::Field,
            flags::STATIC_FIELD => SymbolKind::StaticField,
            flags::TYPE_MEMBER => SymbolKind::TypeMember,
            flags::TYPE_ARGUMENT => SymbolKind::TypeArgument,
            other => panic!("symbol has invalid kind bits: {other:#010x}"),
        }
    }

    pub(crate) fn flags_raw(&self) -> u32 {
        self.flags
    }

    // --- kind predicates ---

    pub fn is_class(&self) -> bool {
        self.flags & flags::CLASS != 0
    }

    pub fn is_method(&self) -> bool {
        self.flags & flags::METHOD != 0
    }

    pub fn is_field(&self) -> bool {
        self.flags & flags::FIELD != 0
    }

    pub fn is_static_field(&self) -> bool {
        self.flags & flags::STATIC_FIELD != 0
    }

    pub fn is_type_member(&self) -> bool {
        self.flags & flags::TYPE_MEMBER != 0
    }

    pub fn is_type_argument(&self) -> bool {
        self.flags & flags::TYPE_ARGUMENT != 0
    }

    fn assert_class(&self) {
        checker_assert!(self.is_class(), "symbol is not a class: {self:?}");
    }

    fn assert_method(&self) {
        checker_assert!(self.is_method(), "symbol is not a method: {self:?}");
    }

    fn assert_type_param(&self) {
        checker_assert!(
            self.is_type_member() || self.is_type_argument(),
            "symbol is not a type member or type argument: {self:?}"
        );
    }

    fn assert_static_field(&self) {
        checker_assert!(self.is_static_field(), "symbol is not a static field: {self:?}");
    }

    // --- shared attributes ---

    pub fn is_synthesized(&self) -> bool {
        self.flags & flags::SYNTHESIZED != 0
    }

    pub fn set_synthesized(&mut self) {
        self.flags |= flags::SYNTHESIZED;
    }

    // --- class attributes ---

    /// Whether the module/class distinction has been decided yet. It must be
    /// decided before linearization.
    pub fn is_class_module_set(&self) -> bool {
        self.assert_class();
        self.flags & (flags::CLASS_MODULE | flags::CLASS_CLASS) != 0
    }

    pub fn is_class_module(&self) -> bool {
        checker_assert!(
            self.is_class_module_set(),
            "module/class bit queried before it was decided: {self:?}"
        );
        self.flags & flags::CLASS_MODULE != 0
    }

    pub fn is_class_class(&self) -> bool {
        !self.is_class_module()
    }

    pub fn set_is_module(&mut self, is_module: bool) {
        self.assert_class();
        if is_module {
            checker_assert!(
                self.flags & flags::CLASS_CLASS == 0,
                "symbol already marked as a class: {self:?}"
            );
            self.flags |= flags::CLASS_MODULE;
        } else {
            checker_assert!(
                self.flags & flags::CLASS_MODULE == 0,
                "symbol already marked as a module: {self:?}"
            );
            self.flags |= flags::CLASS_CLASS;
        }
    }

    pub fn is_class_abstract(&self) -> bool {
        self.assert_class();
        self.flags & flags::CLASS_ABSTRACT != 0
    }

    pub fn set_class_abstract(&mut self) {
        self.assert_class();
        self.flags |= flags::CLASS_ABSTRACT;
    }

    pub fn is_class_interface(&self) -> bool {
        self.assert_class();
        self.flags & flags::CLASS_INTERFACE != 0
    }

    pub fn set_class_interface(&mut self) {
        self.assert_class();
        self.flags |= flags::CLASS_INTERFACE;
    }

    pub fn is_linearization_computed(&self) -> bool {
        self.assert_class();
        self.flags & flags::CLASS_LINEARIZATION_COMPUTED != 0
    }

    pub fn set_linearization_computed(&mut self) {
        self.assert_class();
        self.flags |= flags::CLASS_LINEARIZATION_COMPUTED;
    }

    pub fn superclass(&self) -> SymbolRef {
        self.assert_class();
        self.super_or_rebind
    }

    pub fn set_superclass(&mut self, superclass: SymbolRef) {
        self.assert_class();
        self.super_or_rebind = superclass;
    }

    pub fn mixins(&self) -> &[SymbolRef] {
        self.assert_class();
        &self.mixins
    }

    pub fn add_mixin(&mut self, mixin: SymbolRef) {
        self.assert_class();
        self.mixins.push(mixin);
    }

    pub fn type_members(&self) -> &[SymbolRef] {
        self.assert_class();
        &self.type_params
    }

    // --- method attributes ---

    pub fn rebind(&self) -> SymbolRef {
        self.assert_method();
        self.super_or_rebind
    }

    pub fn set_rebind(&mut self, rebind: SymbolRef) {
        self.assert_method();
        self.super_or_rebind = rebind;
    }

    pub fn type_arguments(&self) -> &[SymbolRef] {
        self.assert_method();
        &self.type_params
    }

    pub fn is_public(&self) -> bool {
        self.assert_method();
        !self.is_protected() && !self.is_private()
    }

    pub fn is_protected(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_PROTECTED != 0
    }

    pub fn is_private(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_PRIVATE != 0
    }

    pub fn set_public(&mut self) {
        self.assert_method();
        self.flags &= !(flags::METHOD_PRIVATE | flags::METHOD_PROTECTED);
    }

    pub fn set_protected(&mut self) {
        self.assert_method();
        self.flags &= !flags::METHOD_PRIVATE;
        self.flags |= flags::METHOD_PROTECTED;
    }

    pub fn set_private(&mut self) {
        self.assert_method();
        self.flags &= !flags::METHOD_PROTECTED;
        self.flags |= flags::METHOD_PRIVATE;
    }

    pub fn is_abstract(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_ABSTRACT != 0
    }

    pub fn set_abstract(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_ABSTRACT;
    }

    pub fn is_overloaded(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_OVERLOADED != 0
    }

    pub fn set_overloaded(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_OVERLOADED;
    }

    pub fn is_generic_method(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_GENERIC != 0
    }

    pub fn set_generic_method(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_GENERIC;
    }

    pub fn has_generated_sig(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_GENERATED_SIG != 0
    }

    pub fn set_has_generated_sig(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_GENERATED_SIG;
    }

    pub fn is_overridable(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_OVERRIDABLE != 0
    }

    pub fn set_overridable(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_OVERRIDABLE;
    }

    pub fn is_final_method(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_FINAL != 0
    }

    pub fn set_final_method(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_FINAL;
    }

    pub fn is_override(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_OVERRIDE != 0
    }

    pub fn set_override(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_OVERRIDE;
    }

    pub fn is_implementation(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_IMPLEMENTATION != 0
    }

    pub fn set_implementation(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_IMPLEMENTATION;
    }

    pub fn is_incompatible_override(&self) -> bool {
        self.assert_method();
        self.flags & flags::METHOD_INCOMPATIBLE_OVERRIDE != 0
    }

    pub fn set_incompatible_override(&mut self) {
        self.assert_method();
        self.flags |= flags::METHOD_INCOMPATIBLE_OVERRIDE;
    }

    // --- type member / type argument attributes ---

    pub fn is_covariant(&self) -> bool {
        self.assert_type_param();
        self.flags & flags::TYPE_COVARIANT != 0
    }

    pub fn is_invariant(&self) -> bool {
        self.assert_type_param();
        self.flags & flags::TYPE_INVARIANT != 0
    }

    pub fn is_contravariant(&self) -> bool {
        self.assert_type_param();
        self.flags & flags::TYPE_CONTRAVARIANT != 0
    }

    pub fn is_fixed(&self) -> bool {
        self.assert_type_param();
        self.flags & flags::TYPE_FIXED != 0
    }

    pub fn set_covariant(&mut self) {
        self.assert_type_param();
        checker_assert!(!self.is_contravariant() && !self.is_invariant());
        self.flags |= flags::TYPE_COVARIANT;
    }

    pub fn set_contravariant(&mut self) {
        self.assert_type_param();
        checker_assert!(!self.is_covariant() && !self.is_invariant());
        self.flags |= flags::TYPE_CONTRAVARIANT;
    }

    pub fn set_invariant(&mut self) {
        self.assert_type_param();
        checker_assert!(!self.is_covariant() && !self.is_contravariant());
        self.flags |= flags::TYPE_INVARIANT;
    }

    pub fn set_fixed(&mut self) {
        self.assert_type_param();
        self.flags |= flags::TYPE_FIXED;
    }

    pub fn variance(&self) -> Variance {
        checker_assert!(
            self.is_covariant() || self.is_invariant() || self.is_contravariant(),
            "type parameter has no variance: {self:?}"
        );
        if self.is_invariant() {
            Variance::Invariant
        } else if self.is_covariant() {
            Variance::CoVariant
        } else {
            Variance::ContraVariant
        }
    }

    // --- static field attributes ---

    pub fn is_type_alias(&self) -> bool {
        self.is_static_field() && self.flags & flags::STATIC_FIELD_TYPE_ALIAS != 0
    }

    pub fn set_type_alias(&mut self) {
        self.assert_static_field();
        self.flags |= flags::STATIC_FIELD_TYPE_ALIAS;
    }

    pub fn alias_target(&self) -> SymbolRef {
        self.assert_static_field();
        self.super_or_rebind
    }

    pub fn set_alias_target(&mut self, target: SymbolRef) {
        self.assert_static_field();
        self.super_or_rebind = target;
    }

    // --- members / locations ---

    pub fn members(&self) -> &FxHashMap<NameRef, SymbolRef> {
        &self.members
    }

    pub fn add_loc(&mut self, loc: Loc) {
        self.locs.push(loc);
    }

    /// The most recent declaration location.
    pub fn loc(&self) -> Loc {
        self.locs.last().copied().unwrap_or_default()
    }

    pub fn locs(&self) -> &[Loc] {
        &self.locs
    }

    /// Debug-build structural validation.
    pub fn sanity_check(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let kind_bits = self.flags & flags::KIND_MASK;
        checker_assert!(
            kind_bits.count_ones() == 1,
            "symbol must have exactly one kind bit: {self:?}"
        );
        if self.is_type_member() || self.is_type_argument() {
            let variance_bits = self.flags
                & (flags::TYPE_COVARIANT | flags::TYPE_INVARIANT | flags::TYPE_CONTRAVARIANT);
            checker_assert!(
                variance_bits.count_ones() == 1,
                "type parameter must have exactly one variance: {self:?}"
            );
        }
        if self.is_method() {
            checker_assert!(
                !(self.is_protected() && self.is_private()),
                "method is both protected and private: {self:?}"
            );
        }
    }
}
