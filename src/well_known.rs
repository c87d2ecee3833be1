// src/well_known.rs
//
// Handles for the symbols GlobalState::new creates at fixed arena indices.
// The constants here must match the creation order in globals.rs exactly;
// GlobalState::new asserts each one as it allocates.

use crate::checker_assert;
use crate::symbols::SymbolRef;

pub const NO_SYMBOL: SymbolRef = SymbolRef::from_raw(0);
/// The top-level scope.
pub const ROOT: SymbolRef = SymbolRef::from_raw(1);
/// "Not yet resolved"; replaced during resolution.
pub const TODO_SYM: SymbolRef = SymbolRef::from_raw(2);
/// The class standing in for constants that never resolved.
pub const STUB_CLASS: SymbolRef = SymbolRef::from_raw(3);

pub const BASIC_OBJECT: SymbolRef = SymbolRef::from_raw(4);
pub const OBJECT: SymbolRef = SymbolRef::from_raw(5);
pub const INTEGER: SymbolRef = SymbolRef::from_raw(6);
pub const FLOAT: SymbolRef = SymbolRef::from_raw(7);
pub const STRING: SymbolRef = SymbolRef::from_raw(8);
pub const SYMBOL_CLASS: SymbolRef = SymbolRef::from_raw(9);
pub const NIL_CLASS: SymbolRef = SymbolRef::from_raw(10);
pub const TRUE_CLASS: SymbolRef = SymbolRef::from_raw(11);
pub const FALSE_CLASS: SymbolRef = SymbolRef::from_raw(12);
pub const ARRAY: SymbolRef = SymbolRef::from_raw(13);
pub const HASH: SymbolRef = SymbolRef::from_raw(14);
pub const SET: SymbolRef = SymbolRef::from_raw(15);
pub const STRUCT: SymbolRef = SymbolRef::from_raw(16);
pub const FILE: SymbolRef = SymbolRef::from_raw(17);
pub const RANGE: SymbolRef = SymbolRef::from_raw(18);
pub const ENUMERABLE: SymbolRef = SymbolRef::from_raw(19);
pub const ENUMERATOR: SymbolRef = SymbolRef::from_raw(20);
pub const PROC: SymbolRef = SymbolRef::from_raw(21);
/// Synthetic receiver the desugarer uses for checker-internal calls.
pub const MAGIC: SymbolRef = SymbolRef::from_raw(22);
/// The module whose `sig` method gates signature blocks.
pub const SIG_GATE: SymbolRef = SymbolRef::from_raw(23);
/// The type-combinator namespace.
pub const T: SymbolRef = SymbolRef::from_raw(24);

// Typed wrappers for the stdlib generics, each with its type members.
pub const T_ARRAY: SymbolRef = SymbolRef::from_raw(25);
pub const T_ARRAY_ELEM: SymbolRef = SymbolRef::from_raw(26);
pub const T_HASH: SymbolRef = SymbolRef::from_raw(27);
pub const T_HASH_KEY: SymbolRef = SymbolRef::from_raw(28);
pub const T_HASH_VALUE: SymbolRef = SymbolRef::from_raw(29);
pub const T_SET: SymbolRef = SymbolRef::from_raw(30);
pub const T_SET_ELEM: SymbolRef = SymbolRef::from_raw(31);
pub const T_RANGE: SymbolRef = SymbolRef::from_raw(32);
pub const T_RANGE_ELEM: SymbolRef = SymbolRef::from_raw(33);
pub const T_ENUMERABLE: SymbolRef = SymbolRef::from_raw(34);
pub const T_ENUMERABLE_ELEM: SymbolRef = SymbolRef::from_raw(35);
pub const T_ENUMERATOR: SymbolRef = SymbolRef::from_raw(36);
pub const T_ENUMERATOR_ELEM: SymbolRef = SymbolRef::from_raw(37);

/// Hidden class used as the result type of `.void` methods.
pub const VOID: SymbolRef = SymbolRef::from_raw(38);

/// `Proc0` .. `Proc10`, one class per arity.
pub const PROC_0: SymbolRef = SymbolRef::from_raw(39);
pub const MAX_PROC_ARITY: usize = 10;

/// The proc class for a given arity. Callers must bounds-check against
/// `MAX_PROC_ARITY` first.
pub fn proc_with_arity(arity: usize) -> SymbolRef {
    checker_assert!(arity <= MAX_PROC_ARITY, "proc arity {arity} out of range");
    SymbolRef::from_raw(PROC_0.index() + arity as u32)
}

/// Number of symbols GlobalState::new allocates at fixed indices.
pub(crate) const FIXED_SYMBOL_COUNT: u32 = PROC_0.index() + MAX_PROC_ARITY as u32 + 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proc_arities_are_contiguous() {
        assert_eq!(proc_with_arity(0), PROC_0);
        assert_eq!(proc_with_arity(10).index(), PROC_0.index() + 10);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn proc_arity_is_bounded() {
        let _ = proc_with_arity(MAX_PROC_ARITY + 1);
    }
}
