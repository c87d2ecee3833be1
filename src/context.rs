// src/context.rs
//
// Thin handles bundling the global state with the symbol whose body is
// being processed. Passes thread these explicitly instead of reaching for
// hidden globals.

use crate::globals::GlobalState;
use crate::symbols::{Symbol, SymbolRef};

/// Read-only view of the state with a current owner.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub state: &'a GlobalState,
    pub owner: SymbolRef,
}

impl<'a> Context<'a> {
    pub fn new(state: &'a GlobalState, owner: SymbolRef) -> Self {
        Self { state, owner }
    }

    pub fn owner_data(&self) -> &'a Symbol {
        self.state.symbol(self.owner)
    }

    pub fn with_owner(&self, owner: SymbolRef) -> Context<'a> {
        Context {
            state: self.state,
            owner,
        }
    }

    /// Whether the current owner is (or sits inside) a singleton class.
    pub fn in_singleton_context(&self) -> bool {
        let class = self.state.enclosing_class(self.owner);
        class.exists() && self.state.is_singleton_class(class)
    }
}

/// Mutable view; the only way passes write to the state.
pub struct MutableContext<'a> {
    pub state: &'a mut GlobalState,
    pub owner: SymbolRef,
}

impl<'a> MutableContext<'a> {
    pub fn new(state: &'a mut GlobalState, owner: SymbolRef) -> Self {
        Self { state, owner }
    }

    pub fn owner_data(&self) -> &Symbol {
        self.state.symbol(self.owner)
    }

    pub fn as_context(&self) -> Context<'_> {
        Context {
            state: self.state,
            owner: self.owner,
        }
    }

    pub fn reborrow_with_owner(&mut self, owner: SymbolRef) -> MutableContext<'_> {
        MutableContext {
            state: self.state,
            owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Loc;
    use crate::well_known;

    #[test]
    fn context_tracks_owner() {
        let mut gs = GlobalState::new(Default::default());
        let name = gs.intern_name("Widget");
        let widget = gs.enter_class(well_known::ROOT, name, Loc::none()).unwrap();
        gs.symbol_mut(widget).set_is_module(false);
        gs.symbol_mut(widget).set_superclass(well_known::OBJECT);
        let singleton = gs.singleton_class(widget);

        let ctx = Context::new(&gs, widget);
        assert!(!ctx.in_singleton_context());
        assert!(ctx.owner_data().is_class());

        let sctx = ctx.with_owner(singleton);
        assert!(sctx.in_singleton_context());
    }

    #[test]
    fn mutable_context_reborrows() {
        let mut gs = GlobalState::new(Default::default());
        let mut ctx = MutableContext::new(&mut gs, well_known::OBJECT);
        {
            let inner = ctx.reborrow_with_owner(well_known::STRING);
            assert_eq!(inner.owner, well_known::STRING);
        }
        assert_eq!(ctx.owner, well_known::OBJECT);
        assert!(ctx.as_context().owner_data().is_class());
    }
}
