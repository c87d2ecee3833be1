// src/frontend/ast.rs
//
// Expression tree contract. The parser collaborator produces these nodes;
// this crate only reads them. Constant references arrive already resolved to
// symbol handles (stubs keep their unresolved path alongside).

use crate::frontend::Loc;
use crate::names::NameRef;
use crate::symbols::SymbolRef;

/// A literal value as written in source. `Symbol` and `String` payloads are
/// interned so the tree stays cheap to clone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LitValue {
    Integer(i64),
    Float(f64),
    Symbol(NameRef),
    String(NameRef),
    True,
    False,
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub loc: Loc,
    pub value: LitValue,
}

impl Literal {
    pub fn is_symbol(&self) -> bool {
        matches!(self.value, LitValue::Symbol(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.value, LitValue::String(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.value, LitValue::Nil)
    }

    pub fn as_symbol(&self) -> Option<NameRef> {
        match self.value {
            LitValue::Symbol(name) => Some(name),
            _ => None,
        }
    }
}

/// A constant reference, resolved by the resolver collaborator. When the
/// constant could not be resolved, `symbol` is the stub class and
/// `unresolved_path` holds the scope it was seen in plus the literal name
/// segments, so the stub can be kept verbatim for hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantLit {
    pub loc: Loc,
    pub symbol: SymbolRef,
    pub unresolved_path: Option<(SymbolRef, Vec<NameRef>)>,
}

/// A method call: `recv.fun(args) { block }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Send {
    pub loc: Loc,
    pub recv: Box<Expr>,
    pub fun: NameRef,
    pub args: Vec<Expr>,
    pub block: Option<Box<Expr>>,
    pub has_splat: bool,
}

/// A block body attached to a send.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockExpr {
    pub loc: Loc,
    pub body: Box<Expr>,
}

/// A sequence of statements with a trailing result expression.
#[derive(Debug, Clone, PartialEq)]
pub struct InsSeq {
    pub loc: Loc,
    pub stats: Vec<Expr>,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLit {
    pub loc: Loc,
    pub elems: Vec<Expr>,
}

/// Hash literal; `keys` and `values` are parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct HashLit {
    pub loc: Loc,
    pub keys: Vec<Expr>,
    pub values: Vec<Expr>,
}

/// A local variable reference, including the receiverless `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub loc: Loc,
    pub name: NameRef,
    pub is_self: bool,
}

impl Local {
    pub fn is_self_reference(&self) -> bool {
        self.is_self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    ConstantLit(ConstantLit),
    Send(Send),
    Block(BlockExpr),
    InsSeq(InsSeq),
    Array(ArrayLit),
    Hash(HashLit),
    Local(Local),
}

impl Expr {
    pub fn loc(&self) -> Loc {
        match self {
            Expr::Literal(e) => e.loc,
            Expr::ConstantLit(e) => e.loc,
            Expr::Send(e) => e.loc,
            Expr::Block(e) => e.loc,
            Expr::InsSeq(e) => e.loc,
            Expr::Array(e) => e.loc,
            Expr::Hash(e) => e.loc,
            Expr::Local(e) => e.loc,
        }
    }

    pub fn as_send(&self) -> Option<&Send> {
        match self {
            Expr::Send(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantLit> {
        match self {
            Expr::ConstantLit(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_self_reference(&self) -> bool {
        matches!(self, Expr::Local(l) if l.is_self_reference())
    }
}
