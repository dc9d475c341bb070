//! Handles into a [`Context`](crate::Context).
//!
//! Every handle records the arena that issued it. Looking a handle up in
//! any other arena panics, so nodes from two translation units can never be
//! mixed silently.

use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ARENA: AtomicU32 = AtomicU32::new(0);

/// Identity of one [`Context`](crate::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u32);

impl ArenaId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_ARENA.fetch_add(1, Ordering::Relaxed))
    }
}

/// Common surface of the untyped node handles.
pub trait Handle: Copy {
    /// Node category, used in panic messages.
    const CATEGORY: &'static str;

    fn arena(self) -> ArenaId;
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $category:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            arena: ArenaId,
            index: usize,
        }

        impl $name {
            pub(crate) fn new(arena: ArenaId, index: usize) -> Self {
                Self { arena, index }
            }

            pub(crate) fn index(self) -> usize {
                self.index
            }
        }

        impl Handle for $name {
            const CATEGORY: &'static str = $category;

            fn arena(self) -> ArenaId {
                self.arena
            }
        }
    };
}

define_handle!(
    /// A type node.
    TypeId,
    "type"
);
define_handle!(
    /// A declaration node.
    DeclId,
    "declaration"
);
define_handle!(
    /// An expression node.
    ExprId,
    "expression"
);
define_handle!(
    /// A statement node.
    StmtId,
    "statement"
);
define_handle!(
    /// A preprocessor directive or debugging insertion.
    DirectiveId,
    "directive"
);
define_handle!(
    /// A scope container of any kind.
    ScopeId,
    "scope"
);

/// Wrap an untyped handle in a handle that only exists for one node variant.
macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident($inner:ident)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) $inner);

        impl $name {
            pub fn id(self) -> $inner {
                self.0
            }
        }

        impl From<$name> for $inner {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

pub(crate) use typed_handle;

/// Any node that can carry a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Type(TypeId),
    Decl(DeclId),
    Expr(ExprId),
    Stmt(StmtId),
    Directive(DirectiveId),
    Scope(ScopeId),
}

impl From<TypeId> for NodeRef {
    fn from(id: TypeId) -> Self {
        Self::Type(id)
    }
}

impl From<DeclId> for NodeRef {
    fn from(id: DeclId) -> Self {
        Self::Decl(id)
    }
}

impl From<ExprId> for NodeRef {
    fn from(id: ExprId) -> Self {
        Self::Expr(id)
    }
}

impl From<StmtId> for NodeRef {
    fn from(id: StmtId) -> Self {
        Self::Stmt(id)
    }
}

impl From<DirectiveId> for NodeRef {
    fn from(id: DirectiveId) -> Self {
        Self::Directive(id)
    }
}

impl From<ScopeId> for NodeRef {
    fn from(id: ScopeId) -> Self {
        Self::Scope(id)
    }
}
