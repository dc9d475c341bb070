//! Scope containers.
//!
//! A scope is an ordered, append-only list of entries owned by the arena.
//! Each container kind has a typed id and a view that borrows the arena to
//! append to it. Which entries a view accepts is decided by the factory
//! traits in [`sink`] it implements.

mod sink;
mod view;

use cemit_core::{CodeWriter, continue_lines};

pub use sink::{DeclSink, DirectiveSink, ScopeSink, StmtSink, TypeDeclSink};
pub use view::{FuncScope, MacroScope, MemberScope, TopLevel};

use crate::{
    Context, Emit,
    id::{DeclId, DirectiveId, NodeRef, ScopeId, StmtId, TypeId},
};

/// What a scope is for; decides how its entries are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// File level, namespace bodies and preprocessor branches. Each entry
    /// is followed by a newline.
    TopLevel,
    /// Function, lambda and block bodies. Entries are concatenated.
    Function,
    /// Body of a function-like macro. Newlines become line continuations.
    Macro,
    /// One member region of an aggregate. Labeled regions put each entry on
    /// its own line.
    Members { parent: TypeId, labeled: bool },
}

/// One element of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    Decl(DeclId),
    Stmt(StmtId),
    Directive(DirectiveId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeData {
    pub kind: ScopeKind,
    pub entries: Vec<Entry>,
}

impl ScopeData {
    pub(crate) fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A typed scope id.
pub trait ScopeHandle: Copy + Into<ScopeId> + sealed::Sealed {
    #[doc(hidden)]
    fn from_raw(id: ScopeId) -> Self;

    #[doc(hidden)]
    fn alloc(cx: &mut Context, kind: ScopeKind) -> Self {
        Self::from_raw(cx.alloc_scope(kind))
    }
}

/// Scopes that can back a preprocessor conditional branch.
pub trait BranchScope: ScopeHandle {
    const KIND: ScopeKind;
}

macro_rules! scope_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(ScopeId);

        impl $name {
            pub fn id(self) -> ScopeId {
                self.0
            }
        }

        impl From<$name> for ScopeId {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }

        impl sealed::Sealed for $name {}

        impl ScopeHandle for $name {
            fn from_raw(id: ScopeId) -> Self {
                Self(id)
            }
        }

        impl Emit for $name {
            fn emit(&self, cx: &Context, w: &mut CodeWriter) {
                self.0.emit(cx, w);
            }
        }
    };
}

scope_handle!(
    /// File level or a branch of a preprocessor conditional.
    TopLevelId
);
scope_handle!(
    /// Body of a function, lambda, block or control statement.
    FuncScopeId
);
scope_handle!(
    /// Body of a function-like macro.
    MacroScopeId
);
scope_handle!(
    /// A member region of a struct, union or class.
    MemberScopeId
);

impl BranchScope for TopLevelId {
    const KIND: ScopeKind = ScopeKind::TopLevel;
}

impl BranchScope for FuncScopeId {
    const KIND: ScopeKind = ScopeKind::Function;
}

impl Context {
    /// A fresh file-level container, not attached to anything.
    pub fn new_top_level(&mut self) -> TopLevelId {
        TopLevelId::alloc(self, ScopeKind::TopLevel)
    }

    pub fn top_level(&mut self, id: TopLevelId) -> TopLevel<'_> {
        TopLevel::new(self, id)
    }

    pub fn func_scope(&mut self, id: FuncScopeId) -> FuncScope<'_> {
        FuncScope::new(self, id)
    }

    pub fn macro_scope(&mut self, id: MacroScopeId) -> MacroScope<'_> {
        MacroScope::new(self, id)
    }

    pub fn member_scope(&mut self, id: MemberScopeId) -> MemberScope<'_> {
        MemberScope::new(self, id)
    }

    pub fn scope_kind(&self, id: impl Into<ScopeId>) -> ScopeKind {
        self.scope_data(id.into()).kind
    }
}

// =============================================================================
// Emission
// =============================================================================

impl Emit for Entry {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        match self {
            Self::Decl(id) => id.emit(cx, w),
            Self::Stmt(id) => id.emit(cx, w),
            Self::Directive(id) => id.emit(cx, w),
        }
    }
}

impl Emit for ScopeId {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        cx.emit_commented(NodeRef::Scope(*self), w, |w| emit_scope(cx, *self, w));
    }
}

fn emit_scope(cx: &Context, id: ScopeId, w: &mut CodeWriter) {
    let data = cx.scope_data(id);
    match data.kind {
        ScopeKind::TopLevel | ScopeKind::Members { labeled: true, .. } => {
            for entry in &data.entries {
                entry.emit(cx, w);
                w.push_newline();
            }
        }
        ScopeKind::Function | ScopeKind::Members { labeled: false, .. } => {
            for entry in &data.entries {
                entry.emit(cx, w);
            }
        }
        ScopeKind::Macro => {
            let body = CodeWriter::capture(|w| {
                for entry in &data.entries {
                    entry.emit(cx, w);
                }
            });
            w.push_str(&continue_lines(&body));
        }
    }
}
