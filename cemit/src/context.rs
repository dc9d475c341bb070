//! The node arena.
//!
//! A [`Context`] owns every node built for one translation unit. Factories
//! live in the module of the node family they build (`impl Context` blocks in
//! `ty`, `decl`, `expr`, `stmt`, `directive`); this module holds storage,
//! handle validation and the interning tables.

use std::collections::HashMap;

use cemit_core::CodeWriter;
use indexmap::IndexMap;

use crate::{
    decl::DeclKind,
    directive::DirectiveKind,
    expr::ExprKind,
    id::{ArenaId, DeclId, DirectiveId, ExprId, Handle, NodeRef, ScopeId, StmtId, TypeId},
    scope::{Entry, ScopeData, ScopeKind},
    stmt::StmtKind,
    ty::{TemplateArg, TypeKind},
};

/// Which language the arena emits.
///
/// C++-only factories (references, classes, templates, exceptions,
/// namespaces, lambdas) panic in [`Dialect::C`]; C-only factories
/// (`_Generic`, `restrict`) panic in [`Dialect::Cxx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    C,
    Cxx,
}

impl Dialect {
    pub fn is_cxx(self) -> bool {
        matches!(self, Self::Cxx)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Cxx => "C++",
        }
    }
}

/// Comments attached to a node, rendered as `/* text */`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeComments {
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Node counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    pub types: usize,
    pub decls: usize,
    pub exprs: usize,
    pub stmts: usize,
    pub directives: usize,
    pub scopes: usize,
}

/// Exclusive owner of every node of one translation unit.
///
/// Factories take `&mut self`, so construction is single-writer by
/// construction. Emission only needs `&Context`.
#[derive(Debug)]
pub struct Context {
    id: ArenaId,
    dialect: Dialect,
    types: Vec<TypeKind>,
    decls: Vec<DeclKind>,
    exprs: Vec<ExprKind>,
    stmts: Vec<StmtKind>,
    directives: Vec<DirectiveKind>,
    scopes: Vec<ScopeData>,
    comments: HashMap<NodeRef, NodeComments>,
    void: TypeId,
    pub(crate) raw_types: IndexMap<String, TypeId>,
    pub(crate) pointers: HashMap<TypeId, TypeId>,
    pub(crate) references: HashMap<TypeId, TypeId>,
    pub(crate) arrays: HashMap<(TypeId, Vec<ExprId>), TypeId>,
    pub(crate) named: HashMap<DeclId, TypeId>,
}

impl Context {
    pub fn new(dialect: Dialect) -> Self {
        let id = ArenaId::fresh();
        let mut cx = Self {
            id,
            dialect,
            types: Vec::new(),
            decls: Vec::new(),
            exprs: Vec::new(),
            stmts: Vec::new(),
            directives: Vec::new(),
            scopes: Vec::new(),
            comments: HashMap::new(),
            void: TypeId::new(id, 0),
            raw_types: IndexMap::new(),
            pointers: HashMap::new(),
            references: HashMap::new(),
            arrays: HashMap::new(),
            named: HashMap::new(),
        };
        cx.void = cx.alloc_type(TypeKind::Void);
        tracing::debug!(arena = ?id, dialect = dialect.name(), "created context");
        cx
    }

    /// Arena for C sources.
    pub fn c() -> Self {
        Self::new(Dialect::C)
    }

    /// Arena for C++ sources.
    pub fn cxx() -> Self {
        Self::new(Dialect::Cxx)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_cxx(&self) -> bool {
        self.dialect.is_cxx()
    }

    /// The arena's single `void` type.
    pub fn type_void(&self) -> TypeId {
        self.void
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            types: self.types.len(),
            decls: self.decls.len(),
            exprs: self.exprs.len(),
            stmts: self.stmts.len(),
            directives: self.directives.len(),
            scopes: self.scopes.len(),
        }
    }

    /// Raw type spellings interned so far, in first-request order.
    pub fn raw_type_names(&self) -> impl Iterator<Item = &str> {
        self.raw_types.keys().map(String::as_str)
    }

    // =========================================================================
    // Misuse checks
    // =========================================================================

    /// Panic unless `handle` was issued by this arena.
    pub(crate) fn claim<H: Handle>(&self, handle: H) -> H {
        assert!(
            handle.arena() == self.id,
            "{} handle belongs to a different Context",
            H::CATEGORY
        );
        handle
    }

    pub(crate) fn claim_all<H: Handle>(&self, handles: impl IntoIterator<Item = H>) -> Vec<H> {
        handles.into_iter().map(|h| self.claim(h)).collect()
    }

    pub(crate) fn claim_args(
        &self,
        args: impl IntoIterator<Item = TemplateArg>,
    ) -> Vec<TemplateArg> {
        args.into_iter()
            .map(|arg| match arg {
                TemplateArg::Type(ty) => TemplateArg::Type(self.claim(ty)),
                TemplateArg::Expr(expr) => TemplateArg::Expr(self.claim(expr)),
            })
            .collect()
    }

    pub(crate) fn require_cxx(&self, what: &str) {
        assert!(
            self.dialect.is_cxx(),
            "{what} is only available when generating C++"
        );
    }

    pub(crate) fn require_c(&self, what: &str) {
        assert!(
            !self.dialect.is_cxx(),
            "{what} is only available when generating C"
        );
    }

    // =========================================================================
    // Storage
    // =========================================================================

    pub(crate) fn alloc_type(&mut self, kind: TypeKind) -> TypeId {
        self.types.push(kind);
        TypeId::new(self.id, self.types.len() - 1)
    }

    pub(crate) fn alloc_decl(&mut self, kind: DeclKind) -> DeclId {
        self.decls.push(kind);
        DeclId::new(self.id, self.decls.len() - 1)
    }

    pub(crate) fn alloc_expr(&mut self, kind: ExprKind) -> ExprId {
        self.exprs.push(kind);
        ExprId::new(self.id, self.exprs.len() - 1)
    }

    pub(crate) fn alloc_stmt(&mut self, kind: StmtKind) -> StmtId {
        self.stmts.push(kind);
        StmtId::new(self.id, self.stmts.len() - 1)
    }

    pub(crate) fn alloc_directive(&mut self, kind: DirectiveKind) -> DirectiveId {
        self.directives.push(kind);
        DirectiveId::new(self.id, self.directives.len() - 1)
    }

    pub(crate) fn alloc_scope(&mut self, kind: ScopeKind) -> ScopeId {
        self.scopes.push(ScopeData::new(kind));
        ScopeId::new(self.id, self.scopes.len() - 1)
    }

    pub fn type_node(&self, id: TypeId) -> &TypeKind {
        &self.types[self.claim(id).index()]
    }

    pub(crate) fn type_node_mut(&mut self, id: TypeId) -> &mut TypeKind {
        let index = self.claim(id).index();
        &mut self.types[index]
    }

    pub fn decl_node(&self, id: DeclId) -> &DeclKind {
        &self.decls[self.claim(id).index()]
    }

    pub(crate) fn decl_node_mut(&mut self, id: DeclId) -> &mut DeclKind {
        let index = self.claim(id).index();
        &mut self.decls[index]
    }

    pub fn expr_node(&self, id: ExprId) -> &ExprKind {
        &self.exprs[self.claim(id).index()]
    }

    pub(crate) fn expr_node_mut(&mut self, id: ExprId) -> &mut ExprKind {
        let index = self.claim(id).index();
        &mut self.exprs[index]
    }

    pub fn stmt_node(&self, id: StmtId) -> &StmtKind {
        &self.stmts[self.claim(id).index()]
    }

    pub(crate) fn stmt_node_mut(&mut self, id: StmtId) -> &mut StmtKind {
        let index = self.claim(id).index();
        &mut self.stmts[index]
    }

    pub fn directive_node(&self, id: DirectiveId) -> &DirectiveKind {
        &self.directives[self.claim(id).index()]
    }

    pub(crate) fn directive_node_mut(&mut self, id: DirectiveId) -> &mut DirectiveKind {
        let index = self.claim(id).index();
        &mut self.directives[index]
    }

    pub(crate) fn scope_data(&self, id: ScopeId) -> &ScopeData {
        &self.scopes[self.claim(id).index()]
    }

    /// Entries of a scope, in insertion order.
    pub fn scope_entries(&self, id: impl Into<ScopeId>) -> &[Entry] {
        &self.scope_data(id.into()).entries
    }

    pub(crate) fn push_entry(&mut self, scope: ScopeId, entry: Entry) {
        match entry {
            Entry::Decl(id) => {
                self.claim(id);
            }
            Entry::Stmt(id) => {
                self.claim(id);
            }
            Entry::Directive(id) => {
                self.claim(id);
            }
        }
        let index = self.claim(scope).index();
        self.scopes[index].entries.push(entry);
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Render `/* text */` before `node`.
    pub fn comment_before(&mut self, node: impl Into<NodeRef>, text: impl Into<String>) {
        let node = self.claim_node(node.into());
        self.comments.entry(node).or_default().before = Some(text.into());
    }

    /// Render `/* text */` after `node`.
    pub fn comment_after(&mut self, node: impl Into<NodeRef>, text: impl Into<String>) {
        let node = self.claim_node(node.into());
        self.comments.entry(node).or_default().after = Some(text.into());
    }

    pub fn comments(&self, node: impl Into<NodeRef>) -> Option<&NodeComments> {
        self.comments.get(&node.into())
    }

    fn claim_node(&self, node: NodeRef) -> NodeRef {
        match node {
            NodeRef::Type(id) => NodeRef::Type(self.claim(id)),
            NodeRef::Decl(id) => NodeRef::Decl(self.claim(id)),
            NodeRef::Expr(id) => NodeRef::Expr(self.claim(id)),
            NodeRef::Stmt(id) => NodeRef::Stmt(self.claim(id)),
            NodeRef::Directive(id) => NodeRef::Directive(self.claim(id)),
            NodeRef::Scope(id) => NodeRef::Scope(self.claim(id)),
        }
    }

    /// Run `emit`, surrounded by the node's comments if it has any.
    pub(crate) fn emit_commented(
        &self,
        node: NodeRef,
        w: &mut CodeWriter,
        emit: impl FnOnce(&mut CodeWriter),
    ) {
        let Some(comments) = self.comments.get(&node) else {
            emit(w);
            return;
        };
        if let Some(before) = &comments.before {
            w.push_block_comment(before);
        }
        emit(w);
        if let Some(after) = &comments.after {
            w.push_block_comment(after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Emit;

    #[test]
    fn test_void_is_a_per_arena_singleton() {
        let a = Context::c();
        let b = Context::c();
        assert_eq!(a.type_void(), a.type_void());
        assert_ne!(a.type_void(), b.type_void());
        assert_eq!(a.type_void().to_code(&a), "void");
    }

    #[test]
    #[should_panic(expected = "type handle belongs to a different Context")]
    fn test_foreign_handle_panics() {
        let a = Context::c();
        let mut b = Context::c();
        b.type_pointer(a.type_void());
    }

    #[test]
    #[should_panic(expected = "only available when generating C++")]
    fn test_cxx_factory_in_c_mode_panics() {
        let mut cx = Context::c();
        let int = cx.type_int();
        cx.type_reference(int);
    }

    #[test]
    fn test_stats_count_allocations() {
        let mut cx = Context::c();
        let before = cx.stats();
        cx.expr_int(1);
        cx.expr_int(1);
        let after = cx.stats();
        assert_eq!(after.exprs, before.exprs + 2);
        assert_eq!(before.types, 1);
    }

    #[test]
    fn test_comments_wrap_node() {
        let mut cx = Context::c();
        let one = cx.expr_int(1);
        cx.comment_before(one, "first");
        cx.comment_after(one, "last");
        assert_eq!(one.to_code(&cx), "/* first */1/* last */");
        assert_eq!(
            cx.comments(one).and_then(|c| c.before.as_deref()),
            Some("first")
        );
    }
}
