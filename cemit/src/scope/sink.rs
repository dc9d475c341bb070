//! Factory traits shared by the scope views.
//!
//! Every method allocates its node in the arena and appends it to the
//! view's scope. A view only implements the traits whose entries are legal
//! in it, so a macro body has no `include` and a member region has no
//! statements.

use super::{BranchScope, Entry, FuncScopeId};
use crate::{
    Context,
    decl::Templated,
    directive::{CondHead, Conditional, DirectiveKind, MacroFunc},
    id::{DeclId, DirectiveId, ExprId, ScopeId, StmtId, TypeId},
    name::QualName,
    stmt::{IfStmt, LoopStmt, StmtKind, SwitchStmt, TryStmt},
    ty::{AggregateKind, ClassType, EnumKey, EnumType},
};

/// Access to the arena and the scope being appended to.
pub trait ScopeSink {
    fn cx(&mut self) -> &mut Context;

    fn scope_id(&self) -> ScopeId;

    fn push_entry(&mut self, entry: Entry) {
        let scope = self.scope_id();
        self.cx().push_entry(scope, entry);
    }

    /// Append a declaration that supplies its own terminator.
    fn push_decl(&mut self, decl: DeclId) -> DeclId {
        self.push_entry(Entry::Decl(decl));
        decl
    }

    /// Append `decl;`.
    fn push_decl_stmt(&mut self, decl: DeclId) -> DeclId {
        let cx = self.cx();
        let decl = cx.claim(decl);
        let stmt = cx.alloc_stmt(StmtKind::Decl(decl));
        self.push_entry(Entry::Stmt(stmt));
        decl
    }

    fn push_stmt(&mut self, stmt: StmtId) -> StmtId {
        self.push_entry(Entry::Stmt(stmt));
        stmt
    }

    fn push_directive(&mut self, directive: DirectiveId) -> DirectiveId {
        self.push_entry(Entry::Directive(directive));
        directive
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// Variables and aliases; legal in every scope.
pub trait DeclSink: ScopeSink {
    /// A declaration emitted verbatim, without a terminator.
    fn def_raw(&mut self, text: impl Into<String>) -> DeclId {
        let decl = self.cx().decl_raw(text);
        self.push_decl(decl)
    }

    /// `T name=init;`
    fn def_var(
        &mut self,
        name: impl Into<QualName>,
        ty: TypeId,
        init: impl Into<Option<ExprId>>,
    ) -> DeclId {
        let decl = self.cx().decl_var(name, ty, init);
        self.push_decl_stmt(decl)
    }

    /// `T name[a][b]=init;`
    fn def_array_var(
        &mut self,
        name: impl Into<QualName>,
        ty: TypeId,
        sizes: impl IntoIterator<Item = ExprId>,
        init: impl Into<Option<ExprId>>,
    ) -> DeclId {
        let decl = self.cx().decl_array_var(name, ty, sizes, init);
        self.push_decl_stmt(decl)
    }

    /// C++ `T name(args);` or `T name{args};`
    fn def_var_init(
        &mut self,
        name: impl Into<QualName>,
        ty: TypeId,
        args: impl IntoIterator<Item = ExprId>,
        list: bool,
    ) -> DeclId {
        let decl = self.cx().decl_var_init(name, ty, args, list);
        self.push_decl_stmt(decl)
    }

    /// `typedef T name;`, returning the alias type.
    fn def_typedef(&mut self, name: impl Into<QualName>, ty: TypeId) -> TypeId {
        let (decl, alias) = self.cx().new_alias(name.into(), ty, false);
        self.push_decl_stmt(decl);
        alias
    }

    /// C++ `using name=T;`, returning the alias type.
    fn def_using(&mut self, name: impl Into<QualName>, ty: TypeId) -> TypeId {
        self.cx().require_cxx("alias declaration");
        let (decl, alias) = self.cx().new_alias(name.into(), ty, true);
        self.push_decl_stmt(decl);
        alias
    }

    /// `template<params> T name=init;`
    fn def_var_template(
        &mut self,
        name: impl Into<QualName>,
        params: impl IntoIterator<Item = DeclId>,
        ty: TypeId,
        init: impl Into<Option<ExprId>>,
    ) -> Templated<DeclId> {
        let cx = self.cx();
        let var = cx.decl_var(name, ty, init);
        let template = cx.decl_template(params, var);
        self.push_decl_stmt(template);
        Templated::new(template, var)
    }

    /// `template<params> using name=T;`
    fn def_using_template(
        &mut self,
        name: impl Into<QualName>,
        params: impl IntoIterator<Item = DeclId>,
        ty: TypeId,
    ) -> Templated<TypeId> {
        let cx = self.cx();
        cx.require_cxx("alias template");
        let (decl, alias) = cx.new_alias(name.into(), ty, true);
        let template = cx.decl_template(params, decl);
        self.push_decl_stmt(template);
        Templated::new(template, alias)
    }
}

/// Struct, union, class and enum definitions.
pub trait TypeDeclSink: ScopeSink {
    /// `struct name{...};`
    fn def_struct(&mut self, name: impl Into<QualName>) -> ClassType {
        self.def_aggregate(AggregateKind::Struct, name)
    }

    /// `union name{...};`
    fn def_union(&mut self, name: impl Into<QualName>) -> ClassType {
        self.def_aggregate(AggregateKind::Union, name)
    }

    /// C++ `class name{...};`
    fn def_class(&mut self, name: impl Into<QualName>) -> ClassType {
        self.def_aggregate(AggregateKind::Class, name)
    }

    fn def_aggregate(&mut self, kind: AggregateKind, name: impl Into<QualName>) -> ClassType {
        let class = self.cx().new_aggregate(kind, name);
        self.push_decl_stmt(class.decl());
        class
    }

    /// `enum name{...};`
    fn def_enum(&mut self, name: impl Into<QualName>) -> EnumType {
        let e = self.cx().new_enum(name, None);
        self.push_decl_stmt(e.decl());
        e
    }

    /// C++ `enum class name{...};`
    fn def_enum_class(&mut self, name: impl Into<QualName>) -> EnumType {
        let e = self.cx().new_enum(name, Some(EnumKey::Class));
        self.push_decl_stmt(e.decl());
        e
    }

    /// `template<params> class name{...};`
    fn def_class_template(
        &mut self,
        name: impl Into<QualName>,
        params: impl IntoIterator<Item = DeclId>,
    ) -> Templated<ClassType> {
        self.def_aggregate_template(AggregateKind::Class, name, params)
    }

    /// `template<params> struct name{...};`
    fn def_struct_template(
        &mut self,
        name: impl Into<QualName>,
        params: impl IntoIterator<Item = DeclId>,
    ) -> Templated<ClassType> {
        self.def_aggregate_template(AggregateKind::Struct, name, params)
    }

    fn def_aggregate_template(
        &mut self,
        kind: AggregateKind,
        name: impl Into<QualName>,
        params: impl IntoIterator<Item = DeclId>,
    ) -> Templated<ClassType> {
        let cx = self.cx();
        cx.require_cxx("class template");
        let class = cx.new_aggregate(kind, name);
        let template = cx.decl_template(params, class.decl());
        self.push_decl_stmt(template);
        Templated::new(template, class)
    }

    /// `struct name;` for an aggregate defined elsewhere.
    fn declare_aggregate(&mut self, class: ClassType) -> DeclId {
        let decl = class.forward(self.cx());
        self.push_decl_stmt(decl)
    }

    /// `enum name;` for an enum defined elsewhere.
    fn declare_enum(&mut self, e: EnumType) -> DeclId {
        let decl = e.forward(self.cx());
        self.push_decl_stmt(decl)
    }
}

// =============================================================================
// Statements
// =============================================================================

/// Statements; legal in function and macro bodies.
pub trait StmtSink: ScopeSink {
    /// A statement emitted verbatim.
    fn stmt_raw(&mut self, text: impl Into<String>) -> StmtId {
        let stmt = self.cx().alloc_stmt(StmtKind::Raw(text.into()));
        self.push_stmt(stmt)
    }

    /// `;`
    fn stmt_empty(&mut self) -> StmtId {
        let stmt = self.cx().alloc_stmt(StmtKind::Empty);
        self.push_stmt(stmt)
    }

    /// `decl;` for a declaration built elsewhere.
    fn stmt_decl(&mut self, decl: DeclId) -> StmtId {
        let cx = self.cx();
        let decl = cx.claim(decl);
        let stmt = cx.alloc_stmt(StmtKind::Decl(decl));
        self.push_stmt(stmt)
    }

    /// `expr;`
    fn stmt_expr(&mut self, expr: ExprId) -> StmtId {
        let cx = self.cx();
        let expr = cx.claim(expr);
        let stmt = cx.alloc_stmt(StmtKind::Expr(expr));
        self.push_stmt(stmt)
    }

    /// `if(cond){...}`
    fn stmt_if(&mut self, cond: ExprId) -> IfStmt {
        self.stmt_if_with(None, cond, false)
    }

    /// `if(init;cond){...}`, optionally `if constexpr`.
    fn stmt_if_with(&mut self, init: Option<DeclId>, cond: ExprId, is_constexpr: bool) -> IfStmt {
        let cx = self.cx();
        if init.is_some() {
            cx.require_cxx("if with initializer");
        }
        let stmt = cx.new_if(init, cond, is_constexpr);
        self.push_stmt(stmt.id());
        stmt
    }

    /// `while(cond){...}`
    fn stmt_while(&mut self, cond: ExprId) -> LoopStmt {
        let stmt = self.cx().new_while(cond);
        self.push_stmt(stmt.id());
        stmt
    }

    /// `for(;cond;step){...}`
    fn stmt_for(
        &mut self,
        cond: impl Into<Option<ExprId>>,
        step: impl Into<Option<ExprId>>,
    ) -> LoopStmt {
        let stmt = self.cx().new_for(None, cond.into(), step.into());
        self.push_stmt(stmt.id());
        stmt
    }

    /// `for(T i=init;cond;step){...}`
    fn stmt_for_decl(
        &mut self,
        init: DeclId,
        cond: impl Into<Option<ExprId>>,
        step: impl Into<Option<ExprId>>,
    ) -> LoopStmt {
        let cx = self.cx();
        let init = cx.claim(init);
        let init = cx.alloc_stmt(StmtKind::Decl(init));
        let stmt = cx.new_for(Some(init), cond.into(), step.into());
        self.push_stmt(stmt.id());
        stmt
    }

    /// `for(init;cond;step){...}` with an expression initializer.
    fn stmt_for_expr(
        &mut self,
        init: ExprId,
        cond: impl Into<Option<ExprId>>,
        step: impl Into<Option<ExprId>>,
    ) -> LoopStmt {
        let cx = self.cx();
        let init = cx.claim(init);
        let init = cx.alloc_stmt(StmtKind::Expr(init));
        let stmt = cx.new_for(Some(init), cond.into(), step.into());
        self.push_stmt(stmt.id());
        stmt
    }

    /// C++ `for(decl:range){...}`
    fn stmt_for_range(&mut self, decl: DeclId, range: ExprId) -> LoopStmt {
        let stmt = self.cx().new_for_range(decl, range);
        self.push_stmt(stmt.id());
        stmt
    }

    /// `do{...}while(cond);`
    fn stmt_do(&mut self, cond: ExprId) -> LoopStmt {
        let stmt = self.cx().new_do_while(cond);
        self.push_stmt(stmt.id());
        stmt
    }

    /// `{...}`, returning the nested body.
    fn stmt_block(&mut self) -> FuncScopeId {
        let (stmt, body) = self.cx().new_block();
        self.push_stmt(stmt);
        body
    }

    /// `return value;` or `return;`
    fn stmt_return(&mut self, value: impl Into<Option<ExprId>>) -> StmtId {
        let cx = self.cx();
        let value = value.into().map(|e| cx.claim(e));
        let stmt = cx.alloc_stmt(StmtKind::Return(value));
        self.push_stmt(stmt)
    }

    fn stmt_break(&mut self) -> StmtId {
        let stmt = self.cx().alloc_stmt(StmtKind::Break);
        self.push_stmt(stmt)
    }

    fn stmt_continue(&mut self) -> StmtId {
        let stmt = self.cx().alloc_stmt(StmtKind::Continue);
        self.push_stmt(stmt)
    }

    /// `name:;`
    fn stmt_label(&mut self, name: impl Into<String>) -> StmtId {
        let stmt = self.cx().alloc_stmt(StmtKind::Label {
            name: name.into(),
            stmt: None,
        });
        self.push_stmt(stmt)
    }

    /// `name:expr;`
    fn stmt_label_expr(&mut self, name: impl Into<String>, expr: ExprId) -> StmtId {
        let cx = self.cx();
        let expr = cx.claim(expr);
        let inner = cx.alloc_stmt(StmtKind::Expr(expr));
        let stmt = cx.alloc_stmt(StmtKind::Label {
            name: name.into(),
            stmt: Some(inner),
        });
        self.push_stmt(stmt)
    }

    /// `goto label;`
    fn stmt_goto(&mut self, label: impl Into<String>) -> StmtId {
        let stmt = self.cx().alloc_stmt(StmtKind::Goto(label.into()));
        self.push_stmt(stmt)
    }

    /// `switch(cond){...}`
    fn stmt_switch(&mut self, cond: ExprId) -> SwitchStmt {
        let stmt = self.cx().new_switch(None, cond);
        self.push_stmt(stmt.id());
        stmt
    }

    /// C++ `switch(init;cond){...}`
    fn stmt_switch_with(&mut self, init: DeclId, cond: ExprId) -> SwitchStmt {
        let cx = self.cx();
        cx.require_cxx("switch with initializer");
        let stmt = cx.new_switch(Some(init), cond);
        self.push_stmt(stmt.id());
        stmt
    }

    /// C++ `throw value;` or `throw;`
    fn stmt_throw(&mut self, value: impl Into<Option<ExprId>>) -> StmtId {
        let cx = self.cx();
        cx.require_cxx("throw");
        let value = value.into().map(|e| cx.claim(e));
        let stmt = cx.alloc_stmt(StmtKind::Throw(value));
        self.push_stmt(stmt)
    }

    /// C++ `try{...}`; handlers are added on the returned handle.
    fn stmt_try(&mut self) -> TryStmt {
        let stmt = self.cx().new_try();
        self.push_stmt(stmt.id());
        stmt
    }

    /// C++ `using namespace name;`
    fn stmt_using_namespace(&mut self, name: impl Into<QualName>) -> StmtId {
        let cx = self.cx();
        cx.require_cxx("using directive");
        let stmt = cx.alloc_stmt(StmtKind::UsingNamespace(name.into()));
        self.push_stmt(stmt)
    }

    /// `lhs=rhs;`
    fn stmt_assign(&mut self, lhs: ExprId, rhs: ExprId) -> StmtId {
        let expr = self.cx().expr_binary(lhs, "=", rhs);
        self.stmt_expr(expr)
    }

    /// `callee(args);`
    fn stmt_call(&mut self, callee: ExprId, args: impl IntoIterator<Item = ExprId>) -> StmtId {
        let expr = self.cx().expr_call(callee, args);
        self.stmt_expr(expr)
    }

    /// C++ `delete operand;` or `delete [] operand;`
    fn stmt_delete(&mut self, operand: ExprId, array: bool) -> StmtId {
        let expr = self.cx().expr_delete(operand, array);
        self.stmt_expr(expr)
    }

    /// `va_list name;`, returning the declared list.
    fn stmt_va_list(&mut self, name: impl Into<QualName>) -> DeclId {
        let cx = self.cx();
        let ty = cx.type_raw("va_list");
        let decl = cx.decl_var(name, ty, None);
        self.push_decl_stmt(decl)
    }

    /// `va_start(list,last);`
    fn stmt_va_start(&mut self, list: ExprId, last: ExprId) -> StmtId {
        let callee = self.cx().expr_raw("va_start");
        self.stmt_call(callee, [list, last])
    }

    /// `va_copy(dest,src);`
    fn stmt_va_copy(&mut self, dest: ExprId, src: ExprId) -> StmtId {
        let callee = self.cx().expr_raw("va_copy");
        self.stmt_call(callee, [dest, src])
    }

    /// `va_end(list);`
    fn stmt_va_end(&mut self, list: ExprId) -> StmtId {
        let callee = self.cx().expr_raw("va_end");
        self.stmt_call(callee, [list])
    }
}

// =============================================================================
// Directives
// =============================================================================

/// Preprocessor directives and debugging insertions.
pub trait DirectiveSink: ScopeSink {
    /// Scope kind of conditional branches opened here.
    type Branch: BranchScope;

    /// Text emitted verbatim as its own entry.
    fn directive_raw(&mut self, text: impl Into<String>) -> DirectiveId {
        let directive = self.cx().alloc_directive(DirectiveKind::Raw(text.into()));
        self.push_directive(directive)
    }

    /// `#include "path"`
    fn include(&mut self, path: impl Into<String>) -> DirectiveId {
        let directive = self.cx().alloc_directive(DirectiveKind::Include {
            path: path.into(),
            system: false,
        });
        self.push_directive(directive)
    }

    /// `#include <path>`
    fn include_system(&mut self, path: impl Into<String>) -> DirectiveId {
        let directive = self.cx().alloc_directive(DirectiveKind::Include {
            path: path.into(),
            system: true,
        });
        self.push_directive(directive)
    }

    /// `#define name`
    fn def_macro_flag(&mut self, name: impl Into<String>) -> DirectiveId {
        let directive = self.cx().alloc_directive(DirectiveKind::Define {
            name: name.into(),
            value: None,
        });
        self.push_directive(directive)
    }

    /// `#define name value`
    fn def_macro(&mut self, name: impl Into<String>, value: impl Into<String>) -> DirectiveId {
        let directive = self.cx().alloc_directive(DirectiveKind::Define {
            name: name.into(),
            value: Some(value.into()),
        });
        self.push_directive(directive)
    }

    /// `#define name(params) body`; the body is filled through
    /// [`MacroFunc::body`].
    fn def_macro_func<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        params: impl IntoIterator<Item = S>,
    ) -> MacroFunc {
        let params = params.into_iter().map(Into::into).collect();
        let mac = self.cx().new_macro_func(name.into(), params);
        self.push_directive(mac.id());
        mac
    }

    /// `#undef name`
    fn undef_macro(&mut self, name: impl Into<String>) -> DirectiveId {
        let directive = self.cx().alloc_directive(DirectiveKind::Undef(name.into()));
        self.push_directive(directive)
    }

    /// `#pragma text`
    fn pragma(&mut self, text: impl Into<String>) -> DirectiveId {
        let directive = self.cx().alloc_directive(DirectiveKind::Pragma(text.into()));
        self.push_directive(directive)
    }

    /// `#if cond`
    fn directive_if(&mut self, cond: ExprId) -> Conditional<Self::Branch> {
        self.push_conditional(CondHead::If(cond))
    }

    /// `#ifdef name`
    fn directive_ifdef(&mut self, name: impl Into<String>) -> Conditional<Self::Branch> {
        self.push_conditional(CondHead::Ifdef(name.into()))
    }

    /// `#ifndef name`
    fn directive_ifndef(&mut self, name: impl Into<String>) -> Conditional<Self::Branch> {
        self.push_conditional(CondHead::Ifndef(name.into()))
    }

    #[doc(hidden)]
    fn push_conditional(&mut self, head: CondHead) -> Conditional<Self::Branch> {
        let conditional = self.cx().new_conditional::<Self::Branch>(head);
        self.push_directive(conditional.id());
        conditional
    }

    fn insert_newline(&mut self, count: usize) -> DirectiveId {
        self.directive_raw("\n".repeat(count))
    }

    fn insert_space(&mut self, count: usize) -> DirectiveId {
        self.directive_raw(" ".repeat(count))
    }

    fn insert_tab(&mut self, count: usize) -> DirectiveId {
        self.directive_raw("\t".repeat(count))
    }

    /// `/* text */`
    fn insert_comment(&mut self, text: &str) -> DirectiveId {
        self.directive_raw(format!("/* {text} */"))
    }

    /// `// text` followed by a newline.
    fn insert_line_comment(&mut self, text: &str) -> DirectiveId {
        self.directive_raw(format!("// {text}\n"))
    }
}
