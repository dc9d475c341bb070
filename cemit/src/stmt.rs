//! Statement nodes and the handles used to grow compound statements.

use cemit_core::CodeWriter;

use crate::{
    Context, Emit,
    id::{DeclId, ExprId, NodeRef, StmtId, typed_handle},
    name::QualName,
    scope::{FuncScopeId, ScopeHandle, ScopeKind},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub init: Option<DeclId>,
    pub cond: ExprId,
    pub body: FuncScopeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfData {
    pub init: Option<DeclId>,
    pub cond: ExprId,
    pub is_constexpr: bool,
    pub then: FuncScopeId,
    pub else_ifs: Vec<ElseIf>,
    pub otherwise: Option<FuncScopeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchData {
    pub init: Option<DeclId>,
    pub cond: ExprId,
    /// Case statements in insertion order.
    pub cases: Vec<StmtId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseData {
    /// `None` is `default`.
    pub value: Option<ExprId>,
    pub body: FuncScopeId,
    pub fallthrough: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchData {
    /// `None` is `catch(...)`.
    pub decl: Option<DeclId>,
    pub body: FuncScopeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryData {
    pub body: FuncScopeId,
    pub handlers: Vec<CatchData>,
}

/// Every statement shape.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Raw(String),
    Empty,
    Decl(DeclId),
    Expr(ExprId),
    If(IfData),
    While {
        cond: ExprId,
        body: FuncScopeId,
    },
    For {
        /// A declaration or expression statement supplying its own `;`.
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<ExprId>,
        body: FuncScopeId,
    },
    ForRange {
        decl: DeclId,
        range: ExprId,
        body: FuncScopeId,
    },
    DoWhile {
        cond: ExprId,
        body: FuncScopeId,
    },
    Block(FuncScopeId),
    Return(Option<ExprId>),
    Break,
    Continue,
    Label {
        name: String,
        stmt: Option<StmtId>,
    },
    Goto(String),
    Switch(SwitchData),
    Case(CaseData),
    Throw(Option<ExprId>),
    Try(TryData),
    UsingNamespace(QualName),
}

typed_handle!(
    /// An `if` statement.
    IfStmt(StmtId)
);

typed_handle!(
    /// A `switch` statement.
    SwitchStmt(StmtId)
);

typed_handle!(
    /// A `case` or `default` label inside a switch.
    CaseStmt(StmtId)
);

typed_handle!(
    /// A `while`, `for`, range-`for` or `do` loop.
    LoopStmt(StmtId)
);

typed_handle!(
    /// A `try` block with its handlers.
    TryStmt(StmtId)
);

impl Context {
    fn new_body(&mut self) -> FuncScopeId {
        FuncScopeId::alloc(self, ScopeKind::Function)
    }

    pub(crate) fn new_if(&mut self, init: Option<DeclId>, cond: ExprId, is_constexpr: bool) -> IfStmt {
        if is_constexpr {
            self.require_cxx("if constexpr");
        }
        let init = init.map(|d| self.claim(d));
        let cond = self.claim(cond);
        let then = self.new_body();
        IfStmt(self.alloc_stmt(StmtKind::If(IfData {
            init,
            cond,
            is_constexpr,
            then,
            else_ifs: Vec::new(),
            otherwise: None,
        })))
    }

    pub(crate) fn new_while(&mut self, cond: ExprId) -> LoopStmt {
        let cond = self.claim(cond);
        let body = self.new_body();
        LoopStmt(self.alloc_stmt(StmtKind::While { cond, body }))
    }

    pub(crate) fn new_for(
        &mut self,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        step: Option<ExprId>,
    ) -> LoopStmt {
        let init = init.map(|s| self.claim(s));
        let cond = cond.map(|e| self.claim(e));
        let step = step.map(|e| self.claim(e));
        let body = self.new_body();
        LoopStmt(self.alloc_stmt(StmtKind::For {
            init,
            cond,
            step,
            body,
        }))
    }

    pub(crate) fn new_for_range(&mut self, decl: DeclId, range: ExprId) -> LoopStmt {
        self.require_cxx("range-based for");
        let (decl, range) = (self.claim(decl), self.claim(range));
        let body = self.new_body();
        LoopStmt(self.alloc_stmt(StmtKind::ForRange { decl, range, body }))
    }

    pub(crate) fn new_do_while(&mut self, cond: ExprId) -> LoopStmt {
        let cond = self.claim(cond);
        let body = self.new_body();
        LoopStmt(self.alloc_stmt(StmtKind::DoWhile { cond, body }))
    }

    pub(crate) fn new_block(&mut self) -> (StmtId, FuncScopeId) {
        let body = self.new_body();
        (self.alloc_stmt(StmtKind::Block(body)), body)
    }

    pub(crate) fn new_switch(&mut self, init: Option<DeclId>, cond: ExprId) -> SwitchStmt {
        let init = init.map(|d| self.claim(d));
        let cond = self.claim(cond);
        SwitchStmt(self.alloc_stmt(StmtKind::Switch(SwitchData {
            init,
            cond,
            cases: Vec::new(),
        })))
    }

    pub(crate) fn new_try(&mut self) -> TryStmt {
        self.require_cxx("try block");
        let body = self.new_body();
        TryStmt(self.alloc_stmt(StmtKind::Try(TryData {
            body,
            handlers: Vec::new(),
        })))
    }

    fn if_data_mut(&mut self, stmt: StmtId) -> &mut IfData {
        match self.stmt_node_mut(stmt) {
            StmtKind::If(data) => data,
            other => panic!("expected an if statement, found {other:?}"),
        }
    }

    fn if_data(&self, stmt: StmtId) -> &IfData {
        match self.stmt_node(stmt) {
            StmtKind::If(data) => data,
            other => panic!("expected an if statement, found {other:?}"),
        }
    }
}

impl IfStmt {
    pub fn then(self, cx: &Context) -> FuncScopeId {
        cx.if_data(self.0).then
    }

    /// Append an `else if(cond)` branch.
    pub fn add_else_if(self, cx: &mut Context, cond: ExprId) -> FuncScopeId {
        self.push_else_if(cx, None, cond)
    }

    /// Append an `else if(init;cond)` branch.
    pub fn add_else_if_with(self, cx: &mut Context, init: DeclId, cond: ExprId) -> FuncScopeId {
        cx.require_cxx("if with initializer");
        self.push_else_if(cx, Some(init), cond)
    }

    fn push_else_if(self, cx: &mut Context, init: Option<DeclId>, cond: ExprId) -> FuncScopeId {
        let init = init.map(|d| cx.claim(d));
        let cond = cx.claim(cond);
        let body = cx.new_body();
        cx.if_data_mut(self.0)
            .else_ifs
            .push(ElseIf { init, cond, body });
        body
    }

    /// The `else` branch, created on the first call.
    pub fn otherwise(self, cx: &mut Context) -> FuncScopeId {
        if let Some(scope) = cx.if_data(self.0).otherwise {
            return scope;
        }
        let body = cx.new_body();
        cx.if_data_mut(self.0).otherwise = Some(body);
        body
    }
}

impl SwitchStmt {
    fn push_case(self, cx: &mut Context, value: Option<ExprId>, fallthrough: bool) -> CaseStmt {
        let value = value.map(|e| cx.claim(e));
        let body = cx.new_body();
        let case = cx.alloc_stmt(StmtKind::Case(CaseData {
            value,
            body,
            fallthrough,
        }));
        match cx.stmt_node_mut(self.0) {
            StmtKind::Switch(data) => data.cases.push(case),
            other => panic!("expected a switch statement, found {other:?}"),
        }
        CaseStmt(case)
    }

    /// `case value:`; a `break;` follows the body unless `fallthrough`.
    pub fn add_case(self, cx: &mut Context, value: ExprId, fallthrough: bool) -> CaseStmt {
        self.push_case(cx, Some(value), fallthrough)
    }

    /// `default:`; a `break;` follows the body unless `fallthrough`.
    pub fn add_default(self, cx: &mut Context, fallthrough: bool) -> CaseStmt {
        self.push_case(cx, None, fallthrough)
    }
}

impl CaseStmt {
    pub fn body(self, cx: &Context) -> FuncScopeId {
        match cx.stmt_node(self.0) {
            StmtKind::Case(data) => data.body,
            other => panic!("expected a case label, found {other:?}"),
        }
    }
}

impl LoopStmt {
    pub fn body(self, cx: &Context) -> FuncScopeId {
        match cx.stmt_node(self.0) {
            StmtKind::While { body, .. }
            | StmtKind::For { body, .. }
            | StmtKind::ForRange { body, .. }
            | StmtKind::DoWhile { body, .. } => *body,
            other => panic!("expected a loop, found {other:?}"),
        }
    }
}

impl TryStmt {
    pub fn body(self, cx: &Context) -> FuncScopeId {
        match cx.stmt_node(self.0) {
            StmtKind::Try(data) => data.body,
            other => panic!("expected a try block, found {other:?}"),
        }
    }

    fn push_handler(self, cx: &mut Context, decl: Option<DeclId>) -> FuncScopeId {
        let decl = decl.map(|d| cx.claim(d));
        let body = cx.new_body();
        match cx.stmt_node_mut(self.0) {
            StmtKind::Try(data) => data.handlers.push(CatchData { decl, body }),
            other => panic!("expected a try block, found {other:?}"),
        }
        body
    }

    /// `catch(decl){...}`.
    pub fn add_catch(self, cx: &mut Context, decl: DeclId) -> FuncScopeId {
        self.push_handler(cx, Some(decl))
    }

    /// `catch(...){...}`.
    pub fn add_catch_all(self, cx: &mut Context) -> FuncScopeId {
        self.push_handler(cx, None)
    }
}

// =============================================================================
// Emission
// =============================================================================

impl Emit for StmtId {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        cx.emit_commented(NodeRef::Stmt(*self), w, |w| emit_stmt(cx, *self, w));
    }
}

macro_rules! emit_via_inner {
    ($($handle:ident),*) => {
        $(
            impl Emit for $handle {
                fn emit(&self, cx: &Context, w: &mut CodeWriter) {
                    self.0.emit(cx, w);
                }
            }
        )*
    };
}

emit_via_inner!(IfStmt, SwitchStmt, CaseStmt, LoopStmt, TryStmt);

fn emit_block(cx: &Context, body: FuncScopeId, w: &mut CodeWriter) {
    w.push_char('{');
    body.emit(cx, w);
    w.push_char('}');
}

/// `(init;cond)`
fn emit_condition(cx: &Context, init: Option<DeclId>, cond: ExprId, w: &mut CodeWriter) {
    w.push_char('(');
    if let Some(init) = init {
        init.emit(cx, w);
        w.push_char(';');
    }
    cond.emit(cx, w);
    w.push_char(')');
}

fn emit_stmt(cx: &Context, id: StmtId, w: &mut CodeWriter) {
    match cx.stmt_node(id) {
        StmtKind::Raw(text) => {
            w.push_str(text);
        }
        StmtKind::Empty => {
            w.push_char(';');
        }
        StmtKind::Decl(decl) => {
            decl.emit(cx, w);
            w.push_char(';');
        }
        StmtKind::Expr(expr) => {
            expr.emit(cx, w);
            w.push_char(';');
        }
        StmtKind::If(data) => {
            w.push_str(if data.is_constexpr { "if constexpr" } else { "if" });
            emit_condition(cx, data.init, data.cond, w);
            emit_block(cx, data.then, w);
            for branch in &data.else_ifs {
                w.push_str("else if");
                emit_condition(cx, branch.init, branch.cond, w);
                emit_block(cx, branch.body, w);
            }
            if let Some(otherwise) = data.otherwise {
                w.push_str("else");
                emit_block(cx, otherwise, w);
            }
        }
        StmtKind::While { cond, body } => {
            w.push_str("while");
            emit_condition(cx, None, *cond, w);
            emit_block(cx, *body, w);
        }
        StmtKind::For {
            init,
            cond,
            step,
            body,
        } => {
            w.push_str("for(");
            match init {
                Some(init) => init.emit(cx, w),
                None => {
                    w.push_char(';');
                }
            }
            if let Some(cond) = cond {
                cond.emit(cx, w);
            }
            w.push_char(';');
            if let Some(step) = step {
                step.emit(cx, w);
            }
            w.push_char(')');
            emit_block(cx, *body, w);
        }
        StmtKind::ForRange { decl, range, body } => {
            w.push_str("for(");
            decl.emit(cx, w);
            w.push_char(':');
            range.emit(cx, w);
            w.push_char(')');
            emit_block(cx, *body, w);
        }
        StmtKind::DoWhile { cond, body } => {
            w.push_str("do");
            emit_block(cx, *body, w);
            w.push_str("while");
            emit_condition(cx, None, *cond, w);
            w.push_char(';');
        }
        StmtKind::Block(body) => emit_block(cx, *body, w),
        StmtKind::Return(value) => {
            w.push_str("return");
            if let Some(value) = value {
                w.push_char(' ');
                value.emit(cx, w);
            }
            w.push_char(';');
        }
        StmtKind::Break => {
            w.push_str("break;");
        }
        StmtKind::Continue => {
            w.push_str("continue;");
        }
        StmtKind::Label { name, stmt } => {
            w.push_str(name);
            w.push_char(':');
            match stmt {
                Some(stmt) => stmt.emit(cx, w),
                None => {
                    w.push_char(';');
                }
            }
        }
        StmtKind::Goto(label) => {
            w.push_str("goto ");
            w.push_str(label);
            w.push_char(';');
        }
        StmtKind::Switch(data) => {
            w.push_str("switch");
            emit_condition(cx, data.init, data.cond, w);
            w.push_char('{');
            for case in &data.cases {
                case.emit(cx, w);
            }
            w.push_char('}');
        }
        StmtKind::Case(data) => {
            match data.value {
                Some(value) => {
                    w.push_str("case ");
                    value.emit(cx, w);
                    w.push_char(':');
                }
                None => {
                    w.push_str("default:");
                }
            }
            data.body.emit(cx, w);
            if !data.fallthrough {
                w.push_str("break;");
            }
        }
        StmtKind::Throw(value) => {
            w.push_str("throw");
            if let Some(value) = value {
                w.push_char(' ');
                value.emit(cx, w);
            }
            w.push_char(';');
        }
        StmtKind::Try(data) => {
            w.push_str("try");
            emit_block(cx, data.body, w);
            for handler in &data.handlers {
                w.push_str("catch(");
                match handler.decl {
                    Some(decl) => decl.emit(cx, w),
                    None => {
                        w.push_str("...");
                    }
                }
                w.push_char(')');
                emit_block(cx, handler.body, w);
            }
        }
        StmtKind::UsingNamespace(name) => {
            w.push_str("using namespace ");
            w.push_str(&name.to_string());
            w.push_char(';');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeclSink, StmtSink};

    fn body_of(cx: &mut Context) -> FuncScopeId {
        FuncScopeId::alloc(cx, ScopeKind::Function)
    }

    #[test]
    fn test_simple_statements() {
        let mut cx = Context::c();
        let body = body_of(&mut cx);
        let int = cx.type_int();
        let one = cx.expr_int(1);
        let two = cx.expr_int(2);
        {
            let mut f = cx.func_scope(body);
            f.stmt_raw("raw;");
            f.stmt_empty();
            f.def_var("var", int, one);
            f.stmt_expr(two);
            f.stmt_return(None);
            f.stmt_break();
            f.stmt_continue();
            f.stmt_label("out");
            f.stmt_goto("out");
        }
        assert_eq!(
            body.to_code(&cx),
            "raw;;int var=1;2;return;break;continue;out:;goto out;"
        );
    }

    #[test]
    fn test_if_else_chain() {
        let mut cx = Context::c();
        let body = body_of(&mut cx);
        let c0 = cx.expr_raw("c0");
        let c1 = cx.expr_raw("c1");
        let c2 = cx.expr_raw("c2");
        let stmt = cx.func_scope(body).stmt_if(c0);

        let first = stmt.add_else_if(&mut cx, c1);
        let second = stmt.add_else_if(&mut cx, c2);
        let otherwise = stmt.otherwise(&mut cx);
        assert_eq!(otherwise, stmt.otherwise(&mut cx));

        let then = stmt.then(&cx);
        cx.func_scope(then).stmt_raw("a;");
        cx.func_scope(first).stmt_raw("b;");
        cx.func_scope(second).stmt_raw("c;");
        cx.func_scope(otherwise).stmt_raw("d;");

        assert_eq!(
            stmt.to_code(&cx),
            "if(c0){a;}else if(c1){b;}else if(c2){c;}else{d;}"
        );
    }

    #[test]
    fn test_if_with_init_and_constexpr() {
        let mut cx = Context::cxx();
        let body = body_of(&mut cx);
        let int = cx.type_int();
        let one = cx.expr_int(1);
        let init = cx.decl_var("i", int, one);
        let cond = cx.expr_raw("cond");
        let with_init = cx.func_scope(body).stmt_if_with(Some(init), cond, false);
        let constexpr = cx.func_scope(body).stmt_if_with(None, cond, true);

        assert_eq!(with_init.to_code(&cx), "if(int i=1;cond){}");
        assert_eq!(constexpr.to_code(&cx), "if constexpr(cond){}");
    }

    #[test]
    fn test_loops() {
        let mut cx = Context::cxx();
        let body = body_of(&mut cx);
        let int = cx.type_int();
        let zero = cx.expr_int(0);
        let i = cx.decl_var("i", int, zero);
        let iv = cx.expr_var(i);
        let n = cx.expr_raw("n");
        let cond = cx.expr_lt(iv, n);
        let step = cx.expr_postfix(iv, "++");
        let x = cx.decl_var("x", int, None);
        let range = cx.expr_raw("items");

        let mut f = cx.func_scope(body);
        let counted = f.stmt_for_decl(i, cond, step);
        let bare = f.stmt_for(None, None);
        let from_expr = f.stmt_for_expr(iv, cond, None);
        let ranged = f.stmt_for_range(x, range);
        let looping = f.stmt_while(cond);
        let once = f.stmt_do(cond);

        assert_eq!(counted.to_code(&cx), "for(int i=0;i<n;i++){}");
        assert_eq!(bare.to_code(&cx), "for(;;){}");
        assert_eq!(from_expr.to_code(&cx), "for(i;i<n;){}");
        assert_eq!(ranged.to_code(&cx), "for(int x:items){}");
        assert_eq!(looping.to_code(&cx), "while(i<n){}");
        assert_eq!(once.to_code(&cx), "do{}while(i<n);");
    }

    #[test]
    fn test_switch() {
        let mut cx = Context::c();
        let body = body_of(&mut cx);
        let cond = cx.expr_raw("cond");
        let one = cx.expr_int(1);
        let two = cx.expr_int(2);
        let switch = cx.func_scope(body).stmt_switch(cond);

        let first = switch.add_case(&mut cx, one, false);
        let second = switch.add_case(&mut cx, two, true);
        let default = switch.add_default(&mut cx, false);
        for (case, text) in [(first, "s1;"), (second, "s2;"), (default, "s3;")] {
            let scope = case.body(&cx);
            cx.func_scope(scope).stmt_raw(text);
        }

        assert_eq!(
            switch.to_code(&cx),
            "switch(cond){case 1:s1;break;case 2:s2;default:s3;break;}"
        );
    }

    #[test]
    fn test_try_catch() {
        let mut cx = Context::cxx();
        let body = body_of(&mut cx);
        let int = cx.type_int();
        let e = cx.decl_var("e", int, None);
        let stmt = cx.func_scope(body).stmt_try();
        let inner = stmt.body(&cx);
        let one = cx.expr_int(1);
        cx.func_scope(inner).stmt_throw(one);
        let handler = stmt.add_catch(&mut cx, e);
        cx.func_scope(handler).stmt_throw(None);
        stmt.add_catch_all(&mut cx);

        assert_eq!(
            stmt.to_code(&cx),
            "try{throw 1;}catch(int e){throw;}catch(...){}"
        );
    }

    #[test]
    #[should_panic(expected = "try block is only available when generating C++")]
    fn test_try_is_cxx_only() {
        let mut cx = Context::c();
        let body = body_of(&mut cx);
        cx.func_scope(body).stmt_try();
    }

    #[test]
    #[should_panic(expected = "expression handle belongs to a different Context")]
    fn test_case_rejects_foreign_value() {
        let mut other = Context::c();
        let foreign = other.expr_int(1);
        let mut cx = Context::c();
        let body = body_of(&mut cx);
        let cond = cx.expr_raw("c");
        let switch = cx.func_scope(body).stmt_switch(cond);
        switch.add_case(&mut cx, foreign, false);
    }

    #[test]
    #[should_panic(expected = "expression handle belongs to a different Context")]
    fn test_else_if_rejects_foreign_condition() {
        let mut other = Context::c();
        let foreign = other.expr_raw("b");
        let mut cx = Context::c();
        let body = body_of(&mut cx);
        let cond = cx.expr_raw("a");
        let stmt = cx.func_scope(body).stmt_if(cond);
        stmt.add_else_if(&mut cx, foreign);
    }

    #[test]
    #[should_panic(expected = "expression handle belongs to a different Context")]
    fn test_return_rejects_foreign_value() {
        let mut other = Context::c();
        let foreign = other.expr_int(0);
        let mut cx = Context::c();
        let body = body_of(&mut cx);
        cx.func_scope(body).stmt_return(foreign);
    }
}
