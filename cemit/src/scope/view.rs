//! Borrowing views over one scope of the arena.

use super::{FuncScopeId, MacroScopeId, MemberScopeId, ScopeKind, TopLevelId};
use crate::{
    Context,
    decl::{DeclKind, FuncDecl, FuncKind, Lifecycle, Templated},
    directive::{DirectiveKind, Namespace},
    id::{DeclId, DirectiveId, ScopeId, TypeId},
    name::QualName,
    scope::sink::{DeclSink, DirectiveSink, ScopeSink, StmtSink, TypeDeclSink},
};

macro_rules! scope_view {
    ($(#[$meta:meta])* $view:ident($id:ty)) => {
        $(#[$meta])*
        pub struct $view<'cx> {
            cx: &'cx mut Context,
            id: $id,
        }

        impl<'cx> $view<'cx> {
            pub(crate) fn new(cx: &'cx mut Context, id: $id) -> Self {
                cx.claim(ScopeId::from(id));
                Self { cx, id }
            }

            pub fn id(&self) -> $id {
                self.id
            }
        }

        impl ScopeSink for $view<'_> {
            fn cx(&mut self) -> &mut Context {
                self.cx
            }

            fn scope_id(&self) -> ScopeId {
                self.id.into()
            }
        }
    };
}

scope_view!(
    /// File level, namespace body or preprocessor branch.
    TopLevel(TopLevelId)
);
scope_view!(
    /// Function, lambda, block or control-statement body.
    FuncScope(FuncScopeId)
);
scope_view!(
    /// Function-like macro body.
    MacroScope(MacroScopeId)
);
scope_view!(
    /// One member region of an aggregate.
    MemberScope(MemberScopeId)
);

impl DirectiveSink for TopLevel<'_> {
    type Branch = TopLevelId;
}
impl DeclSink for TopLevel<'_> {}
impl TypeDeclSink for TopLevel<'_> {}

impl DirectiveSink for FuncScope<'_> {
    type Branch = FuncScopeId;
}
impl DeclSink for FuncScope<'_> {}
impl TypeDeclSink for FuncScope<'_> {}
impl StmtSink for FuncScope<'_> {}

impl DeclSink for MacroScope<'_> {}
impl StmtSink for MacroScope<'_> {}

impl DeclSink for MemberScope<'_> {}
impl TypeDeclSink for MemberScope<'_> {}

// =============================================================================
// File level
// =============================================================================

impl TopLevel<'_> {
    /// A function whose body is created on the first [`FuncDecl::body`]
    /// call. Until then it renders as a forward declaration.
    pub fn def_func(
        &mut self,
        name: impl Into<QualName>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> FuncDecl {
        let func = self.cx.decl_func(name, ret, params, variadic);
        self.push_decl(func.id());
        func
    }

    /// A prototype that can never have a body.
    pub fn declare_func(
        &mut self,
        name: impl Into<QualName>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> FuncDecl {
        let func = self.cx.new_func(
            name.into(),
            Some(ret),
            params,
            variadic,
            Lifecycle::Forward,
            FuncKind::Free,
            None,
        );
        self.push_decl(func.id());
        func
    }

    /// The forward-declare half of a split function. The definition is
    /// placed with [`TopLevel::def_func_define`], usually in another scope.
    pub fn def_func_declare(
        &mut self,
        name: impl Into<QualName>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> FuncDecl {
        let func = self.cx.new_func(
            name.into(),
            Some(ret),
            params,
            variadic,
            Lifecycle::Split,
            FuncKind::Free,
            None,
        );
        self.push_split_forward(func);
        func
    }

    /// Place the definition of a split function or method.
    ///
    /// # Panics
    ///
    /// If `func` was not created by one of the `*_declare` factories, or
    /// its definition was already placed.
    pub fn def_func_define(&mut self, func: FuncDecl) -> FuncDecl {
        self.cx.claim(func.id());
        func.mark_defined(self.cx);
        self.push_decl(func.id());
        func
    }

    /// `template<params> R name(args){...}`
    pub fn def_func_template(
        &mut self,
        name: impl Into<QualName>,
        template_params: impl IntoIterator<Item = DeclId>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> Templated<FuncDecl> {
        let func = self.cx.decl_func(name, ret, params, variadic);
        let template = self.cx.decl_template(template_params, func.id());
        self.push_decl(template);
        Templated::new(template, func)
    }

    /// C++ `namespace name{...}`.
    pub fn def_namespace(&mut self, name: impl Into<QualName>) -> Namespace {
        let namespace = self.cx.new_namespace(name.into());
        self.push_directive(namespace.id());
        namespace
    }

    /// C++ `using namespace name;`
    pub fn using_namespace(&mut self, name: impl Into<QualName>) -> DirectiveId {
        self.cx.require_cxx("using directive");
        let directive = self
            .cx
            .alloc_directive(DirectiveKind::UsingNamespace(name.into()));
        self.push_directive(directive)
    }

    /// C++ `using name;`
    pub fn using_name(&mut self, name: impl Into<QualName>) -> DirectiveId {
        self.cx.require_cxx("using declaration");
        let directive = self.cx.alloc_directive(DirectiveKind::Using(name.into()));
        self.push_directive(directive)
    }

    fn push_split_forward(&mut self, func: FuncDecl) {
        let forward = self.cx.alloc_decl(DeclKind::SplitForward(func.id()));
        self.push_decl(forward);
    }
}

// =============================================================================
// Members
// =============================================================================

impl MemberScope<'_> {
    fn parent(&self) -> TypeId {
        match self.cx.scope_kind(self.id) {
            ScopeKind::Members { parent, .. } => parent,
            other => panic!("expected a member scope, found {other:?}"),
        }
    }

    fn class_name(&self) -> String {
        self.cx.tag_name(self.parent()).last().to_string()
    }

    fn new_member(
        &mut self,
        name: String,
        ret: Option<TypeId>,
        params: Vec<DeclId>,
        variadic: bool,
        lifecycle: Lifecycle,
        kind: FuncKind,
    ) -> FuncDecl {
        self.cx.require_cxx("member function");
        let parent = self.parent();
        self.cx
            .new_func(name.into(), ret, params, variadic, lifecycle, kind, Some(parent))
    }

    fn place(&mut self, func: FuncDecl) -> FuncDecl {
        if func.lifecycle(self.cx) == Lifecycle::Split {
            let forward = self.cx.alloc_decl(DeclKind::SplitForward(func.id()));
            self.push_decl(forward);
        } else {
            self.push_decl(func.id());
        }
        func
    }

    /// A method defined in the class body.
    pub fn def_method(
        &mut self,
        name: impl Into<String>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> FuncDecl {
        self.method(name, ret, params, variadic, Lifecycle::Inline)
    }

    /// A method declared in the class body that never gets a body here.
    pub fn declare_method(
        &mut self,
        name: impl Into<String>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> FuncDecl {
        self.method(name, ret, params, variadic, Lifecycle::Forward)
    }

    /// A method declared in the class body and defined out of line as
    /// `Class::name`.
    pub fn def_method_declare(
        &mut self,
        name: impl Into<String>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> FuncDecl {
        self.method(name, ret, params, variadic, Lifecycle::Split)
    }

    fn method(
        &mut self,
        name: impl Into<String>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
        lifecycle: Lifecycle,
    ) -> FuncDecl {
        let func = self.new_member(
            name.into(),
            Some(ret),
            params.into_iter().collect(),
            variadic,
            lifecycle,
            FuncKind::Method,
        );
        self.place(func)
    }

    /// `template<params> R name(args){...}` inside the class body.
    pub fn def_method_template(
        &mut self,
        name: impl Into<String>,
        template_params: impl IntoIterator<Item = DeclId>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> Templated<FuncDecl> {
        let func = self.new_member(
            name.into(),
            Some(ret),
            params.into_iter().collect(),
            variadic,
            Lifecycle::Inline,
            FuncKind::Method,
        );
        let template = self.cx.decl_template(template_params, func.id());
        self.push_decl(template);
        Templated::new(template, func)
    }

    pub fn def_ctor(&mut self, params: impl IntoIterator<Item = DeclId>) -> FuncDecl {
        self.ctor(params, Lifecycle::Inline)
    }

    pub fn declare_ctor(&mut self, params: impl IntoIterator<Item = DeclId>) -> FuncDecl {
        self.ctor(params, Lifecycle::Forward)
    }

    pub fn def_ctor_declare(&mut self, params: impl IntoIterator<Item = DeclId>) -> FuncDecl {
        self.ctor(params, Lifecycle::Split)
    }

    fn ctor(&mut self, params: impl IntoIterator<Item = DeclId>, lifecycle: Lifecycle) -> FuncDecl {
        let name = self.class_name();
        let func = self.new_member(
            name,
            None,
            params.into_iter().collect(),
            false,
            lifecycle,
            FuncKind::Constructor,
        );
        self.place(func)
    }

    pub fn def_dtor(&mut self) -> FuncDecl {
        self.dtor(Lifecycle::Inline)
    }

    pub fn declare_dtor(&mut self) -> FuncDecl {
        self.dtor(Lifecycle::Forward)
    }

    pub fn def_dtor_declare(&mut self) -> FuncDecl {
        self.dtor(Lifecycle::Split)
    }

    fn dtor(&mut self, lifecycle: Lifecycle) -> FuncDecl {
        let name = format!("~{}", self.class_name());
        let func = self.new_member(name, None, Vec::new(), false, lifecycle, FuncKind::Destructor);
        self.place(func)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Emit,
        decl::{MethodQualifiers, MethodSpecial},
    };

    #[test]
    fn test_split_method_qualifies_definition() {
        let mut cx = Context::cxx();
        let tl = cx.new_top_level();
        let int = cx.type_int();
        let class = cx.top_level(tl).def_class("widget");
        let public = class.add_public_scope(&mut cx);
        let size = cx.member_scope(public).def_method_declare("size", int, [], false);
        size.set_method_qualifiers(&mut cx, MethodQualifiers::new().with_const());
        let body = size.body(&mut cx);
        let zero = cx.expr_int(0);
        cx.func_scope(body).stmt_return(zero);
        cx.top_level(tl).def_func_define(size);

        assert_eq!(
            tl.to_code(&cx),
            "class widget{public:\nint size()const;\n};\nint widget::size()const{return 0;}\n"
        );
    }

    #[test]
    fn test_ctor_and_dtor_names() {
        let mut cx = Context::cxx();
        let tl = cx.new_top_level();
        let int = cx.type_int();
        let class = cx.top_level(tl).def_class("widget");
        let public = class.add_public_scope(&mut cx);
        let x = cx.decl_var("x", int, None);
        let mut members = cx.member_scope(public);
        let ctor = members.def_ctor([x]);
        let dtor = members.declare_dtor();
        dtor.set_method_qualifiers(
            &mut cx,
            MethodQualifiers::new()
                .with_virtual()
                .with_special(MethodSpecial::Default),
        );
        let xv = cx.expr_var(x);
        ctor.add_init(&mut cx, "value", [xv]);
        ctor.body(&mut cx);

        assert_eq!(ctor.to_code(&cx), "widget(int x):value(x){}");
        assert_eq!(dtor.to_code(&cx), "virtual ~widget()=default;");
    }

    #[test]
    #[should_panic(expected = "was not declared as a split function")]
    fn test_define_requires_split() {
        let mut cx = Context::c();
        let tl = cx.new_top_level();
        let int = cx.type_int();
        let func = cx.top_level(tl).def_func("f", int, [], false);
        cx.top_level(tl).def_func_define(func);
    }

    #[test]
    #[should_panic(expected = "`f` is already defined")]
    fn test_split_function_is_defined_once() {
        let mut cx = Context::c();
        let decls = cx.new_top_level();
        let defs = cx.new_top_level();
        let int = cx.type_int();
        let func = cx.top_level(decls).def_func_declare("f", int, [], false);
        cx.top_level(defs).def_func_define(func);
        cx.top_level(decls).def_func_define(func);
    }

    #[test]
    #[should_panic(expected = "belongs to a different Context")]
    fn test_foreign_scope_is_rejected() {
        let mut other = Context::c();
        let foreign = other.new_top_level();
        let mut cx = Context::c();
        cx.top_level(foreign);
    }
}
