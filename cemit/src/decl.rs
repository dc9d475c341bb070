//! Declaration nodes.
//!
//! Functions, methods, constructors and destructors share [`FuncData`]. A
//! function is created in one of three [`Lifecycle`] states and the state
//! never changes afterwards, though an inline function gains its body
//! lazily the first time [`FuncDecl::body`] is called.

use cemit_core::CodeWriter;

use crate::{
    Context, Emit,
    id::{DeclId, ExprId, NodeRef, TypeId, typed_handle},
    name::QualName,
    scope::{FuncScopeId, ScopeHandle, ScopeKind},
    ty::{TypeKind, emit_array_sizes, emit_param_types, emit_tag_reference},
};

/// Qualifiers of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarQualifiers {
    pub is_const: bool,
    pub is_extern: bool,
    pub is_static: bool,
    pub is_volatile: bool,
    /// C only.
    pub is_restrict: bool,
    /// C++ only.
    pub is_inline: bool,
}

impl VarQualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_extern(mut self) -> Self {
        self.is_extern = true;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_volatile(mut self) -> Self {
        self.is_volatile = true;
        self
    }

    pub fn with_restrict(mut self) -> Self {
        self.is_restrict = true;
        self
    }

    pub fn with_inline(mut self) -> Self {
        self.is_inline = true;
        self
    }
}

/// Qualifiers shared by every function-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FuncQualifiers {
    pub is_extern: bool,
    pub is_static: bool,
    /// C++ only.
    pub is_constexpr: bool,
    pub is_inline: bool,
}

impl FuncQualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extern(mut self) -> Self {
        self.is_extern = true;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_constexpr(mut self) -> Self {
        self.is_constexpr = true;
        self
    }

    pub fn with_inline(mut self) -> Self {
        self.is_inline = true;
        self
    }
}

/// A method that has no body of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSpecial {
    /// `=0`
    Abstract,
    /// `=default`
    Default,
    /// `=delete`
    Delete,
}

impl MethodSpecial {
    fn suffix(self) -> &'static str {
        match self {
            Self::Abstract => "=0;",
            Self::Default => "=default;",
            Self::Delete => "=delete;",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Default => "defaulted",
            Self::Delete => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodQualifiers {
    pub is_virtual: bool,
    pub is_explicit: bool,
    pub is_const: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub special: Option<MethodSpecial>,
}

impl MethodQualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn with_explicit(mut self) -> Self {
        self.is_explicit = true;
        self
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn with_special(mut self, special: MethodSpecial) -> Self {
        self.special = Some(special);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Never has a body.
    Forward,
    /// Body attached to the declaration itself, created on first request.
    Inline,
    /// Separate forward-declare and define nodes sharing this state.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind {
    Free,
    Method,
    Constructor,
    Destructor,
}

/// Link from a member function to the aggregate it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodData {
    pub parent: TypeId,
    pub quals: MethodQualifiers,
}

/// One `member(args)` entry of a constructor's initializer list.
#[derive(Debug, Clone, PartialEq)]
pub struct CtorInit {
    pub member: QualName,
    pub args: Vec<ExprId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncData {
    pub name: QualName,
    /// `None` for constructors and destructors.
    pub ret: Option<TypeId>,
    pub params: Vec<DeclId>,
    pub variadic: bool,
    pub body: Option<FuncScopeId>,
    pub lifecycle: Lifecycle,
    pub kind: FuncKind,
    pub quals: FuncQualifiers,
    pub method: Option<MethodData>,
    pub inits: Vec<CtorInit>,
    /// Set once the definition of a split function has been placed.
    pub defined: bool,
}

/// Declarator suffix of a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VarShape {
    Plain,
    /// `name[a][b]`, or `name[]` with no sizes.
    Array(Vec<ExprId>),
    /// C++ `name(args)` or `name{args}`.
    Construct { args: Vec<ExprId>, list: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarData {
    pub name: QualName,
    pub ty: TypeId,
    pub init: Option<ExprId>,
    pub shape: VarShape,
    pub quals: VarQualifiers,
}

/// Every declaration shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    Raw(String),
    Var(VarData),
    Function(FuncData),
    /// The forward-declare half of a split function.
    SplitForward(DeclId),
    Aggregate { ty: TypeId, forward: bool },
    Enum { ty: TypeId, forward: bool },
    /// `typedef`; the payload is the alias type.
    Typedef(TypeId),
    /// C++ `using name=T`; the payload is the alias type.
    Using(TypeId),
    Template { params: Vec<DeclId>, inner: DeclId },
}

typed_handle!(
    /// A function, method, constructor or destructor.
    FuncDecl(DeclId)
);

/// A template declaration and the declaration it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Templated<T> {
    template: DeclId,
    inner: T,
}

impl<T: Copy> Templated<T> {
    pub(crate) fn new(template: DeclId, inner: T) -> Self {
        Self { template, inner }
    }

    /// The `template<...>` declaration, used to instantiate the template.
    pub fn decl(&self) -> DeclId {
        self.template
    }

    pub fn inner(&self) -> T {
        self.inner
    }
}

// =============================================================================
// Factories
// =============================================================================

impl Context {
    /// A declaration emitted verbatim.
    pub fn decl_raw(&mut self, text: impl Into<String>) -> DeclId {
        self.alloc_decl(DeclKind::Raw(text.into()))
    }

    /// A variable, typically a parameter. An empty name renders just the
    /// type, as in `int main(void)`.
    pub fn decl_var(
        &mut self,
        name: impl Into<QualName>,
        ty: TypeId,
        init: impl Into<Option<ExprId>>,
    ) -> DeclId {
        self.new_var(name.into(), ty, init.into(), VarShape::Plain)
    }

    pub fn decl_array_var(
        &mut self,
        name: impl Into<QualName>,
        ty: TypeId,
        sizes: impl IntoIterator<Item = ExprId>,
        init: impl Into<Option<ExprId>>,
    ) -> DeclId {
        let sizes = self.claim_all(sizes);
        self.new_var(name.into(), ty, init.into(), VarShape::Array(sizes))
    }

    /// C++ `T name(args)`, or `T name{args}` when `list` is set.
    pub fn decl_var_init(
        &mut self,
        name: impl Into<QualName>,
        ty: TypeId,
        args: impl IntoIterator<Item = ExprId>,
        list: bool,
    ) -> DeclId {
        self.require_cxx("constructor-style initialization");
        let args = self.claim_all(args);
        self.new_var(name.into(), ty, None, VarShape::Construct { args, list })
    }

    fn new_var(
        &mut self,
        name: QualName,
        ty: TypeId,
        init: Option<ExprId>,
        shape: VarShape,
    ) -> DeclId {
        let ty = self.claim(ty);
        let init = init.map(|e| self.claim(e));
        self.alloc_decl(DeclKind::Var(VarData {
            name,
            ty,
            init,
            shape,
            quals: VarQualifiers::default(),
        }))
    }

    /// A free function not placed in any scope, e.g. for a nested
    /// template. Its body is created on first request.
    pub fn decl_func(
        &mut self,
        name: impl Into<QualName>,
        ret: TypeId,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
    ) -> FuncDecl {
        self.new_func(
            name.into(),
            Some(ret),
            params,
            variadic,
            Lifecycle::Inline,
            FuncKind::Free,
            None,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_func(
        &mut self,
        name: QualName,
        ret: Option<TypeId>,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
        lifecycle: Lifecycle,
        kind: FuncKind,
        parent: Option<TypeId>,
    ) -> FuncDecl {
        let ret = ret.map(|r| self.claim(r));
        let params = params.into_iter().map(|p| self.claim(p)).collect();
        let body = match lifecycle {
            Lifecycle::Split => Some(FuncScopeId::alloc(self, ScopeKind::Function)),
            Lifecycle::Forward | Lifecycle::Inline => None,
        };
        let method = parent.map(|parent| MethodData {
            parent,
            quals: MethodQualifiers::default(),
        });
        FuncDecl(self.alloc_decl(DeclKind::Function(FuncData {
            name,
            ret,
            params,
            variadic,
            body,
            lifecycle,
            kind,
            quals: FuncQualifiers::default(),
            method,
            inits: Vec::new(),
            defined: false,
        })))
    }

    /// `template<params> inner`, not placed in any scope.
    pub fn decl_template(&mut self, params: impl IntoIterator<Item = DeclId>, inner: DeclId) -> DeclId {
        self.require_cxx("template");
        let params = params.into_iter().map(|p| self.claim(p)).collect();
        let inner = self.claim(inner);
        self.alloc_decl(DeclKind::Template { params, inner })
    }

    /// A template known only by name, for instantiating library templates.
    pub fn decl_raw_template(&mut self, name: impl Into<QualName>) -> DeclId {
        self.require_cxx("template");
        let inner = self.decl_raw(name.into().to_string());
        self.alloc_decl(DeclKind::Template {
            params: Vec::new(),
            inner,
        })
    }

    /// Returns the typedef declaration and the alias type it introduces.
    pub(crate) fn new_alias(&mut self, name: QualName, aliased: TypeId, using: bool) -> (DeclId, TypeId) {
        let aliased = self.claim(aliased);
        let alias = self.type_alias(name, aliased);
        let decl = if using {
            DeclKind::Using(alias)
        } else {
            DeclKind::Typedef(alias)
        };
        (self.alloc_decl(decl), alias)
    }

    fn var_data_mut(&mut self, decl: DeclId) -> &mut VarData {
        match self.decl_node_mut(decl) {
            DeclKind::Var(data) => data,
            other => panic!("expected a variable declaration, found {other:?}"),
        }
    }

    pub fn var_qualifiers(&self, decl: DeclId) -> VarQualifiers {
        match self.decl_node(decl) {
            DeclKind::Var(data) => data.quals,
            other => panic!("expected a variable declaration, found {other:?}"),
        }
    }

    pub fn set_var_qualifiers(&mut self, decl: DeclId, quals: VarQualifiers) {
        if quals.is_restrict {
            self.require_c("restrict qualifier");
        }
        if quals.is_inline {
            self.require_cxx("inline variable");
        }
        self.var_data_mut(decl).quals = quals;
    }

    pub(crate) fn func_data(&self, decl: DeclId) -> &FuncData {
        match self.decl_node(decl) {
            DeclKind::Function(data) => data,
            other => panic!("expected a function declaration, found {other:?}"),
        }
    }

    fn func_data_mut(&mut self, decl: DeclId) -> &mut FuncData {
        match self.decl_node_mut(decl) {
            DeclKind::Function(data) => data,
            other => panic!("expected a function declaration, found {other:?}"),
        }
    }

    /// The name a declaration is referred to by.
    pub fn decl_name(&self, decl: DeclId) -> QualName {
        match self.decl_node(decl) {
            DeclKind::Raw(text) => QualName::from(text.as_str()),
            DeclKind::Var(data) => data.name.clone(),
            DeclKind::Function(data) => data.name.clone(),
            DeclKind::SplitForward(func) => self.decl_name(*func),
            DeclKind::Aggregate { ty, .. }
            | DeclKind::Enum { ty, .. }
            | DeclKind::Typedef(ty)
            | DeclKind::Using(ty) => self.tag_name(*ty).clone(),
            DeclKind::Template { inner, .. } => self.decl_name(*inner),
        }
    }

    /// `decl::segment`, e.g. a member of a declared namespace or class.
    pub fn qualify(&self, decl: DeclId, segment: impl Into<String>) -> QualName {
        self.decl_name(decl).join(segment)
    }
}

impl FuncDecl {
    pub fn lifecycle(self, cx: &Context) -> Lifecycle {
        cx.func_data(self.0).lifecycle
    }

    pub fn name(self, cx: &Context) -> &QualName {
        &cx.func_data(self.0).name
    }

    /// True while the function renders as a signature followed by `;`.
    pub fn is_forward(self, cx: &Context) -> bool {
        cx.func_data(self.0).body.is_none()
    }

    /// The body scope, created on the first call.
    ///
    /// # Panics
    ///
    /// If the function is a pure forward declaration, or a method marked
    /// abstract, defaulted or deleted.
    pub fn body(self, cx: &mut Context) -> FuncScopeId {
        let data = cx.func_data(self.0);
        if data.lifecycle == Lifecycle::Forward {
            panic!("`{}` is a pure forward declaration and cannot have a body", data.name);
        }
        if let Some(special) = data.method.and_then(|m| m.quals.special) {
            panic!("`{}` is {} and cannot have a body", data.name, special.describe());
        }
        if let Some(body) = data.body {
            return body;
        }
        let body = FuncScopeId::alloc(cx, ScopeKind::Function);
        cx.func_data_mut(self.0).body = Some(body);
        body
    }

    pub fn qualifiers(self, cx: &Context) -> FuncQualifiers {
        cx.func_data(self.0).quals
    }

    pub fn set_qualifiers(self, cx: &mut Context, quals: FuncQualifiers) {
        if quals.is_constexpr {
            cx.require_cxx("constexpr function");
        }
        cx.func_data_mut(self.0).quals = quals;
    }

    pub fn method_qualifiers(self, cx: &Context) -> Option<MethodQualifiers> {
        cx.func_data(self.0).method.map(|m| m.quals)
    }

    /// # Panics
    ///
    /// If this is not a member function, or if `quals` marks it abstract,
    /// defaulted or deleted after its body was created.
    pub fn set_method_qualifiers(self, cx: &mut Context, quals: MethodQualifiers) {
        let data = cx.func_data_mut(self.0);
        if let Some(special) = quals.special {
            assert!(
                data.body.is_none(),
                "`{}` already has a body and cannot be {}",
                data.name,
                special.describe()
            );
        }
        match data.method.as_mut() {
            Some(method) => method.quals = quals,
            None => panic!("`{}` is not a member function", data.name),
        }
    }

    /// Record that the definition of a split function has been placed.
    pub(crate) fn mark_defined(self, cx: &mut Context) {
        let data = cx.func_data_mut(self.0);
        assert!(
            data.lifecycle == Lifecycle::Split,
            "`{}` was not declared as a split function",
            data.name
        );
        assert!(!data.defined, "`{}` is already defined", data.name);
        data.defined = true;
    }

    /// Append `member(args)` to a constructor's initializer list.
    pub fn add_init(self, cx: &mut Context, member: impl Into<QualName>, args: impl IntoIterator<Item = ExprId>) {
        let args: Vec<ExprId> = args.into_iter().map(|a| cx.claim(a)).collect();
        let data = cx.func_data_mut(self.0);
        assert!(
            data.kind == FuncKind::Constructor,
            "`{}` is not a constructor",
            data.name
        );
        data.inits.push(CtorInit {
            member: member.into(),
            args,
        });
    }
}

// =============================================================================
// Emission
// =============================================================================

impl Emit for DeclId {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        cx.emit_commented(NodeRef::Decl(*self), w, |w| emit_decl(cx, *self, w));
    }
}

impl Emit for FuncDecl {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.0.emit(cx, w);
    }
}

fn emit_decl(cx: &Context, id: DeclId, w: &mut CodeWriter) {
    match cx.decl_node(id) {
        DeclKind::Raw(text) => {
            w.push_str(text);
        }
        DeclKind::Var(data) => emit_var(cx, data, w),
        DeclKind::Function(data) => emit_function(cx, data, w),
        DeclKind::SplitForward(func) => {
            let data = cx.func_data(*func);
            emit_signature(cx, data, Signature::Forward, w);
            w.push_char(';');
        }
        DeclKind::Aggregate { ty, forward } | DeclKind::Enum { ty, forward } => {
            if *forward {
                emit_tag_reference(cx, *ty, w);
            } else {
                ty.emit(cx, w);
            }
        }
        DeclKind::Typedef(alias) => {
            let (name, aliased) = alias_parts(cx, *alias);
            w.push_str("typedef ");
            emit_declarator(cx, aliased, &name.to_string(), w);
        }
        DeclKind::Using(alias) => {
            let (name, aliased) = alias_parts(cx, *alias);
            w.push_str("using ");
            w.push_str(&name.to_string());
            w.push_char('=');
            aliased.emit(cx, w);
        }
        DeclKind::Template { params, inner } => {
            w.push_str("template<");
            w.push_joined(params, ",", |w, p| p.emit(cx, w));
            w.push_str("> ");
            inner.emit(cx, w);
        }
    }
}

fn alias_parts(cx: &Context, alias: TypeId) -> (&QualName, TypeId) {
    match cx.type_node(alias) {
        TypeKind::Alias { name, aliased } => (name, *aliased),
        other => panic!("expected an alias type, found {other:?}"),
    }
}

/// `T name`, with the name placed inside function and array declarators.
///
/// An empty name yields an abstract declarator such as `int(*)(int)`.
fn emit_declarator(cx: &Context, ty: TypeId, name: &str, w: &mut CodeWriter) {
    match cx.type_node(ty) {
        TypeKind::Function {
            ret,
            params,
            variadic,
        } => {
            ret.emit(cx, w);
            if !name.is_empty() {
                w.push_char(' ');
                w.push_str(name);
            }
            w.push_char('(');
            emit_param_types(cx, params, *variadic, w);
            w.push_char(')');
        }
        TypeKind::Pointer(pointee) => match cx.type_node(*pointee) {
            TypeKind::Function {
                ret,
                params,
                variadic,
            } => {
                ret.emit(cx, w);
                w.push_str("(*");
                w.push_str(name);
                w.push_str(")(");
                emit_param_types(cx, params, *variadic, w);
                w.push_char(')');
            }
            _ => emit_plain_declarator(cx, ty, name, w),
        },
        TypeKind::Array { elem, sizes } => {
            emit_plain_declarator(cx, *elem, name, w);
            emit_array_sizes(cx, sizes, w);
        }
        _ => emit_plain_declarator(cx, ty, name, w),
    }
}

fn emit_plain_declarator(cx: &Context, ty: TypeId, name: &str, w: &mut CodeWriter) {
    ty.emit(cx, w);
    if !name.is_empty() {
        w.push_char(' ');
        w.push_str(name);
    }
}

fn emit_var(cx: &Context, data: &VarData, w: &mut CodeWriter) {
    let q = data.quals;
    for (set, keyword) in [
        (q.is_const, "const "),
        (q.is_extern, "extern "),
        (q.is_static, "static "),
        (q.is_volatile, "volatile "),
        (q.is_inline, "inline "),
    ] {
        if set {
            w.push_str(keyword);
        }
    }
    let name = match (data.name.is_empty(), q.is_restrict) {
        (true, _) => String::new(),
        (false, true) => format!("restrict {}", data.name),
        (false, false) => data.name.to_string(),
    };
    emit_declarator(cx, data.ty, &name, w);
    match &data.shape {
        VarShape::Plain => {}
        VarShape::Array(sizes) => emit_array_sizes(cx, sizes, w),
        VarShape::Construct { args, list } => {
            let (open, close) = if *list { ('{', '}') } else { ('(', ')') };
            w.push_char(open);
            w.push_joined(args, ",", |w, a| a.emit(cx, w));
            w.push_char(close);
        }
    }
    if let Some(init) = data.init {
        w.push_char('=');
        init.emit(cx, w);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signature {
    /// A function carrying its own body, or none at all.
    Declaration,
    /// The declare half of a split function: unqualified name.
    Forward,
    /// The define half of a split function: members are qualified by their
    /// aggregate and lose in-class-only specifiers.
    Define,
}

fn emit_signature(cx: &Context, data: &FuncData, style: Signature, w: &mut CodeWriter) {
    let in_class = data.method.is_some() && style != Signature::Define;
    let quals = data.quals;
    let method = data.method.map(|m| m.quals).unwrap_or_default();

    for (set, keyword) in [
        (quals.is_extern && data.method.is_none(), "extern "),
        (quals.is_static && (data.method.is_none() || in_class), "static "),
        (quals.is_constexpr, "constexpr "),
        (quals.is_inline, "inline "),
        (in_class && method.is_virtual, "virtual "),
        (in_class && method.is_explicit, "explicit "),
    ] {
        if set {
            w.push_str(keyword);
        }
    }

    if let Some(ret) = data.ret {
        ret.emit(cx, w);
        w.push_char(' ');
    }

    match (style, data.method) {
        (Signature::Forward, _) => {
            w.push_str(data.name.last());
        }
        (Signature::Define, Some(method)) => {
            w.push_str(&cx.tag_name(method.parent).to_string());
            w.push_str("::");
            w.push_str(data.name.last());
        }
        _ => {
            w.push_str(&data.name.to_string());
        }
    }

    w.push_char('(');
    w.push_joined(&data.params, ",", |w, p| p.emit(cx, w));
    if data.variadic {
        w.push_str(if data.params.is_empty() { "..." } else { ",..." });
    }
    w.push_char(')');

    let trailing = [
        (method.is_const, "const"),
        (in_class && method.is_override, "override"),
        (in_class && method.is_final, "final"),
    ];
    w.push_joined(
        trailing.iter().filter(|(set, _)| *set).map(|(_, kw)| *kw),
        " ",
        |w, kw| {
            w.push_str(kw);
        },
    );
}

fn emit_function(cx: &Context, data: &FuncData, w: &mut CodeWriter) {
    let style = match data.lifecycle {
        Lifecycle::Split => Signature::Define,
        Lifecycle::Forward | Lifecycle::Inline => Signature::Declaration,
    };
    emit_signature(cx, data, style, w);

    if let Some(special) = data.method.and_then(|m| m.quals.special) {
        w.push_str(special.suffix());
        return;
    }

    let Some(body) = data.body else {
        w.push_char(';');
        return;
    };
    if !data.inits.is_empty() {
        w.push_char(':');
        w.push_joined(&data.inits, ",", |w, init| {
            w.push_str(&init.member.to_string());
            w.push_char('(');
            w.push_joined(&init.args, ",", |w, a| a.emit(cx, w));
            w.push_char(')');
        });
    }
    w.push_char('{');
    body.emit(cx, w);
    w.push_char('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeclSink, StmtSink, TypeDeclSink};

    #[test]
    fn test_var_rendering() {
        let mut cx = Context::c();
        let int = cx.type_int();
        let one = cx.expr_int(1);
        let var = cx.decl_var("var", int, one);
        let void = cx.type_void();
        let unnamed = cx.decl_var("", void, None);

        assert_eq!(var.to_code(&cx), "int var=1");
        assert_eq!(unnamed.to_code(&cx), "void");
    }

    #[test]
    fn test_var_qualifier_order() {
        let mut cx = Context::c();
        let char_ty = cx.type_char();
        let ptr = cx.type_pointer(char_ty);
        let var = cx.decl_var("p", ptr, None);
        cx.set_var_qualifiers(
            var,
            VarQualifiers::new()
                .with_volatile()
                .with_static()
                .with_extern()
                .with_const()
                .with_restrict(),
        );

        assert_eq!(
            var.to_code(&cx),
            "const extern static volatile char* restrict p"
        );
    }

    #[test]
    #[should_panic(expected = "restrict qualifier is only available when generating C")]
    fn test_restrict_is_c_only() {
        let mut cx = Context::cxx();
        let int = cx.type_int();
        let var = cx.decl_var("x", int, None);
        cx.set_var_qualifiers(var, VarQualifiers::new().with_restrict());
    }

    #[test]
    fn test_array_var() {
        let mut cx = Context::c();
        let int = cx.type_int();
        let char_ty = cx.type_char();
        let char_ptr = cx.type_pointer(char_ty);
        let one = cx.expr_int(1);
        let two = cx.expr_int(2);
        let three = cx.expr_int(3);

        let var = cx.decl_array_var("var", int, [one, two], three);
        let argv = cx.decl_array_var("argv", char_ptr, [], None);

        assert_eq!(var.to_code(&cx), "int var[1][2]=3");
        assert_eq!(argv.to_code(&cx), "char* argv[]");
    }

    #[test]
    fn test_function_pointer_declarators() {
        let mut cx = Context::c();
        let int = cx.type_int();
        let callback = cx.type_function(int, [int], false);
        let callback_ptr = cx.type_pointer(callback);
        let cb = cx.decl_var("cb", callback_ptr, None);
        let func = cx.decl_func("apply", int, [cb], false);
        let unnamed = cx.decl_var("", callback_ptr, None);
        let restricted = cx.decl_var("next", callback_ptr, None);
        cx.set_var_qualifiers(restricted, VarQualifiers::new().with_restrict());

        assert_eq!(func.to_code(&cx), "int apply(int(*cb)(int));");
        assert_eq!(unnamed.to_code(&cx), "int(*)(int)");
        assert_eq!(restricted.to_code(&cx), "int(*restrict next)(int)");
    }

    #[test]
    fn test_array_typed_var() {
        let mut cx = Context::c();
        let int = cx.type_int();
        let three = cx.expr_int(3);
        let triple = cx.type_array(int, [three]);
        let items: Vec<ExprId> = (1..=3).map(|v| cx.expr_int(v)).collect();
        let init = cx.expr_init_list(items);
        let var = cx.decl_var("a", triple, init);
        let param = cx.decl_var("", triple, None);

        assert_eq!(var.to_code(&cx), "int a[3]={1,2,3}");
        assert_eq!(param.to_code(&cx), "int[3]");
    }

    #[test]
    fn test_construct_init() {
        let mut cx = Context::cxx();
        let int = cx.type_int();
        let one = cx.expr_int(1);
        let paren = cx.decl_var_init("a", int, [one], false);
        let list = cx.decl_var_init("b", int, [one], true);

        assert_eq!(paren.to_code(&cx), "int a(1)");
        assert_eq!(list.to_code(&cx), "int b{1}");
    }

    #[test]
    fn test_inline_function_is_forward_until_body_requested() {
        let mut cx = Context::c();
        let int = cx.type_int();
        let x = cx.decl_var("x", int, None);
        let func = cx.decl_func("f", int, [x], true);

        assert!(func.is_forward(&cx));
        assert_eq!(func.to_code(&cx), "int f(int x,...);");

        let body = func.body(&mut cx);
        assert_eq!(body, func.body(&mut cx));
        assert!(!func.is_forward(&cx));
        assert_eq!(func.to_code(&cx), "int f(int x,...){}");
    }

    #[test]
    #[should_panic(expected = "pure forward declaration")]
    fn test_pure_forward_has_no_body() {
        let mut cx = Context::c();
        let tl = cx.new_top_level();
        let int = cx.type_int();
        let func = cx.top_level(tl).declare_func("f", int, [], false);
        func.body(&mut cx);
    }

    fn widget_method(cx: &mut Context) -> FuncDecl {
        let tl = cx.new_top_level();
        let int = cx.type_int();
        let class = cx.top_level(tl).def_class("widget");
        let public = class.add_public_scope(cx);
        cx.member_scope(public).def_method("size", int, [], false)
    }

    fn special_method(cx: &mut Context, special: MethodSpecial) -> FuncDecl {
        let method = widget_method(cx);
        method.set_method_qualifiers(
            cx,
            MethodQualifiers::new().with_virtual().with_special(special),
        );
        method
    }

    #[test]
    #[should_panic(expected = "`size` is abstract and cannot have a body")]
    fn test_abstract_method_has_no_body() {
        let mut cx = Context::cxx();
        let method = special_method(&mut cx, MethodSpecial::Abstract);
        method.body(&mut cx);
    }

    #[test]
    #[should_panic(expected = "`size` is defaulted and cannot have a body")]
    fn test_defaulted_method_has_no_body() {
        let mut cx = Context::cxx();
        let method = special_method(&mut cx, MethodSpecial::Default);
        method.body(&mut cx);
    }

    #[test]
    #[should_panic(expected = "`size` is deleted and cannot have a body")]
    fn test_deleted_method_has_no_body() {
        let mut cx = Context::cxx();
        let method = special_method(&mut cx, MethodSpecial::Delete);
        method.body(&mut cx);
    }

    #[test]
    fn test_special_method_renders_suffix() {
        let mut cx = Context::cxx();
        let method = special_method(&mut cx, MethodSpecial::Abstract);

        assert!(method.is_forward(&cx));
        assert_eq!(method.to_code(&cx), "virtual int size()=0;");
    }

    #[test]
    #[should_panic(expected = "`size` already has a body and cannot be deleted")]
    fn test_special_after_body_panics() {
        let mut cx = Context::cxx();
        let method = widget_method(&mut cx);
        method.body(&mut cx);
        method.set_method_qualifiers(
            &mut cx,
            MethodQualifiers::new().with_special(MethodSpecial::Delete),
        );
    }

    #[test]
    #[should_panic(expected = "`size` is not a constructor")]
    fn test_init_list_requires_constructor() {
        let mut cx = Context::cxx();
        let method = widget_method(&mut cx);
        let zero = cx.expr_int(0);
        method.add_init(&mut cx, "count", [zero]);
    }

    #[test]
    #[should_panic(expected = "`f` is not a member function")]
    fn test_method_qualifiers_require_member() {
        let mut cx = Context::cxx();
        let int = cx.type_int();
        let func = cx.decl_func("f", int, [], false);
        func.set_method_qualifiers(&mut cx, MethodQualifiers::new().with_const());
    }

    #[test]
    fn test_function_qualifier_order() {
        let mut cx = Context::cxx();
        let int = cx.type_int();
        let func = cx.decl_func("f", int, [], false);
        func.set_qualifiers(
            &mut cx,
            FuncQualifiers::new()
                .with_inline()
                .with_constexpr()
                .with_static()
                .with_extern(),
        );

        assert_eq!(func.to_code(&cx), "extern static constexpr inline int f();");
    }

    #[test]
    fn test_split_signatures_match() {
        let mut cx = Context::c();
        let decls = cx.new_top_level();
        let defs = cx.new_top_level();
        let int = cx.type_int();
        let x = cx.decl_var("x", int, None);

        let func = cx.top_level(decls).def_func_declare("func1", int, [x], false);
        let body = func.body(&mut cx);
        let ret = cx.expr_var(x);
        cx.func_scope(body).stmt_return(ret);
        cx.top_level(defs).def_func_define(func);

        let forward = decls.to_code(&cx);
        let define = defs.to_code(&cx);
        assert_eq!(forward, "int func1(int x);\n");
        assert_eq!(define, "int func1(int x){return x;}\n");
        let signature = forward.trim_end_matches(";\n");
        assert!(define.starts_with(signature));
    }

    #[test]
    fn test_typedef_declarators() {
        let mut cx = Context::c();
        let tl = cx.new_top_level();
        let int = cx.type_int();
        let float = cx.type_float();
        let three = cx.expr_int(3);
        let func = cx.type_function(int, [int, float], false);
        let func_ptr = cx.type_pointer(func);
        let array = cx.type_array(int, [three]);

        let mut top = cx.top_level(tl);
        top.def_typedef("num", int);
        top.def_typedef("handler", func);
        top.def_typedef("callback", func_ptr);
        top.def_typedef("triple", array);

        assert_eq!(
            tl.to_code(&cx),
            "typedef int num;\n\
             typedef int handler(int,float);\n\
             typedef int(*callback)(int,float);\n\
             typedef int triple[3];\n"
        );
    }

    #[test]
    fn test_template_wraps_declaration() {
        let mut cx = Context::cxx();
        let tn = cx.type_typename();
        let int = cx.type_int();
        let t = cx.decl_var("T", tn, None);
        let i = cx.decl_var("I", int, None);
        let t_ty = cx.type_named(t);
        let x = cx.decl_var("x", t_ty, None);
        let func = cx.decl_func("func", t_ty, [x], false);
        let template = cx.decl_template([t, i], func.id());

        assert_eq!(template.to_code(&cx), "template<typename T,int I> T func(T x);");
    }

    #[test]
    fn test_decl_name_and_qualify() {
        let mut cx = Context::cxx();
        let tl = cx.new_top_level();
        let cls = cx.top_level(tl).def_class("widget");

        assert_eq!(cx.decl_name(cls.decl()).to_string(), "widget");
        assert_eq!(cx.qualify(cls.decl(), "size").to_string(), "widget::size");
    }
}
