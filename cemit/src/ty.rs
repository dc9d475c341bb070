//! Type nodes.

use cemit_core::CodeWriter;

use crate::{
    Context, Emit,
    decl::DeclKind,
    id::{DeclId, ExprId, NodeRef, TypeId},
    name::QualName,
    scope::{MemberScopeId, ScopeHandle, ScopeKind},
};

/// Access specifier of a class region or base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Struct,
    Union,
    Class,
}

impl AggregateKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Class => "class",
        }
    }
}

/// Keyword of a scoped enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKey {
    Class,
    Struct,
}

/// Keyword used to introduce a template type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeParamKeyword {
    Typename,
    Class,
}

/// An argument in a template argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateArg {
    Type(TypeId),
    Expr(ExprId),
}

impl From<TypeId> for TemplateArg {
    fn from(id: TypeId) -> Self {
        Self::Type(id)
    }
}

impl From<ExprId> for TemplateArg {
    fn from(id: ExprId) -> Self {
        Self::Expr(id)
    }
}

impl Emit for TemplateArg {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        match self {
            Self::Type(ty) => ty.emit(cx, w),
            Self::Expr(expr) => expr.emit(cx, w),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseSpec {
    pub access: Access,
    pub ty: TypeId,
}

/// One member region of an aggregate. Unlabeled regions carry C members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub access: Option<Access>,
    pub scope: MemberScopeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateData {
    pub kind: AggregateKind,
    pub name: QualName,
    pub is_final: bool,
    pub bases: Vec<BaseSpec>,
    pub regions: Vec<Region>,
    default_region: Option<MemberScopeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<ExprId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumData {
    pub name: QualName,
    pub key: Option<EnumKey>,
    pub underlying: Option<TypeId>,
    pub members: Vec<EnumMember>,
}

/// Every shape a type can take.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Raw(String),
    Void,
    Pointer(TypeId),
    Reference(TypeId),
    Array {
        elem: TypeId,
        sizes: Vec<ExprId>,
    },
    Function {
        ret: TypeId,
        params: Vec<TypeId>,
        variadic: bool,
    },
    /// Refers to the declaration of a struct, union, class, enum or alias.
    Named(DeclId),
    Alias {
        name: QualName,
        aliased: TypeId,
    },
    Aggregate(AggregateData),
    Enum(EnumData),
    Instantiation {
        template: DeclId,
        args: Vec<TemplateArg>,
    },
    Pack(TypeId),
    TypeParam(TypeParamKeyword),
}

/// A struct, union or class together with its full declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassType {
    ty: TypeId,
    decl: DeclId,
}

/// An enumeration together with its full declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumType {
    ty: TypeId,
    decl: DeclId,
}

// =============================================================================
// Factories
// =============================================================================

impl Context {
    /// An opaque type spelled exactly as given. Interned by spelling.
    pub fn type_raw(&mut self, spelling: impl Into<String>) -> TypeId {
        let spelling = spelling.into();
        if let Some(&id) = self.raw_types.get(&spelling) {
            tracing::trace!(kind = "raw", %spelling, "interned type hit");
            return id;
        }
        tracing::trace!(kind = "raw", %spelling, "interned type miss");
        let id = self.alloc_type(TypeKind::Raw(spelling.clone()));
        self.raw_types.insert(spelling, id);
        id
    }

    pub fn type_bool(&mut self) -> TypeId {
        self.type_raw("bool")
    }

    pub fn type_char(&mut self) -> TypeId {
        self.type_raw("char")
    }

    pub fn type_schar(&mut self) -> TypeId {
        self.type_raw("signed char")
    }

    pub fn type_uchar(&mut self) -> TypeId {
        self.type_raw("unsigned char")
    }

    pub fn type_short(&mut self) -> TypeId {
        self.type_raw("short")
    }

    pub fn type_ushort(&mut self) -> TypeId {
        self.type_raw("unsigned short")
    }

    pub fn type_int(&mut self) -> TypeId {
        self.type_raw("int")
    }

    pub fn type_uint(&mut self) -> TypeId {
        self.type_raw("unsigned int")
    }

    pub fn type_long(&mut self) -> TypeId {
        self.type_raw("long")
    }

    pub fn type_ulong(&mut self) -> TypeId {
        self.type_raw("unsigned long")
    }

    pub fn type_llong(&mut self) -> TypeId {
        self.type_raw("long long")
    }

    pub fn type_ullong(&mut self) -> TypeId {
        self.type_raw("unsigned long long")
    }

    pub fn type_float(&mut self) -> TypeId {
        self.type_raw("float")
    }

    pub fn type_double(&mut self) -> TypeId {
        self.type_raw("double")
    }

    pub fn type_ldouble(&mut self) -> TypeId {
        self.type_raw("long double")
    }

    pub fn type_size_t(&mut self) -> TypeId {
        self.type_raw("size_t")
    }

    pub fn type_auto(&mut self) -> TypeId {
        self.require_cxx("auto type");
        self.type_raw("auto")
    }

    /// `T*`, one node per pointee.
    pub fn type_pointer(&mut self, pointee: TypeId) -> TypeId {
        let pointee = self.claim(pointee);
        if let Some(&id) = self.pointers.get(&pointee) {
            tracing::trace!(kind = "pointer", "interned type hit");
            return id;
        }
        tracing::trace!(kind = "pointer", "interned type miss");
        let id = self.alloc_type(TypeKind::Pointer(pointee));
        self.pointers.insert(pointee, id);
        id
    }

    /// `T&`, one node per referee.
    pub fn type_reference(&mut self, referee: TypeId) -> TypeId {
        self.require_cxx("reference type");
        let referee = self.claim(referee);
        if let Some(&id) = self.references.get(&referee) {
            tracing::trace!(kind = "reference", "interned type hit");
            return id;
        }
        tracing::trace!(kind = "reference", "interned type miss");
        let id = self.alloc_type(TypeKind::Reference(referee));
        self.references.insert(referee, id);
        id
    }

    /// `T[a][b]`, one node per element type and size-expression identities.
    pub fn type_array(&mut self, elem: TypeId, sizes: impl IntoIterator<Item = ExprId>) -> TypeId {
        let elem = self.claim(elem);
        let sizes = self.claim_all(sizes);
        let key = (elem, sizes);
        if let Some(&id) = self.arrays.get(&key) {
            tracing::trace!(kind = "array", "interned type hit");
            return id;
        }
        tracing::trace!(kind = "array", "interned type miss");
        let id = self.alloc_type(TypeKind::Array {
            elem,
            sizes: key.1.clone(),
        });
        self.arrays.insert(key, id);
        id
    }

    /// `ret(params)`.
    pub fn type_function(
        &mut self,
        ret: TypeId,
        params: impl IntoIterator<Item = TypeId>,
        variadic: bool,
    ) -> TypeId {
        let ret = self.claim(ret);
        let params = self.claim_all(params);
        self.alloc_type(TypeKind::Function {
            ret,
            params,
            variadic,
        })
    }

    /// The type a declaration introduces, one node per declaration.
    pub fn type_named(&mut self, decl: DeclId) -> TypeId {
        let decl = self.claim(decl);
        if let Some(&id) = self.named.get(&decl) {
            tracing::trace!(kind = "named", "interned type hit");
            return id;
        }
        tracing::trace!(kind = "named", "interned type miss");
        let id = self.alloc_type(TypeKind::Named(decl));
        self.named.insert(decl, id);
        id
    }

    /// `Name<args>` for a declared template.
    pub fn type_instantiation(
        &mut self,
        template: DeclId,
        args: impl IntoIterator<Item = TemplateArg>,
    ) -> TypeId {
        self.require_cxx("template instantiation");
        let template = self.claim(template);
        let args = self.claim_args(args);
        self.alloc_type(TypeKind::Instantiation { template, args })
    }

    /// `Name<args>` for a template known only by name, e.g. `std::vector`.
    pub fn type_raw_instantiation(
        &mut self,
        name: impl Into<QualName>,
        args: impl IntoIterator<Item = TemplateArg>,
    ) -> TypeId {
        let template = self.decl_raw_template(name);
        self.type_instantiation(template, args)
    }

    /// `T...`.
    pub fn type_pack(&mut self, ty: TypeId) -> TypeId {
        self.require_cxx("parameter pack");
        let ty = self.claim(ty);
        self.alloc_type(TypeKind::Pack(ty))
    }

    /// Placeholder type of a `typename T` template parameter.
    pub fn type_typename(&mut self) -> TypeId {
        self.require_cxx("template type parameter");
        self.alloc_type(TypeKind::TypeParam(TypeParamKeyword::Typename))
    }

    /// Placeholder type of a `class T` template parameter.
    pub fn type_class_param(&mut self) -> TypeId {
        self.require_cxx("template type parameter");
        self.alloc_type(TypeKind::TypeParam(TypeParamKeyword::Class))
    }

    pub(crate) fn type_alias(&mut self, name: QualName, aliased: TypeId) -> TypeId {
        let aliased = self.claim(aliased);
        self.alloc_type(TypeKind::Alias { name, aliased })
    }

    /// Build an aggregate type and its full declaration without placing it
    /// in any scope.
    pub fn new_aggregate(&mut self, kind: AggregateKind, name: impl Into<QualName>) -> ClassType {
        if kind == AggregateKind::Class {
            self.require_cxx("class");
        }
        let ty = self.alloc_type(TypeKind::Aggregate(AggregateData {
            kind,
            name: name.into(),
            is_final: false,
            bases: Vec::new(),
            regions: Vec::new(),
            default_region: None,
        }));
        let decl = self.alloc_decl(DeclKind::Aggregate { ty, forward: false });
        ClassType { ty, decl }
    }

    /// Build an enumeration without placing it in any scope.
    pub fn new_enum(&mut self, name: impl Into<QualName>, key: Option<EnumKey>) -> EnumType {
        if key.is_some() {
            self.require_cxx("scoped enum");
        }
        let ty = self.alloc_type(TypeKind::Enum(EnumData {
            name: name.into(),
            key,
            underlying: None,
            members: Vec::new(),
        }));
        let decl = self.alloc_decl(DeclKind::Enum { ty, forward: false });
        EnumType { ty, decl }
    }

    fn aggregate_data(&self, ty: TypeId) -> &AggregateData {
        match self.type_node(ty) {
            TypeKind::Aggregate(data) => data,
            other => panic!("expected an aggregate type, found {other:?}"),
        }
    }

    fn aggregate_data_mut(&mut self, ty: TypeId) -> &mut AggregateData {
        match self.type_node_mut(ty) {
            TypeKind::Aggregate(data) => data,
            other => panic!("expected an aggregate type, found {other:?}"),
        }
    }

    fn enum_data_mut(&mut self, ty: TypeId) -> &mut EnumData {
        match self.type_node_mut(ty) {
            TypeKind::Enum(data) => data,
            other => panic!("expected an enum type, found {other:?}"),
        }
    }

    /// Name of an aggregate or enum type.
    pub(crate) fn tag_name(&self, ty: TypeId) -> &QualName {
        match self.type_node(ty) {
            TypeKind::Aggregate(data) => &data.name,
            TypeKind::Enum(data) => &data.name,
            TypeKind::Alias { name, .. } => name,
            other => panic!("expected a named type, found {other:?}"),
        }
    }
}

impl ClassType {
    /// The aggregate type node; emitting it renders the full definition.
    pub fn ty(self) -> TypeId {
        self.ty
    }

    /// The full declaration.
    pub fn decl(self) -> DeclId {
        self.decl
    }

    /// The interned named type used to refer to this aggregate.
    pub fn named(self, cx: &mut Context) -> TypeId {
        cx.type_named(self.decl)
    }

    pub fn kind(self, cx: &Context) -> AggregateKind {
        cx.aggregate_data(self.ty).kind
    }

    pub fn name(self, cx: &Context) -> &QualName {
        &cx.aggregate_data(self.ty).name
    }

    /// The unlabeled member region, created on first request.
    ///
    /// This is where C struct and union members go.
    pub fn members(self, cx: &mut Context) -> MemberScopeId {
        if let Some(region) = cx.aggregate_data(self.ty).default_region {
            return region;
        }
        let scope = MemberScopeId::alloc(
            cx,
            ScopeKind::Members {
                parent: self.ty,
                labeled: false,
            },
        );
        let data = cx.aggregate_data_mut(self.ty);
        data.default_region = Some(scope);
        data.regions.push(Region {
            access: None,
            scope,
        });
        scope
    }

    /// Append a labeled `access:` region.
    pub fn add_region(self, cx: &mut Context, access: Access) -> MemberScopeId {
        cx.require_cxx("access specifier");
        let scope = MemberScopeId::alloc(
            cx,
            ScopeKind::Members {
                parent: self.ty,
                labeled: true,
            },
        );
        cx.aggregate_data_mut(self.ty).regions.push(Region {
            access: Some(access),
            scope,
        });
        scope
    }

    pub fn add_public_scope(self, cx: &mut Context) -> MemberScopeId {
        self.add_region(cx, Access::Public)
    }

    pub fn add_protected_scope(self, cx: &mut Context) -> MemberScopeId {
        self.add_region(cx, Access::Protected)
    }

    pub fn add_private_scope(self, cx: &mut Context) -> MemberScopeId {
        self.add_region(cx, Access::Private)
    }

    pub fn add_base(self, cx: &mut Context, access: Access, base: TypeId) {
        cx.require_cxx("base class");
        let base = cx.claim(base);
        cx.aggregate_data_mut(self.ty)
            .bases
            .push(BaseSpec { access, ty: base });
    }

    pub fn set_final(self, cx: &mut Context, is_final: bool) {
        cx.require_cxx("final class");
        cx.aggregate_data_mut(self.ty).is_final = is_final;
    }

    /// A forward declaration, `struct name`, not placed in any scope.
    pub fn forward(self, cx: &mut Context) -> DeclId {
        cx.alloc_decl(DeclKind::Aggregate {
            ty: self.ty,
            forward: true,
        })
    }
}

impl EnumType {
    pub fn ty(self) -> TypeId {
        self.ty
    }

    pub fn decl(self) -> DeclId {
        self.decl
    }

    /// The interned named type used to refer to this enumeration.
    pub fn named(self, cx: &mut Context) -> TypeId {
        cx.type_named(self.decl)
    }

    pub fn name(self, cx: &Context) -> &QualName {
        cx.tag_name(self.ty)
    }

    /// Append `name=value,` (or `name,` without a value).
    pub fn def_member(self, cx: &mut Context, name: impl Into<String>, value: impl Into<Option<ExprId>>) {
        let value = value.into().map(|v| cx.claim(v));
        cx.enum_data_mut(self.ty).members.push(EnumMember {
            name: name.into(),
            value,
        });
    }

    pub fn set_underlying(self, cx: &mut Context, ty: TypeId) {
        let ty = cx.claim(ty);
        cx.enum_data_mut(self.ty).underlying = Some(ty);
    }

    pub fn set_key(self, cx: &mut Context, key: EnumKey) {
        cx.require_cxx("scoped enum");
        cx.enum_data_mut(self.ty).key = Some(key);
    }

    /// A forward declaration, `enum name`, not placed in any scope.
    pub fn forward(self, cx: &mut Context) -> DeclId {
        cx.alloc_decl(DeclKind::Enum {
            ty: self.ty,
            forward: true,
        })
    }
}

// =============================================================================
// Emission
// =============================================================================

impl Emit for TypeId {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        cx.emit_commented(NodeRef::Type(*self), w, |w| emit_type(cx, *self, w));
    }
}

impl Emit for ClassType {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.ty.emit(cx, w);
    }
}

impl Emit for EnumType {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.ty.emit(cx, w);
    }
}

fn emit_type(cx: &Context, id: TypeId, w: &mut CodeWriter) {
    match cx.type_node(id) {
        TypeKind::Raw(spelling) => {
            w.push_str(spelling);
        }
        TypeKind::Void => {
            w.push_str("void");
        }
        TypeKind::Pointer(pointee) => {
            pointee.emit(cx, w);
            w.push_char('*');
        }
        TypeKind::Reference(referee) => {
            referee.emit(cx, w);
            w.push_char('&');
        }
        TypeKind::Array { elem, sizes } => {
            elem.emit(cx, w);
            emit_array_sizes(cx, sizes, w);
        }
        TypeKind::Function {
            ret,
            params,
            variadic,
        } => {
            ret.emit(cx, w);
            w.push_char('(');
            emit_param_types(cx, params, *variadic, w);
            w.push_char(')');
        }
        TypeKind::Named(decl) => emit_named(cx, *decl, w),
        TypeKind::Alias { name, .. } => {
            w.push_str(&name.to_string());
        }
        TypeKind::Aggregate(data) => emit_aggregate(cx, data, w),
        TypeKind::Enum(data) => emit_enum(cx, data, w),
        TypeKind::Instantiation { template, args } => {
            w.push_str(&cx.decl_name(*template).to_string());
            w.push_char('<');
            w.push_joined(args, ",", |w, arg| arg.emit(cx, w));
            w.push_char('>');
        }
        TypeKind::Pack(ty) => {
            ty.emit(cx, w);
            w.push_str("...");
        }
        TypeKind::TypeParam(keyword) => {
            w.push_str(match keyword {
                TypeParamKeyword::Typename => "typename",
                TypeParamKeyword::Class => "class",
            });
        }
    }
}

/// `[a][b]`, or `[]` for an unsized array.
pub(crate) fn emit_array_sizes(cx: &Context, sizes: &[ExprId], w: &mut CodeWriter) {
    if sizes.is_empty() {
        w.push_str("[]");
        return;
    }
    for size in sizes {
        w.push_char('[');
        size.emit(cx, w);
        w.push_char(']');
    }
}

pub(crate) fn emit_param_types(cx: &Context, params: &[TypeId], variadic: bool, w: &mut CodeWriter) {
    w.push_joined(params, ",", |w, p| p.emit(cx, w));
    if variadic {
        w.push_str(if params.is_empty() { "..." } else { ",..." });
    }
}

fn emit_named(cx: &Context, decl: DeclId, w: &mut CodeWriter) {
    let tag = match cx.decl_node(decl) {
        DeclKind::Aggregate { ty, .. } => Some((cx.aggregate_data(*ty).kind.keyword(), *ty)),
        DeclKind::Enum { ty, .. } => Some(("enum", *ty)),
        _ => None,
    };
    match tag {
        Some((keyword, ty)) if !cx.is_cxx() => {
            w.push_str(keyword);
            w.push_char(' ');
            w.push_str(&cx.tag_name(ty).to_string());
        }
        _ => {
            w.push_str(&cx.decl_name(decl).to_string());
        }
    }
}

fn emit_aggregate(cx: &Context, data: &AggregateData, w: &mut CodeWriter) {
    w.push_str(data.kind.keyword());
    w.push_char(' ');
    w.push_str(&data.name.to_string());
    if data.is_final {
        w.push_str(" final");
    }
    if !data.bases.is_empty() {
        w.push_str(" : ");
        w.push_joined(&data.bases, ",", |w, base| {
            w.push_str(base.access.as_str());
            w.push_char(' ');
            base.ty.emit(cx, w);
        });
    }
    w.push_char('{');
    for region in &data.regions {
        if let Some(access) = region.access {
            w.push_str(access.as_str());
            w.push_str(":\n");
        }
        region.scope.emit(cx, w);
    }
    w.push_char('}');
}

fn emit_enum(cx: &Context, data: &EnumData, w: &mut CodeWriter) {
    w.push_str("enum ");
    if let Some(key) = data.key {
        w.push_str(match key {
            EnumKey::Class => "class ",
            EnumKey::Struct => "struct ",
        });
    }
    w.push_str(&data.name.to_string());
    if let Some(underlying) = data.underlying {
        w.push_char(':');
        underlying.emit(cx, w);
    }
    w.push_char('{');
    for member in &data.members {
        w.push_str(&member.name);
        if let Some(value) = member.value {
            w.push_char('=');
            value.emit(cx, w);
        }
        w.push_char(',');
    }
    w.push_char('}');
}

/// `struct name` / `enum class name`, the way a forward declaration reads.
pub(crate) fn emit_tag_reference(cx: &Context, ty: TypeId, w: &mut CodeWriter) {
    match cx.type_node(ty) {
        TypeKind::Aggregate(data) => {
            w.push_str(data.kind.keyword());
            w.push_char(' ');
            w.push_str(&data.name.to_string());
        }
        TypeKind::Enum(data) => {
            w.push_str("enum ");
            if let Some(key) = data.key {
                w.push_str(match key {
                    EnumKey::Class => "class ",
                    EnumKey::Struct => "struct ",
                });
            }
            w.push_str(&data.name.to_string());
            if let Some(underlying) = data.underlying {
                w.push_char(':');
                underlying.emit(cx, w);
            }
        }
        other => panic!("expected an aggregate or enum type, found {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::{DeclSink, ScopeSink, TypeDeclSink};

    #[test]
    fn test_interning_idempotence() {
        let mut cx = Context::cxx();
        let int = cx.type_int();

        assert_eq!(cx.type_pointer(int), cx.type_pointer(int));
        assert_eq!(cx.type_reference(int), cx.type_reference(int));

        let two = cx.expr_int(2);
        let three = cx.expr_int(3);
        let a = cx.type_array(int, [two, three]);
        assert_eq!(a, cx.type_array(int, [two, three]));
        assert_ne!(a, cx.type_array(int, [three, two]));

        let decl = cx.decl_var("x", int, None);
        assert_eq!(cx.type_named(decl), cx.type_named(decl));
    }

    #[test]
    fn test_array_interning_is_by_identity_not_text() {
        let mut cx = Context::c();
        let int = cx.type_int();
        let first = cx.expr_int(4);
        let second = cx.expr_int(4);
        assert_ne!(cx.type_array(int, [first]), cx.type_array(int, [second]));
    }

    #[test]
    fn test_raw_types_interned_by_spelling() {
        let mut cx = Context::c();
        let a = cx.type_raw("unsigned long");
        assert_eq!(a, cx.type_ulong());
        assert_eq!(cx.raw_type_names().collect::<Vec<_>>(), ["unsigned long"]);
    }

    #[test]
    fn test_function_types_are_not_interned() {
        let mut cx = Context::c();
        let int = cx.type_int();
        assert_ne!(
            cx.type_function(int, [int], false),
            cx.type_function(int, [int], false)
        );
    }

    #[test]
    fn test_derived_type_rendering() {
        let mut cx = Context::cxx();
        let int = cx.type_int();
        let float = cx.type_float();
        let one = cx.expr_int(1);
        let two = cx.expr_int(2);

        let ptr = cx.type_pointer(int);
        let ptr_ptr = cx.type_pointer(ptr);
        let reference = cx.type_reference(int);
        let array = cx.type_array(int, [one, two]);
        let open = cx.type_array(int, []);
        let func = cx.type_function(int, [int, float], false);
        let var = cx.type_function(int, [int], true);

        assert_eq!(ptr_ptr.to_code(&cx), "int**");
        assert_eq!(reference.to_code(&cx), "int&");
        assert_eq!(array.to_code(&cx), "int[1][2]");
        assert_eq!(open.to_code(&cx), "int[]");
        assert_eq!(func.to_code(&cx), "int(int,float)");
        assert_eq!(var.to_code(&cx), "int(int,...)");
    }

    #[test]
    fn test_named_type_uses_tag_in_c() {
        let mut cx = Context::c();
        let tl = cx.new_top_level();
        let mut top = cx.top_level(tl);
        let point = top.def_struct("point");
        let tag = top.def_enum("tag");
        let point = point.named(top.cx());
        let tag = tag.named(top.cx());

        assert_eq!(point.to_code(&cx), "struct point");
        assert_eq!(tag.to_code(&cx), "enum tag");
    }

    #[test]
    fn test_named_type_uses_bare_name_in_cxx() {
        let mut cx = Context::cxx();
        let tl = cx.new_top_level();
        let mut top = cx.top_level(tl);
        let point = top.def_class("point");
        let int = top.cx().type_int();
        let alias = top.def_typedef("handle", int);
        let point = point.named(top.cx());

        assert_eq!(point.to_code(&cx), "point");
        assert_eq!(alias.to_code(&cx), "handle");
    }

    #[test]
    fn test_enum_rendering() {
        let mut cx = Context::cxx();
        let e = cx.new_enum("color", Some(EnumKey::Class));
        let int = cx.type_int();
        e.set_underlying(&mut cx, int);
        let one = cx.expr_int(1);
        e.def_member(&mut cx, "red", one);
        e.def_member(&mut cx, "green", None);

        assert_eq!(e.to_code(&cx), "enum class color:int{red=1,green,}");
    }

    #[test]
    fn test_template_type_helpers() {
        let mut cx = Context::cxx();
        let int = cx.type_int();
        let vec = cx.type_raw_instantiation(["std", "vector"], [int.into()]);
        let tn = cx.type_typename();
        let cls = cx.type_class_param();
        let pack = cx.type_pack(int);

        assert_eq!(vec.to_code(&cx), "std::vector<int>");
        assert_eq!(tn.to_code(&cx), "typename");
        assert_eq!(cls.to_code(&cx), "class");
        assert_eq!(pack.to_code(&cx), "int...");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_interning_traces_hits_and_misses() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut cx = Context::c();
            let int = cx.type_int();
            cx.type_int();
            cx.type_pointer(int);
        });

        let out = logs.contents();
        assert!(out.contains("interned type miss"), "{out}");
        assert!(out.contains("interned type hit"), "{out}");
    }
}
