//! Expression nodes.
//!
//! Every expression factory allocates a fresh node, literals included.

use cemit_core::{CodeWriter, escape_string, format_fixed, quote_char};

use crate::{
    Context, Emit,
    id::{DeclId, ExprId, NodeRef, TypeId, typed_handle},
    name::QualName,
    scope::{FuncScopeId, ScopeHandle, ScopeKind},
    ty::TemplateArg,
};

/// A lambda capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// `name`
    ByValue(String),
    /// `&name`
    ByRef(String),
    /// `=`
    AllByValue,
    /// `&`
    AllByRef,
    /// `this`
    This,
}

impl Capture {
    pub fn by_value(name: impl Into<String>) -> Self {
        Self::ByValue(name.into())
    }

    pub fn by_ref(name: impl Into<String>) -> Self {
        Self::ByRef(name.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaData {
    pub captures: Vec<Capture>,
    pub params: Vec<DeclId>,
    pub variadic: bool,
    pub ret: Option<TypeId>,
    pub body: FuncScopeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewData {
    pub ty: TypeId,
    pub args: Vec<ExprId>,
    /// `{args}` instead of `(args)`.
    pub list_init: bool,
    pub array_size: Option<ExprId>,
    pub placement: Option<ExprId>,
}

/// Shape of a C++17 fold expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// `( ... op pack)`
    UnaryLeft,
    /// `(pack op ... )`
    UnaryRight,
    /// `(init op ... op pack)`
    BinaryLeft(ExprId),
    /// `(pack op ... op init)`
    BinaryRight(ExprId),
}

/// One branch of a `_Generic` selection; `ty` is `None` for `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericAssoc {
    pub ty: Option<TypeId>,
    pub value: ExprId,
}

/// Every expression shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Raw(String),
    Var(DeclId),
    /// A type in expression position, e.g. the operand of `sizeof`.
    Type(TypeId),
    Subscript {
        base: ExprId,
        index: ExprId,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Unary {
        op: String,
        operand: ExprId,
        prefix: bool,
    },
    Binary {
        op: String,
        lhs: ExprId,
        rhs: ExprId,
    },
    Ternary {
        cond: ExprId,
        then: ExprId,
        otherwise: ExprId,
    },
    Cast {
        ty: TypeId,
        operand: ExprId,
    },
    Paren(ExprId),
    InitList(Vec<ExprId>),
    DesignatedInit(Vec<(String, ExprId)>),
    Generic {
        control: ExprId,
        assocs: Vec<GenericAssoc>,
    },
    QualName(QualName),
    Lambda(LambdaData),
    New(NewData),
    Delete {
        operand: ExprId,
        array: bool,
    },
    UserLiteral {
        operand: ExprId,
        suffix: String,
    },
    Instantiation {
        template: DeclId,
        args: Vec<TemplateArg>,
    },
    PackExpansion(ExprId),
    Fold {
        op: String,
        pack: ExprId,
        fold: Fold,
    },
}

typed_handle!(
    /// A C++ lambda expression.
    Lambda(ExprId)
);

typed_handle!(
    /// A C11 `_Generic` selection.
    GenericSelection(ExprId)
);

// =============================================================================
// Factories
// =============================================================================

impl Context {
    /// An expression emitted verbatim. Never deduplicated.
    pub fn expr_raw(&mut self, text: impl Into<String>) -> ExprId {
        self.alloc_expr(ExprKind::Raw(text.into()))
    }

    pub fn expr_int(&mut self, value: i32) -> ExprId {
        self.expr_raw(value.to_string())
    }

    pub fn expr_uint(&mut self, value: u32) -> ExprId {
        self.expr_raw(format!("{value}u"))
    }

    pub fn expr_long(&mut self, value: i64) -> ExprId {
        self.expr_raw(format!("{value}l"))
    }

    pub fn expr_ulong(&mut self, value: u64) -> ExprId {
        self.expr_raw(format!("{value}ul"))
    }

    pub fn expr_llong(&mut self, value: i64) -> ExprId {
        self.expr_raw(format!("{value}ll"))
    }

    pub fn expr_ullong(&mut self, value: u64) -> ExprId {
        self.expr_raw(format!("{value}ull"))
    }

    pub fn expr_float(&mut self, value: f32) -> ExprId {
        self.expr_raw(format!("{}f", format_fixed(f64::from(value))))
    }

    pub fn expr_double(&mut self, value: f64) -> ExprId {
        self.expr_raw(format_fixed(value))
    }

    pub fn expr_char(&mut self, value: char) -> ExprId {
        self.expr_raw(quote_char(value))
    }

    /// `"text"` with the contents emitted as given.
    pub fn expr_str(&mut self, text: &str) -> ExprId {
        self.expr_raw(format!("\"{text}\""))
    }

    /// `"text"` with quotes, backslashes and control characters escaped.
    pub fn expr_str_escaped(&mut self, text: &str) -> ExprId {
        self.expr_raw(format!("\"{}\"", escape_string(text)))
    }

    /// `1`/`0` in C, `true`/`false` in C++.
    pub fn expr_bool(&mut self, value: bool) -> ExprId {
        let text = match (self.is_cxx(), value) {
            (true, true) => "true",
            (true, false) => "false",
            (false, true) => "1",
            (false, false) => "0",
        };
        self.expr_raw(text)
    }

    /// `((void*)0)` in C, `nullptr` in C++.
    pub fn expr_null(&mut self) -> ExprId {
        let text = if self.is_cxx() { "nullptr" } else { "((void*)0)" };
        self.expr_raw(text)
    }

    /// A reference to a declared entity, rendered as its name.
    pub fn expr_var(&mut self, decl: DeclId) -> ExprId {
        let decl = self.claim(decl);
        self.alloc_expr(ExprKind::Var(decl))
    }

    pub fn expr_type(&mut self, ty: TypeId) -> ExprId {
        let ty = self.claim(ty);
        self.alloc_expr(ExprKind::Type(ty))
    }

    pub fn expr_subscript(&mut self, base: ExprId, index: ExprId) -> ExprId {
        let (base, index) = (self.claim(base), self.claim(index));
        self.alloc_expr(ExprKind::Subscript { base, index })
    }

    pub fn expr_call(&mut self, callee: ExprId, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        let callee = self.claim(callee);
        let args = self.claim_all(args);
        self.alloc_expr(ExprKind::Call { callee, args })
    }

    pub fn expr_unary(&mut self, op: impl Into<String>, operand: ExprId) -> ExprId {
        let operand = self.claim(operand);
        self.alloc_expr(ExprKind::Unary {
            op: op.into(),
            operand,
            prefix: true,
        })
    }

    pub fn expr_postfix(&mut self, operand: ExprId, op: impl Into<String>) -> ExprId {
        let operand = self.claim(operand);
        self.alloc_expr(ExprKind::Unary {
            op: op.into(),
            operand,
            prefix: false,
        })
    }

    pub fn expr_binary(&mut self, lhs: ExprId, op: impl Into<String>, rhs: ExprId) -> ExprId {
        let (lhs, rhs) = (self.claim(lhs), self.claim(rhs));
        self.alloc_expr(ExprKind::Binary {
            op: op.into(),
            lhs,
            rhs,
        })
    }

    pub fn expr_ternary(&mut self, cond: ExprId, then: ExprId, otherwise: ExprId) -> ExprId {
        let cond = self.claim(cond);
        let (then, otherwise) = (self.claim(then), self.claim(otherwise));
        self.alloc_expr(ExprKind::Ternary {
            cond,
            then,
            otherwise,
        })
    }

    pub fn expr_cast(&mut self, ty: TypeId, operand: ExprId) -> ExprId {
        let (ty, operand) = (self.claim(ty), self.claim(operand));
        self.alloc_expr(ExprKind::Cast { ty, operand })
    }

    pub fn expr_paren(&mut self, inner: ExprId) -> ExprId {
        let inner = self.claim(inner);
        self.alloc_expr(ExprKind::Paren(inner))
    }

    pub fn expr_init_list(&mut self, items: impl IntoIterator<Item = ExprId>) -> ExprId {
        let items = self.claim_all(items);
        self.alloc_expr(ExprKind::InitList(items))
    }

    /// `{.field=value,...}`.
    pub fn expr_designated_init<S: Into<String>>(
        &mut self,
        fields: impl IntoIterator<Item = (S, ExprId)>,
    ) -> ExprId {
        let fields = fields
            .into_iter()
            .map(|(n, e)| (n.into(), self.claim(e)))
            .collect();
        self.alloc_expr(ExprKind::DesignatedInit(fields))
    }

    /// `_Generic(control,...)`; associations are added on the handle.
    pub fn expr_generic(&mut self, control: ExprId) -> GenericSelection {
        self.require_c("_Generic selection");
        let control = self.claim(control);
        GenericSelection(self.alloc_expr(ExprKind::Generic {
            control,
            assocs: Vec::new(),
        }))
    }

    /// `a::b::c`.
    pub fn expr_qual_name(&mut self, name: impl Into<QualName>) -> ExprId {
        self.require_cxx("qualified name");
        self.alloc_expr(ExprKind::QualName(name.into()))
    }

    /// `[captures](params)->ret{body}`; the body scope is created eagerly.
    pub fn expr_lambda(
        &mut self,
        captures: impl IntoIterator<Item = Capture>,
        params: impl IntoIterator<Item = DeclId>,
        variadic: bool,
        ret: Option<TypeId>,
    ) -> Lambda {
        self.require_cxx("lambda");
        let params = self.claim_all(params);
        let ret = ret.map(|ty| self.claim(ty));
        let body = FuncScopeId::alloc(self, ScopeKind::Function);
        Lambda(self.alloc_expr(ExprKind::Lambda(LambdaData {
            captures: captures.into_iter().collect(),
            params,
            variadic,
            ret,
            body,
        })))
    }

    /// `new T(args)`.
    pub fn expr_new(&mut self, ty: TypeId, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        self.expr_new_with(NewData {
            ty,
            args: args.into_iter().collect(),
            list_init: false,
            array_size: None,
            placement: None,
        })
    }

    /// `new`, with placement, array size or list initialization.
    pub fn expr_new_with(&mut self, data: NewData) -> ExprId {
        self.require_cxx("new expression");
        let data = NewData {
            ty: self.claim(data.ty),
            args: self.claim_all(data.args),
            array_size: data.array_size.map(|e| self.claim(e)),
            placement: data.placement.map(|e| self.claim(e)),
            list_init: data.list_init,
        };
        self.alloc_expr(ExprKind::New(data))
    }

    pub fn expr_delete(&mut self, operand: ExprId, array: bool) -> ExprId {
        self.require_cxx("delete expression");
        let operand = self.claim(operand);
        self.alloc_expr(ExprKind::Delete { operand, array })
    }

    /// `operand_suffix`, a user-defined literal.
    pub fn expr_user_literal(&mut self, operand: ExprId, suffix: impl Into<String>) -> ExprId {
        self.require_cxx("user-defined literal");
        let operand = self.claim(operand);
        self.alloc_expr(ExprKind::UserLiteral {
            operand,
            suffix: suffix.into(),
        })
    }

    pub fn expr_instantiation(
        &mut self,
        template: DeclId,
        args: impl IntoIterator<Item = TemplateArg>,
    ) -> ExprId {
        self.require_cxx("template instantiation");
        let template = self.claim(template);
        let args = self.claim_args(args);
        self.alloc_expr(ExprKind::Instantiation { template, args })
    }

    pub fn expr_raw_instantiation(
        &mut self,
        name: impl Into<QualName>,
        args: impl IntoIterator<Item = TemplateArg>,
    ) -> ExprId {
        let template = self.decl_raw_template(name);
        self.expr_instantiation(template, args)
    }

    /// `pack...`.
    pub fn expr_pack_expansion(&mut self, pack: ExprId) -> ExprId {
        self.require_cxx("pack expansion");
        let pack = self.claim(pack);
        self.alloc_expr(ExprKind::PackExpansion(pack))
    }

    pub fn expr_fold(&mut self, op: impl Into<String>, pack: ExprId, fold: Fold) -> ExprId {
        self.require_cxx("fold expression");
        let pack = self.claim(pack);
        let fold = match fold {
            Fold::BinaryLeft(init) => Fold::BinaryLeft(self.claim(init)),
            Fold::BinaryRight(init) => Fold::BinaryRight(self.claim(init)),
            other => other,
        };
        self.alloc_expr(ExprKind::Fold {
            op: op.into(),
            pack,
            fold,
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    pub fn expr_addr(&mut self, operand: ExprId) -> ExprId {
        self.expr_unary("&", operand)
    }

    pub fn expr_deref(&mut self, operand: ExprId) -> ExprId {
        self.expr_unary("*", operand)
    }

    pub fn expr_not(&mut self, operand: ExprId) -> ExprId {
        self.expr_unary("!", operand)
    }

    /// `lhs.member`.
    pub fn expr_dot(&mut self, lhs: ExprId, member: impl Into<String>) -> ExprId {
        let rhs = self.expr_raw(member);
        self.expr_binary(lhs, ".", rhs)
    }

    /// `lhs->member`.
    pub fn expr_arrow(&mut self, lhs: ExprId, member: impl Into<String>) -> ExprId {
        let rhs = self.expr_raw(member);
        self.expr_binary(lhs, "->", rhs)
    }

    pub fn expr_eq(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr_binary(lhs, "==", rhs)
    }

    pub fn expr_lt(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr_binary(lhs, "<", rhs)
    }

    pub fn expr_gt(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr_binary(lhs, ">", rhs)
    }

    pub fn expr_leq(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr_binary(lhs, "<=", rhs)
    }

    pub fn expr_geq(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr_binary(lhs, ">=", rhs)
    }

    /// `sizeof(T)`.
    pub fn expr_sizeof(&mut self, ty: TypeId) -> ExprId {
        let callee = self.expr_raw("sizeof");
        let operand = self.expr_type(ty);
        self.expr_call(callee, [operand])
    }

    /// `va_arg(list,T)`.
    pub fn expr_va_arg(&mut self, list: ExprId, ty: TypeId) -> ExprId {
        let callee = self.expr_raw("va_arg");
        let ty = self.expr_type(ty);
        self.expr_call(callee, [list, ty])
    }
}

impl Lambda {
    pub fn body(self, cx: &Context) -> FuncScopeId {
        match cx.expr_node(self.0) {
            ExprKind::Lambda(data) => data.body,
            other => panic!("expected a lambda, found {other:?}"),
        }
    }
}

impl GenericSelection {
    fn assocs_mut(self, cx: &mut Context) -> &mut Vec<GenericAssoc> {
        match cx.expr_node_mut(self.0) {
            ExprKind::Generic { assocs, .. } => assocs,
            other => panic!("expected a _Generic selection, found {other:?}"),
        }
    }

    /// Append `ty:value`.
    pub fn add_assoc(self, cx: &mut Context, ty: TypeId, value: ExprId) {
        let (ty, value) = (cx.claim(ty), cx.claim(value));
        self.assocs_mut(cx).push(GenericAssoc {
            ty: Some(ty),
            value,
        });
    }

    /// Append `default:value`.
    pub fn add_default(self, cx: &mut Context, value: ExprId) {
        let value = cx.claim(value);
        self.assocs_mut(cx).push(GenericAssoc { ty: None, value });
    }
}

// =============================================================================
// Emission
// =============================================================================

impl Emit for ExprId {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        cx.emit_commented(NodeRef::Expr(*self), w, |w| emit_expr(cx, *self, w));
    }
}

impl Emit for Lambda {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.0.emit(cx, w);
    }
}

impl Emit for GenericSelection {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.0.emit(cx, w);
    }
}

fn emit_args(cx: &Context, args: &[ExprId], w: &mut CodeWriter) {
    w.push_joined(args, ",", |w, a| a.emit(cx, w));
}

fn emit_expr(cx: &Context, id: ExprId, w: &mut CodeWriter) {
    match cx.expr_node(id) {
        ExprKind::Raw(text) => {
            w.push_str(text);
        }
        ExprKind::Var(decl) => {
            w.push_str(&cx.decl_name(*decl).to_string());
        }
        ExprKind::Type(ty) => ty.emit(cx, w),
        ExprKind::Subscript { base, index } => {
            base.emit(cx, w);
            w.push_char('[');
            index.emit(cx, w);
            w.push_char(']');
        }
        ExprKind::Call { callee, args } => {
            callee.emit(cx, w);
            w.push_char('(');
            emit_args(cx, args, w);
            w.push_char(')');
        }
        ExprKind::Unary {
            op,
            operand,
            prefix,
        } => {
            if *prefix {
                w.push_str(op);
                operand.emit(cx, w);
            } else {
                operand.emit(cx, w);
                w.push_str(op);
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            lhs.emit(cx, w);
            w.push_str(op);
            rhs.emit(cx, w);
        }
        ExprKind::Ternary {
            cond,
            then,
            otherwise,
        } => {
            cond.emit(cx, w);
            w.push_char('?');
            then.emit(cx, w);
            w.push_char(':');
            otherwise.emit(cx, w);
        }
        ExprKind::Cast { ty, operand } => {
            w.push_char('(');
            ty.emit(cx, w);
            w.push_char(')');
            operand.emit(cx, w);
        }
        ExprKind::Paren(inner) => {
            w.push_char('(');
            inner.emit(cx, w);
            w.push_char(')');
        }
        ExprKind::InitList(items) => {
            w.push_char('{');
            emit_args(cx, items, w);
            w.push_char('}');
        }
        ExprKind::DesignatedInit(fields) => {
            w.push_char('{');
            w.push_joined(fields, ",", |w, (name, value)| {
                w.push_char('.');
                w.push_str(name);
                w.push_char('=');
                value.emit(cx, w);
            });
            w.push_char('}');
        }
        ExprKind::Generic { control, assocs } => {
            w.push_str("_Generic(");
            control.emit(cx, w);
            for assoc in assocs {
                w.push_char(',');
                match assoc.ty {
                    Some(ty) => ty.emit(cx, w),
                    None => {
                        w.push_str("default");
                    }
                }
                w.push_char(':');
                assoc.value.emit(cx, w);
            }
            w.push_char(')');
        }
        ExprKind::QualName(name) => {
            w.push_str(&name.to_string());
        }
        ExprKind::Lambda(data) => {
            w.push_char('[');
            w.push_joined(&data.captures, ",", |w, capture| {
                match capture {
                    Capture::ByValue(name) => w.push_str(name),
                    Capture::ByRef(name) => w.push_char('&').push_str(name),
                    Capture::AllByValue => w.push_char('='),
                    Capture::AllByRef => w.push_char('&'),
                    Capture::This => w.push_str("this"),
                };
            });
            w.push_str("](");
            w.push_joined(&data.params, ",", |w, p| p.emit(cx, w));
            if data.variadic {
                w.push_str(if data.params.is_empty() { "..." } else { ",..." });
            }
            w.push_char(')');
            if let Some(ret) = data.ret {
                w.push_str("->");
                ret.emit(cx, w);
            }
            w.push_char('{');
            data.body.emit(cx, w);
            w.push_char('}');
        }
        ExprKind::New(data) => {
            w.push_str("new ");
            if let Some(placement) = data.placement {
                w.push_char('(');
                placement.emit(cx, w);
                w.push_char(')');
            }
            data.ty.emit(cx, w);
            if let Some(size) = data.array_size {
                w.push_char('[');
                size.emit(cx, w);
                w.push_char(']');
            }
            let (open, close) = if data.list_init { ('{', '}') } else { ('(', ')') };
            w.push_char(open);
            emit_args(cx, &data.args, w);
            w.push_char(close);
        }
        ExprKind::Delete { operand, array } => {
            w.push_str(if *array { "delete [] " } else { "delete " });
            operand.emit(cx, w);
        }
        ExprKind::UserLiteral { operand, suffix } => {
            operand.emit(cx, w);
            w.push_char('_');
            w.push_str(suffix);
        }
        ExprKind::Instantiation { template, args } => {
            w.push_str(&cx.decl_name(*template).to_string());
            w.push_char('<');
            w.push_joined(args, ",", |w, arg| arg.emit(cx, w));
            w.push_char('>');
        }
        ExprKind::PackExpansion(pack) => {
            pack.emit(cx, w);
            w.push_str("...");
        }
        ExprKind::Fold { op, pack, fold } => {
            w.push_char('(');
            match fold {
                Fold::UnaryLeft => {
                    w.push_str(" ... ").push_str(op);
                    pack.emit(cx, w);
                }
                Fold::UnaryRight => {
                    pack.emit(cx, w);
                    w.push_str(op).push_str(" ... ");
                }
                Fold::BinaryLeft(init) => {
                    init.emit(cx, w);
                    w.push_str(op).push_str(" ... ").push_str(op);
                    pack.emit(cx, w);
                }
                Fold::BinaryRight(init) => {
                    pack.emit(cx, w);
                    w.push_str(op).push_str(" ... ").push_str(op);
                    init.emit(cx, w);
                }
            }
            w.push_char(')');
        }
    }
}
