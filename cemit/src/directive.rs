//! Preprocessor directives, namespaces and debugging insertions.

use std::marker::PhantomData;

use cemit_core::CodeWriter;

use crate::{
    Context, Emit,
    id::{DirectiveId, ExprId, NodeRef, ScopeId, typed_handle},
    name::QualName,
    scope::{BranchScope, MacroScopeId, ScopeHandle, ScopeKind, TopLevelId},
};

/// Opening line of a conditional.
#[derive(Debug, Clone, PartialEq)]
pub enum CondHead {
    If(ExprId),
    Ifdef(String),
    Ifndef(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalData {
    pub head: CondHead,
    pub then: ScopeId,
    pub elifs: Vec<(ExprId, ScopeId)>,
    pub otherwise: Option<ScopeId>,
    branch: ScopeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind {
    /// Emitted verbatim; also used for whitespace and comment insertions.
    Raw(String),
    Include {
        path: String,
        system: bool,
    },
    Define {
        name: String,
        value: Option<String>,
    },
    DefineFunc {
        name: String,
        params: Vec<String>,
        body: MacroScopeId,
    },
    Undef(String),
    Pragma(String),
    Conditional(ConditionalData),
    Namespace {
        name: QualName,
        body: TopLevelId,
    },
    UsingNamespace(QualName),
    Using(QualName),
}

typed_handle!(
    /// A `#define name(params) body` directive.
    MacroFunc(DirectiveId)
);

typed_handle!(
    /// A C++ `namespace name{...}` block.
    Namespace(DirectiveId)
);

/// An `#if`/`#ifdef`/`#ifndef` whose branches are scopes of kind `S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Conditional<S> {
    id: DirectiveId,
    _branch: PhantomData<S>,
}

impl Context {
    pub(crate) fn new_conditional<S: BranchScope>(&mut self, head: CondHead) -> Conditional<S> {
        let head = match head {
            CondHead::If(cond) => CondHead::If(self.claim(cond)),
            other => other,
        };
        let then = S::alloc(self, S::KIND).into();
        let id = self.alloc_directive(DirectiveKind::Conditional(ConditionalData {
            head,
            then,
            elifs: Vec::new(),
            otherwise: None,
            branch: S::KIND,
        }));
        Conditional {
            id,
            _branch: PhantomData,
        }
    }

    pub(crate) fn new_macro_func(&mut self, name: String, params: Vec<String>) -> MacroFunc {
        let body = MacroScopeId::alloc(self, ScopeKind::Macro);
        MacroFunc(self.alloc_directive(DirectiveKind::DefineFunc { name, params, body }))
    }

    pub(crate) fn new_namespace(&mut self, name: QualName) -> Namespace {
        self.require_cxx("namespace");
        let body = self.new_top_level();
        Namespace(self.alloc_directive(DirectiveKind::Namespace { name, body }))
    }

    fn conditional_data_mut(&mut self, id: DirectiveId) -> &mut ConditionalData {
        match self.directive_node_mut(id) {
            DirectiveKind::Conditional(data) => data,
            other => panic!("expected a conditional directive, found {other:?}"),
        }
    }

    fn conditional_data(&self, id: DirectiveId) -> &ConditionalData {
        match self.directive_node(id) {
            DirectiveKind::Conditional(data) => data,
            other => panic!("expected a conditional directive, found {other:?}"),
        }
    }
}

impl<S: BranchScope> Conditional<S> {
    pub fn id(self) -> DirectiveId {
        self.id
    }

    /// The branch taken when the opening condition holds.
    pub fn then(self, cx: &Context) -> S {
        S::from_raw(cx.conditional_data(self.id).then)
    }

    /// Append an `#elif cond` branch.
    pub fn add_elif(self, cx: &mut Context, cond: ExprId) -> S {
        let cond = cx.claim(cond);
        let kind = cx.conditional_data(self.id).branch;
        let branch = S::alloc(cx, kind);
        cx.conditional_data_mut(self.id)
            .elifs
            .push((cond, branch.into()));
        branch
    }

    /// The `#else` branch, created on the first call.
    pub fn otherwise(self, cx: &mut Context) -> S {
        if let Some(scope) = cx.conditional_data(self.id).otherwise {
            return S::from_raw(scope);
        }
        let kind = cx.conditional_data(self.id).branch;
        let branch = S::alloc(cx, kind);
        cx.conditional_data_mut(self.id).otherwise = Some(branch.into());
        branch
    }
}

impl<S> From<Conditional<S>> for DirectiveId {
    fn from(handle: Conditional<S>) -> Self {
        handle.id
    }
}

impl MacroFunc {
    pub fn body(self, cx: &Context) -> MacroScopeId {
        match cx.directive_node(self.0) {
            DirectiveKind::DefineFunc { body, .. } => *body,
            other => panic!("expected a function-like macro, found {other:?}"),
        }
    }
}

impl Namespace {
    pub fn body(self, cx: &Context) -> TopLevelId {
        match cx.directive_node(self.0) {
            DirectiveKind::Namespace { body, .. } => *body,
            other => panic!("expected a namespace, found {other:?}"),
        }
    }
}

// =============================================================================
// Emission
// =============================================================================

impl Emit for DirectiveId {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        cx.emit_commented(NodeRef::Directive(*self), w, |w| {
            emit_directive(cx, *self, w)
        });
    }
}

impl<S> Emit for Conditional<S> {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.id.emit(cx, w);
    }
}

impl Emit for MacroFunc {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.0.emit(cx, w);
    }
}

impl Emit for Namespace {
    fn emit(&self, cx: &Context, w: &mut CodeWriter) {
        self.0.emit(cx, w);
    }
}

/// `\n#keyword rest\n`
fn emit_line(w: &mut CodeWriter, keyword: &str, rest: &str) {
    w.push_newline();
    w.push_char('#').push_str(keyword);
    if !rest.is_empty() {
        w.push_char(' ').push_str(rest);
    }
    w.push_newline();
}

fn emit_directive(cx: &Context, id: DirectiveId, w: &mut CodeWriter) {
    match cx.directive_node(id) {
        DirectiveKind::Raw(text) => {
            w.push_str(text);
        }
        DirectiveKind::Include { path, system } => {
            let quoted = if *system {
                format!("<{path}>")
            } else {
                format!("\"{path}\"")
            };
            emit_line(w, "include", &quoted);
        }
        DirectiveKind::Define { name, value } => match value {
            Some(value) => emit_line(w, "define", &format!("{name} {value}")),
            None => emit_line(w, "define", name),
        },
        DirectiveKind::DefineFunc { name, params, body } => {
            w.push_str("\n#define ").push_str(name).push_char('(');
            w.push_joined(params, ",", |w, p| {
                w.push_str(p);
            });
            w.push_str(") ");
            body.emit(cx, w);
            w.push_newline();
        }
        DirectiveKind::Undef(name) => emit_line(w, "undef", name),
        DirectiveKind::Pragma(text) => emit_line(w, "pragma", text),
        DirectiveKind::Conditional(data) => {
            match &data.head {
                CondHead::If(cond) => {
                    w.push_str("\n#if ");
                    cond.emit(cx, w);
                    w.push_newline();
                }
                CondHead::Ifdef(name) => {
                    w.push_str("\n#ifdef ").push_str(name).push_newline();
                }
                CondHead::Ifndef(name) => {
                    w.push_str("\n#ifndef ").push_str(name).push_newline();
                }
            }
            data.then.emit(cx, w);
            for (cond, branch) in &data.elifs {
                w.push_str("\n#elif ");
                cond.emit(cx, w);
                w.push_newline();
                branch.emit(cx, w);
            }
            if let Some(otherwise) = data.otherwise {
                w.push_str("\n#else\n");
                otherwise.emit(cx, w);
            }
            w.push_str("\n#endif\n");
        }
        DirectiveKind::Namespace { name, body } => {
            w.push_str("namespace ").push_str(&name.to_string());
            w.push_char('{');
            body.emit(cx, w);
            w.push_char('}');
        }
        DirectiveKind::UsingNamespace(name) => {
            w.push_str("using namespace ").push_str(&name.to_string());
            w.push_char(';');
        }
        DirectiveKind::Using(name) => {
            w.push_str("using ").push_str(&name.to_string());
            w.push_char(';');
        }
    }
}
