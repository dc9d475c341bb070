//! Arena-backed emission of C and C++ source text.
//!
//! Generator programs build a syntax tree through factory methods on a
//! [`Context`] and render it with [`Emit`]. The output is dense and
//! syntactically valid, not formatted; run a formatter over it when people
//! will read it.
//!
//! # Module Organization
//!
//! - [`context`] - The arena, dialect selection and node introspection
//! - [`ty`], [`decl`], [`expr`], [`stmt`], [`directive`] - Node families and their factories
//! - [`scope`] - Scope containers and the factory traits that append to them
//! - [`short`] - Short-form expression builder that always parenthesizes
//! - [`file`] - The translation unit facade
//!
//! # Example
//!
//! ```
//! use cemit::{Context, DirectiveSink, Emit, ScopeSink, SourceFile, StmtSink};
//!
//! let mut cx = Context::c();
//! let file = SourceFile::new(&mut cx);
//! let top = file.first_top_level();
//! cx.top_level(top).include_system("stdio.h");
//!
//! let int = cx.type_int();
//! let main = cx.top_level(top).def_func("main", int, [], false);
//! let body = main.body(&mut cx);
//! let puts = cx.expr_raw("puts");
//! let hello = cx.expr_str("hello");
//! let mut f = cx.func_scope(body);
//! f.stmt_call(puts, [hello]);
//! let zero = f.cx().expr_int(0);
//! f.stmt_return(zero);
//!
//! assert_eq!(
//!     file.to_code(&cx),
//!     "\n#include <stdio.h>\n\nint main(){puts(\"hello\");return 0;}\n\n"
//! );
//! ```

pub mod context;
pub mod decl;
pub mod directive;
mod emit;
pub mod expr;
pub mod file;
pub mod id;
pub mod name;
pub mod scope;
pub mod short;
pub mod stmt;
pub mod ty;

pub use cemit_core::{File, FileRules, Overwrite, WriteResult};
pub use context::{ArenaStats, Context, Dialect, NodeComments};
pub use decl::{
    FuncDecl, FuncQualifiers, Lifecycle, MethodQualifiers, MethodSpecial, Templated,
    VarQualifiers,
};
pub use directive::{Conditional, MacroFunc, Namespace};
pub use emit::Emit;
pub use expr::{Capture, Fold, GenericSelection, Lambda, NewData};
pub use file::SourceFile;
pub use id::{DeclId, DirectiveId, ExprId, ScopeId, StmtId, TypeId};
pub use name::QualName;
pub use scope::{
    DeclSink, DirectiveSink, FuncScope, FuncScopeId, MacroScope, MacroScopeId, MemberScope,
    MemberScopeId, ScopeSink, StmtSink, TopLevel, TopLevelId, TypeDeclSink,
};
pub use short::Value;
pub use stmt::{CaseStmt, IfStmt, LoopStmt, SwitchStmt, TryStmt};
pub use ty::{Access, AggregateKind, ClassType, EnumKey, EnumType, TemplateArg};
