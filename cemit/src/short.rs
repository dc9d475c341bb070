//! Short-form expression builder.
//!
//! Converts plain Rust values and declared entities into expression nodes.
//! Every compound expression built here is wrapped in parentheses, and so
//! is every already-built expression passed in as an operand. The output is
//! never minimal, but nesting can never change operator precedence.
//!
//! ```
//! use cemit::{Context, Emit};
//!
//! let mut cx = Context::c();
//! let inner = cx.ex_binary(1, "+", 2);
//! let outer = cx.ex_binary(inner, "*", 3);
//! assert_eq!(outer.to_code(&cx), "(((1+2))*3)");
//! ```

use crate::{
    Context,
    id::{DeclId, ExprId},
    name::QualName,
};

/// A value the short-form builder knows how to turn into an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    LongLong(i64),
    ULongLong(u64),
    Float(f32),
    Double(f64),
    Char(char),
    /// A bare name, emitted verbatim.
    Ident(String),
    /// C++ qualified name.
    QualName(QualName),
    /// An already-built expression; wrapped in parentheses.
    Expr(ExprId),
    /// A reference to a declared variable or function.
    Var(DeclId),
    /// The null pointer constant of the dialect.
    Null,
}

impl Value {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn qual_name(name: impl Into<QualName>) -> Self {
        Self::QualName(name.into())
    }
}

macro_rules! value_from {
    ($($source:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

value_from!(
    bool => Bool as bool,
    i8 => Int as i32,
    i16 => Int as i32,
    i32 => Int as i32,
    u8 => UInt as u32,
    u16 => UInt as u32,
    u32 => UInt as u32,
    i64 => LongLong as i64,
    u64 => ULongLong as u64,
    f32 => Float as f32,
    f64 => Double as f64,
    char => Char as char,
    String => Ident as String,
    &str => Ident as String,
    QualName => QualName as QualName,
    ExprId => Expr as ExprId,
    DeclId => Var as DeclId,
);

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Self::Long(value as i64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::ULong(value as u64)
    }
}

impl Context {
    /// Build an expression from a value.
    ///
    /// Literals get the suffix of their width, names render verbatim,
    /// variables become references and existing expressions are wrapped
    /// in parentheses.
    pub fn ex(&mut self, value: impl Into<Value>) -> ExprId {
        match value.into() {
            Value::Bool(v) => self.expr_bool(v),
            Value::Int(v) => self.expr_int(v),
            Value::UInt(v) => self.expr_uint(v),
            Value::Long(v) => self.expr_long(v),
            Value::ULong(v) => self.expr_ulong(v),
            Value::LongLong(v) => self.expr_llong(v),
            Value::ULongLong(v) => self.expr_ullong(v),
            Value::Float(v) => self.expr_float(v),
            Value::Double(v) => self.expr_double(v),
            Value::Char(v) => self.expr_char(v),
            Value::Ident(name) => self.expr_raw(name),
            Value::QualName(name) => self.expr_qual_name(name),
            Value::Expr(expr) => {
                let expr = self.claim(expr);
                self.expr_paren(expr)
            }
            Value::Var(decl) => self.expr_var(decl),
            Value::Null => self.expr_null(),
        }
    }

    /// A string literal; the text is emitted as given between quotes.
    pub fn ex_str(&mut self, text: &str) -> ExprId {
        self.expr_str(text)
    }

    /// `(op operand)`
    pub fn ex_unary(&mut self, op: &str, operand: impl Into<Value>) -> ExprId {
        let operand = self.ex(operand);
        let unary = self.expr_unary(op, operand);
        self.expr_paren(unary)
    }

    /// `(operand op)`
    pub fn ex_postfix(&mut self, operand: impl Into<Value>, op: &str) -> ExprId {
        let operand = self.ex(operand);
        let postfix = self.expr_postfix(operand, op);
        self.expr_paren(postfix)
    }

    /// `(lhs op rhs)`
    pub fn ex_binary(&mut self, lhs: impl Into<Value>, op: &str, rhs: impl Into<Value>) -> ExprId {
        let lhs = self.ex(lhs);
        let rhs = self.ex(rhs);
        let binary = self.expr_binary(lhs, op, rhs);
        self.expr_paren(binary)
    }

    /// `(callee(args))`
    pub fn ex_call(
        &mut self,
        callee: impl Into<Value>,
        args: impl IntoIterator<Item = Value>,
    ) -> ExprId {
        let callee = self.ex(callee);
        let args: Vec<ExprId> = args.into_iter().map(|arg| self.ex(arg)).collect();
        let call = self.expr_call(callee, args);
        self.expr_paren(call)
    }

    /// `(base[i][j])`
    pub fn ex_idx(
        &mut self,
        base: impl Into<Value>,
        indices: impl IntoIterator<Item = Value>,
    ) -> ExprId {
        let mut expr = self.ex(base);
        for index in indices {
            let index = self.ex(index);
            expr = self.expr_subscript(expr, index);
        }
        self.expr_paren(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Emit;

    #[test]
    fn test_literal_suffixes() {
        let mut cx = Context::c();
        let cases = [
            (Value::from(7), "7"),
            (Value::from(7u32), "7u"),
            (Value::from(7isize), "7l"),
            (Value::from(7usize), "7ul"),
            (Value::from(7i64), "7ll"),
            (Value::from(7u64), "7ull"),
            (Value::from(2.0f32), "2.000000f"),
            (Value::from(0.5), "0.500000"),
            (Value::from('a'), "'a'"),
            (Value::from(true), "1"),
            (Value::from("argc"), "argc"),
            (Value::Null, "((void*)0)"),
        ];
        for (value, expected) in cases {
            let expr = cx.ex(value);
            assert_eq!(expr.to_code(&cx), expected);
        }
    }

    #[test]
    fn test_existing_expression_is_parenthesized() {
        let mut cx = Context::c();
        let raw = cx.expr_raw("a+b");
        let wrapped = cx.ex(raw);
        assert_eq!(wrapped.to_code(&cx), "(a+b)");
    }

    #[test]
    fn test_compound_forms_always_parenthesize() {
        let mut cx = Context::c();
        let int = cx.type_int();
        let x = cx.decl_var("x", int, None);

        let not = cx.ex_unary("!", 0);
        let post = cx.ex_postfix(x, "++");
        let cmp = cx.ex_binary("argc", ">", 1);
        let call = cx.ex_call("func", [Value::from(1), Value::from(x)]);
        let idx = cx.ex_idx("arr", [Value::from(0), Value::from(1)]);
        let string = cx.ex_str("hi");

        assert_eq!(not.to_code(&cx), "(!0)");
        assert_eq!(post.to_code(&cx), "(x++)");
        assert_eq!(cmp.to_code(&cx), "(argc>1)");
        assert_eq!(call.to_code(&cx), "(func(1,x))");
        assert_eq!(idx.to_code(&cx), "(arr[0][1])");
        assert_eq!(string.to_code(&cx), "\"hi\"");
    }

    #[test]
    fn test_nesting_keeps_outer_parentheses() {
        let mut cx = Context::c();
        let mut expr = cx.ex_binary(1, "+", 2);
        for depth in 0..8 {
            expr = if depth % 2 == 0 {
                cx.ex_binary(expr, "*", depth)
            } else {
                cx.ex_unary("-", expr)
            };
            let text = expr.to_code(&cx);
            assert!(text.starts_with('(') && text.ends_with(')'), "{text}");
        }
    }

    #[test]
    fn test_qualified_name_value() {
        let mut cx = Context::cxx();
        let name = cx.ex(Value::qual_name(["std", "size_t"]));
        let truth = cx.ex(true);
        assert_eq!(name.to_code(&cx), "std::size_t");
        assert_eq!(truth.to_code(&cx), "true");
    }
}
