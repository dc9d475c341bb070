//! End-to-end emission of C translation units.

use cemit::{
    Context, DeclSink, DirectiveSink, Emit, ScopeSink, SourceFile, StmtSink, TypeDeclSink, Value,
};

#[test]
fn test_main_returning_zero() {
    let mut cx = Context::c();
    let file = SourceFile::new(&mut cx);
    let int = cx.type_int();
    let main = cx
        .top_level(file.first_top_level())
        .def_func("main", int, [], false);
    let body = main.body(&mut cx);
    let zero = cx.expr_int(0);
    cx.func_scope(body).stmt_return(zero);

    assert_eq!(main.to_code(&cx), "int main(){return 0;}");
    assert_eq!(file.to_code(&cx), "int main(){return 0;}\n\n");
}

#[test]
fn test_switch_with_fallthrough() {
    let mut cx = Context::c();
    let int = cx.type_int();
    let func = cx.decl_func("f", int, [], false);
    let body = func.body(&mut cx);
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
fn test_complete_unit() {
    let mut cx = Context::c();
    let file = SourceFile::new(&mut cx);
    let top = file.first_top_level();
    let int = cx.type_int();
    let float = cx.type_float();
    let void = cx.type_void();

    cx.top_level(top).include_system("stdio.h");

    let shape = cx.top_level(top).def_struct("s");
    let members = shape.members(&mut cx);
    let mut fields = cx.member_scope(members);
    fields.def_var("member1", int, None);
    fields.def_var("member2", float, None);

    let tag = cx.top_level(top).def_enum("e");
    let one = cx.expr_int(1);
    tag.def_member(&mut cx, "A", one);
    tag.def_member(&mut cx, "B", None);

    let a = cx.decl_var("a", int, None);
    let b = cx.decl_var("b", int, None);
    let add = cx.top_level(top).def_func_declare("add", int, [a, b], false);

    let no_params = cx.decl_var("", void, None);
    let main = cx.top_level(top).def_func("main", int, [no_params], false);
    let body = main.body(&mut cx);
    let printf = cx.expr_raw("printf");
    let format = cx.expr_str("%d\\n");
    let sum = cx.ex_call(add.id(), [Value::from(1), Value::from(2)]);
    let mut f = cx.func_scope(body);
    f.stmt_call(printf, [format, sum]);
    let zero = f.cx().expr_int(0);
    f.stmt_return(zero);

    let add_body = add.body(&mut cx);
    let total = cx.ex_binary(a, "+", b);
    cx.func_scope(add_body).stmt_return(total);
    cx.top_level(top).def_func_define(add);

    assert_eq!(
        file.to_code(&cx),
        "\n#include <stdio.h>\n\n\
         struct s{int member1;float member2;};\n\
         enum e{A=1,B,};\n\
         int add(int a,int b);\n\
         int main(void){printf(\"%d\\n\",(add(1,2)));return 0;}\n\
         int add(int a,int b){return (a+b);}\n\n"
    );
}

#[test]
fn test_header_guard() {
    let mut cx = Context::c();
    let file = SourceFile::new(&mut cx);
    let int = cx.type_int();
    let guard = cx
        .top_level(file.first_top_level())
        .directive_ifndef("POINT_H");
    let inner = guard.then(&cx);
    let mut body = cx.top_level(inner);
    body.def_macro_flag("POINT_H");
    let point = body.def_struct("point");
    let members = point.members(&mut cx);
    cx.member_scope(members).def_var("x", int, None);

    assert_eq!(
        file.to_code(&cx),
        "\n#ifndef POINT_H\n\n#define POINT_H\n\nstruct point{int x;};\n\n#endif\n\n\n"
    );
}

#[test]
fn test_variadic_function_with_va_list() {
    let mut cx = Context::c();
    let int = cx.type_int();
    let char_ty = cx.type_char();
    let fmt_ty = cx.type_pointer(char_ty);
    let fmt = cx.decl_var("fmt", fmt_ty, None);
    let func = cx.decl_func("log_all", int, [fmt], true);
    let body = func.body(&mut cx);

    let mut f = cx.func_scope(body);
    let args = f.stmt_va_list("args");
    let cx_ref = f.cx();
    let args_ref = cx_ref.expr_var(args);
    let fmt_ref = cx_ref.expr_var(fmt);
    let next = cx_ref.expr_va_arg(args_ref, int);
    f.stmt_va_start(args_ref, fmt_ref);
    let first = f.def_var("first", int, next);
    f.stmt_va_end(args_ref);
    let result = f.cx().ex(first);
    f.stmt_return(result);

    assert_eq!(
        func.to_code(&cx),
        "int log_all(char* fmt,...){va_list args;va_start(args,fmt);\
         int first=va_arg(args,int);va_end(args);return first;}"
    );
}

#[test]
fn test_always_parenthesize_nested() {
    let mut cx = Context::c();
    let inner = cx.ex_binary("x", "+", 1);
    let negated = cx.ex_unary("-", inner);
    let outer = cx.ex_binary(negated, "*", "y");
    let indexed = cx.ex_idx("grid", [Value::from(outer), Value::from(0)]);

    for expr in [inner, negated, outer, indexed] {
        let code = expr.to_code(&cx);
        assert!(code.starts_with('(') && code.ends_with(')'), "{code}");
    }
    assert_eq!(outer.to_code(&cx), "(((-((x+1))))*y)");
}
