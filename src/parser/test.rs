use super::ast::*;
use super::printer::{reconstruct, to_sexp};
use super::visit::{SyntaxNode, walk};
use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind};
use crate::lexer::{self, NumberLiteral, Radix};
use crate::utils::Span;
use crate::{ParseOptions, parse, parse_with_options};

/// 辅助函数，用于测试成功解析的场景。
/// 如果出现任何诊断就会 panic，否则返回 AST。
fn parse_ok(source: &str) -> Program {
    let output = parse(source, Some("test.mo"));
    assert!(
        output.diagnostics.is_empty(),
        "Parser failed unexpectedly for source: {}\n{:#?}",
        source,
        output.diagnostics
    );
    output.program
}

/// 辅助函数，用于测试解析失败的场景。返回（部分的）AST 和所有诊断。
fn parse_fail(source: &str) -> (Program, Vec<Diagnostic>) {
    let output = parse(source, Some("test.mo"));
    assert!(
        !output.diagnostics.is_empty(),
        "Expected diagnostics for source: {}",
        source
    );
    (output.program, output.diagnostics)
}

fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
    diagnostics.iter().map(|d| d.kind()).collect()
}

/// 取出第 `index` 个顶层声明，它必须是函数。
fn function(program: &Program, index: usize) -> &FnDecl {
    match &program.declarations[index].kind {
        Declaration::Fn(func) => func,
        other => panic!("Declaration {} is not a function: {:?}", index, other),
    }
}

/// 把若干行语句包进一个函数里解析，返回函数体中的语句。
fn parse_statements(body: &str) -> Vec<Node<Statement>> {
    let source = format!("fn main() {{\n{}\n}}", body);
    let program = parse_ok(&source);
    function(&program, 0).body.kind.statements.clone()
}

fn parse_statement(body: &str) -> Statement {
    let mut statements = parse_statements(body);
    assert_eq!(statements.len(), 1, "Expected exactly one statement in {:?}", body);
    statements.remove(0).kind
}

/// 通过 `ret <expr>` 解析一个表达式。
fn parse_expr(expr: &str) -> Node<Expression> {
    match parse_statement(&format!("ret {}", expr)) {
        Statement::Ret(RetStatement { value: Some(value) }) => value,
        other => panic!("Expected a ret statement with a value, got {:?}", other),
    }
}

/// 通过结构体字段解析一个类型。
fn parse_type(ty: &str) -> Node<TypeExpr> {
    let program = parse_ok(&format!("struct S {{ f {} }}", ty));
    match &program.declarations[0].kind {
        Declaration::Struct(s) => s.fields[0].kind.field_type.clone(),
        other => panic!("Expected a struct, got {:?}", other),
    }
}

fn binary(expr: &Expression) -> &BinaryExpression {
    match expr {
        Expression::Equality(b) | Expression::Comparison(b) | Expression::Term(b) | Expression::Factor(b) => b,
        other => panic!("Expected a binary expression, got {:?}", other),
    }
}

fn decimal(digits: &str) -> LiteralValue {
    LiteralValue::Number(NumberLiteral {
        radix: Radix::Decimal,
        fractional: false,
        digits: digits.to_string(),
    })
}

fn variable_name(expr: &Expression) -> &str {
    match expr {
        Expression::Variable(IdentOrPath::Identifier(ident)) => &ident.name,
        other => panic!("Expected a variable, got {:?}", other),
    }
}

// --- 成功路径测试 (Happy Path) ---

#[test]
fn test_complete_program() {
    let source = r#"use std:io "io"
use std:mem

// 一个点
struct Point {
    x i32, y i32
    tag *u8,
}

fn add(a i32, b i32) i32 {
    ret a + b
}

fn main()
{
    p Point := make()
    io:print(add(1, 2))
}
"#;
    let program = parse_ok(source);

    assert_eq!(program.declarations.len(), 5);
    assert_eq!(program.span, Span::new(0, source.len()));

    match &program.declarations[0].kind {
        Declaration::Use(decl) => {
            let names: Vec<_> = decl.path.segments.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["std", "io"]);
            assert_eq!(decl.alias.as_ref().map(|a| a.kind.as_str()), Some("io"));
        }
        other => panic!("Expected a use declaration, got {:?}", other),
    }
    assert!(matches!(&program.declarations[1].kind, Declaration::Use(UseDecl { alias: None, .. })));

    if let Declaration::Struct(s) = &program.declarations[2].kind {
        assert_eq!(s.name.name, "Point");
        let fields: Vec<_> = s.fields.iter().map(|f| f.kind.name.name.as_str()).collect();
        assert_eq!(fields, vec!["x", "y", "tag"]);
        assert!(matches!(s.fields[2].kind.field_type.kind, TypeExpr::Pointer(_)));
    } else {
        panic!("Third declaration was not a struct.");
    }

    let add = function(&program, 3);
    assert_eq!(add.name.name, "add");
    assert_eq!(add.params.len(), 2);
    assert!(add.return_type.is_some());
    assert_eq!(add.body.kind.statements.len(), 1);

    let main = function(&program, 4);
    assert!(main.params.is_empty());
    assert!(main.return_type.is_none());
    assert_eq!(main.body.kind.statements.len(), 2);
}

#[test]
fn test_term_wraps_factor() {
    // `1 + 2 * 3`：乘法是加法右操作数的子节点
    let expr = parse_expr("1 + 2 * 3");
    let Expression::Term(term) = &expr.kind else {
        panic!("Expected a term expression, got {:?}", expr.kind);
    };
    assert_eq!(term.operator.kind, BinaryOperator::Add);
    assert_eq!(term.left.kind, Expression::Literal(decimal("1")));

    let Expression::Factor(factor) = &term.right.kind else {
        panic!("Expected a factor expression on the right, got {:?}", term.right.kind);
    };
    assert_eq!(factor.operator.kind, BinaryOperator::Mul);
}

#[test]
fn test_bitwise_shares_tier_with_multiplication() {
    // `8 / 2 & 1` 是 `(8 / 2) & 1`
    let expr = parse_expr("8 / 2 & 1");
    let Expression::Factor(outer) = &expr.kind else {
        panic!("Expected a factor expression, got {:?}", expr.kind);
    };
    assert_eq!(outer.operator.kind, BinaryOperator::BitAnd);
    assert_eq!(outer.right.kind, Expression::Literal(decimal("1")));

    let Expression::Factor(inner) = &outer.left.kind else {
        panic!("Expected the division on the left, got {:?}", outer.left.kind);
    };
    assert_eq!(inner.operator.kind, BinaryOperator::Div);
    assert_eq!(inner.left.kind, Expression::Literal(decimal("8")));
}

#[test]
fn test_comparison_and_equality_tiers() {
    let expr = parse_expr("a == b < c << 1");
    let eq = binary(&expr.kind);
    assert!(matches!(expr.kind, Expression::Equality(_)));
    assert_eq!(variable_name(&eq.left.kind), "a");

    let cmp = binary(&eq.right.kind);
    assert!(matches!(eq.right.kind, Expression::Comparison(_)));
    assert_eq!(cmp.operator.kind, BinaryOperator::Lt);
    assert!(matches!(cmp.right.kind, Expression::Factor(_)));
}

#[test]
fn test_infix_operator_allows_line_break() {
    let expr = parse_expr("1 +\n    2");
    assert!(matches!(expr.kind, Expression::Term(_)));
}

#[test]
fn test_prefix_and_infix_ampersand_and_star() {
    // 前缀 `&`/`*` 是取地址和解引用，中缀 `*` 是乘法
    let expr = parse_expr("&a * *b");
    let factor = binary(&expr.kind);
    assert_eq!(factor.operator.kind, BinaryOperator::Mul);

    let Expression::Unary(left) = &factor.left.kind else {
        panic!("Expected a unary expression, got {:?}", factor.left.kind);
    };
    assert_eq!(left.operator.kind, UnaryOperator::AddressOf);

    let Expression::Unary(right) = &factor.right.kind else {
        panic!("Expected a unary expression, got {:?}", factor.right.kind);
    };
    assert_eq!(right.operator.kind, UnaryOperator::Deref);
}

#[test]
fn test_unary_applies_to_dot_chain() {
    let expr = parse_expr("-p.x");
    let Expression::Unary(unary) = &expr.kind else {
        panic!("Expected a unary expression, got {:?}", expr.kind);
    };
    assert_eq!(unary.operator.kind, UnaryOperator::Negate);
    assert!(matches!(unary.operand.kind, Expression::Dot(_)));
}

#[test]
fn test_dot_chain_suffixes() {
    let expr = parse_expr("list.items.get(1, 2).len");
    let Expression::Dot(dot) = &expr.kind else {
        panic!("Expected a dot expression, got {:?}", expr.kind);
    };
    assert_eq!(variable_name(&dot.receiver.kind), "list");
    assert_eq!(dot.suffixes.len(), 3);
    assert!(matches!(&dot.suffixes[0].kind, DotSuffix::Field(name) if name.name == "items"));
    assert!(matches!(
        &dot.suffixes[1].kind,
        DotSuffix::Call { name, arguments } if name.name == "get" && arguments.len() == 2
    ));
    assert!(matches!(&dot.suffixes[2].kind, DotSuffix::Field(name) if name.name == "len"));
}

#[test]
fn test_variable_or_call_forms() {
    assert!(matches!(parse_expr("xs[i + 1]").kind, Expression::Index(_)));
    assert!(matches!(
        parse_expr("print()").kind,
        Expression::Call(CallExpression { ref arguments, .. }) if arguments.is_empty()
    ));
    assert!(matches!(parse_expr("(x)").kind, Expression::Grouped(_)));
    assert_eq!(parse_expr("true").kind, Expression::Literal(LiteralValue::Bool(true)));
    assert_eq!(
        parse_expr("\"hi\\n\"").kind,
        Expression::Literal(LiteralValue::String("hi\n".to_string()))
    );
}

#[test]
fn test_module_path_is_distinct_from_identifiers() {
    let expr = parse_expr("a:b:c");
    let Expression::Variable(IdentOrPath::Path(path)) = &expr.kind else {
        panic!("Expected a module path, got {:?}", expr.kind);
    };
    let names: Vec<_> = path.segments.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);

    // 单个标识符不会变成只有一段的路径
    assert!(matches!(parse_expr("a").kind, Expression::Variable(IdentOrPath::Identifier(_))));

    let call = parse_expr("std:io:print(x)");
    assert!(matches!(
        call.kind,
        Expression::Call(CallExpression { callee: IdentOrPath::Path(_), .. })
    ));
}

#[test]
fn test_declaration_disambiguation() {
    match parse_statement("x := 5") {
        Statement::VarDecl(decl) => {
            assert!(decl.is_inferred());
            assert_eq!(decl.name.name, "x");
            assert_eq!(decl.value.kind, Expression::Literal(decimal("5")));
        }
        other => panic!("Expected an inferred declaration, got {:?}", other),
    }

    match parse_statement("x i32 := 5") {
        Statement::VarDecl(decl) => {
            let ty = decl.declared_type.expect("typed declaration has a type");
            let TypeExpr::Named(IdentOrPath::Identifier(name)) = ty.kind else {
                panic!("Expected a named type, got {:?}", ty.kind);
            };
            assert_eq!(name.name, "i32");
        }
        other => panic!("Expected a typed declaration, got {:?}", other),
    }

    match parse_statement("x = 5") {
        Statement::Assignment(assign) => assert_eq!(variable_name(&assign.target.kind), "x"),
        other => panic!("Expected an assignment, got {:?}", other),
    }

    match parse_statement("p *i32 := &x") {
        Statement::VarDecl(decl) => {
            assert!(matches!(decl.declared_type.map(|t| t.kind), Some(TypeExpr::Pointer(_))));
        }
        other => panic!("Expected a typed pointer declaration, got {:?}", other),
    }

    // 类型试探失败后回到表达式语句，不留下任何诊断
    assert!(matches!(parse_statement("x * y"), Statement::Expression(_)));
    assert!(matches!(parse_statement("f(1)"), Statement::Expression(_)));
}

#[test]
fn test_assignment_targets() {
    match parse_statement("*p = 3") {
        Statement::Assignment(assign) => assert!(matches!(assign.target.kind, Expression::Unary(_))),
        other => panic!("Expected an assignment, got {:?}", other),
    }
    assert!(matches!(parse_statement("p.x = 1"), Statement::Assignment(_)));
    assert!(matches!(parse_statement("xs[0] = 1"), Statement::Assignment(_)));
}

#[test]
fn test_compound_assignment() {
    match parse_statement("x += 1") {
        Statement::CompoundAssignment(assign) => {
            assert_eq!(assign.operator.kind, BinaryOperator::Add);
            assert_eq!(variable_name(&assign.target.kind), "x");
        }
        other => panic!("Expected a compound assignment, got {:?}", other),
    }

    match parse_statement("mask <<= 2") {
        Statement::CompoundAssignment(assign) => assert_eq!(assign.operator.kind, BinaryOperator::Shl),
        other => panic!("Expected a compound assignment, got {:?}", other),
    }
}

#[test]
fn test_array_literal_and_array_type() {
    let expr = parse_expr("[1, 2, 3]");
    let Expression::ArrayLiteral(array) = &expr.kind else {
        panic!("Expected an array literal, got {:?}", expr.kind);
    };
    assert_eq!(array.elements.len(), 3);
    assert!(array.element_type.is_none());

    let ty = parse_type("[3]i32");
    let TypeExpr::Array(array_type) = &ty.kind else {
        panic!("Expected an array type, got {:?}", ty.kind);
    };
    assert_eq!(array_type.length.as_ref().and_then(|n| n.kind.as_u64()), Some(3));
    assert!(matches!(array_type.element.kind, TypeExpr::Named(_)));

    let unsized_ty = parse_type("[]*u8");
    assert!(matches!(
        unsized_ty.kind,
        TypeExpr::Array(ArrayType { length: None, .. })
    ));
}

#[test]
fn test_array_literal_element_type() {
    let expr = parse_expr("[1, 2]u8");
    let Expression::ArrayLiteral(array) = &expr.kind else {
        panic!("Expected an array literal, got {:?}", expr.kind);
    };
    assert!(matches!(
        array.element_type.as_ref().map(|t| &t.kind),
        Some(TypeExpr::Named(_))
    ));

    // `*` 之后永远是乘法
    let expr = parse_expr("[1, 2] * 3");
    let factor = binary(&expr.kind);
    assert!(matches!(
        &factor.left.kind,
        Expression::ArrayLiteral(ArrayLiteral { element_type: None, .. })
    ));
}

#[test]
fn test_keyword_statements() {
    let statements = parse_statements(
        r#"    for i < 10 {
        i += 1
    }
    if ok {
        ret
    }
    else {
        ret 1
    }
    defer defer close(f)
    {
        inner()
    }"#,
    );
    assert_eq!(statements.len(), 4);

    assert!(matches!(&statements[0].kind, Statement::For(f) if f.body.kind.statements.len() == 1));

    let Statement::If(if_stmt) = &statements[1].kind else {
        panic!("Expected an if statement, got {:?}", statements[1].kind);
    };
    assert!(matches!(
        if_stmt.then_block.kind.statements[0].kind,
        Statement::Ret(RetStatement { value: None })
    ));
    assert!(if_stmt.else_block.is_some());

    let Statement::Defer(outer) = &statements[2].kind else {
        panic!("Expected a defer statement, got {:?}", statements[2].kind);
    };
    let Statement::Defer(inner) = &outer.statement.kind else {
        panic!("Expected a nested defer, got {:?}", outer.statement.kind);
    };
    assert!(matches!(inner.statement.kind, Statement::Expression(_)));

    assert!(matches!(&statements[3].kind, Statement::Block(block) if block.statements.len() == 1));
}

#[test]
fn test_ret_without_value_before_brace() {
    let program = parse_ok("fn f() { ret }");
    let body = &function(&program, 0).body.kind.statements;
    assert!(matches!(body[0].kind, Statement::Ret(RetStatement { value: None })));
}

#[test]
fn test_if_without_else_keeps_following_statement() {
    let statements = parse_statements("if a {\n}\n\nb()");
    assert_eq!(statements.len(), 2);
    assert!(matches!(&statements[0].kind, Statement::If(s) if s.else_block.is_none()));
}

#[test]
fn test_statements_without_line_breaks() {
    let statements = parse_statements("a := 1 b := 2");
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_to_sexp() {
    let program = parse_ok("fn main() {\n    x := 1 + 2\n}");
    assert_eq!(
        to_sexp(&program),
        "(program (fn_decl (identifier) (code_block (inferred_decl_assign (identifier) (term_expr (number_literal) (number_literal))))))"
    );
}

#[test]
fn test_spans_nest_and_follow_source_order() {
    let source = r#"use a:b "c"
struct S { f [4]*a:T, g u8 }
fn main(x i32) *S {
    v [2]u8 := [1, 2]u8
    v[0] += -x.y.z(1).w
    if (a == b) { defer ret } else { c:d(e) }
}
"#;
    let program = parse_ok(source);
    let mut visited = 0;
    walk(SyntaxNode::from(&program), &mut |node, _depth| {
        visited += 1;
        let span = node.span();
        assert!(span.start <= span.end, "{} has an inverted span", node.kind_name());
        let mut last_end = span.start;
        for child in node.children() {
            let child_span = child.span();
            assert!(
                span.contains(child_span),
                "{} {:?} is not inside {} {:?}",
                child.kind_name(),
                child_span,
                node.kind_name(),
                span
            );
            assert!(
                child_span.start >= last_end,
                "{} {:?} overlaps its previous sibling",
                child.kind_name(),
                child_span
            );
            last_end = child_span.end;
        }
    });
    assert!(visited > 30);
}

#[test]
fn test_reparse_of_reconstructed_source_is_identical() {
    let source = "use std:io // 导入\nfn main() {\n    x := [1, 2]u8 // 数组\n    x[0] <<= 1\n}\n";
    let first = parse_ok(source);

    let mut diagnostics = DiagnosticBag::new(source);
    let tokens = lexer::lex(source, &mut diagnostics);
    let rebuilt = reconstruct(source, &tokens);
    assert_ne!(rebuilt, source);

    let second = parse_ok(&rebuilt);
    assert_eq!(first, second);
}

// --- 失败路径测试 (Sad Path) ---

#[test]
fn test_compound_assignment_requires_adjacent_operator() {
    let (program, diagnostics) = parse_fail("fn main() {\n    x + = 1\n    y := 2\n}");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::AmbiguousConstructUnresolved]);
    assert_eq!(diagnostics[0].code(), "E0102");

    // 出错的那一行被跳过，后面的语句照常解析
    let body = &function(&program, 0).body.kind.statements;
    assert_eq!(body.len(), 1);
    assert!(matches!(body[0].kind, Statement::VarDecl(_)));
}

#[test]
fn test_unterminated_string_reports_once_and_parsing_resumes() {
    let source = "fn main() {\n    s := \"abc\n    y := 1\n}";
    let (program, diagnostics) = parse_fail(source);

    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnterminatedString]);
    let line_end = source.find("abc").unwrap() + 3;
    assert_eq!(diagnostics[0].end(), line_end);
    assert_eq!(function(&program, 0).body.kind.statements.len(), 2);
}

#[test]
fn test_deeply_nested_parentheses_hit_depth_limit() {
    let source = format!(
        "fn a() {{\n    x := {}1{}\n}}\nfn b() {{}}\n",
        "(".repeat(200),
        ")".repeat(200)
    );
    let (program, diagnostics) = parse_fail(&source);

    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::RecursionLimitExceeded]);
    assert_eq!(program.declarations.len(), 2, "parsing should finish the rest of the file");

    let mut saw_placeholder = false;
    walk(SyntaxNode::from(&program), &mut |node, _| saw_placeholder |= node.is_error());
    assert!(saw_placeholder);
}

#[test]
fn test_deeply_nested_blocks_hit_depth_limit() {
    let source = format!("fn a() {{\n{}{}\n}}", "{".repeat(100), "}".repeat(100));
    let (program, diagnostics) = parse_fail(&source);
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::RecursionLimitExceeded]);
    assert_eq!(program.declarations.len(), 1);
}

#[test]
fn test_depth_limit_on_stray_closer_terminates() {
    // 第 64 层正好停在一个多余的 `)` 上，解析必须越过它继续
    let source = format!("fn a() {{\n{})\n", "{".repeat(64));
    let (_, diagnostics) = parse_fail(&source);
    let limit_errors = diagnostics
        .iter()
        .filter(|d| d.kind() == DiagnosticKind::RecursionLimitExceeded)
        .count();
    assert_eq!(limit_errors, 1);
}

#[test]
fn test_depth_limit_boundary_always_terminates() {
    for n in 60..70 {
        let source = format!("fn a() {{\n{})\n", "{".repeat(n));
        let (program, diagnostics) = parse_fail(&source);
        assert_eq!(program.declarations.len(), 1);
        // 每个未闭合的块一个错误，加上 `)` 本身的一个
        assert!(
            diagnostics.len() <= n + 3,
            "too many diagnostics for depth {}: {}",
            n,
            diagnostics.len()
        );
    }
}

#[test]
fn test_custom_depth_limit() {
    let options = ParseOptions {
        max_depth: 4,
        ..ParseOptions::default()
    };
    let output = parse_with_options("fn a() {\n    x := ((((1))))\n}", None, options);
    assert_eq!(kinds(&output.diagnostics), vec![DiagnosticKind::RecursionLimitExceeded]);
}

#[test]
fn test_token_limit() {
    let options = ParseOptions {
        max_tokens: Some(3),
        ..ParseOptions::default()
    };
    let output = parse_with_options("fn main() {\n    x := 1\n}", None, options);
    let limit_errors = output
        .diagnostics
        .iter()
        .filter(|d| d.kind() == DiagnosticKind::TokenLimitExceeded)
        .count();
    assert_eq!(limit_errors, 1);
}

#[test]
fn test_unexpected_token_recovers_at_line_break() {
    let (program, diagnostics) = parse_fail("fn main() {\n    x := )\n    y := 2\n}");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnexpectedToken]);
    assert_eq!(diagnostics[0].line(), 2);

    let body = &function(&program, 0).body.kind.statements;
    assert_eq!(body.len(), 1);
    assert!(matches!(&body[0].kind, Statement::VarDecl(d) if d.name.name == "y"));
}

#[test]
fn test_use_requires_module_path() {
    let (program, diagnostics) = parse_fail("use std\nfn main() {}");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::MissingExpectedToken]);
    assert_eq!(program.declarations.len(), 1);
}

#[test]
fn test_missing_closing_brace() {
    let (program, diagnostics) = parse_fail("fn main() {\n    x := 1\n");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::MissingExpectedToken]);
    assert_eq!(function(&program, 0).body.kind.statements.len(), 1);

    // 第二个标签指向没有闭合的 `{`
    let labels = diagnostics[0].labels();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[1].span, Span::new(10, 11));
}

#[test]
fn test_unclosed_function_does_not_swallow_next_one() {
    let (program, diagnostics) = parse_fail("fn a() {\n    x := 1\nfn b() {\n}\n");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::MissingExpectedToken]);
    assert_eq!(program.declarations.len(), 2);
    assert_eq!(function(&program, 1).name.name, "b");
}

#[test]
fn test_top_level_statement_is_rejected() {
    let (program, diagnostics) = parse_fail("x := 1\nfn main() {}");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnexpectedToken]);
    assert_eq!(program.declarations.len(), 1);
}

#[test]
fn test_array_length_must_be_decimal() {
    let (_program, diagnostics) = parse_fail("struct S {\n    a [0x4]i32\n}");
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::MissingExpectedToken]);
}

#[test]
fn test_else_only_takes_a_block() {
    let (_program, diagnostics) = parse_fail("fn main() {\n    if a {\n    } else if b {\n    }\n}");
    assert!(diagnostics.iter().all(|d| d.kind() == DiagnosticKind::MissingExpectedToken));
}

#[test]
fn test_diagnostics_are_in_source_order() {
    let (_program, diagnostics) = parse_fail("fn main() {\n    a := )\n    b := $\n    c := \"x\n}");
    let starts: Vec<_> = diagnostics.iter().map(|d| d.start()).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert!(diagnostics.len() >= 3);
}
