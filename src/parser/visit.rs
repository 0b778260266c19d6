//! 对语法树的统一只读视图。
//!
//! [`SyntaxNode`] 借用树中的某个节点，提供节点名、span 和按源码顺序排列的子节点，
//! 这样工具代码（打印、检查 span 不变量等）不需要为每种节点分别写遍历。

use super::ast::*;
use crate::lexer::NumberLiteral;
use crate::utils::Span;

#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    Program(&'a Program),
    Declaration(&'a Node<Declaration>),
    StructField(&'a Node<StructField>),
    Parameter(&'a Node<Parameter>),
    CodeBlock(&'a Node<CodeBlock>),
    Statement(&'a Node<Statement>),
    Expression(&'a Node<Expression>),
    DotSuffix(&'a Node<DotSuffix>),
    Type(&'a Node<TypeExpr>),
    /// 数组类型中的长度。
    ArrayLength(&'a Node<NumberLiteral>),
    /// `use` 声明的字符串别名。
    Alias(&'a Node<String>),
    Identifier(&'a Identifier),
    ModulePath(&'a ModulePath),
}

impl<'a> From<&'a Program> for SyntaxNode<'a> {
    fn from(program: &'a Program) -> Self {
        SyntaxNode::Program(program)
    }
}

fn ident_or_path(target: &IdentOrPath) -> SyntaxNode<'_> {
    match target {
        IdentOrPath::Identifier(ident) => SyntaxNode::Identifier(ident),
        IdentOrPath::Path(path) => SyntaxNode::ModulePath(path),
    }
}

impl<'a> SyntaxNode<'a> {
    /// 节点名，与 tree-sitter 语法中的规则名一致；错误占位节点为 `ERROR`。
    pub fn kind_name(&self) -> &'static str {
        match self {
            SyntaxNode::Program(_) => "program",
            SyntaxNode::Declaration(node) => match node.kind {
                Declaration::Use(_) => "use_decl",
                Declaration::Struct(_) => "struct_decl",
                Declaration::Fn(_) => "fn_decl",
            },
            SyntaxNode::StructField(_) => "struct_field",
            SyntaxNode::Parameter(_) => "fn_param",
            SyntaxNode::CodeBlock(_) => "code_block",
            SyntaxNode::Statement(node) => match &node.kind {
                Statement::For(_) => "for_loop",
                Statement::If(_) => "if_stmt",
                Statement::Ret(_) => "ret_stmt",
                Statement::Defer(_) => "defer_stmt",
                Statement::Block(_) => "code_block",
                Statement::VarDecl(decl) if decl.is_inferred() => "inferred_decl_assign",
                Statement::VarDecl(_) => "typed_decl_assign",
                Statement::Assignment(_) => "assignment",
                Statement::CompoundAssignment(_) => "var_op_assign",
                Statement::Expression(_) => "expr_stmt",
                Statement::Error => "ERROR",
            },
            SyntaxNode::Expression(node) => match &node.kind {
                Expression::Equality(_) => "equality_expr",
                Expression::Comparison(_) => "comparison_expr",
                Expression::Term(_) => "term_expr",
                Expression::Factor(_) => "factor_expr",
                Expression::Unary(_) => "unary_expr",
                Expression::Dot(_) => "dot_expr",
                Expression::Literal(LiteralValue::Number(_)) => "number_literal",
                Expression::Literal(LiteralValue::String(_)) => "string_literal",
                Expression::Literal(LiteralValue::Bool(true)) => "true",
                Expression::Literal(LiteralValue::Bool(false)) => "false",
                Expression::Grouped(_) => "grouped_expr",
                Expression::Variable(_) | Expression::Index(_) | Expression::Call(_) => "variable_or_call",
                Expression::ArrayLiteral(_) => "array_literal",
                Expression::Error => "ERROR",
            },
            SyntaxNode::DotSuffix(node) => match node.kind {
                DotSuffix::Call { .. } => "fn_call_suffix",
                DotSuffix::Field(_) => "field_access",
            },
            SyntaxNode::Type(node) => match node.kind {
                TypeExpr::Array(_) => "array_type",
                TypeExpr::Pointer(_) => "pointer_type",
                TypeExpr::Named(_) => "named_type",
                TypeExpr::Error => "ERROR",
            },
            SyntaxNode::ArrayLength(_) => "decimal_integer_number_literal",
            SyntaxNode::Alias(_) => "string_literal",
            SyntaxNode::Identifier(_) => "identifier",
            SyntaxNode::ModulePath(_) => "module_path",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxNode::Program(program) => program.span,
            SyntaxNode::Declaration(node) => node.span,
            SyntaxNode::StructField(node) => node.span,
            SyntaxNode::Parameter(node) => node.span,
            SyntaxNode::CodeBlock(node) => node.span,
            SyntaxNode::Statement(node) => node.span,
            SyntaxNode::Expression(node) => node.span,
            SyntaxNode::DotSuffix(node) => node.span,
            SyntaxNode::Type(node) => node.span,
            SyntaxNode::ArrayLength(node) => node.span,
            SyntaxNode::Alias(node) => node.span,
            SyntaxNode::Identifier(ident) => ident.span,
            SyntaxNode::ModulePath(path) => path.span(),
        }
    }

    /// 是否是错误占位节点。
    pub fn is_error(&self) -> bool {
        self.kind_name() == "ERROR"
    }

    /// 按源码顺序返回直接子节点。运算符不作为子节点出现。
    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut children = Vec::new();
        match *self {
            SyntaxNode::Program(program) => {
                children.extend(program.declarations.iter().map(SyntaxNode::Declaration));
            }
            SyntaxNode::Declaration(node) => match &node.kind {
                Declaration::Use(decl) => {
                    children.push(SyntaxNode::ModulePath(&decl.path));
                    children.extend(decl.alias.as_ref().map(SyntaxNode::Alias));
                }
                Declaration::Struct(decl) => {
                    children.push(SyntaxNode::Identifier(&decl.name));
                    children.extend(decl.fields.iter().map(SyntaxNode::StructField));
                }
                Declaration::Fn(decl) => {
                    children.push(SyntaxNode::Identifier(&decl.name));
                    children.extend(decl.params.iter().map(SyntaxNode::Parameter));
                    children.extend(decl.return_type.as_ref().map(SyntaxNode::Type));
                    children.push(SyntaxNode::CodeBlock(&decl.body));
                }
            },
            SyntaxNode::StructField(node) => {
                children.push(SyntaxNode::Identifier(&node.kind.name));
                children.push(SyntaxNode::Type(&node.kind.field_type));
            }
            SyntaxNode::Parameter(node) => {
                children.push(SyntaxNode::Identifier(&node.kind.name));
                children.push(SyntaxNode::Type(&node.kind.param_type));
            }
            SyntaxNode::CodeBlock(node) => {
                children.extend(node.kind.statements.iter().map(SyntaxNode::Statement));
            }
            SyntaxNode::Statement(node) => statement_children(&node.kind, &mut children),
            SyntaxNode::Expression(node) => expression_children(&node.kind, &mut children),
            SyntaxNode::DotSuffix(node) => match &node.kind {
                DotSuffix::Call { name, arguments } => {
                    children.push(SyntaxNode::Identifier(name));
                    children.extend(arguments.iter().map(SyntaxNode::Expression));
                }
                DotSuffix::Field(name) => children.push(SyntaxNode::Identifier(name)),
            },
            SyntaxNode::Type(node) => match &node.kind {
                TypeExpr::Array(array) => {
                    children.extend(array.length.as_ref().map(SyntaxNode::ArrayLength));
                    children.push(SyntaxNode::Type(&array.element));
                }
                TypeExpr::Pointer(pointee) => children.push(SyntaxNode::Type(pointee)),
                TypeExpr::Named(name) => children.push(ident_or_path(name)),
                TypeExpr::Error => {}
            },
            SyntaxNode::ModulePath(path) => {
                children.extend(path.segments.iter().map(SyntaxNode::Identifier));
            }
            SyntaxNode::ArrayLength(_) | SyntaxNode::Alias(_) | SyntaxNode::Identifier(_) => {}
        }
        children
    }
}

fn statement_children<'a>(statement: &'a Statement, children: &mut Vec<SyntaxNode<'a>>) {
    match statement {
        Statement::For(for_loop) => {
            children.push(SyntaxNode::Expression(&for_loop.condition));
            children.push(SyntaxNode::CodeBlock(&for_loop.body));
        }
        Statement::If(if_stmt) => {
            children.push(SyntaxNode::Expression(&if_stmt.condition));
            children.push(SyntaxNode::CodeBlock(&if_stmt.then_block));
            children.extend(if_stmt.else_block.as_ref().map(SyntaxNode::CodeBlock));
        }
        Statement::Ret(ret) => children.extend(ret.value.as_ref().map(SyntaxNode::Expression)),
        Statement::Defer(defer) => children.push(SyntaxNode::Statement(&defer.statement)),
        Statement::Block(block) => children.extend(block.statements.iter().map(SyntaxNode::Statement)),
        Statement::VarDecl(decl) => {
            children.push(SyntaxNode::Identifier(&decl.name));
            children.extend(decl.declared_type.as_ref().map(SyntaxNode::Type));
            children.push(SyntaxNode::Expression(&decl.value));
        }
        Statement::Assignment(assign) => {
            children.push(SyntaxNode::Expression(&assign.target));
            children.push(SyntaxNode::Expression(&assign.value));
        }
        Statement::CompoundAssignment(assign) => {
            children.push(SyntaxNode::Expression(&assign.target));
            children.push(SyntaxNode::Expression(&assign.value));
        }
        Statement::Expression(expr) => children.push(SyntaxNode::Expression(expr)),
        Statement::Error => {}
    }
}

fn expression_children<'a>(expression: &'a Expression, children: &mut Vec<SyntaxNode<'a>>) {
    match expression {
        Expression::Equality(binary)
        | Expression::Comparison(binary)
        | Expression::Term(binary)
        | Expression::Factor(binary) => {
            children.push(SyntaxNode::Expression(&binary.left));
            children.push(SyntaxNode::Expression(&binary.right));
        }
        Expression::Unary(unary) => children.push(SyntaxNode::Expression(&unary.operand)),
        Expression::Dot(dot) => {
            children.push(SyntaxNode::Expression(&dot.receiver));
            children.extend(dot.suffixes.iter().map(SyntaxNode::DotSuffix));
        }
        Expression::Grouped(inner) => children.push(SyntaxNode::Expression(inner)),
        Expression::Variable(target) => children.push(ident_or_path(target)),
        Expression::Index(index) => {
            children.push(ident_or_path(&index.target));
            children.push(SyntaxNode::Expression(&index.index));
        }
        Expression::Call(call) => {
            children.push(ident_or_path(&call.callee));
            children.extend(call.arguments.iter().map(SyntaxNode::Expression));
        }
        Expression::ArrayLiteral(array) => {
            children.extend(array.elements.iter().map(SyntaxNode::Expression));
            children.extend(array.element_type.as_ref().map(SyntaxNode::Type));
        }
        Expression::Literal(_) | Expression::Error => {}
    }
}

/// 先序遍历，`visit` 的第二个参数是节点的深度（根为 0）。
pub fn walk<'a>(node: SyntaxNode<'a>, visit: &mut impl FnMut(SyntaxNode<'a>, usize)) {
    walk_at(node, 0, visit);
}

fn walk_at<'a>(node: SyntaxNode<'a>, depth: usize, visit: &mut impl FnMut(SyntaxNode<'a>, usize)) {
    visit(node, depth);
    for child in node.children() {
        walk_at(child, depth + 1, visit);
    }
}
