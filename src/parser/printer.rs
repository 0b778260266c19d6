//! 把语法树或 token 流还原成文本。

use super::ast::Program;
use super::visit::SyntaxNode;
use crate::lexer::{Token, TokenKind};

/// 输出 tree-sitter 风格的 S 表达式，只包含节点名，例如 `(program (fn_decl (identifier) ...))`。
pub fn to_sexp(program: &Program) -> String {
    let mut out = String::new();
    write_sexp(SyntaxNode::Program(program), &mut out);
    out
}

fn write_sexp(node: SyntaxNode<'_>, out: &mut String) {
    out.push('(');
    out.push_str(node.kind_name());
    for child in node.children() {
        out.push(' ');
        write_sexp(child, out);
    }
    out.push(')');
}

/// 按原来的字节偏移重新输出所有 token。
///
/// 注释和无法识别的字符被替换成空格，换行原样保留，所以每个 token 的 span 和原文件中的一致。
pub fn reconstruct(source: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(source.len());
    for token in tokens {
        if token.is_trivia() || token.kind == TokenKind::Eof {
            continue;
        }
        while out.len() < token.span.start {
            out.push(' ');
        }
        out.push_str(&token.lexeme);
    }
    while out.len() < source.len() {
        out.push(' ');
    }
    out
}
