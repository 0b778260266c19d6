use super::*;
use crate::lexer::{Literal, Radix};

impl TypeParser for Parser<'_> {
    /// 解析一个类型表达式。
    ///
    /// 只看开头的 token：`[` 是数组类型，`*` 是指针类型，标识符是命名类型。
    /// 是否应该在这里出现类型由调用者决定。
    fn parse_type(&mut self) -> Result<Node<TypeExpr>, ()> {
        self.nested(TypeExpr::Error, stops_type, |p| match p.peek().kind {
            TokenKind::Punctuation(Punctuation::LBracket) => p.parse_array_type(),
            TokenKind::Operator(Operator::Star) => {
                let star_span = p.advance().span;
                let pointee = p.parse_type()?;
                let span = star_span.to(pointee.span);
                Ok(Node::new(TypeExpr::Pointer(Box::new(pointee)), span))
            }
            TokenKind::Identifier(_) => {
                let name = p.parse_ident_or_path("expected a type name")?;
                let span = name.span();
                Ok(Node::new(TypeExpr::Named(name), span))
            }
            _ => {
                p.report_unexpected("a type");
                Err(())
            }
        })
    }

    /// `[N]T` 或 `[]T`。长度只能是十进制整数字面量。
    fn parse_array_type(&mut self) -> Result<Node<TypeExpr>, ()> {
        let start_span = self
            .consume(&punct(Punctuation::LBracket), "expected `[` to start an array type")?
            .span;

        let token = self.peek().clone();
        let length = match token.kind {
            TokenKind::Literal(Literal::Number(number)) => {
                if number.radix != Radix::Decimal || number.fractional {
                    let label = Label::new(token.span, "not a decimal integer");
                    self.diagnostics.report(
                        Diagnostic::new(DiagnosticKind::MissingExpectedToken, label)
                            .with_dynamic_message(format!("array length `{}` must be a decimal integer", token.lexeme)),
                    );
                    return Err(());
                }
                self.advance();
                Some(Node::new(number, token.span))
            }
            _ => None,
        };

        self.consume(&punct(Punctuation::RBracket), "expected `]` after the array length")?;
        let element = self.parse_type()?;
        let span = start_span.to(element.span);
        Ok(Node::new(
            TypeExpr::Array(ArrayType {
                length,
                element: Box::new(element),
            }),
            span,
        ))
    }
}
