use super::*;
use crate::lexer::Literal;

impl DeclarationParser for Parser<'_> {
    /// 解析一个顶层声明。
    ///
    /// 顶层只允许三种声明，按开头的关键字直接分发，不需要向前看。
    fn parse_declaration(&mut self) -> Result<Node<Declaration>, ()> {
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Use) => self
                .parse_use_declaration()
                .map(|node| node.map(Declaration::Use)),
            TokenKind::Keyword(Keyword::Struct) => self
                .parse_struct_declaration()
                .map(|node| node.map(Declaration::Struct)),
            TokenKind::Keyword(Keyword::Fn) => self
                .parse_fn_declaration()
                .map(|node| node.map(Declaration::Fn)),
            _ => {
                self.report_unexpected("`use`, `struct` or `fn` at the top level");
                Err(())
            }
        }
    }

    /// `use std:io "io"`
    fn parse_use_declaration(&mut self) -> Result<Node<UseDecl>, ()> {
        let start_span = self.consume(&kw(Keyword::Use), "expected `use`")?.span;

        let path = match self.parse_ident_or_path("expected a module path after `use`")? {
            IdentOrPath::Path(path) => path,
            IdentOrPath::Identifier(ident) => {
                // `use` 后面必须是至少两段的模块路径
                let label = Label::new(ident.span, "a single identifier is not a module path");
                self.diagnostics.report(
                    Diagnostic::new(DiagnosticKind::MissingExpectedToken, label)
                        .with_dynamic_message(format!("expected `:` after `{}` in module path", ident.name))
                        .with_note("module paths look like `std:io`"),
                );
                return Err(());
            }
        };

        let mut end_span = path.span();
        let alias = match self.peek().kind.clone() {
            TokenKind::Literal(Literal::String(value)) => {
                let span = self.advance().span;
                end_span = span;
                Some(Node::new(value, span))
            }
            _ => None,
        };

        Ok(Node::new(UseDecl { path, alias }, start_span.to(end_span)))
    }

    /// 解析结构体定义。字段之间可以用 `,` 或换行任意组合分隔，允许末尾多一个分隔符。
    fn parse_struct_declaration(&mut self) -> Result<Node<StructDecl>, ()> {
        let start_span = self.consume(&kw(Keyword::Struct), "expected `struct`")?.span;
        let name = self.parse_identifier("expected a struct name after `struct`")?;
        self.skip_line_breaks();
        self.consume(&punct(Punctuation::LBrace), "expected `{` to start the struct body")?;

        let mut fields = Vec::new();
        loop {
            // 吃掉任意数量的分隔符
            while self.match_token(&TokenKind::LineBreak) || self.match_token(&punct(Punctuation::Comma)) {}

            if self.check(&punct(Punctuation::RBrace)) || self.is_at_end() || starts_declaration(&self.peek().kind) {
                break;
            }

            match self.parse_struct_field() {
                Ok(field) => {
                    fields.push(field);
                    // 字段后面必须是分隔符或 `}`
                    let separated = self.check(&TokenKind::LineBreak)
                        || self.check(&punct(Punctuation::Comma))
                        || self.check(&punct(Punctuation::RBrace));
                    if !separated {
                        self.report_unexpected("`,`, a line break or `}` after a struct field");
                        self.synchronize_statement();
                    }
                }
                Err(()) => self.synchronize_statement(),
            }
        }

        let end_span = self
            .consume(&punct(Punctuation::RBrace), "expected `}` to close the struct body")?
            .span;
        Ok(Node::new(StructDecl { name, fields }, start_span.to(end_span)))
    }

    /// `name Type`
    fn parse_struct_field(&mut self) -> Result<Node<StructField>, ()> {
        let name = self.parse_identifier("expected a field name")?;
        let field_type = self.parse_type()?;
        let span = name.span.to(field_type.span);
        Ok(Node::new(StructField { name, field_type }, span))
    }

    /// 解析一个完整的函数定义。
    /// 例如: `fn add(a i32, b i32) i32 { ret a + b }`
    fn parse_fn_declaration(&mut self) -> Result<Node<FnDecl>, ()> {
        let start_span = self.consume(&kw(Keyword::Fn), "expected `fn`")?.span;
        let name = self.parse_identifier("expected a function name after `fn`")?;
        let params = self.parse_parameter_list()?;

        // 返回类型是可选的；函数体的 `{` 可以放到下一行
        let return_type = if self.check(&punct(Punctuation::LBrace)) || self.check(&TokenKind::LineBreak) {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.skip_line_breaks();

        let body = self.parse_code_block()?;
        let span = start_span.to(body.span);
        Ok(Node::new(
            FnDecl {
                name,
                params,
                return_type,
                body,
            },
            span,
        ))
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<Node<Parameter>>, ()> {
        self.consume(&punct(Punctuation::LParen), "expected `(` after the function name")?;
        self.skip_line_breaks();

        let mut params = Vec::new();
        if !self.check(&punct(Punctuation::RParen)) {
            loop {
                self.skip_line_breaks();
                let name = self.parse_identifier("expected a parameter name")?;
                let param_type = self.parse_type()?;
                let span = name.span.to(param_type.span);
                params.push(Node::new(Parameter { name, param_type }, span));

                self.skip_line_breaks();
                if !self.match_token(&punct(Punctuation::Comma)) {
                    break;
                }
            }
        }

        self.consume(&punct(Punctuation::RParen), "expected `)` to close the parameter list")?;
        Ok(params)
    }
}
