pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod utils;

use std::io;

use diagnostics::{Diagnostic, DiagnosticBag};
use parser::Parse;

pub use parser::ParseOptions;
pub use parser::ast::Program;

/// 解析结果：一棵总是存在的（可能不完整的）语法树，加上按源码顺序排列的诊断。
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
    /// 渲染诊断时显示的文件名。
    pub source_name: String,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// 用 ariadne 把诊断渲染到 `out`（不带颜色）。`source` 必须是被解析的那份源码。
    pub fn write_diagnostics<W: io::Write>(&self, source: &str, out: &mut W) -> io::Result<()> {
        diagnostics::render(&self.source_name, source, &self.diagnostics, out, false)
    }

    /// 把诊断带颜色地渲染到标准错误输出。
    pub fn print_diagnostics(&self, source: &str) -> io::Result<()> {
        diagnostics::render(&self.source_name, source, &self.diagnostics, &mut io::stderr(), true)
    }
}

/// 使用默认选项解析一段 Mo 源代码。
///
/// # Arguments
/// * `source` - 要解析的源代码。
/// * `source_name` - 可选的文件名，只用于渲染诊断。
///
/// 这个函数不会失败：无论输入多么糟糕，都会返回一棵语法树和所有诊断。
pub fn parse(source: &str, source_name: Option<&str>) -> ParseOutput {
    parse_with_options(source, source_name, ParseOptions::default())
}

/// 使用指定的嵌套深度和 token 上限解析源代码。
pub fn parse_with_options(source: &str, source_name: Option<&str>, options: ParseOptions) -> ParseOutput {
    let source_name = source_name.unwrap_or("<input>").to_string();
    let mut diagnostics = DiagnosticBag::new(source);

    // 1. 词法分析。即使有词法错误，token 也会继续交给解析器
    let tokens = lexer::lex(source, &mut diagnostics);

    // 2. 语法分析
    let program = parser::Parser::new(tokens, &mut diagnostics, options).parse();

    log::debug!(
        "finished parsing {} ({} bytes, {} diagnostics)",
        source_name,
        source.len(),
        diagnostics.len()
    );

    ParseOutput {
        program,
        diagnostics: diagnostics.into_sorted(),
        source_name,
    }
}
