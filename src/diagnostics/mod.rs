//! 词法和语法分析阶段的诊断信息。
//!
//! 每个诊断都对应 [`codes`] 中的一个错误码。诊断被收集进 [`DiagnosticBag`]，
//! 解析永远不会因为错误而中止，最终返回给调用者的总是一棵（可能不完整的）语法树加上诊断列表。

pub mod codes;

use crate::utils::{LineIndex, Span};
use ariadne::{Color, Config, IndexType, Label as AriadneLabel, Report, ReportKind, Source};
use codes::*;
use std::fmt;
use std::io;

/// 诊断的大类，对应三种不同的恢复策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// 在词法分析器内部恢复：跳过出错的片段继续扫描。
    Lexical,
    /// 在语句/成员边界恢复：跳到下一个换行或 `}`。
    Syntactic,
    /// 放弃当前子树，插入错误占位节点。
    Resource,
}

/// 所有诊断种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    InvalidCharacter,
    UnterminatedString,
    InvalidEscape,
    InvalidNumberLiteral,
    UnexpectedToken,
    MissingExpectedToken,
    AmbiguousConstructUnresolved,
    RecursionLimitExceeded,
    TokenLimitExceeded,
}

impl DiagnosticKind {
    pub fn error_code(self) -> &'static ErrorCode {
        match self {
            DiagnosticKind::InvalidCharacter => &E0000_INVALID_CHARACTER,
            DiagnosticKind::UnterminatedString => &E0001_UNTERMINATED_STRING,
            DiagnosticKind::InvalidEscape => &E0002_INVALID_ESCAPE,
            DiagnosticKind::InvalidNumberLiteral => &E0003_INVALID_NUMBER_LITERAL,
            DiagnosticKind::UnexpectedToken => &E0100_UNEXPECTED_TOKEN,
            DiagnosticKind::MissingExpectedToken => &E0101_MISSING_EXPECTED_TOKEN,
            DiagnosticKind::AmbiguousConstructUnresolved => &E0102_AMBIGUOUS_CONSTRUCT,
            DiagnosticKind::RecursionLimitExceeded => &E0200_RECURSION_LIMIT_EXCEEDED,
            DiagnosticKind::TokenLimitExceeded => &E0201_TOKEN_LIMIT_EXCEEDED,
        }
    }

    pub fn category(self) -> Category {
        match self {
            DiagnosticKind::InvalidCharacter
            | DiagnosticKind::UnterminatedString
            | DiagnosticKind::InvalidEscape
            | DiagnosticKind::InvalidNumberLiteral => Category::Lexical,
            DiagnosticKind::UnexpectedToken
            | DiagnosticKind::MissingExpectedToken
            | DiagnosticKind::AmbiguousConstructUnresolved => Category::Syntactic,
            DiagnosticKind::RecursionLimitExceeded | DiagnosticKind::TokenLimitExceeded => {
                Category::Resource
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// 一条诊断。主标签的 span 就是诊断的位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    line: usize,
    column: usize,
    labels: Vec<Label>,
    notes: Vec<String>,
}

impl Diagnostic {
    /// 默认消息取自错误码表，行列号在报告进 [`DiagnosticBag`] 时才计算。
    pub fn new(kind: DiagnosticKind, primary_label: Label) -> Self {
        Self {
            kind,
            message: kind.error_code().message.to_string(),
            line: 0,
            column: 0,
            labels: vec![primary_label],
            notes: Vec::new(),
        }
    }

    /// 覆盖默认消息，以包含动态信息（例如具体找到了哪个 token）。
    #[must_use]
    pub fn with_dynamic_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_secondary_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.error_code().code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Span {
        self.labels[0].span
    }

    pub fn start(&self) -> usize {
        self.span().start
    }

    pub fn end(&self) -> usize {
        self.span().end
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: error[{}]: {}",
            self.line,
            self.column,
            self.code(),
            self.message
        )
    }
}

/// 诊断收集器。
///
/// 回溯时解析器记下 [`DiagnosticBag::len`]，失败后用 [`DiagnosticBag::truncate`]
/// 丢弃试探期间产生的诊断。
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    source: String,
    line_index: Option<LineIndex>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            line_index: Some(LineIndex::new(source)),
            diagnostics: Vec::new(),
        }
    }

    /// Reports a diagnostic of the given kind with a primary label.
    pub fn report_error(&mut self, kind: DiagnosticKind, message: impl Into<String>, label: Label) {
        let diagnostic = Diagnostic::new(kind, label).with_dynamic_message(message);
        self.report(diagnostic);
    }

    /// Reports a generic diagnostic.
    pub fn report(&mut self, mut diagnostic: Diagnostic) {
        if let Some(index) = &self.line_index {
            let (line, column) = index.position(&self.source, diagnostic.start());
            diagnostic.line = line;
            diagnostic.column = column;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 丢弃 `len` 之后报告的所有诊断。
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// 按源码顺序返回所有诊断。排序是稳定的，同一位置的诊断保持报告顺序。
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| (d.start(), d.end()));
        self.diagnostics
    }

    /// 把所有诊断以不带颜色的形式写入 `out`。
    pub fn write<W: io::Write>(&self, file_name: &str, out: &mut W) -> io::Result<()> {
        render(file_name, &self.source, &self.diagnostics, out, false)
    }
}

/// 渲染一组诊断，供已经离开 [`DiagnosticBag`] 的诊断列表使用。
pub fn render<W: io::Write>(
    file_name: &str,
    source_code: &str,
    diagnostics: &[Diagnostic],
    out: &mut W,
    color: bool,
) -> io::Result<()> {
    let cache = (file_name, Source::from(source_code));

    for diag in diagnostics {
        let Some((primary_label_info, secondary_labels)) = diag.labels.split_first() else {
            continue;
        };

        let mut report = Report::build(ReportKind::Error, (file_name, primary_label_info.span.into_range()))
            .with_config(Config::default().with_index_type(IndexType::Byte).with_color(color))
            .with_message(&diag.message)
            .with_code(diag.code());

        report.add_label(
            AriadneLabel::new((file_name, primary_label_info.span.into_range()))
                .with_message(&primary_label_info.message)
                .with_color(Color::Red),
        );

        for label_info in secondary_labels {
            report.add_label(
                AriadneLabel::new((file_name, label_info.span.into_range()))
                    .with_message(&label_info.message)
                    .with_color(Color::Blue),
            );
        }

        for note in &diag.notes {
            report = report.with_note(note);
        }

        report.finish().write(cache.clone(), &mut *out)?;
    }
    Ok(())
}
