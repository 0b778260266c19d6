// src/main.rs

use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};
use mo_parser::diagnostics::{DiagnosticBag, codes};
use mo_parser::parser::printer;
use mo_parser::{ParseOptions, lexer};
use std::fs;
use std::path::PathBuf;
use std::process;

/// Mo 语言的语法分析器：读取源文件，报告词法和语法错误
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 需要解析的源文件路径
    #[arg(required_unless_present = "explain")]
    input: Option<PathBuf>,

    /// 打印某个错误码（例如 E0102）的详细说明后退出
    #[arg(long, value_name = "CODE")]
    explain: Option<String>,

    /// 打印过滤注释前的全部 token
    #[arg(long)]
    tokens: bool,

    /// 以 S 表达式形式打印语法树
    #[arg(long)]
    sexp: bool,

    /// 允许的最大嵌套深度
    #[arg(long, default_value_t = ParseOptions::default().max_depth)]
    max_depth: usize,

    /// 最多处理的 token 数
    #[arg(long)]
    max_tokens: Option<usize>,

    /// 输出更多日志（-v 为 debug，-vv 为 trace）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// 把日志写到标准错误输出的最简单实现。
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // 只会在启动时调用一次
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(code) = &cli.explain {
        let entry = codes::lookup(code).ok_or_else(|| format!("unknown error code '{}'", code))?;
        println!("{}: {}\n\n{}", entry.code, entry.message, entry.explanation);
        return Ok(());
    }

    let input = cli.input.ok_or("no input file given")?;
    let source_name = input.display().to_string();
    let source_code = fs::read_to_string(&input)
        .map_err(|e| format!("Failed to read file '{}': {}", source_name, e))?;

    if cli.tokens {
        // 单独跑一次词法分析，诊断在下面解析时统一报告
        let mut scratch = DiagnosticBag::new(&source_code);
        for token in lexer::lex(&source_code, &mut scratch) {
            println!(
                "{}:{}\t{:?}\t{:?}",
                token.line, token.column, token.kind, token.lexeme
            );
        }
    }

    let options = ParseOptions {
        max_depth: cli.max_depth,
        max_tokens: cli.max_tokens,
    };
    let output = mo_parser::parse_with_options(&source_code, Some(&source_name), options);

    if cli.sexp {
        println!("{}", printer::to_sexp(&output.program));
    }

    if output.has_errors() {
        output.print_diagnostics(&source_code)?;
        eprintln!("{} error(s) found in '{}'", output.diagnostics.len(), source_name);
        process::exit(1);
    }

    Ok(())
}
