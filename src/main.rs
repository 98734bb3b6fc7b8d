//! shellwords-lex entry point.

use shellwords_lex::audit::AuditLogger;
use shellwords_lex::config::Config;
use shellwords_lex::input::SplitRequest;
use shellwords_lex::output::{format_error, format_words};
use shellwords_lex::shell::Lexer;

use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    // Read JSON from stdin
    let mut input_str = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input_str) {
        eprintln!("failed to read stdin: {}", e);
        return ExitCode::from(2);
    }

    let request = match SplitRequest::parse(&input_str) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("invalid request: {}", e);
            return ExitCode::from(2);
        }
    };

    let cwd = request.cwd.as_deref().map(Path::new);
    let mut config = match Config::load(cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::from(2);
        }
    };
    request.apply_to(&mut config);

    let syntax = match config.compile() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::from(2);
        }
    };

    let name = request.source_name();
    tracing::debug!(name = %name, posix = syntax.posix, "splitting request");
    let result: Result<Vec<String>, _> =
        Lexer::with_syntax(request.input.as_bytes(), name, syntax).collect();

    if config.audit.enabled {
        if let Some(path) = &config.audit.path {
            match AuditLogger::open(Path::new(path)) {
                Ok(mut logger) => {
                    if let Err(e) = logger.log_request(&request, &result) {
                        tracing::warn!(path = %path, error = %e, "failed to write audit entry");
                    }
                }
                Err(e) => tracing::warn!(path = %path, error = %e, "failed to open audit log"),
            }
        }
    }

    match result {
        Ok(words) => match format_words(&words, request.format) {
            Ok(out) => {
                println!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("failed to render output: {}", e);
                ExitCode::from(2)
            }
        },
        Err(e) => {
            eprintln!("{}", format_error(&e));
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
