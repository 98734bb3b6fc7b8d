//! Source inclusion against real files.

use shellwords_lex::shell::{LexError, Lexer, Syntax};
use std::fs;
use std::fs::File;
use tempfile::TempDir;

fn include_syntax() -> Syntax {
    Syntax::new(true, "")
        .with_whitespace_split(true)
        .with_source("source")
}

#[test]
fn test_nested_files_resolve_relative_to_includer() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("main.args"), "first source sub/a.args last\n").unwrap();
    fs::write(sub.join("a.args"), "a1 source \"b.args\" a2\n").unwrap();
    fs::write(sub.join("b.args"), "# only comment\nb1\n").unwrap();

    let main = dir.path().join("main.args");
    let file = File::open(&main).unwrap();
    let lexer = Lexer::with_syntax(file, main.to_string_lossy(), include_syntax());
    let words: Vec<String> = lexer.collect::<Result<_, _>>().unwrap();
    assert_eq!(words, vec!["first", "a1", "b1", "a2", "last"]);
}

#[test]
fn test_included_error_reports_included_name() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.args"), "ok\n'unterminated\n").unwrap();
    let main = dir.path().join("main.args");

    let mut lexer = Lexer::with_syntax(
        "source bad.args".as_bytes(),
        main.to_string_lossy(),
        include_syntax(),
    );
    assert_eq!(lexer.get_token().unwrap(), Some("ok".to_string()));
    let err = lexer.get_token().unwrap_err();
    match err {
        LexError::UnterminatedQuotation { name, line } => {
            assert!(name.ends_with("bad.args"));
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_trigger_without_source_configured_is_a_word() {
    let words: Vec<String> = Lexer::new("source x".as_bytes(), "", true, "")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(words, vec!["source", "x"]);
}
