//! Audit logging for split requests.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::input::SplitRequest;
use crate::shell::LexError;

/// An audit log entry.
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the request.
    pub timestamp: DateTime<Utc>,
    /// Logical name of the input.
    pub name: String,
    /// Number of words produced (0 on error).
    pub words: usize,
    /// Error message if lexing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Summary of the input text.
    pub summary: String,
}

impl AuditEntry {
    /// Create a new audit entry from a request and its outcome.
    pub fn new(request: &SplitRequest, result: &Result<Vec<String>, LexError>) -> Self {
        let (words, error) = match result {
            Ok(words) => (words.len(), None),
            Err(e) => (0, Some(e.to_string())),
        };

        Self {
            timestamp: Utc::now(),
            name: request.source_name(),
            words,
            error,
            summary: truncate_string(&request.input, 200),
        }
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len - 3;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Audit logger for writing entries to a file.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create an audit log file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Write an audit entry to the log.
    pub fn log(&mut self, entry: &AuditEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()
    }

    /// Log the outcome of a request.
    pub fn log_request(
        &mut self,
        request: &SplitRequest,
        result: &Result<Vec<String>, LexError>,
    ) -> std::io::Result<()> {
        let entry = AuditEntry::new(request, result);
        self.log(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn request(input: &str) -> SplitRequest {
        SplitRequest::parse(&serde_json::json!({ "input": input }).to_string()).unwrap()
    }

    #[test]
    fn test_audit_entry_success() {
        let req = request("ls -la");
        let entry = AuditEntry::new(&req, &Ok(vec!["ls".into(), "-la".into()]));
        assert_eq!(entry.words, 2);
        assert!(entry.error.is_none());
        assert_eq!(entry.summary, "ls -la");
        assert_eq!(entry.name, "<stdin>");
    }

    #[test]
    fn test_audit_entry_error() {
        let req = request("\"open");
        let err = LexError::UnterminatedQuotation {
            name: "<stdin>".to_string(),
            line: 1,
        };
        let entry = AuditEntry::new(&req, &Err(err));
        assert_eq!(entry.words, 0);
        assert!(entry.error.unwrap().contains("no closing quotation"));
    }

    #[test]
    fn test_audit_logger() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut logger = AuditLogger::open(temp_file.path()).unwrap();

        let req = request("pwd");
        logger.log_request(&req, &Ok(vec!["pwd".into()])).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"words\":1"));
        assert!(content.contains("\"summary\":\"pwd\""));
        assert!(!content.contains("\"error\""));
    }

    #[test]
    fn test_truncate_summary() {
        let entry = AuditEntry::new(&request(&"a".repeat(300)), &Ok(vec![]));
        assert!(entry.summary.len() <= 200);
        assert!(entry.summary.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte() {
        let s = "é".repeat(150);
        let truncated = truncate_string(&s, 200);
        assert!(truncated.len() <= 200);
        assert!(truncated.ends_with("..."));
    }
}
