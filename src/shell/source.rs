//! Resolution of included sources.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// A resolved source: its logical name and byte stream.
pub type ResolvedSource = (String, Box<dyn Read>);

/// Resolves the target of a source-include directive.
pub trait SourceHook {
    /// Open `requested`, interpreted relative to the source named `current`.
    fn resolve(&mut self, requested: &str, current: &str) -> io::Result<ResolvedSource>;
}

impl<F> SourceHook for F
where
    F: FnMut(&str, &str) -> io::Result<ResolvedSource>,
{
    fn resolve(&mut self, requested: &str, current: &str) -> io::Result<ResolvedSource> {
        self(requested, current)
    }
}

/// Opens included sources from the filesystem.
///
/// A double-quoted name has its quotes stripped. Relative names resolve
/// against the directory of the including source.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSourceHook;

impl SourceHook for FileSourceHook {
    fn resolve(&mut self, requested: &str, current: &str) -> io::Result<ResolvedSource> {
        let path = resolve_path(requested, current);
        let file: Box<dyn Read> = Box::new(File::open(&path)?);
        Ok((path, file))
    }
}

/// Strip a surrounding pair of double quotes.
pub fn strip_quotes(name: &str) -> &str {
    if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
        &name[1..name.len() - 1]
    } else {
        name
    }
}

/// Compute the logical name of an included source.
pub fn resolve_path(requested: &str, current: &str) -> String {
    let requested = strip_quotes(requested);
    let path = Path::new(requested);
    if path.is_absolute() {
        return requested.to_string();
    }
    match Path::new(current).parent() {
        Some(dir) => dir.join(path).to_string_lossy().into_owned(),
        None => requested.to_string(),
    }
}
