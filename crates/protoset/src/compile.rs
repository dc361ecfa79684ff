//! High-level pipeline API: parse one file, or compile an entry file
//! with its transitive imports into a descriptor set.

use std::path::PathBuf;

use crate::ast::ProtoFile;
use crate::descriptor::FileDescriptorSet;
use crate::error::{Error, LexError, ParseError};
use crate::foundation::SourceMap;
use crate::lexer;
use crate::lower::to_descriptor_set;
use crate::parser;
use crate::resolver::{read_protos, SearchPath};

/// Parse a single source file into its AST.
///
/// `name` is advisory; it appears in diagnostics and is carried into
/// the AST as the file's logical name.
pub fn parse(name: &str, source: &str) -> Result<ProtoFile, Error> {
    let mut sources = SourceMap::new();
    let file_id = sources.add_file(PathBuf::from(name), source.to_string());

    let tokens = lexer::lex(source, file_id).map_err(|raw| LexError {
        location: sources.locate(&raw.span),
        kind: raw.kind,
        snippet: sources.snippet(&raw.span).to_string(),
    })?;

    parser::parse_file(&tokens, file_id, name).map_err(|raw| {
        ParseError {
            location: sources.locate(&raw.span),
            expected: raw.expected,
            found: raw.found,
        }
        .into()
    })
}

/// Full pipeline: resolve imports from the entry file, parse
/// everything once, lower to a descriptor set.
///
/// Unresolved imports are reported to `sink` (one line each) and do
/// not fail the compile; every other error is fatal.
pub fn compile(
    search: &SearchPath,
    entry_name: &str,
    entry_source: &str,
    sink: &mut dyn FnMut(&str),
) -> Result<FileDescriptorSet, Error> {
    let files = read_protos(search, entry_name, entry_source, sink)?;
    Ok(to_descriptor_set(&files)?)
}
