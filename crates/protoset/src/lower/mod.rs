//! Lowering: AST to canonical descriptor model.
//!
//! Consumes parsed files read-only and produces an independent
//! [`FileDescriptorSet`]. Entries are emitted in source order within
//! every container, which together with the resolver's post-order file
//! sequencing makes output byte-stable across runs.

mod case;
mod field;
mod file;
mod message;
mod options;

use crate::ast::ProtoFile;
use crate::descriptor::FileDescriptorSet;
use crate::error::LowerError;
use crate::foundation::FullName;

/// Per-file lowering state threaded through the walkers.
pub(crate) struct Context<'a> {
    /// File name for error contexts.
    pub file: &'a str,
    /// True when `syntax = "proto3"`.
    pub proto3: bool,
    /// Enclosing package, used to qualify names.
    pub package: Option<&'a FullName>,
}

/// Lower a resolved, ordered list of files into one descriptor set.
///
/// The input order is preserved; the resolver already sequenced
/// dependencies before dependants with the entry file last.
pub fn to_descriptor_set(files: &[ProtoFile]) -> Result<FileDescriptorSet, LowerError> {
    let file = files
        .iter()
        .map(file::lower_file)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FileDescriptorSet { file })
}
