//! # protoset
//!
//! Protobuf schema compiler: `.proto` sources in, canonical descriptor
//! sets out.
//!
//! The pipeline has three stages, leaves first:
//!
//! ```text
//! lexer      - source bytes to tokens (logos)
//! parser     - tokens to AST (hand-written recursive descent,
//!              two-token lookahead)
//! lower      - AST to FileDescriptorSet, with imports resolved
//!              transitively against a search path
//! ```
//!
//! The descriptor model serialises two ways: exact `descriptor.proto`
//! wire bytes ([`FileDescriptorSet::encode`]) and a protojson-shaped
//! JSON projection ([`FileDescriptorSet::to_json`]).
//!
//! ## Usage
//!
//! ```
//! use protoset::{compile, SearchPath};
//!
//! let search = SearchPath::new(vec![]);
//! let set = compile(
//!     &search,
//!     "greeter.proto",
//!     r#"syntax = "proto3"; message Hello { string name = 1; }"#,
//!     &mut |diagnostic| eprintln!("{diagnostic}"),
//! )
//! .unwrap();
//! assert_eq!(set.file.len(), 1);
//! ```

pub mod ast;
pub mod compile;
pub mod descriptor;
pub mod error;
pub mod foundation;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod resolver;

pub use compile::{compile, parse};
pub use descriptor::FileDescriptorSet;
pub use error::Error;
pub use lower::to_descriptor_set;
pub use resolver::{read_protos, SearchPath};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
