//! Building blocks of the export parser.
//!
//! Both the in-memory parser and the streaming parser are thin drivers around
//! the same pieces:
//!
//! - [`timestamp`] - header timestamp conventions ([`TimestampFormat`])
//! - [`header`] - header vs. continuation line classification
//! - [`markers`] - the ordered body classification rules
//! - [`assembler`] - the line state machine ([`EventAssembler`])

pub mod assembler;
pub mod header;
pub mod markers;
pub mod timestamp;

pub use assembler::EventAssembler;
pub use header::{HeaderLine, LineClass, classify_line};
pub use markers::{RULES, Rule, classify, is_system_notice};
pub use timestamp::TimestampFormat;
