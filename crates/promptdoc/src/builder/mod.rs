//! Deferred builders for prompts, memory, and queries.
//!
//! Every builder records its calls as pending operations and only produces
//! a tree when `build(&data)` is called, so one builder can be built again
//! and again with different data. Composite entry points (`list`, `table`,
//! `section`, `row`, ...) hand a fresh child builder to a closure; returning
//! `None` from that closure omits the branch.
//!
//! # Special sections
//!
//! A document holds at most one memory, one tools, and one output-specs
//! section. Each builder tracks which kinds its subtree has taken, and a
//! parent merges that record when the closure hands the child back, so an
//! omitted branch claims nothing. A second registration is recorded as
//! [`ConfigError::DuplicateSpecialSection`] and returned by `build`.
//!
//! [`ConfigError::DuplicateSpecialSection`]: crate::error::ConfigError::DuplicateSpecialSection

mod list;
mod memory;
mod pending;
mod query;
mod section;
mod table;

pub use list::ListBuilder;
pub use memory::MemoryBuilder;
pub use query::QueryBuilder;
pub use section::{PromptBuilder, SectionBuilder, SpecialSectionBuilder};
pub use table::{CellBuilder, RowBuilder, TableBuilder};
