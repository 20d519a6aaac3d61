//! Path template engine.
//!
//! Templates are `/`-separated strings whose segments mix literal text with
//! `{field}` tokens. Numeric fields accept a width directive (`{track:02d}`)
//! and the date field accepts a strftime sub-format (`{date:%Y}`). Every
//! template is compiled once at start-up so that an unknown field or a bad
//! directive aborts the run before any item is touched.
//!
//! Rendering is deterministic: the same [`Metadata`](crate::media::Metadata)
//! and templates always produce the same [`OutputPlan`].

mod config;
mod error;
mod parser;
mod path;

pub use config::TemplateConfig;
pub use error::TemplateError;
pub use parser::{FormatSpec, Template, TemplateField};
pub use path::{sanitize_segment, truncate_bytes, OutputPlan, PathTemplates, PlanOptions};
pub(crate) use parser::format_date;
