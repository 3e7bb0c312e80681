//! # fixhero-export
//!
//! Turns stored issues into shareable documents. Two formats: a Markdown
//! report for humans and a JSON array for tooling. Both render the issue
//! data contract as-is; presentation concerns stay out.

mod json;
mod markdown;

pub use json::to_json;
pub use markdown::to_markdown;
