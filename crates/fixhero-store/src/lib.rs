//! # fixhero-store
//!
//! Local persistence for captured issues.
//!
//! Issues live as one pretty-printed JSON document each under
//! `.fixhero/issues/`; screenshots are optionally mirrored as PNG artifacts
//! under `.fixhero/artifacts/<issue-id>/` for direct viewing. [`StoreSink`]
//! is the default publish target the assembler hands finished issues to.

mod artifacts;
mod sink;
mod store;

pub use artifacts::{ArtifactStore, ScreenshotArtifact};
pub use sink::StoreSink;
pub use store::IssueStore;
