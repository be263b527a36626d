//! Derived indexes over note text

pub mod backlinks;
pub mod references;

pub use backlinks::BacklinkIndex;
pub use references::{ReferenceResolver, ResolvedReferences, resolve_references};
