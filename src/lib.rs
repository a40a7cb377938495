//! Brick Builder Catalogue
//!
//! Works out which brick sets a collector can build from their inventory:
//! - Canonical (piece, colour) multisets for inventories and set requirements
//! - Buildability across the whole set catalogue
//! - Per-piece gap analysis for a single set
//! - Bounded search for collaborators who can close a gap together
//!
//! Data comes from a [`catalogue::CatalogueSource`]; the engine itself is pure.

pub mod catalogue;
pub mod config;
pub mod engine;
pub mod error;
pub mod services;
pub mod utils;

// Re-exports for convenience
pub use catalogue::{CatalogueClient, CatalogueSource, InMemoryCatalogue};
pub use config::CatalogueConfig;
pub use engine::{BuildReport, CollaborationReport, GapReport, Multiset, PieceKey, SearchLimits};
pub use error::{AnalysisError, CatalogueError};
pub use services::Analyzer;
