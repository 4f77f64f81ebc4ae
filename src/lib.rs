//! Makefile generator for Go source trees.
//!
//! Walks a package root and a command root, classifies every file of every
//! compilation unit by platform suffix, resolves imports against the scanned
//! packages and renders one `Makefile` per unit plus the tree-wide
//! `Make.dirs`, `Make.deps` and `.gitignore` listings.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod walker;

pub use config::GenConfig;
pub use error::{GenError, GenResult};
