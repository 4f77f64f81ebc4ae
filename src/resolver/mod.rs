pub mod platform;
pub mod file_classifier;
pub mod dependency_resolver;

pub use platform::{classify_suffix, Platform, PlatformVocabulary};
pub use file_classifier::{FileClassifier, FileClassification};
pub use dependency_resolver::{DependencyResolver, ResolvedDeps};
