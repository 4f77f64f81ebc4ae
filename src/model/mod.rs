pub mod target;
pub mod universe;

pub use target::{FilesMap, PlatformFiles, SourceKind, Target, TargetMode};
pub use universe::TargetUniverse;
