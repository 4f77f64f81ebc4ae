use super::platform::{Platform, PlatformVocabulary};
use crate::model::target::{SourceKind, Target, SCHEMA_EXT};
use crate::parser::ImportScan;
use serde::Serialize;
use std::fmt;

/// Local build fragment included by the generated descriptor.
pub const MAKEINC_FILE: &str = "Make.inc";

/// Suffix of test sources.
pub const TEST_SUFFIX: &str = "_test.go";

/// Extension of compilable sources.
pub const SOURCE_EXT: &str = ".go";

/// Where a file ended up inside its unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "bucket", rename_all = "snake_case")]
pub enum FileClassification {
    IncludeFragment,
    Schema,
    Test,
    Ignored,
    Source { kind: SourceKind, platform: Platform },
}

impl fmt::Display for FileClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileClassification::IncludeFragment => write!(f, "include fragment"),
            FileClassification::Schema => write!(f, "schema"),
            FileClassification::Test => write!(f, "test"),
            FileClassification::Ignored => write!(f, "ignored"),
            FileClassification::Source { kind: SourceKind::Go, platform } => write!(f, "go source ({})", platform),
            FileClassification::Source { kind: SourceKind::Cgo, platform } => write!(f, "cgo source ({})", platform),
        }
    }
}

pub struct FileClassifier {
    vocabulary: PlatformVocabulary,
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self {
            vocabulary: PlatformVocabulary::default(),
        }
    }
}

impl FileClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary(vocabulary: PlatformVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &PlatformVocabulary {
        &self.vocabulary
    }

    /// Whether `filename` reaches the source rule and so needs its imports
    /// scanned before classification.
    pub fn is_source(filename: &str) -> bool {
        filename != MAKEINC_FILE
            && !filename.ends_with(SCHEMA_EXT)
            && !filename.ends_with(TEST_SUFFIX)
            && filename.ends_with(SOURCE_EXT)
    }

    /// Route `filename` into exactly one bucket of `target`.
    ///
    /// `scan` is only consulted for sources; its imports are recorded on the
    /// unit and its cgo flag picks the cgo bucket for package units.
    pub fn classify(&self, target: &mut Target, filename: &str, scan: &ImportScan) -> FileClassification {
        if filename == MAKEINC_FILE {
            target.mark_makeinc();
            return FileClassification::IncludeFragment;
        }

        if filename.ends_with(SCHEMA_EXT) {
            target.append_proto(filename);
            return FileClassification::Schema;
        }

        if filename.ends_with(TEST_SUFFIX) {
            target.append_test(filename);
            return FileClassification::Test;
        }

        if !filename.ends_with(SOURCE_EXT) {
            return FileClassification::Ignored;
        }

        target.record_imports(scan.imports.iter().cloned());

        let kind = if scan.uses_cgo && target.mode().is_package() {
            SourceKind::Cgo
        } else {
            SourceKind::Go
        };
        let platform = self.vocabulary.classify(filename);
        target.append_source(kind, &platform, filename);

        FileClassification::Source { kind, platform }
    }
}
