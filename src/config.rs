use crate::error::{GenError, GenResult};
use crate::resolver::PlatformVocabulary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working root.
pub const CONFIG_FILE: &str = "genmake.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenConfig {
    /// Package root, relative to the working root
    pub pkg_dir: PathBuf,

    /// Command root, relative to the working root
    pub cmd_dir: PathBuf,

    /// Directory names never descended into
    pub skip_dirs: Vec<String>,

    /// List external dependencies in Make.deps and each Makefile
    pub emit_external_deps: bool,

    pub platforms: PlatformsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformsConfig {
    pub os: Vec<String>,
    pub arch: Vec<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            pkg_dir: PathBuf::from("src/pkg"),
            cmd_dir: PathBuf::from("src/cmd"),
            skip_dirs: vec!["_obj".to_string(), "_test".to_string(), "testdata".to_string()],
            emit_external_deps: false,
            platforms: PlatformsConfig::default(),
        }
    }
}

impl Default for PlatformsConfig {
    fn default() -> Self {
        let vocabulary = PlatformVocabulary::default();
        Self {
            os: vocabulary.os().map(String::from).collect(),
            arch: vocabulary.arch().map(String::from).collect(),
        }
    }
}

impl GenConfig {
    pub fn from_toml(path: &Path, content: &str) -> GenResult<Self> {
        let config: GenConfig = toml::from_str(content).map_err(|e| GenError::config(path, e))?;
        config
            .vocabulary()
            .map_err(|e| GenError::config(path, e))?;
        Ok(config)
    }

    pub fn load(path: &Path) -> GenResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Self::from_toml(path, &content)
    }

    /// Load `explicit` if given, else `<root>/genmake.toml` when present,
    /// else the defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> GenResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn vocabulary(&self) -> GenResult<PlatformVocabulary> {
        PlatformVocabulary::new(self.platforms.os.iter().cloned(), self.platforms.arch.iter().cloned())
    }

    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenConfig::default();
        assert_eq!(config.pkg_dir, PathBuf::from("src/pkg"));
        assert!(config.is_skipped_dir("testdata"));
        assert!(!config.emit_external_deps);

        let vocabulary = config.vocabulary().unwrap();
        assert!(vocabulary.is_os("linux"));
        assert!(vocabulary.is_arch("386"));
        assert!(vocabulary.is_arch("amd64"));
    }

    #[test]
    fn test_partial_file() {
        let content = r#"
emit_external_deps = true

[platforms]
os = ["linux", "darwin"]
"#;
        let config = GenConfig::from_toml(Path::new("genmake.toml"), content).unwrap();
        assert!(config.emit_external_deps);
        assert_eq!(config.cmd_dir, PathBuf::from("src/cmd"));
        assert_eq!(config.platforms.os, vec!["linux", "darwin"]);
        assert_eq!(config.platforms.arch, vec!["386", "amd64"]);
    }

    #[test]
    fn test_invalid_files() {
        let path = Path::new("genmake.toml");
        assert!(GenConfig::from_toml(path, "unknown_key = 1").is_err());
        assert!(GenConfig::from_toml(path, "[platforms]\narch = [\"x86-64\"]").is_err());
        assert!(GenConfig::from_toml(path, "pkg_dir = [").is_err());
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenConfig::discover(dir.path(), None).unwrap();
        assert_eq!(config, GenConfig::default());
    }
}
