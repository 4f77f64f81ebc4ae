use crate::error::{GenError, GenResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

// TODO: accept the "bsd" and "unix" group tokens once the vocabulary can map
// one token onto several operating systems.

static PLATFORM_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+$").unwrap()
});

/// Platform applicability encoded in a filename's trailing `_`-tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Generic,
    Arch(String),
    Os(String),
    OsArch { os: String, arch: String },
}

impl Platform {
    /// Bucket key used in descriptor variable names, e.g. `linux_amd64`.
    pub fn key(&self) -> Option<String> {
        match self {
            Platform::Generic => None,
            Platform::Arch(arch) => Some(arch.clone()),
            Platform::Os(os) => Some(os.clone()),
            Platform::OsArch { os, arch } => Some(format!("{}_{}", os, arch)),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Generic => write!(f, "generic"),
            Platform::Arch(arch) => write!(f, "arch {}", arch),
            Platform::Os(os) => write!(f, "os {}", os),
            Platform::OsArch { os, arch } => write!(f, "os+arch {}_{}", os, arch),
        }
    }
}

/// Closed sets of operating systems and architectures recognised in suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVocabulary {
    os: BTreeSet<String>,
    arch: BTreeSet<String>,
}

impl Default for PlatformVocabulary {
    fn default() -> Self {
        Self {
            os: ["linux"].iter().map(|s| s.to_string()).collect(),
            arch: ["amd64", "386"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PlatformVocabulary {
    pub fn new<I, J>(os: I, arch: J) -> GenResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        let os = validate_tokens("os", os)?;
        let arch = validate_tokens("arch", arch)?;

        if let Some(shared) = os.intersection(&arch).next() {
            return Err(GenError::InvalidVocabulary(format!(
                "'{}' is listed both as an os and as an arch",
                shared
            )));
        }

        Ok(Self { os, arch })
    }

    pub fn is_os(&self, token: &str) -> bool {
        self.os.contains(token)
    }

    pub fn is_arch(&self, token: &str) -> bool {
        self.arch.contains(token)
    }

    pub fn os(&self) -> impl Iterator<Item = &str> {
        self.os.iter().map(String::as_str)
    }

    pub fn arch(&self) -> impl Iterator<Item = &str> {
        self.arch.iter().map(String::as_str)
    }

    /// Classify a bare filename by its platform suffix.
    ///
    /// Shapes are tried as `_<os>_<arch>`, then `_<arch>`, then `_<os>`; a
    /// shape whose tokens are not in the vocabulary falls through to the next
    /// one, and a name matching none of them is [`Platform::Generic`].
    pub fn classify(&self, filename: &str) -> Platform {
        let parts: Vec<&str> = filename.split('_').collect();
        if parts.len() < 2 {
            return Platform::Generic;
        }

        let last = parts[parts.len() - 1];
        let last = last.split('.').next().unwrap_or(last);
        let before_last = parts[parts.len() - 2];

        if self.is_os(before_last) && self.is_arch(last) {
            return Platform::OsArch {
                os: before_last.to_string(),
                arch: last.to_string(),
            };
        }

        if self.is_arch(last) {
            return Platform::Arch(last.to_string());
        }

        if self.is_os(last) {
            return Platform::Os(last.to_string());
        }

        Platform::Generic
    }
}

fn validate_tokens<I>(what: &str, tokens: I) -> GenResult<BTreeSet<String>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut set = BTreeSet::new();
    for token in tokens {
        let token = token.into();
        if !PLATFORM_TOKEN_REGEX.is_match(&token) {
            return Err(GenError::InvalidVocabulary(format!(
                "{} token '{}' must be lowercase alphanumeric",
                what, token
            )));
        }
        set.insert(token);
    }

    if set.is_empty() {
        return Err(GenError::InvalidVocabulary(format!("{} list is empty", what)));
    }

    Ok(set)
}

/// Classify `filename` against the default vocabulary.
pub fn classify_suffix(filename: &str) -> Platform {
    static DEFAULT: Lazy<PlatformVocabulary> = Lazy::new(PlatformVocabulary::default);
    DEFAULT.classify(filename)
}
