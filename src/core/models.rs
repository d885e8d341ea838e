use super::errors::ReconError;
use super::stages::StageOutput;
use std::fmt;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.txt";

/// Domain under reconnaissance. Doubles as the run directory name and as a
/// tool argument, so anything that could escape either role is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    domain: String,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, ReconError> {
        let domain = raw.trim();
        let reject = |reason| {
            Err(ReconError::InvalidTarget {
                domain: raw.to_string(),
                reason,
            })
        };

        if domain.is_empty() {
            return reject("domain is empty");
        }
        if domain == "." || domain == ".." {
            return reject("domain cannot be a relative path component");
        }
        if domain.starts_with('-') {
            return reject("domain cannot start with '-'");
        }
        if domain
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_whitespace())
        {
            return reject("domain contains a path separator or whitespace");
        }

        Ok(Self {
            domain: domain.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}

/// `<output_root>/<domain>`, owner of every file a run produces.
#[derive(Clone, Debug)]
pub struct RunDir {
    pub root: PathBuf,
}

impl RunDir {
    pub fn new(output_root: &Path, target: &Target) -> Self {
        Self {
            root: output_root.join(target.as_str()),
        }
    }

    pub fn path_of(&self, output: StageOutput) -> PathBuf {
        self.root.join(output.file_name())
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }
}
