use crate::core::errors::ReconError;
use std::ffi::OsString;
use std::path::PathBuf;

/// Resolves collaborator executables against one search path, shared by the
/// upfront availability check and the stage runner.
#[derive(Clone, Debug)]
pub struct Toolchain {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl Toolchain {
    pub fn new(search_path: Option<OsString>) -> Self {
        Self {
            search_path: search_path.or_else(|| std::env::var_os("PATH")),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which_in(program, self.search_path.as_ref(), &self.cwd).ok()
    }

    /// Unresolved tools, in the order given.
    pub fn missing(&self, tools: &[String]) -> Vec<String> {
        tools
            .iter()
            .filter(|tool| match self.resolve(tool) {
                Some(path) => {
                    tracing::debug!("Found {}: {:?}", tool, path);
                    false
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn verify_or_bail(&self, tools: &[String]) -> Result<(), ReconError> {
        let missing = self.missing(tools);
        if !missing.is_empty() {
            return Err(ReconError::MissingTools(missing));
        }

        tracing::info!("All required tools found");
        Ok(())
    }
}
