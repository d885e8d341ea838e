use crate::core::errors::ReconError;
use crate::core::models::{RunDir, Target};
use std::fs;
use std::path::Path;

/// Creates `<output_root>/<domain>`. An existing directory is reused.
pub fn prepare_run_dir(output_root: &Path, target: &Target) -> Result<RunDir, ReconError> {
    let dir = RunDir::new(output_root, target);

    fs::create_dir_all(&dir.root).map_err(|source| ReconError::RunDir {
        path: dir.root.clone(),
        source,
    })?;

    tracing::info!("Run directory ready: {:?}", dir.root);
    Ok(dir)
}
