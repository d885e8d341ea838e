use super::errors::ReconError;
use super::models::{RunDir, Target};
use super::stages::{StageContext, StageDescriptor, default_pipeline};
use crate::config::ReconConfig;
use crate::executors::command::{StageOutcome, StageRunner};
use crate::executors::toolchain::Toolchain;
use crate::organizers::layout;
use crate::ui::printer;
use std::ffi::OsString;
use std::path::PathBuf;

/// The fixed recon sequence for one target, built once from configuration.
pub struct Pipeline {
    target: Target,
    templates: PathBuf,
    output_root: PathBuf,
    required_tools: Vec<String>,
    toolchain: Toolchain,
    stages: Vec<StageDescriptor>,
}

/// What a finished run leaves behind for reporting.
pub struct PipelineRun {
    pub run_dir: RunDir,
    pub outcomes: Vec<StageOutcome>,
}

impl Pipeline {
    pub fn new(
        target: Target,
        templates: PathBuf,
        output_root: Option<PathBuf>,
        config: &ReconConfig,
    ) -> Result<Self, ReconError> {
        let stages = default_pipeline(&config.redirect_params)
            .map_err(|e| ReconError::Config(format!("redirect_params: {}", e)))?;

        Ok(Self {
            target,
            templates,
            output_root: output_root.unwrap_or_else(|| config.output_root.clone()),
            required_tools: config.required_tools.clone(),
            toolchain: Toolchain::new(config.search_path.as_ref().map(OsString::from)),
            stages,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    /// Fails fast when any collaborator tool is absent.
    pub fn check_tools(&self) -> Result<(), ReconError> {
        self.toolchain.verify_or_bail(&self.required_tools)
    }

    /// Checks the toolchain, then runs every stage in order. Individual stage
    /// failures never stop the run.
    pub async fn run(&self) -> Result<PipelineRun, ReconError> {
        self.check_tools()?;
        printer::print_banner(&self.target);

        let run_dir = layout::prepare_run_dir(&self.output_root, &self.target)?;
        let runner = StageRunner::new(
            &self.toolchain,
            StageContext {
                domain: self.target.as_str(),
                templates: &self.templates,
                run_dir: &run_dir,
            },
        );

        let mut outcomes = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            outcomes.push(runner.run(stage).await);
        }

        Ok(PipelineRun { run_dir, outcomes })
    }
}
