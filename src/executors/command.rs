use crate::core::errors::ReconError;
use crate::core::stages::{StageContext, StageDescriptor, StageOutput, apply_filters};
use crate::executors::toolchain::Toolchain;
use crate::ui::printer;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    /// The external program ran to completion with this exit code.
    Exited(i32),
    /// The external program was killed by a signal.
    Terminated,
    /// The program could not be started at all.
    SpawnFailed(String),
    /// The program ran but waiting on it or reading its output failed.
    Failed(String),
    /// In-process filter stage finished.
    Completed,
}

impl StageStatus {
    pub fn success(&self) -> bool {
        matches!(self, StageStatus::Exited(0) | StageStatus::Completed)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Exited(code) => write!(f, "exited with status {}", code),
            StageStatus::Terminated => f.write_str("terminated by signal"),
            StageStatus::SpawnFailed(reason) => write!(f, "could not start: {}", reason),
            StageStatus::Failed(reason) => write!(f, "failed: {}", reason),
            StageStatus::Completed => f.write_str("completed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub name: &'static str,
    pub output: StageOutput,
    pub status: StageStatus,
    pub lines_written: usize,
    pub duration: Duration,
}

/// Runs stages one at a time. A stage that fails is reported through its
/// [`StageOutcome`], including a stage whose output file cannot be written.
pub struct StageRunner<'a> {
    toolchain: &'a Toolchain,
    ctx: StageContext<'a>,
}

impl<'a> StageRunner<'a> {
    pub fn new(toolchain: &'a Toolchain, ctx: StageContext<'a>) -> Self {
        Self { toolchain, ctx }
    }

    pub async fn run(&self, stage: &StageDescriptor) -> StageOutcome {
        let start = Instant::now();
        printer::print_stage_header(stage.description);
        tracing::info!("Stage started: {}", stage.name);

        let (status, written) = match self.execute(stage).await {
            Ok(result) => result,
            Err(e) => (StageStatus::Failed(e.to_string()), 0),
        };
        self.finish(stage, status, written, start)
    }

    async fn execute(&self, stage: &StageDescriptor) -> Result<(StageStatus, usize), ReconError> {
        let out_path = self.ctx.run_dir.path_of(stage.output);
        let mut sink = StageSink::create(&out_path, stage.dedup).await?;
        let input = stage.input.map(|i| self.ctx.run_dir.path_of(i));

        let status = match &stage.invocation {
            Some(invocation) => {
                let Some(program) = self.toolchain.resolve(invocation.program) else {
                    let reason = format!("{} not found on search path", invocation.program);
                    sink.finish().await?;
                    return Ok((StageStatus::SpawnFailed(reason), 0));
                };
                let args = invocation.render_args(&self.ctx);
                tracing::debug!(
                    "Executing: {} {}",
                    program.display(),
                    shell_words::join(args.iter().map(|a| a.to_string_lossy()))
                );
                self.run_program(&program, &args, input.as_deref(), stage, &mut sink)
                    .await?
            }
            None => {
                let bytes = match input.as_deref() {
                    Some(path) => tokio::fs::read(path).await.unwrap_or_default(),
                    None => Vec::new(),
                };
                for line in String::from_utf8_lossy(&bytes).lines() {
                    if let Some(line) = apply_filters(&stage.filters, line.to_string()) {
                        sink.accept(line).await?;
                    }
                }
                StageStatus::Completed
            }
        };

        let written = sink.finish().await?;
        Ok((status, written))
    }

    async fn run_program(
        &self,
        program: &Path,
        args: &[std::ffi::OsString],
        input: Option<&Path>,
        stage: &StageDescriptor,
        sink: &mut StageSink,
    ) -> Result<StageStatus, ReconError> {
        let stdin = match input {
            Some(path) => match std::fs::File::open(path) {
                Ok(file) => Stdio::from(file),
                Err(e) => {
                    tracing::warn!("Input {:?} unavailable for {}: {}", path, stage.name, e);
                    Stdio::null()
                }
            },
            None => Stdio::null(),
        };

        let mut child = match Command::new(program)
            .args(args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return Ok(StageStatus::SpawnFailed(e.to_string())),
        };

        let Some(stdout) = child.stdout.take() else {
            return Ok(StageStatus::Failed("stdout was not captured".into()));
        };

        let mut segments = BufReader::new(stdout).split(b'\n');
        let mut read_error = None;
        loop {
            match segments.next_segment().await {
                Ok(Some(segment)) if stage.filters.is_empty() => sink.accept_raw(segment).await?,
                Ok(Some(segment)) => {
                    let line = String::from_utf8_lossy(&segment)
                        .trim_end_matches('\r')
                        .to_string();
                    if let Some(line) = apply_filters(&stage.filters, line) {
                        sink.accept(line).await?;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    read_error = Some(e);
                    break;
                }
            }
        }

        let status = match child.wait().await {
            Ok(status) => match status.code() {
                Some(code) => StageStatus::Exited(code),
                None => StageStatus::Terminated,
            },
            Err(e) => StageStatus::Failed(e.to_string()),
        };

        match read_error {
            Some(e) if status.success() => Ok(StageStatus::Failed(e.to_string())),
            _ => Ok(status),
        }
    }

    fn finish(
        &self,
        stage: &StageDescriptor,
        status: StageStatus,
        lines_written: usize,
        start: Instant,
    ) -> StageOutcome {
        let outcome = StageOutcome {
            name: stage.name,
            output: stage.output,
            status,
            lines_written,
            duration: start.elapsed(),
        };

        if outcome.status.success() {
            tracing::info!(
                "Stage completed: {} ({} lines in {:?})",
                outcome.name,
                outcome.lines_written,
                outcome.duration
            );
        } else {
            tracing::debug!("Stage {} {}", outcome.name, outcome.status);
            printer::print_stage_warning(&outcome);
        }

        outcome
    }
}

/// Tees accepted lines to the console and the stage file. Unfiltered tool
/// output is written byte for byte. Deduplicating sinks hold everything back
/// until the producer is done.
struct StageSink {
    path: PathBuf,
    file: BufWriter<File>,
    pending: Option<Vec<String>>,
    written: usize,
}

impl StageSink {
    async fn create(path: &Path, dedup: bool) -> Result<Self, ReconError> {
        let file = File::create(path)
            .await
            .map_err(|source| ReconError::StageFile {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file: BufWriter::new(file),
            pending: dedup.then(Vec::new),
            written: 0,
        })
    }

    async fn accept(&mut self, line: String) -> Result<(), ReconError> {
        match &mut self.pending {
            Some(buffer) => {
                buffer.push(line);
                Ok(())
            }
            None => self.emit(line.as_bytes()).await,
        }
    }

    async fn accept_raw(&mut self, bytes: Vec<u8>) -> Result<(), ReconError> {
        match &mut self.pending {
            Some(buffer) => {
                let line = String::from_utf8_lossy(&bytes);
                buffer.push(line.trim_end_matches('\r').to_string());
                Ok(())
            }
            None => self.emit(&bytes).await,
        }
    }

    async fn emit(&mut self, line: &[u8]) -> Result<(), ReconError> {
        println!("{}", String::from_utf8_lossy(line));
        self.file
            .write_all(line)
            .await
            .map_err(|source| self.error(source))?;
        self.file
            .write_all(b"\n")
            .await
            .map_err(|source| self.error(source))?;
        self.written += 1;
        Ok(())
    }

    async fn finish(mut self) -> Result<usize, ReconError> {
        if let Some(mut buffer) = self.pending.take() {
            buffer.sort();
            buffer.dedup();
            for line in buffer {
                self.emit(line.as_bytes()).await?;
            }
        }

        self.file.flush().await.map_err(|source| self.error(source))?;
        Ok(self.written)
    }

    fn error(&self, source: std::io::Error) -> ReconError {
        ReconError::StageFile {
            path: self.path.clone(),
            source,
        }
    }
}
