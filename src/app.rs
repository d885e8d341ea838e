use crate::{
    config::ConfigLoader,
    core::{models::Target, pipeline::Pipeline},
    reporters::{summary::SummaryRecord, writer},
    ui::printer,
    utils::logging,
};
use anyhow::Result;

pub async fn run(cli: crate::cli::args::Cli) -> Result<()> {
    let start_time = std::time::Instant::now();

    logging::init(cli.log_level())?;

    let config = ConfigLoader::load(cli.config.as_deref())?;
    let target = Target::parse(&cli.domain)?;
    tracing::info!("Starting recon for target: {}", target);

    let pipeline = Pipeline::new(target, cli.templates, cli.output, &config)?;
    tracing::info!("Pipeline has {} stages", pipeline.stages().len());

    let run = pipeline.run().await?;

    let summary = SummaryRecord::collect(pipeline.target(), &run.run_dir);
    printer::print_summary(&summary, &run.outcomes, start_time.elapsed());
    writer::write_summary(&summary, &run.run_dir)?;

    Ok(())
}
