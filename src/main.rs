use diabetes_report::{PersistOutcome, Pipeline, PipelineConfig};
use log::{error, info, warn};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from_env()?;
    info!("{config}");

    match Pipeline::new(config).run() {
        Ok(report) => {
            if let PersistOutcome::Failed(e) = &report.persistence {
                warn!("Report produced without database persistence: {e}");
            }
            info!(
                "Wrote {} charts and {} sheets to {}",
                report.charts.len(),
                report.export.sheets.len(),
                report.export.path.display()
            );
            Ok(())
        }
        Err(e) if e.is_fatal_load() => {
            error!("{e}");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
