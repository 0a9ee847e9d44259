//! Report pipeline
//!
//! Runs the five stages in fixed order: load, persist, summarize, visualize,
//! export. A load failure aborts the run before anything is written. A
//! persistence failure is reported and the run continues. Failures in the
//! remaining stages end the run with an error.

use std::path::PathBuf;
use std::time::Instant;

use crate::charts::render_charts;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::loader::{LoadedInputs, load_inputs};
use crate::report::{ExportSummary, export_report};
use crate::stats::{DatasetSummary, summarize};
use crate::store::{PersistOutcome, persist_table};
use crate::utils::logging::{
    abandon_progress_bar, create_spinner, finish_and_clear, finish_progress_bar, log_warning,
    print_dataset_summary, print_table_summary,
};

/// Everything a completed run produced
#[derive(Debug)]
pub struct PipelineReport {
    pub persistence: PersistOutcome,
    pub summary: DatasetSummary,
    pub charts: Vec<PathBuf>,
    pub export: ExportSummary,
}

/// The batch pipeline for one configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all stages
    pub fn run(&self) -> Result<PipelineReport> {
        let start = Instant::now();
        log::info!("Starting report pipeline");
        log::debug!("{}", self.config);

        // [1/5] Load; errors here are fatal
        log::info!("[Step 1/5] Loading input files");
        let spinner = create_spinner(Some("Loading input files"), self.config.show_progress);
        let loaded = load_inputs(&self.config);
        finish_and_clear(&spinner);
        let inputs = match loaded {
            Ok(inputs) => inputs,
            Err(e) => {
                println!("Error loading files: {e}");
                return Err(e);
            }
        };
        println!("Files loaded successfully");
        print_table_summary(&inputs.patients);
        print_table_summary(&inputs.mapping);

        // [2/5] Persist; errors here are reported and swallowed
        log::info!("[Step 2/5] Persisting encounters");
        let persistence = self.persist(&inputs);

        // [3/5] Summarize
        log::info!("[Step 3/5] Summarizing dataset");
        let summary = summarize(&inputs.patients, &inputs.mapping)?;
        print_dataset_summary(&summary);

        // [4/5] Visualize
        log::info!("[Step 4/5] Rendering charts");
        let spinner = create_spinner(Some("Rendering charts"), self.config.show_progress);
        let charts = match render_charts(&inputs.patients, &self.config.charts_dir) {
            Ok(charts) => {
                finish_progress_bar(&spinner, Some("Charts rendered"));
                charts
            }
            Err(e) => {
                abandon_progress_bar(&spinner, "Chart rendering failed");
                return Err(e);
            }
        };

        // [5/5] Export
        log::info!("[Step 5/5] Exporting spreadsheet report");
        let export = export_report(&inputs.patients, &inputs.mapping, &self.config.report_path)?;

        println!();
        println!("Report saved as '{}'", export.path.display());
        println!("Charts saved inside '{}' folder", self.config.charts_dir.display());
        log::info!("Pipeline completed in {:?}", start.elapsed());

        Ok(PipelineReport {
            persistence,
            summary,
            charts,
            export,
        })
    }

    fn persist(&self, inputs: &LoadedInputs) -> PersistOutcome {
        let store = &self.config.store;
        if !store.enabled {
            log::info!("Persistence disabled, skipping database load");
            return PersistOutcome::Skipped;
        }

        match persist_table(&inputs.patients, store, self.config.show_progress) {
            Ok(report) => {
                println!(
                    "Data inserted into database successfully ({} new, {} already present)",
                    report.rows_inserted, report.rows_skipped
                );
                PersistOutcome::Stored(report)
            }
            Err(e) => {
                println!("Database insertion error: {e}");
                log_warning("Continuing without persistence", Some(&store.path));
                PersistOutcome::Failed(e)
            }
        }
    }
}
