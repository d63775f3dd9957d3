use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::document::{self, Page, PageSelection};
use crate::file_utils::FileManager;
use crate::providers::{ConfiguredProviderFactory, ProviderFactory};
use crate::report::{self, StructureReport};
use crate::translation::pipeline::{PagePipeline, PageProgress, RunSummary};
use crate::translation::TranslationClient;

// @module: Application controller for page translation runs

/// What a single run should do
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub selection: PageSelection,
    /// Previous JSON report; only its failed pages are translated again
    pub retry_failed: Option<PathBuf>,
    /// Also write the structure report
    pub structure: bool,
    pub force_overwrite: bool,
}

impl RunOptions {
    pub fn new(input_file: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            output_dir: output_dir.into(),
            selection: PageSelection::All,
            retry_failed: None,
            structure: false,
            force_overwrite: false,
        }
    }
}

/// Files written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub structure: PathBuf,
    pub log: PathBuf,
}

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub outputs: OutputPaths,
    /// Pages handed to the translator
    pub pages_selected: usize,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Opens provider connections
    factory: Arc<dyn ProviderFactory>,
}

impl Controller {
    /// Create a controller for the provider named in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        let factory = ConfiguredProviderFactory::shared(
            &config.translation,
            &config.source_language,
            &config.target_language,
        );
        Ok(Self { config, factory })
    }

    /// Create a controller around an existing provider factory
    pub fn with_factory(config: Config, factory: Arc<dyn ProviderFactory>) -> Self {
        Self { config, factory }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Report paths for an input file
    pub fn output_paths(&self, input_file: &Path, output_dir: &Path) -> OutputPaths {
        let target = &self.config.target_language;
        OutputPaths {
            json: FileManager::generate_output_path(input_file, output_dir, target, "", "json"),
            csv: FileManager::generate_output_path(input_file, output_dir, target, "", "csv"),
            structure: FileManager::generate_output_path(input_file, output_dir, target, "structure", "json"),
            log: output_dir.join("pagewise.log"),
        }
    }

    /// Apply the page selection and the failed-page filter
    pub fn select_pages(&self, pages: &[Page], options: &RunOptions) -> Result<Vec<Page>> {
        let mut selected = options.selection.apply(pages);

        if let Some(previous) = &options.retry_failed {
            let content = FileManager::read_to_string(previous)?;
            let failed = document::failed_pages_from_report(&content)
                .with_context(|| format!("Failed to read previous report {:?}", previous))?;
            info!("Previous report lists {} failed pages", failed.len());
            selected.retain(|page| failed.contains(&page.page_number));
        }

        Ok(selected)
    }

    /// Run the whole workflow; `Ok(None)` when outputs exist and overwrite is off
    pub async fn run(&self, options: RunOptions) -> Result<Option<RunReport>> {
        if !FileManager::file_exists(&options.input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", options.input_file));
        }

        FileManager::ensure_dir(&options.output_dir)?;
        let outputs = self.output_paths(&options.input_file, &options.output_dir);
        if outputs.json.exists() && !options.force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(None);
        }

        let pages = document::load_pages(&options.input_file)?;
        let selected = self.select_pages(&pages, &options)?;
        if selected.is_empty() {
            warn!("No pages selected, nothing to translate");
        }

        self.check_provider().await;

        info!(
            "pagewise: {} - {} ({} -> {})",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            self.config.source_language,
            self.config.target_language
        );

        let client = TranslationClient::from_config(Arc::clone(&self.factory), &self.config);
        let pipeline = PagePipeline::new(client.clone(), &self.config);

        let progress_bar = Self::page_progress_bar(selected.len() as u64);
        let pb = progress_bar.clone();
        let run = pipeline
            .translate_pages(
                &selected,
                Some(Box::new(move |progress: PageProgress| {
                    pb.set_position(progress.completed as u64);
                    pb.set_message(format!("page {} {}", progress.page_number, progress.status));
                })),
            )
            .await;
        progress_bar.finish_and_clear();

        report::write_json_summary(&outputs.json, &run.results)?;
        report::write_csv(&outputs.csv, &run.results)?;
        if options.structure {
            let structure = StructureReport::build(&pages, &run.results, pipeline.translator().classifier());
            report::write_structure(&outputs.structure, &structure)?;
        }

        if let Some(cache) = client.cache() {
            let stats = cache.stats();
            debug!("Cache: {} hits, {} misses ({:.0}% hit rate)", stats.hits, stats.misses, stats.hit_rate() * 100.0);
        }

        for line in run.summary.summary().lines() {
            info!("{}", line);
        }
        info!("Total time: {}", Self::format_duration(Duration::from_secs_f64(run.summary.elapsed_seconds)));
        info!("Success: {}", outputs.json.display());

        FileManager::append_to_log_file(
            &outputs.log,
            &format!(
                "{:?}: {} pages, {} successful, {} failed, {:.1}s",
                options.input_file,
                run.summary.total_pages,
                run.summary.successful,
                run.summary.failed,
                run.summary.elapsed_seconds
            ),
        )?;

        Ok(Some(RunReport {
            summary: run.summary,
            outputs,
            pages_selected: selected.len(),
        }))
    }

    // A failed check is only a warning; every call still retries on its own
    async fn check_provider(&self) {
        let timeout = Duration::from_secs(self.config.translation.common.timeout_base_secs);
        let result = match self.factory.connect(timeout) {
            Ok(provider) => provider.test_connection().await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("{} connection check failed: {}", self.factory.name(), e);
        }
    }

    fn page_progress_bar(total: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
