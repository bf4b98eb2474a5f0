use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tokio::task::JoinSet;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Result, ShabdError};
use crate::service::{RebuildResponse, TranslationService};
use crate::training::RawTrainingPair;

const TRANSLATED_SUFFIX: &str = "hi.txt";

/// Totals of a training file import
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub submitted: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub corpus_size: usize,
    pub rebuild: Option<RebuildResponse>,
}

/// File level operations on top of [`TranslationService`]
pub struct Workflow {
    config: Config,
    service: Arc<TranslationService>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let service = Arc::new(TranslationService::new(&config)?);
        Ok(Self { config, service })
    }

    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Translate one text file, writing to `output` or returning the text when `output` is `None`
    pub async fn translate_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Option<&Path>,
        preserve_formatting: bool,
    ) -> Result<String> {
        let input_path = input_path.as_ref();
        if !input_path.exists() {
            return Err(ShabdError::FileNotFound(input_path.display().to_string()));
        }

        let text = fs::read_to_string(input_path).await?;
        let translation = self.service.engine().translate(&text, preserve_formatting)?;

        if let Some(output_path) = output_path {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(output_path, &translation).await?;
            info!("Wrote translation: {}", output_path.display());
        }

        Ok(translation)
    }

    /// Translate every `.txt` file under `input_dir` on the blocking worker pool.
    ///
    /// Outputs are written as `<stem>.hi.txt`, mirroring the input tree under `output_dir`
    /// (or next to the inputs). Per-file failures are logged and skipped. Returns the number
    /// of files translated.
    pub async fn translate_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Option<Q>,
    ) -> Result<usize> {
        let input_dir = input_dir.as_ref();
        info!("Translating directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(ShabdError::Config("Input path is not a directory".to_string()));
        }

        let output_dir = match output_dir {
            Some(dir) => dir.as_ref().to_path_buf(),
            None => input_dir.to_path_buf(),
        };
        fs::create_dir_all(&output_dir).await?;

        let text_files = find_text_files(input_dir);
        info!("Found {} text files to translate", text_files.len());

        let preserve_formatting = self.config.engine.preserve_formatting;
        let mut tasks = JoinSet::new();
        for input_path in text_files {
            let output_path = output_path_for(input_dir, &output_dir, &input_path);
            let service = Arc::clone(&self.service);
            tasks.spawn_blocking(move || {
                let result = translate_one(&service, &input_path, &output_path, preserve_formatting);
                (input_path, result)
            });
        }

        let mut translated = 0;
        while let Some(joined) = tasks.join_next().await {
            let (input_path, result) = joined.map_err(|e| ShabdError::Task(e.to_string()))?;
            match result {
                Ok(()) => {
                    translated += 1;
                    info!("Translated: {}", input_path.display());
                }
                Err(e) => warn!("Failed to translate {}: {}", input_path.display(), e),
            }
        }

        info!("Translated {} files", translated);
        Ok(translated)
    }

    /// Load a JSON array of `{english, hindi}` pairs and submit it in batches
    pub async fn import_training_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        rebuild: bool,
    ) -> Result<ImportSummary> {
        let input_path = input_path.as_ref();
        if !input_path.exists() {
            return Err(ShabdError::FileNotFound(input_path.display().to_string()));
        }

        let content = fs::read_to_string(input_path).await?;
        let pairs: Vec<RawTrainingPair> = serde_json::from_str(&content)?;
        info!("Loaded {} training pairs from {}", pairs.len(), input_path.display());

        let batch_size = self.config.training.batch_size.max(1);
        let progress = ProgressBar::new(pairs.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs")
                .map_err(|e| ShabdError::Config(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );

        let mut summary = ImportSummary {
            submitted: pairs.len(),
            accepted: 0,
            rejected: 0,
            corpus_size: 0,
            rebuild: None,
        };

        for batch in pairs.chunks(batch_size) {
            let service = Arc::clone(&self.service);
            let batch = batch.to_vec();
            let batch_len = batch.len() as u64;
            let response = tokio::task::spawn_blocking(move || service.add_training_data(batch))
                .await
                .map_err(|e| ShabdError::Task(e.to_string()))?;

            if !response.success {
                progress.abandon();
                return Err(ShabdError::Persistence(response.message));
            }

            summary.accepted += response.accepted;
            summary.rejected += response.rejected;
            summary.corpus_size = response.pairs_count;
            progress.inc(batch_len);
        }
        progress.finish_with_message("training data added");

        if rebuild {
            let service = Arc::clone(&self.service);
            let response = tokio::task::spawn_blocking(move || service.rebuild_model())
                .await
                .map_err(|e| ShabdError::Task(e.to_string()))?;
            summary.rebuild = Some(response);
        }

        Ok(summary)
    }
}

fn find_text_files(input_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_source_text(path))
        .collect();
    files.sort();
    files
}

fn is_source_text(path: &Path) -> bool {
    let is_txt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    let already_translated = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(&format!(".{}", TRANSLATED_SUFFIX)));
    is_txt && !already_translated
}

fn output_path_for(input_dir: &Path, output_dir: &Path, input_path: &Path) -> PathBuf {
    let relative = input_path.strip_prefix(input_dir).unwrap_or(input_path);
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}.{}", stem, TRANSLATED_SUFFIX);

    match relative.parent() {
        Some(parent) => output_dir.join(parent).join(file_name),
        None => output_dir.join(file_name),
    }
}

fn translate_one(
    service: &TranslationService,
    input_path: &Path,
    output_path: &Path,
    preserve_formatting: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(input_path)?;
    let translation = service.engine().translate(&text, preserve_formatting)?;
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, translation)?;
    Ok(())
}
