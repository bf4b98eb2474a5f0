use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::engine::TranslationEngine;
use crate::error::{Result, ShabdError};
use crate::store::{LookupStore, TrainingPair};
use crate::training::{NaivePositionalAligner, RawTrainingPair, TrainingIngestor};

const SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
    pub source_text: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddDataResponse {
    pub success: bool,
    pub message: String,
    pub pairs_count: usize,
    pub accepted: usize,
    pub rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RebuildResponse {
    pub success: bool,
    pub message: String,
    pub word_map_size: usize,
    pub phrase_map_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub word_map_size: usize,
    pub phrase_map_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataStatusResponse {
    pub exists: bool,
    pub count: usize,
    pub sample: Vec<TrainingPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Operations offered to a request layer.
///
/// Every failure is reported inside the response (`success: false` plus a message); none of
/// these methods return an error or panic.
pub struct TranslationService {
    store: Arc<LookupStore>,
    engine: TranslationEngine,
    ingestor: TrainingIngestor,
}

impl TranslationService {
    /// Build the service over the configured documents and load whatever tables exist
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(LookupStore::new(&config.store));
        store.load()?;

        let aligner = NaivePositionalAligner::from_config(&config.training);
        Ok(Self::with_parts(
            Arc::clone(&store),
            TranslationEngine::new(Arc::clone(&store), &config.engine),
            TrainingIngestor::new(store, Box::new(aligner)),
        ))
    }

    pub fn with_parts(
        store: Arc<LookupStore>,
        engine: TranslationEngine,
        ingestor: TrainingIngestor,
    ) -> Self {
        Self {
            store,
            engine,
            ingestor,
        }
    }

    pub fn store(&self) -> &Arc<LookupStore> {
        &self.store
    }

    pub fn engine(&self) -> &TranslationEngine {
        &self.engine
    }

    pub fn translate(&self, text: &str, preserve_formatting: bool) -> TranslateResponse {
        match self.engine.translate(text, preserve_formatting) {
            Ok(translation) => TranslateResponse {
                translation,
                source_text: text.to_string(),
                success: true,
                error: None,
                error_kind: None,
            },
            Err(e) => {
                log_failure("translate", &e);
                TranslateResponse {
                    translation: String::new(),
                    source_text: text.to_string(),
                    success: false,
                    error: Some(e.to_string()),
                    error_kind: Some(e.kind()),
                }
            }
        }
    }

    pub fn add_training_data(&self, pairs: Vec<RawTrainingPair>) -> AddDataResponse {
        let submitted = pairs.len();
        match self.ingestor.add_pairs(pairs) {
            Ok(outcome) => AddDataResponse {
                success: true,
                message: format!(
                    "Added {} of {} training pairs",
                    outcome.accepted, submitted
                ),
                pairs_count: outcome.corpus_size,
                accepted: outcome.accepted,
                rejected: outcome.rejected,
                error_kind: None,
            },
            Err(e) => {
                log_failure("add training data", &e);
                AddDataResponse {
                    success: false,
                    message: e.to_string(),
                    pairs_count: self.corpus_size(),
                    accepted: 0,
                    rejected: 0,
                    error_kind: Some(e.kind()),
                }
            }
        }
    }

    pub fn rebuild_model(&self) -> RebuildResponse {
        match self.ingestor.rebuild() {
            Ok(outcome) => RebuildResponse {
                success: true,
                message: format!(
                    "Model rebuilt from {} training pairs",
                    outcome.corpus_size
                ),
                word_map_size: outcome.word_map_size,
                phrase_map_size: outcome.phrase_map_size,
                error_kind: None,
            },
            Err(e) => {
                log_failure("rebuild model", &e);
                let tables = self.store.snapshot();
                RebuildResponse {
                    success: false,
                    message: e.to_string(),
                    word_map_size: tables.word_map.len(),
                    phrase_map_size: tables.phrase_map.len(),
                    error_kind: Some(e.kind()),
                }
            }
        }
    }

    /// Both sizes come from one snapshot, never from two different publishes
    pub fn health(&self) -> HealthResponse {
        let tables = self.store.snapshot();
        HealthResponse {
            status: "healthy",
            model_loaded: self.store.is_loaded(),
            word_map_size: tables.word_map.len(),
            phrase_map_size: tables.phrase_map.len(),
        }
    }

    pub fn data_status(&self) -> DataStatusResponse {
        match self.ingestor.corpus() {
            Ok(Some(corpus)) => DataStatusResponse {
                exists: true,
                count: corpus.len(),
                sample: corpus.into_iter().take(SAMPLE_SIZE).collect(),
                error: None,
            },
            Ok(None) => DataStatusResponse {
                exists: false,
                count: 0,
                sample: Vec::new(),
                error: None,
            },
            Err(e) => {
                log_failure("read training data", &e);
                DataStatusResponse {
                    exists: true,
                    count: 0,
                    sample: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn corpus_size(&self) -> usize {
        self.ingestor
            .corpus()
            .ok()
            .flatten()
            .map_or(0, |corpus| corpus.len())
    }
}

fn log_failure(operation: &str, e: &ShabdError) {
    match e {
        ShabdError::EmptyInput | ShabdError::MissingCorpus => {
            info!("Rejected {}: {}", operation, e)
        }
        _ => error!("Failed to {}: {}", operation, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn service_in(dir: &std::path::Path) -> TranslationService {
        let config = Config {
            store: StoreConfig {
                data_dir: dir.to_path_buf(),
                ..StoreConfig::default()
            },
            ..Config::default()
        };
        TranslationService::new(&config).unwrap()
    }

    #[test]
    fn test_empty_translate_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        let response = service.translate("   ", true);
        assert!(!response.success);
        assert_eq!(response.error_kind, Some("empty_input"));
        assert!(response.translation.is_empty());
    }

    #[test]
    fn test_rebuild_without_data_reports_missing_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        let response = service.rebuild_model();
        assert!(!response.success);
        assert_eq!(response.error_kind, Some("missing_corpus"));
    }

    #[test]
    fn test_health_reflects_training() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        let health = service.health();
        assert!(!health.model_loaded);
        assert_eq!(health.word_map_size, 0);

        service.add_training_data(vec![RawTrainingPair::new("Good night", "शुभ रात्रि")]);
        let health = service.health();
        assert!(health.model_loaded);
        assert_eq!(health.word_map_size, 2);
        assert_eq!(health.phrase_map_size, 1);
    }

    #[test]
    fn test_add_training_data_reports_write_failure_and_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be makes every write fail
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let service = service_in(&blocker);

        let response = service.add_training_data(vec![RawTrainingPair::new("Yes", "हाँ")]);
        assert!(!response.success);
        assert_eq!(response.error_kind, Some("persistence"));
        assert_eq!(response.pairs_count, 0);

        let health = service.health();
        assert!(health.model_loaded);
        assert_eq!(health.word_map_size, 1);
        assert_eq!(service.translate("Yes", true).translation, "हाँ");
    }

    #[test]
    fn test_rebuild_reports_write_failure_and_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        service.add_training_data(vec![RawTrainingPair::new("Thank you", "धन्यवाद")]);

        // A non-empty directory in place of the phrase map cannot be replaced by a rename
        let phrase_map = dir.path().join("phrase_map.json");
        std::fs::remove_file(&phrase_map).unwrap();
        std::fs::create_dir(&phrase_map).unwrap();
        std::fs::write(phrase_map.join("occupied"), "").unwrap();

        let response = service.rebuild_model();
        assert!(!response.success);
        assert_eq!(response.error_kind, Some("persistence"));
        assert_eq!(response.phrase_map_size, 1);

        let health = service.health();
        assert_eq!(health.word_map_size, response.word_map_size);
        assert_eq!(service.translate("Thank you", true).translation, "धन्यवाद");
    }

    #[test]
    fn test_data_status_sample_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        let status = service.data_status();
        assert!(!status.exists);
        assert_eq!(status.count, 0);

        let pairs = (1..=5)
            .map(|i| RawTrainingPair::new(format!("Item {}", i), format!("वस्तु {}", i)))
            .collect();
        service.add_training_data(pairs);

        let status = service.data_status();
        assert!(status.exists);
        assert_eq!(status.count, 5);
        assert_eq!(status.sample.len(), 3);
        assert_eq!(status.sample[0], TrainingPair::new("Item 1", "वस्तु 1"));
    }

    #[test]
    fn test_responses_serialize_without_empty_errors() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path());
        let json = serde_json::to_value(service.health()).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["model_loaded"], false);

        service.add_training_data(vec![RawTrainingPair::new("Hi", "नमस्ते")]);
        let json = serde_json::to_value(service.translate("Hi", true)).unwrap();
        assert_eq!(json["translation"], "नमस्ते");
        assert!(json.get("error").is_none());
    }
}
