//! Field extraction backends

use crate::config::{ExtractionBackend, ExtractionConfig};
use crate::error::{Result, ResumeRankerError};
use crate::extraction::fields::{ExtractionOutput, FieldRecord};
use crate::extraction::form_recognizer::FormRecognizerExtractor;
use crate::input::file_detector::FileType;
use crate::input::manager::ResumeDocument;
use log::debug;
use tokio::fs;

/// Produces the typed field tree of a resume.
pub trait FieldExtractor {
    fn extract(
        &self,
        document: &ResumeDocument,
    ) -> impl std::future::Future<Output = Result<Vec<FieldRecord>>> + Send;
}

/// Reads field trees that were extracted ahead of time.
///
/// A `.json` resume is itself the field file; any other resume is looked up
/// through its `<file>.fields.json` sidecar.
pub struct JsonFieldExtractor;

impl FieldExtractor for JsonFieldExtractor {
    async fn extract(&self, document: &ResumeDocument) -> Result<Vec<FieldRecord>> {
        let source = match document.file_type {
            FileType::Json => document.path.clone(),
            _ => document.sidecar_path(),
        };

        if !source.exists() {
            return Err(ResumeRankerError::Extraction(format!(
                "No extracted fields for {} (expected {})",
                document.file_name,
                source.display()
            )));
        }

        debug!("Reading extracted fields from {}", source.display());
        let content = fs::read_to_string(&source).await?;
        let output: ExtractionOutput = serde_json::from_str(&content)?;
        Ok(output.documents)
    }
}

/// Backend selected by configuration.
pub enum Extractor {
    Json(JsonFieldExtractor),
    FormRecognizer(FormRecognizerExtractor),
}

impl Extractor {
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        match config.backend {
            ExtractionBackend::Json => Ok(Extractor::Json(JsonFieldExtractor)),
            ExtractionBackend::FormRecognizer => {
                Ok(Extractor::FormRecognizer(FormRecognizerExtractor::new(config)?))
            }
        }
    }
}

impl FieldExtractor for Extractor {
    async fn extract(&self, document: &ResumeDocument) -> Result<Vec<FieldRecord>> {
        match self {
            Extractor::Json(extractor) => extractor.extract(document).await,
            Extractor::FormRecognizer(extractor) => extractor.extract(document).await,
        }
    }
}
