//! Client for Form Recognizer compatible document analysis services
//!
//! A document is submitted to a custom extraction model, the returned
//! operation is polled until it settles, and the typed fields of every
//! analyzed document are decoded into [`ExtractedField`] trees.

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeRankerError};
use crate::extraction::extractor::FieldExtractor;
use crate::extraction::fields::{ExtractedField, FieldRecord};
use crate::input::file_detector::content_type;
use crate::input::manager::ResumeDocument;
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::fs;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";
const MAX_BACKOFF: Duration = Duration::from_secs(30);

pub struct FormRecognizerExtractor {
    client: Client,
    endpoint: String,
    api_key: String,
    model_id: String,
    api_version: String,
    max_retries: u32,
    retry_backoff: Duration,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    analyze_result: Option<AnalyzeResult>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    documents: Vec<AnalyzedDocument>,
}

#[derive(Debug, Deserialize)]
struct AnalyzedDocument {
    #[serde(default)]
    fields: BTreeMap<String, DocumentField>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ServiceError,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    code: String,
    message: String,
}

/// A field as the service reports it: a type tag plus the matching value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentField {
    #[serde(rename = "type")]
    field_type: Option<String>,
    value_string: Option<String>,
    value_array: Option<Vec<DocumentField>>,
    value_object: Option<BTreeMap<String, DocumentField>>,
    content: Option<String>,
}

impl DocumentField {
    fn into_extracted(self) -> ExtractedField {
        match self.field_type.as_deref() {
            Some("array") => ExtractedField::List(
                self.value_array
                    .unwrap_or_default()
                    .into_iter()
                    .map(DocumentField::into_extracted)
                    .collect(),
            ),
            Some("object") => ExtractedField::Record(
                self.value_object
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(key, field)| (key, field.into_extracted()))
                    .collect(),
            ),
            Some("string") => {
                ExtractedField::Scalar(self.value_string.or(self.content).unwrap_or_default())
            }
            // dates, numbers, phone numbers... are kept as their document text
            _ => ExtractedField::Scalar(self.content.unwrap_or_default()),
        }
    }
}

impl FormRecognizerExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        config.require_remote()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model_id: config.model_id.clone(),
            api_version: config.api_version.clone(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls,
        })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint, self.model_id, self.api_version
        )
    }

    async fn submit(&self, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let url = self.analyze_url();
        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
                    .header(CONTENT_TYPE, content_type)
                    .body(bytes.clone())
            })
            .await?;

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ResumeRankerError::Extraction("Analyze response has no Operation-Location header".to_string())
            })
    }

    async fn poll(&self, operation_url: &str) -> Result<AnalyzeResult> {
        for attempt in 1..=self.max_polls {
            let response = self
                .send_with_retry(|| {
                    self.client
                        .get(operation_url)
                        .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
                })
                .await?;

            let operation: AnalyzeOperation = response.json().await?;
            match operation.status.as_str() {
                "succeeded" => {
                    return operation.analyze_result.ok_or_else(|| {
                        ResumeRankerError::Extraction("Operation succeeded without a result".to_string())
                    });
                }
                "failed" => {
                    let reason = operation
                        .error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| "unknown error".to_string());
                    return Err(ResumeRankerError::Extraction(format!("Analysis failed: {}", reason)));
                }
                status => {
                    debug!("Analysis {} (poll {}/{})", status, attempt, self.max_polls);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(ResumeRankerError::Extraction(format!(
            "Analysis did not finish after {} polls",
            self.max_polls
        )))
    }

    /// Exponential delay before retry number `attempt + 1`, capped at [`MAX_BACKOFF`].
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF)
    }

    /// Send a request, retrying throttled and server-side failures with
    /// exponential backoff. Other error statuses are returned immediately.
    async fn send_with_retry<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let response = build().send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if !retryable || attempt >= self.max_retries {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorEnvelope>(&body)
                    .map(|envelope| format!("{}: {}", envelope.error.code, envelope.error.message))
                    .unwrap_or(body);
                return Err(ResumeRankerError::Extraction(format!(
                    "Service returned {}: {}",
                    status, message
                )));
            }

            let backoff = self.backoff_delay(attempt);
            warn!("Service returned {}, retrying in {:?}", status, backoff);
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}

impl FieldExtractor for FormRecognizerExtractor {
    async fn extract(&self, document: &ResumeDocument) -> Result<Vec<FieldRecord>> {
        let bytes = fs::read(&document.path).await?;
        info!("Submitting {} ({} bytes) to model {}", document.file_name, bytes.len(), self.model_id);

        let operation_url = self.submit(bytes, content_type(&document.path)).await?;
        let result = self.poll(&operation_url).await?;
        info!("Document analysis completed: {} documents", result.documents.len());

        Ok(decode_documents(result))
    }
}

fn decode_documents(result: AnalyzeResult) -> Vec<FieldRecord> {
    result
        .documents
        .into_iter()
        .map(|document| {
            document
                .fields
                .into_iter()
                .map(|(key, field)| (key, field.into_extracted()))
                .collect()
        })
        .collect()
}
