// src/semantic.rs
//! Optional semantic similarity adapter consumed by the scoring engine

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::future::Future;
use tracing::info;

/// Similarity between two text spans, nominally in [0,1]. The scoring
/// engine clamps whatever comes back and treats errors as 0.0, so
/// adapters may fail freely without aborting a scoring pass.
pub trait SemanticSimilarity: Send + Sync {
    fn similarity(
        &self,
        text_a: &str,
        text_b: &str,
    ) -> impl Future<Output = Result<f64>> + Send;
}

/// Adapter for callers that score without an embedding backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSemantic;

impl SemanticSimilarity for NoSemantic {
    async fn similarity(&self, _text_a: &str, _text_b: &str) -> Result<f64> {
        Ok(0.0)
    }
}

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    text_a: &'a str,
    text_b: &'a str,
}

#[derive(Debug, Deserialize)]
struct SimilarityResponse {
    similarity: f64,
}

/// HTTP client for an embedding service exposing cosine similarity.
///
/// The service loads its model once; this client is likewise built once
/// per process and reused across all candidates in a run.
pub struct HttpSemanticClient {
    client: Client,
    base_url: String,
}

impl HttpSemanticClient {
    pub fn new() -> Result<Self> {
        let base_url =
            env::var("SEMANTIC_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        info!("Semantic similarity endpoint: {}", base_url);

        Ok(Self { client, base_url })
    }
}

impl SemanticSimilarity for HttpSemanticClient {
    async fn similarity(&self, text_a: &str, text_b: &str) -> Result<f64> {
        let request = SimilarityRequest { text_a, text_b };

        let response = self
            .client
            .post(format!("{}/similarity", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to send request to semantic similarity service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Semantic similarity service returned {}: {}", status, body);
        }

        let parsed: SimilarityResponse = response
            .json()
            .await
            .context("Failed to parse semantic similarity response")?;

        Ok(parsed.similarity)
    }
}
