//! Lazily populated cache of remote descriptor schemas

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::SchemaRemote;
use crate::domain::descriptor::DescriptorKind;
use crate::error::{Error, Result};

const VNF_SCHEMA_PATH: &str = "function-descriptor/vnfd-schema.yml";
const NS_SCHEMA_PATH: &str = "service-descriptor/nsd-schema.yml";

/// Source of raw schema documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    /// Download the document at `url`
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches schemas over HTTP with a single shared client
pub struct HttpSchemaFetcher {
    client: reqwest::Client,
}

impl HttpSchemaFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SchemaFetcher for HttpSchemaFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// A fetched schema together with the source it came from
#[derive(Debug, Clone, Serialize)]
pub struct SchemaEntry {
    pub source: SchemaRemote,
    pub schema: Value,
}

#[derive(Default)]
struct CacheState {
    populated: bool,
    vnf: Vec<SchemaEntry>,
    ns: Vec<SchemaEntry>,
}

/// Schema cache shared across requests.
///
/// Population runs once, under the lock, on first access. A failed
/// population still counts: whatever was fetched before the failure stays
/// cached and no retry happens.
pub struct SchemaCache {
    fetcher: Arc<dyn SchemaFetcher>,
    sources: Vec<SchemaRemote>,
    state: Mutex<CacheState>,
}

impl SchemaCache {
    pub fn new(fetcher: Arc<dyn SchemaFetcher>, sources: Vec<SchemaRemote>) -> Self {
        Self {
            fetcher,
            sources,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Configured schema sources, in index order
    pub fn sources(&self) -> &[SchemaRemote] {
        &self.sources
    }

    /// Get the schema of `kind` for a workspace's schema index
    pub async fn get_schema(&self, schema_index: usize, kind: DescriptorKind) -> Result<Value> {
        let mut state = self.state.lock().await;
        if !state.populated {
            self.load_schemas(&mut state).await?;
        }

        let entries = match kind {
            DescriptorKind::Vnf => &state.vnf,
            DescriptorKind::Ns => &state.ns,
        };
        entries
            .get(schema_index)
            .map(|entry| entry.schema.clone())
            .ok_or_else(|| Error::SchemaNotFound {
                kind: kind.as_str().to_string(),
                index: schema_index,
            })
    }

    /// Fetch every configured source, in order, and append the results
    async fn load_schemas(&self, state: &mut CacheState) -> Result<()> {
        state.populated = true;

        for source in &self.sources {
            let vnf = self.fetch_schema(&source.url, VNF_SCHEMA_PATH).await?;
            state.vnf.push(SchemaEntry {
                source: source.clone(),
                schema: vnf,
            });

            let ns = self.fetch_schema(&source.url, NS_SCHEMA_PATH).await?;
            state.ns.push(SchemaEntry {
                source: source.clone(),
                schema: ns,
            });
        }

        info!("Loaded schemas from {} source(s)", self.sources.len());
        Ok(())
    }

    async fn fetch_schema(&self, base: &str, path: &str) -> Result<Value> {
        let url = schema_document_url(base, path);
        debug!("Fetching schema {}", url);

        let body = self.fetcher.fetch(&url).await.map_err(|e| {
            warn!("Failed to fetch schema {}: {}", url, e);
            e
        })?;
        Ok(serde_yaml::from_str(&body)?)
    }
}

fn schema_document_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}
