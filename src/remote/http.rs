use super::{RemoteConfig, RemoteOp, RemoteTableClient};
use crate::core::{ItemFields, ItemId, LedgerError, RawRecord, RecordUpdate, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct RecordPage {
    records: Vec<RawRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordList {
    records: Vec<RawRecord>,
}

#[derive(Debug, Serialize)]
struct NewRecord {
    fields: ItemFields,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a, T> {
    records: &'a [T],
}

/// Client for a hosted table exposing the `/v0/{base}/{table}` REST dialect.
///
/// Writes larger than `max_batch_size` are sent as consecutive requests. If
/// a later chunk fails the whole call fails, so the caller applies nothing
/// locally even though earlier chunks were accepted remotely.
#[derive(Debug, Clone)]
pub struct HttpTableClient {
    client: Client,
    table_url: Url,
    api_key: String,
    max_batch_size: usize,
}

impl HttpTableClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        config.validate()?;

        let mut table_url = Url::parse(&config.endpoint_url)
            .map_err(|e| LedgerError::Config(format!("invalid endpoint: {}", e)))?;
        table_url
            .path_segments_mut()
            .map_err(|_| {
                LedgerError::Config(format!(
                    "endpoint '{}' cannot carry a path",
                    config.endpoint_url
                ))
            })?
            .pop_if_empty()
            .push("v0")
            .push(&config.base_id)
            .push(&config.table_name);

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LedgerError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            table_url,
            api_key: config.api_key,
            max_batch_size: config.max_batch_size,
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    async fn send(&self, op: RemoteOp, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                warn!("remote {} failed before a response: {}", op, e);
                LedgerError::RemoteCallFailure(format!("{}: {}", op, e))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("remote {} rejected with {}: {}", op, status, body.trim());
        Err(LedgerError::RemoteCallFailure(format!(
            "{} returned {}: {}",
            op,
            status,
            body.trim()
        )))
    }
}

#[async_trait]
impl RemoteTableClient for HttpTableClient {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self.client.get(self.table_url.clone());
            if let Some(offset) = &offset {
                request = request.query(&[("offset", offset.as_str())]);
            }

            let page: RecordPage = self.send(RemoteOp::FetchAll, request).await?.json().await?;
            debug!(
                "remote fetch_all: page of {} records (more: {})",
                page.records.len(),
                page.offset.is_some()
            );
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    async fn create(&self, fields: ItemFields) -> Result<RawRecord> {
        let body = [NewRecord { fields }];
        let request = self
            .client
            .post(self.table_url.clone())
            .json(&WriteBody { records: &body });

        let list: RecordList = self.send(RemoteOp::Create, request).await?.json().await?;
        list.records.into_iter().next().ok_or_else(|| {
            LedgerError::RemoteCallFailure("create returned no record".to_string())
        })
    }

    async fn update(&self, updates: Vec<RecordUpdate>) -> Result<Vec<RawRecord>> {
        let mut updated = Vec::with_capacity(updates.len());

        for chunk in updates.chunks(self.max_batch_size) {
            debug!("remote update: sending {} records", chunk.len());
            let request = self
                .client
                .patch(self.table_url.clone())
                .json(&WriteBody { records: chunk });

            let list: RecordList = self.send(RemoteOp::Update, request).await?.json().await?;
            updated.extend(list.records);
        }

        Ok(updated)
    }

    async fn destroy(&self, ids: Vec<ItemId>) -> Result<()> {
        for chunk in ids.chunks(self.max_batch_size) {
            debug!("remote destroy: deleting {} records", chunk.len());
            let query: Vec<(&str, &str)> = chunk.iter().map(|id| ("records[]", id.as_str())).collect();
            let request = self.client.delete(self.table_url.clone()).query(&query);
            self.send(RemoteOp::Destroy, request).await?;
        }

        Ok(())
    }
}
