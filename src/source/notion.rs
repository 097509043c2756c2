use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ChildPage, Query, Record, Source, SourceError};
use crate::{config::NotionOptions, error::Result};

/// Notion API 客户端
///
/// 持有鉴权信息和目标数据库 id，内部的 [`reqwest::Client`] 可以廉价克隆。
#[derive(Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    database_id: String,
    page_size: u32,
}

impl NotionClient {
    /// 使用指定的 API key 和数据库 id 创建客户端
    ///
    /// ```ignore
    /// let client = NotionClient::new("secret_xxx", "database-id", &NotionOptions::default())?;
    /// ```
    pub fn new(
        api_key: impl AsRef<str>,
        database_id: impl Into<String>,
        options: &NotionOptions,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.as_ref()))?,
        );
        headers.insert("Notion-Version", HeaderValue::from_str(&options.version)?);

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            database_id: database_id.into(),
            page_size: options.page_size,
        })
    }

    /// 发送请求并解析响应
    ///
    /// 非 2xx 响应会尽量解析 Notion 的错误体，作为 [`SourceError::Api`] 返回。
    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<T, SourceError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let error: ApiErrorBody = serde_json::from_slice(&body).unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryPage {
    results: Vec<Record>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

impl Source for NotionClient {
    async fn query(&self, query: &Query) -> std::result::Result<Vec<Record>, SourceError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);

        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = query.to_body(cursor.as_deref(), self.page_size);
            let page: QueryPage = Self::send(self.client.post(&url).json(&body)).await?;
            records.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn list_children(
        &self,
        record_id: &str,
        cursor: Option<&str>,
    ) -> std::result::Result<ChildPage, SourceError> {
        let url = format!("{}/blocks/{}/children", self.base_url, record_id);

        let mut request = self
            .client
            .get(&url)
            .query(&[("page_size", self.page_size.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("start_cursor", cursor)]);
        }

        Self::send(request).await
    }
}
