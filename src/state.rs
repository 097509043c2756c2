use std::sync::Arc;

use axum::http::HeaderValue;

use crate::{error::Result, service::ContentService, source::NotionClient};

/// 应用程序上下文
///
/// [`AppState`] 封装了内容服务和缓存策略，请求之间只读共享。
pub struct AppState<S = NotionClient> {
    service: Arc<ContentService<S>>,
    cache_control: HeaderValue,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cache_control: self.cache_control.clone(),
        }
    }
}

impl<S> AppState<S> {
    /// 创建一个新的 [`AppState`] 实例
    ///
    /// `revalidate_secs` 为页面的缓存时间，写入 `Cache-Control` 响应头。
    pub fn new(service: ContentService<S>, revalidate_secs: u64) -> Result<Self> {
        let cache_control = HeaderValue::from_str(&format!("public, max-age={revalidate_secs}"))?;

        Ok(Self {
            service: Arc::new(service),
            cache_control,
        })
    }

    /// 获取内容服务
    pub fn service(&self) -> &ContentService<S> {
        &self.service
    }

    /// 获取 `Cache-Control` 响应头的值
    pub fn cache_control(&self) -> &HeaderValue {
        &self.cache_control
    }
}
