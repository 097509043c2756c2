mod notion;
mod query;

#[cfg(test)]
pub(crate) mod fake;

use serde::Deserialize;
use serde_json::{Map, Value};

pub use self::{
    notion::NotionClient,
    query::{Clause, Condition, Query, Sort},
};

/// 数据源调用失败
///
/// 网络、鉴权、限流或响应格式错误统一归为数据源不可用，本层不做重试。
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 网络或超时错误
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Notion 返回了错误状态码
    #[error("notion api error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// 响应体无法解析
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 数据库中的一条记录（Notion 页面）
///
/// 属性保持原始 JSON，由 [`crate::content::map_record`] 逐个解析。
/// 解码从不失败：字段形状不对时留空，交给映射阶段丢弃，不影响同页其他记录。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Value")]
pub struct Record {
    /// 缺失或不是字符串时为空
    pub id: String,
    /// 部分页面对象不带属性，或属性不是对象
    pub properties: Option<Map<String, Value>>,
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return Self::default();
        };

        Self {
            id: take_string(&mut object, "id").unwrap_or_default(),
            properties: match object.remove("properties") {
                Some(Value::Object(properties)) => Some(properties),
                _ => None,
            },
        }
    }
}

/// 页面正文中的一个节点（Notion block）
///
/// 与 [`Record`] 一样宽松解码，坏节点由 [`crate::content::map_node`] 丢弃。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Value")]
pub struct Block {
    pub id: String,
    /// `type` 缺失或不是字符串时为 `None`
    pub kind: Option<String>,
    /// 其余字段，其中与 `type` 同名的字段是节点内容
    pub fields: Map<String, Value>,
}

impl From<Value> for Block {
    fn from(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return Self::default();
        };

        Self {
            id: take_string(&mut object, "id").unwrap_or_default(),
            kind: take_string(&mut object, "type"),
            fields: object,
        }
    }
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// 子节点列表的一页
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildPage {
    #[serde(rename = "results")]
    pub blocks: Vec<Block>,
    /// 为 `None` 时表示没有下一页
    pub next_cursor: Option<String>,
}

/// 远程数据源
///
/// 提供查询记录和分页列出子节点两种操作。
pub trait Source: Send + Sync {
    /// 查询符合条件的全部记录
    ///
    /// 实现方自行处理分页，调用方拿到的是完整结果。
    fn query(
        &self,
        query: &Query,
    ) -> impl std::future::Future<Output = Result<Vec<Record>, SourceError>> + Send;

    /// 列出记录的一页子节点
    ///
    /// `cursor` 为上一页返回的 [`ChildPage::next_cursor`]，首页传 `None`。
    fn list_children(
        &self,
        record_id: &str,
        cursor: Option<&str>,
    ) -> impl std::future::Future<Output = Result<ChildPage, SourceError>> + Send;
}
