use chrono::{DateTime, Utc};

use super::ContentNode;

/// 文章元信息，用于列表展示
///
/// 每次查询都重新构建，不做本地缓存。
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSummary {
    /// 数据源中的页面 id
    pub id: String,
    pub title: String,
    /// 对外查询用的唯一标识
    pub slug: String,
    pub description: String,
    /// 源字段缺失或类型不符时为读取时刻
    pub publish_date: DateTime<Utc>,
    /// 保留源顺序
    pub tags: Vec<String>,
    pub featured: bool,
    /// 缺失即视为未发布
    pub published: bool,
    pub cover_image_url: Option<String>,
}

/// 完整文章，包括元信息和正文节点
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    pub summary: ContentSummary,
    pub nodes: Vec<ContentNode>,
}
