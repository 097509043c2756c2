use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use super::{Error, ListOptions, Result};

use crate::{
    content::{ContentDocument, ContentNode, ContentSummary},
    source::Source,
    state::AppState,
};

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /journal`：已发布的文章列表
/// - `GET /journal/{slug}`：获取单篇文章
/// - `GET /blog`：按标签和推荐筛选的文章列表，附带全部标签
/// - `GET /tags`：获取所有标签
pub fn setup_route<S: Source + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/journal", get(journal_list::<S>))
        .route("/journal/{slug}", get(journal_entry::<S>))
        .route("/blog", get(blog::<S>))
        .route("/tags", get(tag_list::<S>))
}

/// 文章元信息，用于列表展示。
#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// RFC 3339 格式
    pub publish_date: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

impl From<ContentSummary> for SummaryView {
    fn from(summary: ContentSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            slug: summary.slug,
            description: summary.description,
            publish_date: summary.publish_date.to_rfc3339(),
            tags: summary.tags,
            featured: summary.featured,
            published: summary.published,
            cover_image_url: summary.cover_image_url,
        }
    }
}

/// 正文节点。
#[derive(Debug, Serialize)]
pub struct NodeView {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

impl From<ContentNode> for NodeView {
    fn from(node: ContentNode) -> Self {
        Self {
            kind: node.kind.as_str(),
            content: node.text,
            language: node.code_language,
            url: node.media_url,
            children: node.children.into_iter().map(NodeView::from).collect(),
        }
    }
}

/// 完整文章，包括元信息和正文。
#[derive(Debug, Serialize)]
pub struct DocumentView {
    #[serde(flatten)]
    pub summary: SummaryView,
    pub blocks: Vec<NodeView>,
}

impl From<ContentDocument> for DocumentView {
    fn from(document: ContentDocument) -> Self {
        Self {
            summary: document.summary.into(),
            blocks: document.nodes.into_iter().map(NodeView::from).collect(),
        }
    }
}

/// 博客页数据。
#[derive(Debug, Serialize)]
pub struct BlogView {
    pub posts: Vec<SummaryView>,
    pub tags: Vec<String>,
    pub selected_tag: Option<String>,
    pub show_featured_only: bool,
}

/// 博客页查询参数。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BlogParams {
    tag: Option<String>,
    featured: Option<String>,
}

/// 附带缓存头的 JSON 响应
fn cached<S, T: Serialize>(app: &AppState<S>, body: T) -> Response {
    (
        [(header::CACHE_CONTROL, app.cache_control().clone())],
        Json(body),
    )
        .into_response()
}

fn views(summaries: Vec<ContentSummary>) -> Vec<SummaryView> {
    summaries.into_iter().map(SummaryView::from).collect()
}

/// 获取已发布的文章列表。
async fn journal_list<S: Source + 'static>(State(app): State<AppState<S>>) -> Response {
    let posts = app
        .service()
        .list_summaries(&ListOptions::published())
        .await;
    cached(&app, views(posts))
}

/// 根据 slug 获取单篇文章。
///
/// 文章不存在或未发布时返回 [`Error::NotFound`]。
async fn journal_entry<S: Source + 'static>(
    Path(slug): Path<String>,
    State(app): State<AppState<S>>,
) -> Result<Response> {
    let document = app
        .service()
        .get_document_by_slug(&slug)
        .await
        .filter(|document| document.summary.published)
        .ok_or(Error::NotFound)?;

    Ok(cached(&app, DocumentView::from(document)))
}

/// 获取博客页数据。
///
/// 文章列表和标签列表并发查询。
async fn blog<S: Source + 'static>(
    Query(params): Query<BlogParams>,
    State(app): State<AppState<S>>,
) -> Response {
    let tag = params.tag.filter(|t| !t.is_empty());
    let show_featured_only = params.featured.as_deref() == Some("true");

    let options = ListOptions {
        published_only: true,
        featured_only: show_featured_only,
        tag: tag.clone(),
    };

    let (posts, tags) = tokio::join!(
        app.service().list_summaries(&options),
        app.service().list_all_tags()
    );

    cached(
        &app,
        BlogView {
            posts: views(posts),
            tags,
            selected_tag: tag,
            show_featured_only,
        },
    )
}

/// 获取所有已发布文章的标签。
async fn tag_list<S: Source + 'static>(State(app): State<AppState<S>>) -> Response {
    let tags = app.service().list_all_tags().await;
    cached(&app, tags)
}
