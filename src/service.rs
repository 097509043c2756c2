use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{
    content::{
        ContentDocument, ContentNode, ContentSummary, Dropped, Mapped, map_node, map_record,
        property,
    },
    source::{Clause, Condition, Query, Record, Sort, Source, SourceError},
};

/// 文章列表的筛选条件
///
/// 各条件之间取交集，全部关闭时返回所有文章。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 只返回已发布的文章
    pub published_only: bool,
    /// 只返回推荐文章
    pub featured_only: bool,
    /// 只返回带有该标签的文章
    pub tag: Option<String>,
}

impl ListOptions {
    /// 已发布的全部文章
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Default::default()
        }
    }

    /// 构建对应的数据库查询，按发布日期倒序
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();

        if self.published_only {
            query = query.clause(Clause::new(
                property::PUBLISHED,
                Condition::CheckboxEquals(true),
            ));
        }
        if self.featured_only {
            query = query.clause(Clause::new(
                property::FEATURED,
                Condition::CheckboxEquals(true),
            ));
        }
        if let Some(tag) = &self.tag {
            query = query.clause(Clause::new(
                property::TAGS,
                Condition::MultiSelectContains(tag.clone()),
            ));
        }

        query.sort(Sort::descending(property::PUBLISH_DATE))
    }
}

/// 按 slug 查询文章的结果
#[derive(Debug)]
pub enum DocumentLookup {
    /// 没有匹配的记录
    NotFound,
    /// 有匹配的记录，但映射失败
    Dropped(Dropped),
    /// 找到文章，`dropped` 为正文中被丢弃的节点
    Found {
        document: ContentDocument,
        dropped: Vec<Dropped>,
    },
}

/// 将查询结果映射为文章列表，按发布日期倒序，日期相同时保持源顺序
pub fn collect_summaries(records: &[Record], now: DateTime<Utc>) -> Mapped<ContentSummary> {
    let mut mapped: Mapped<ContentSummary> = records
        .iter()
        .map(|record| map_record(record, now))
        .collect();

    mapped
        .items
        .sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    mapped
}

/// 内容服务，页面层唯一使用的入口
///
/// 所有操作都不会向调用方返回错误：数据源失败时记录日志并返回空结果。
pub struct ContentService<S> {
    source: S,
}

impl<S: Source> ContentService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// 查询文章列表
    ///
    /// 数据源不可用时返回空列表。
    #[instrument(skip(self))]
    pub async fn list_summaries(&self, options: &ListOptions) -> Vec<ContentSummary> {
        match self.try_list_summaries(options).await {
            Ok(mapped) => {
                mapped.log_dropped();
                mapped.items
            }
            Err(e) => {
                tracing::error!(%e, "failed to list summaries");
                Vec::new()
            }
        }
    }

    /// 查询文章列表，同时返回被丢弃的记录
    pub async fn try_list_summaries(
        &self,
        options: &ListOptions,
    ) -> Result<Mapped<ContentSummary>, SourceError> {
        let records = self.source.query(&options.to_query()).await?;
        Ok(collect_summaries(&records, Utc::now()))
    }

    /// 根据 slug 获取完整文章
    ///
    /// 没有匹配、记录无效或数据源不可用时返回 `None`。
    #[instrument(skip(self))]
    pub async fn get_document_by_slug(&self, slug: &str) -> Option<ContentDocument> {
        match self.try_get_document_by_slug(slug).await {
            Ok(DocumentLookup::Found { document, dropped }) => {
                for dropped in &dropped {
                    tracing::warn!(%dropped, "block dropped");
                }
                Some(document)
            }
            Ok(DocumentLookup::Dropped(dropped)) => {
                tracing::warn!(%dropped, "record dropped");
                None
            }
            Ok(DocumentLookup::NotFound) => None,
            Err(e) => {
                tracing::error!(%e, "failed to fetch document");
                None
            }
        }
    }

    /// 根据 slug 获取完整文章，返回详细的查询结果
    ///
    /// 多条记录使用同一个 slug 时取数据源返回的第一条。
    pub async fn try_get_document_by_slug(
        &self,
        slug: &str,
    ) -> Result<DocumentLookup, SourceError> {
        let query = Query::new().clause(Clause::new(
            property::SLUG,
            Condition::RichTextEquals(slug.to_string()),
        ));
        let records = self.source.query(&query).await?;

        let Some(record) = records.first() else {
            return Ok(DocumentLookup::NotFound);
        };
        if records.len() > 1 {
            tracing::warn!(slug, count = records.len(), "duplicate slug, using first record");
        }

        let summary = match map_record(record, Utc::now()) {
            Ok(summary) => summary,
            Err(dropped) => return Ok(DocumentLookup::Dropped(dropped)),
        };

        let nodes = self.fetch_nodes(&record.id).await?;

        Ok(DocumentLookup::Found {
            document: ContentDocument {
                summary,
                nodes: nodes.items,
            },
            dropped: nodes.dropped,
        })
    }

    /// 读取记录的全部子节点
    ///
    /// 每一页都依赖上一页的游标，只能顺序请求。
    async fn fetch_nodes(&self, record_id: &str) -> Result<Mapped<ContentNode>, SourceError> {
        let mut nodes = Mapped::default();
        let mut cursor: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let page = self
                .source
                .list_children(record_id, cursor.as_deref())
                .await?;

            for block in &page.blocks {
                nodes.push(map_node(block));
            }

            match page.next_cursor {
                Some(next) if !seen.insert(next.clone()) => {
                    tracing::warn!(record_id, cursor = %next, "child cursor repeated, stop paging");
                    break;
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(nodes)
    }

    /// 所有已发布文章的标签，去重并升序排列
    #[instrument(skip(self))]
    pub async fn list_all_tags(&self) -> Vec<String> {
        self.list_summaries(&ListOptions::published())
            .await
            .into_iter()
            .flat_map(|summary| summary.tags)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
