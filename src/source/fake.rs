//! 测试用的内存数据源

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{Block, ChildPage, Condition, Query, Record, Source, SourceError};

/// 按插入顺序返回记录，不做排序
#[derive(Default)]
pub struct FakeSource {
    records: Vec<Value>,
    children: HashMap<(String, Option<String>), ChildPage>,
    unavailable: bool,
    unavailable_children: bool,
    pub queries: Mutex<Vec<Query>>,
    pub child_calls: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeSource {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// 所有调用都返回错误
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    /// 为记录设置分页的子节点，游标依次为 `c1`、`c2`……
    pub fn with_children(mut self, record_id: &str, pages: Vec<Vec<Value>>) -> Self {
        let count = pages.len();
        for (i, blocks) in pages.into_iter().enumerate() {
            let cursor = (i > 0).then(|| format!("c{i}"));
            let next_cursor = (i + 1 < count).then(|| format!("c{}", i + 1));
            self.children.insert(
                (record_id.to_string(), cursor),
                ChildPage {
                    blocks: blocks.into_iter().map(Block::from).collect(),
                    next_cursor,
                },
            );
        }
        self
    }

    /// 设置某个游标对应的一页子节点，用于构造不规范的游标序列
    pub fn with_child_page(
        mut self,
        record_id: &str,
        cursor: Option<&str>,
        blocks: Vec<Value>,
        next_cursor: Option<&str>,
    ) -> Self {
        self.children.insert(
            (record_id.to_string(), cursor.map(str::to_string)),
            ChildPage {
                blocks: blocks.into_iter().map(Block::from).collect(),
                next_cursor: next_cursor.map(str::to_string),
            },
        );
        self
    }

    /// 只让子节点读取失败
    pub fn failing_children(mut self) -> Self {
        self.children.clear();
        self.unavailable_children = true;
        self
    }

    fn error() -> SourceError {
        SourceError::Api {
            status: 503,
            code: "service_unavailable".to_string(),
            message: "Notion is unavailable".to_string(),
        }
    }

    fn matches(record: &Value, query: &Query) -> bool {
        let props = &record["properties"];
        query.clauses.iter().all(|clause| {
            let prop = &props[clause.property.as_str()];
            match &clause.condition {
                Condition::CheckboxEquals(b) => prop["checkbox"].as_bool().unwrap_or(false) == *b,
                Condition::MultiSelectContains(name) => prop["multi_select"]
                    .as_array()
                    .is_some_and(|options| options.iter().any(|o| o["name"] == name.as_str())),
                Condition::RichTextEquals(text) => {
                    let plain: String = prop["rich_text"]
                        .as_array()
                        .map(|runs| {
                            runs.iter()
                                .filter_map(|r| r["plain_text"].as_str())
                                .collect()
                        })
                        .unwrap_or_default();
                    plain == *text
                }
            }
        })
    }
}

impl Source for FakeSource {
    async fn query(&self, query: &Query) -> Result<Vec<Record>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.unavailable {
            return Err(Self::error());
        }

        self.records
            .iter()
            .filter(|r| Self::matches(r, query))
            .map(|r| Ok(Record::from(r.clone())))
            .collect()
    }

    async fn list_children(
        &self,
        record_id: &str,
        cursor: Option<&str>,
    ) -> Result<ChildPage, SourceError> {
        let key = (record_id.to_string(), cursor.map(str::to_string));
        self.child_calls.lock().unwrap().push(key.clone());
        if self.unavailable || self.unavailable_children {
            return Err(Self::error());
        }

        Ok(self.children.get(&key).cloned().unwrap_or_default())
    }
}
