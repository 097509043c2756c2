use serde_json::{Value, json};

/// 单个过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// 复选框属性等于给定值
    CheckboxEquals(bool),
    /// 多选属性包含给定选项
    MultiSelectContains(String),
    /// 文本属性等于给定值
    RichTextEquals(String),
}

/// 作用于某个属性的过滤子句
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub property: String,
    pub condition: Condition,
}

impl Clause {
    pub fn new(property: impl Into<String>, condition: Condition) -> Self {
        Self {
            property: property.into(),
            condition,
        }
    }

    /// Notion filter 格式
    pub fn to_json(&self) -> Value {
        match &self.condition {
            Condition::CheckboxEquals(b) => json!({
                "property": self.property,
                "checkbox": { "equals": b },
            }),
            Condition::MultiSelectContains(option) => json!({
                "property": self.property,
                "multi_select": { "contains": option },
            }),
            Condition::RichTextEquals(text) => json!({
                "property": self.property,
                "rich_text": { "equals": text },
            }),
        }
    }
}

/// 排序规则，目前只需要降序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: String,
}

impl Sort {
    pub fn descending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "property": self.property, "direction": "descending" })
    }
}

/// 数据库查询：所有子句取交集，按排序规则依次排序
///
/// 子句为空表示不过滤。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub clauses: Vec<Clause>,
    pub sorts: Vec<Sort>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Notion `filter` 字段，没有子句时返回 `None`
    pub fn filter_json(&self) -> Option<Value> {
        if self.clauses.is_empty() {
            return None;
        }
        let clauses: Vec<Value> = self.clauses.iter().map(Clause::to_json).collect();
        Some(json!({ "and": clauses }))
    }

    /// Notion 查询请求体
    pub fn to_body(&self, start_cursor: Option<&str>, page_size: u32) -> Value {
        let mut body = json!({ "page_size": page_size });

        if let Some(filter) = self.filter_json() {
            body["filter"] = filter;
        }
        if !self.sorts.is_empty() {
            body["sorts"] = self.sorts.iter().map(Sort::to_json).collect();
        }
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        body
    }
}
