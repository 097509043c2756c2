/// 映射时被丢弃的条目
///
/// 单个页面或节点出错只影响它自己，不会让整个列表或文章失败。
/// 调用方负责记录日志。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Dropped {
    /// 页面缺少属性，不是完整页面
    #[error("page {id} has no properties")]
    PartialRecord { id: String },

    /// 页面缺少 id、标题或 slug
    #[error("page {id} missing required id, title or slug")]
    MalformedRecord { id: String },

    /// 不支持的节点类型
    #[error("unsupported block type `{kind}` in block {id}")]
    UnrecognizedNodeKind { id: String, kind: String },

    /// 节点结构无法解析
    #[error("malformed block {id}: {reason}")]
    MalformedNode { id: String, reason: String },
}

/// 批量映射结果：成功的条目和被丢弃的条目
#[derive(Debug)]
pub struct Mapped<T> {
    pub items: Vec<T>,
    pub dropped: Vec<Dropped>,
}

impl<T> Default for Mapped<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

impl<T> Mapped<T> {
    /// 收集一个映射结果
    pub fn push(&mut self, result: Result<T, Dropped>) {
        match result {
            Ok(item) => self.items.push(item),
            Err(dropped) => self.dropped.push(dropped),
        }
    }

    /// 把丢弃的条目写入日志
    pub fn log_dropped(&self) {
        for dropped in &self.dropped {
            tracing::warn!(%dropped, "item dropped");
        }
    }
}

impl<T> FromIterator<Result<T, Dropped>> for Mapped<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, Dropped>>>(iter: I) -> Self {
        let mut mapped = Self::default();
        for result in iter {
            mapped.push(result);
        }
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropped_messages() {
        let cases = [
            (
                Dropped::PartialRecord { id: "p1".into() },
                "page p1 has no properties",
            ),
            (
                Dropped::UnrecognizedNodeKind {
                    id: "b1".into(),
                    kind: "table".into(),
                },
                "unsupported block type `table` in block b1",
            ),
            (
                Dropped::MalformedNode {
                    id: "b2".into(),
                    reason: "missing block type".into(),
                },
                "malformed block b2: missing block type",
            ),
        ];

        for (dropped, message) in cases {
            assert_eq!(dropped.to_string(), message);
        }
    }

    #[test]
    fn test_collect_splits_items_and_drops() {
        let mapped: Mapped<u32> = [
            Ok(1),
            Err(Dropped::MalformedRecord { id: "p2".into() }),
            Ok(3),
        ]
        .into_iter()
        .collect();

        assert_eq!(mapped.items, vec![1, 3]);
        assert_eq!(
            mapped.dropped,
            vec![Dropped::MalformedRecord { id: "p2".into() }]
        );
    }
}
