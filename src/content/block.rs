use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ContentNode, Dropped, NodeKind, RichText, plain_text};
use crate::source::Block;

/// 文本类节点的内容
#[derive(Debug, Deserialize)]
struct TextPayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagePayload {
    #[serde(rename = "type")]
    source: Option<String>,
    external: Option<FileLink>,
    file: Option<FileLink>,
    #[serde(default)]
    caption: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct FileLink {
    url: Option<String>,
}

impl ImagePayload {
    /// 图片地址：外链或 Notion 托管文件，二者取其一
    fn url(self) -> Option<String> {
        let link = match self.source.as_deref() {
            Some("external") => self.external,
            Some("file") => self.file,
            _ => self.external.or(self.file),
        };
        link.and_then(|link| link.url)
    }
}

const DEFAULT_CODE_LANGUAGE: &str = "text";

/// 将一个 block 映射为 [`ContentNode`]
///
/// - 不在 [`NodeKind`] 中的类型返回 [`Dropped::UnrecognizedNodeKind`]
/// - 缺少类型或内容结构错误返回 [`Dropped::MalformedNode`]
///
/// 任何错误都只丢弃当前节点。
pub fn map_node(block: &Block) -> Result<ContentNode, Dropped> {
    let Some(kind_name) = block.kind.as_deref() else {
        return Err(malformed(block, "missing block type"));
    };

    let Some(kind) = NodeKind::from_source(kind_name) else {
        return Err(Dropped::UnrecognizedNodeKind {
            id: block.id.clone(),
            kind: kind_name.to_string(),
        });
    };

    let node = match kind {
        NodeKind::Divider => ContentNode::new(kind, ""),

        NodeKind::Code => {
            let code: CodePayload = payload(block, kind)?;
            let language = code
                .language
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string());

            ContentNode {
                code_language: Some(language),
                ..ContentNode::new(kind, plain_text(&code.rich_text))
            }
        }

        NodeKind::Image => {
            let image: ImagePayload = payload(block, kind)?;
            let caption = plain_text(&image.caption);

            ContentNode {
                media_url: image.url(),
                ..ContentNode::new(kind, caption)
            }
        }

        NodeKind::Paragraph
        | NodeKind::Heading1
        | NodeKind::Heading2
        | NodeKind::Heading3
        | NodeKind::BulletedListItem
        | NodeKind::NumberedListItem
        | NodeKind::Quote
        | NodeKind::Callout => {
            let text: TextPayload = payload(block, kind)?;
            ContentNode::new(kind, plain_text(&text.rich_text))
        }
    };

    Ok(node)
}

/// 解析 block 中与类型同名的内容字段
fn payload<T: DeserializeOwned>(block: &Block, kind: NodeKind) -> Result<T, Dropped> {
    let value = block
        .fields
        .get(kind.as_str())
        .ok_or_else(|| malformed(block, format!("missing `{}` content", kind.as_str())))?;

    T::deserialize(value).map_err(|e| malformed(block, e.to_string()))
}

fn malformed(block: &Block, reason: impl Into<String>) -> Dropped {
    Dropped::MalformedNode {
        id: block.id.clone(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn block(value: Value) -> Block {
        serde_json::from_value(value).expect("block should decode")
    }

    fn text_block(kind: &str, text: &str) -> Block {
        let mut value = json!({
            "object": "block",
            "id": "b1",
            "type": kind,
            "has_children": false,
        });
        value[kind] = json!({ "rich_text": [{ "plain_text": text }], "color": "default" });
        block(value)
    }

    #[test]
    fn test_text_kinds() {
        for (name, kind) in [
            ("paragraph", NodeKind::Paragraph),
            ("heading_1", NodeKind::Heading1),
            ("heading_2", NodeKind::Heading2),
            ("heading_3", NodeKind::Heading3),
            ("bulleted_list_item", NodeKind::BulletedListItem),
            ("numbered_list_item", NodeKind::NumberedListItem),
            ("quote", NodeKind::Quote),
            ("callout", NodeKind::Callout),
        ] {
            let node = map_node(&text_block(name, "some text")).expect("known kind");
            assert_eq!(node.kind, kind);
            assert_eq!(node.text, "some text");
            assert!(node.code_language.is_none());
            assert!(node.media_url.is_none());
            assert!(node.children.is_empty());
        }
    }

    #[test]
    fn test_styled_runs_are_flattened() {
        let node = map_node(&block(json!({
            "id": "b1",
            "type": "paragraph",
            "paragraph": {
                "rich_text": [
                    { "plain_text": "bold", "annotations": { "bold": true } },
                    { "plain_text": " and " },
                    { "plain_text": "link", "href": "https://example.com" }
                ]
            }
        })))
        .unwrap();

        assert_eq!(node.text, "bold and link");
    }

    #[test]
    fn test_code_without_language_defaults_to_text() {
        let node = map_node(&block(json!({
            "id": "b1",
            "type": "code",
            "code": { "rich_text": [{ "plain_text": "fn main() {}" }] }
        })))
        .unwrap();

        assert_eq!(node.kind, NodeKind::Code);
        assert_eq!(node.text, "fn main() {}");
        assert_eq!(node.code_language.as_deref(), Some("text"));
    }

    #[test]
    fn test_code_with_language() {
        let node = map_node(&block(json!({
            "id": "b1",
            "type": "code",
            "code": { "rich_text": [{ "plain_text": "let x = 1;" }], "language": "rust" }
        })))
        .unwrap();

        assert_eq!(node.code_language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_external_image() {
        let node = map_node(&block(json!({
            "id": "b1",
            "type": "image",
            "image": {
                "type": "external",
                "external": { "url": "https://example.com/a.png" },
                "caption": [{ "plain_text": "A picture" }]
            }
        })))
        .unwrap();

        assert_eq!(node.kind, NodeKind::Image);
        assert_eq!(node.text, "A picture");
        assert_eq!(node.media_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn test_hosted_image_without_caption() {
        let node = map_node(&block(json!({
            "id": "b1",
            "type": "image",
            "image": {
                "type": "file",
                "file": { "url": "https://s3.example.com/b.png", "expiry_time": "2025-01-01T00:00:00.000Z" }
            }
        })))
        .unwrap();

        assert_eq!(node.text, "");
        assert_eq!(
            node.media_url.as_deref(),
            Some("https://s3.example.com/b.png")
        );
    }

    #[test]
    fn test_divider_has_no_text() {
        let node = map_node(&block(json!({ "id": "b1", "type": "divider", "divider": {} }))).unwrap();
        assert_eq!(node.kind, NodeKind::Divider);
        assert_eq!(node.text, "");
    }

    #[test]
    fn test_unknown_kind_is_dropped() {
        let result = map_node(&block(json!({
            "id": "b9",
            "type": "toggle",
            "toggle": { "rich_text": [] }
        })));

        assert_eq!(
            result,
            Err(Dropped::UnrecognizedNodeKind {
                id: "b9".to_string(),
                kind: "toggle".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_blocks_are_dropped() {
        let missing_type = block(json!({ "id": "b1" }));
        let missing_payload = block(json!({ "id": "b1", "type": "paragraph" }));
        let bad_payload = block(json!({
            "id": "b1",
            "type": "quote",
            "quote": { "rich_text": "not a list" }
        }));

        let numeric_type = block(json!({ "id": "b2", "type": 7 }));
        let not_an_object = block(json!(null));

        for b in [
            missing_type,
            missing_payload,
            bad_payload,
            numeric_type,
            not_an_object,
        ] {
            assert!(matches!(map_node(&b), Err(Dropped::MalformedNode { .. })));
        }
    }
}
