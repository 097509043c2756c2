/// 支持的正文节点类型
///
/// 这是一个封闭集合，不在其中的类型在映射时直接丢弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    Code,
    Quote,
    Callout,
    Image,
    Divider,
}

impl NodeKind {
    /// 根据 Notion block 的 `type` 字段解析节点类型
    ///
    /// 未知类型返回 `None`。
    pub fn from_source(kind: &str) -> Option<Self> {
        let kind = match kind {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "code" => Self::Code,
            "quote" => Self::Quote,
            "callout" => Self::Callout,
            "image" => Self::Image,
            "divider" => Self::Divider,
            _ => return None,
        };
        Some(kind)
    }

    /// 对应的 Notion block 类型名
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::Callout => "callout",
            Self::Image => "image",
            Self::Divider => "divider",
        }
    }
}

/// 正文中的一个渲染单元
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    pub kind: NodeKind,
    /// 纯文本内容，图片节点为标题说明
    pub text: String,
    /// 仅 [`NodeKind::Code`] 使用
    pub code_language: Option<String>,
    /// 仅 [`NodeKind::Image`] 使用
    pub media_url: Option<String>,
    /// 嵌套子节点，当前只做平铺拉取，始终为空
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            code_language: None,
            media_url: None,
            children: Vec::new(),
        }
    }
}
