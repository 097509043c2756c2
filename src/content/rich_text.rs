use serde::Deserialize;

/// Notion 富文本中的一段文本
///
/// 只保留 `plain_text`，样式、链接等信息全部丢弃。
#[derive(Debug, Default, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// 按源顺序拼接所有文本段的纯文本
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plain_text_concat_in_order() {
        let runs: Vec<RichText> = serde_json::from_value(json!([
            { "plain_text": "Hello, ", "annotations": { "bold": true } },
            { "plain_text": "world" },
            { "type": "mention" }
        ]))
        .expect("rich text should decode");

        assert_eq!(plain_text(&runs), "Hello, world");
    }

    #[test]
    fn test_plain_text_empty() {
        assert_eq!(plain_text(&[]), "");
    }
}
