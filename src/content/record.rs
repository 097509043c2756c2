use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ContentSummary, Dropped, RichText, plain_text};
use crate::source::Record;

/// 数据库中各字段对应的属性名
pub mod property {
    pub const TITLE: &str = "Title";
    pub const SLUG: &str = "Slug";
    pub const DESCRIPTION: &str = "Description";
    pub const PUBLISHED: &str = "Published";
    pub const FEATURED: &str = "Featured";
    pub const PUBLISH_DATE: &str = "PublishDate";
    pub const TAGS: &str = "Tags";
    pub const COVER_IMAGE: &str = "OGImage";
}

/// 页面属性值，按 `type` 字段区分
///
/// 只解析用得到的几种，其余类型统一落到 [`PropertyValue::Other`]。
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Date {
        date: Option<DateValue>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Url {
        url: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct DateValue {
    start: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    name: String,
}

/// 按属性名读取一个属性
///
/// 属性缺失或结构无法解析时返回 `None`，由各字段自行取默认值。
fn decode_property(properties: &Map<String, Value>, name: &str) -> Option<PropertyValue> {
    let value = properties.get(name)?;
    match PropertyValue::deserialize(value) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(property = name, %e, "undecodable property");
            None
        }
    }
}

fn title_text(properties: &Map<String, Value>, name: &str) -> String {
    match decode_property(properties, name) {
        Some(PropertyValue::Title { title }) => plain_text(&title),
        _ => String::new(),
    }
}

fn rich_text(properties: &Map<String, Value>, name: &str) -> String {
    match decode_property(properties, name) {
        Some(PropertyValue::RichText { rich_text }) => plain_text(&rich_text),
        _ => String::new(),
    }
}

fn checkbox(properties: &Map<String, Value>, name: &str) -> bool {
    matches!(
        decode_property(properties, name),
        Some(PropertyValue::Checkbox { checkbox: true })
    )
}

fn date(properties: &Map<String, Value>, name: &str) -> Option<DateTime<Utc>> {
    match decode_property(properties, name) {
        Some(PropertyValue::Date {
            date: Some(DateValue { start: Some(start) }),
        }) => parse_date(&start),
        _ => None,
    }
}

fn tags(properties: &Map<String, Value>, name: &str) -> Vec<String> {
    match decode_property(properties, name) {
        Some(PropertyValue::MultiSelect { multi_select }) => {
            multi_select.into_iter().map(|option| option.name).collect()
        }
        _ => Vec::new(),
    }
}

fn url(properties: &Map<String, Value>, name: &str) -> Option<String> {
    match decode_property(properties, name) {
        Some(PropertyValue::Url { url }) => url.filter(|u| !u.is_empty()),
        _ => None,
    }
}

/// 解析 Notion 日期
///
/// 支持带时区的 RFC 3339 时间和仅日期的 `YYYY-MM-DD`（按 UTC 零点处理）。
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(datetime.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 将一个页面映射为 [`ContentSummary`]
///
/// 每个字段独立提取，互不影响。id、标题或 slug 为空时返回
/// [`Dropped::MalformedRecord`]，页面没有属性时返回 [`Dropped::PartialRecord`]。
///
/// `now` 是本次读取的时间，作为发布日期的默认值。
pub fn map_record(record: &Record, now: DateTime<Utc>) -> Result<ContentSummary, Dropped> {
    let Some(properties) = &record.properties else {
        return Err(Dropped::PartialRecord {
            id: record.id.clone(),
        });
    };

    let title = title_text(properties, property::TITLE);
    let slug = rich_text(properties, property::SLUG);

    if record.id.is_empty() || title.is_empty() || slug.is_empty() {
        return Err(Dropped::MalformedRecord {
            id: record.id.clone(),
        });
    }

    Ok(ContentSummary {
        id: record.id.clone(),
        title,
        slug,
        description: rich_text(properties, property::DESCRIPTION),
        publish_date: date(properties, property::PUBLISH_DATE).unwrap_or(now),
        tags: tags(properties, property::TAGS),
        featured: checkbox(properties, property::FEATURED),
        published: checkbox(properties, property::PUBLISHED),
        cover_image_url: url(properties, property::COVER_IMAGE),
    })
}
