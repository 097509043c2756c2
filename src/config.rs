use std::{env, fmt, fs, path::Path};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Notion 客户端选项
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotionOptions {
    /// API 根地址
    pub base_url: String,
    /// `Notion-Version` 请求头
    pub version: String,
    /// 每页条数，Notion 上限为 100
    pub page_size: u32,
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for NotionOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.notion.com/v1".to_string(),
            version: "2022-06-28".to_string(),
            page_size: 100,
            timeout_secs: 10,
        }
    }
}

/// 应用配置
///
/// 可选的 TOML 配置文件由 `JOURNAL_CONFIG` 指定，环境变量优先于文件。
/// `NOTION_API_KEY` 和 `NOTION_DATABASE_ID` 只从环境变量读取且必须存在。
/// `Debug` 输出不包含 API key。
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub api_key: String,
    #[serde(skip)]
    pub database_id: String,
    /// 监听地址
    pub bind: String,
    /// 页面缓存时间（秒），用于 `Cache-Control: max-age`
    pub revalidate_secs: u64,
    pub notion: NotionOptions,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("bind", &self.bind)
            .field("revalidate_secs", &self.revalidate_secs)
            .field("notion", &self.notion)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            database_id: String::new(),
            bind: "0.0.0.0:3000".to_string(),
            revalidate_secs: 3600,
            notion: NotionOptions::default(),
        }
    }
}

impl Config {
    /// 从环境变量和配置文件加载
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 从给定的变量来源加载，`lookup` 返回变量值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup("JOURNAL_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(bind) = lookup("JOURNAL_BIND") {
            config.bind = bind;
        }
        if let Some(secs) = lookup("JOURNAL_REVALIDATE_SECS") {
            config.revalidate_secs = secs
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("JOURNAL_REVALIDATE_SECS: {secs}")))?;
        }

        config.api_key = required(&lookup, "NOTION_API_KEY")?;
        config.database_id = required(&lookup, "NOTION_DATABASE_ID")?;

        Ok(config)
    }

    /// 读取 TOML 配置文件
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String> {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::MissingEnv(name))
}
