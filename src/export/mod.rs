mod html_text;
mod jsonl;
mod plain_text;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use self::{
    html_text::{HtmlNode, html_to_text},
    jsonl::to_json_lines,
    plain_text::to_plain_text,
};

use crate::{
    error::{Error, Result},
    model::Article,
};

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// 对话格式的 JSON Lines
    JsonLines,
    /// 排版后的纯文本
    PlainText,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::JsonLines => "jsonl",
            ExportFormat::PlainText => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::JsonLines => "application/x-jsonlines",
            ExportFormat::PlainText => "text/plain;charset=utf-8",
        }
    }

    /// `blog-posts-<净化后的域名>.<扩展名>`
    pub fn file_name(&self, store_domain: &str) -> String {
        format!(
            "blog-posts-{}.{}",
            sanitize_domain(store_domain),
            self.extension()
        )
    }

    pub fn render(&self, articles: &[Article]) -> Result<String> {
        match self {
            ExportFormat::JsonLines => Ok(to_json_lines(articles)?),
            ExportFormat::PlainText => Ok(to_plain_text(articles)),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jsonl" | "json-lines" => Ok(ExportFormat::JsonLines),
            "txt" | "text" => Ok(ExportFormat::PlainText),
            other => Err(Error::InvalidParam(format!(
                "unknown export format `{other}`, expected `jsonl` or `txt`"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 域名中所有非字母数字字符替换为 `-`
pub fn sanitize_domain(domain: &str) -> String {
    domain
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// 将导出内容写入 `dir` 下的文件，返回文件路径
pub fn write_export(
    dir: impl AsRef<Path>,
    store_domain: &str,
    format: ExportFormat,
    articles: &[Article],
) -> Result<PathBuf> {
    let path = dir.as_ref().join(format.file_name(store_domain));
    std::fs::write(&path, format.render(articles)?)?;
    Ok(path)
}
