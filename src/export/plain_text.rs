use chrono::Local;

use super::html_text::html_to_text;
use crate::model::Article;

const SEPARATOR_WIDTH: usize = 80;
const ANONYMOUS_AUTHOR: &str = "Anonim";

/// 生成纯文本文档：每篇文章一个头部块，接正文纯文本和分隔线
pub fn to_plain_text(articles: &[Article]) -> String {
    articles
        .iter()
        .map(render_article)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_article(article: &Article) -> String {
    let author = article
        .author
        .as_ref()
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS_AUTHOR);

    format!(
        "Başlık: {title}\nYazar: {author}\nTarih: {date}\nBlog: {blog}\n\n{body}\n\n{separator}\n\n",
        title = article.title,
        date = local_date(article),
        blog = article.blog.title,
        body = html_to_text(&article.content),
        separator = "=".repeat(SEPARATOR_WIDTH),
    )
}

/// 本地时区的 `日.月.年`
fn local_date(article: &Article) -> String {
    article
        .published_at
        .with_timezone(&Local)
        .format("%d.%m.%Y")
        .to_string()
}
