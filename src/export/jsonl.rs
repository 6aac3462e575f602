use serde::Serialize;

use crate::model::Article;

#[derive(Serialize)]
struct Conversation<'a> {
    messages: [Message<'a>; 2],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// 每篇文章输出一行对话记录：标题作为 user，正文原样作为 assistant
pub fn to_json_lines(articles: &[Article]) -> serde_json::Result<String> {
    let lines = articles
        .iter()
        .map(|article| {
            serde_json::to_string(&Conversation {
                messages: [
                    Message {
                        role: "user",
                        content: &article.title,
                    },
                    Message {
                        role: "assistant",
                        content: &article.content,
                    },
                ],
            })
        })
        .collect::<serde_json::Result<Vec<_>>>()?;

    Ok(lines.join("\n"))
}
