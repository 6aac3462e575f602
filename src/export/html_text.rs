use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

const HEADING_RULE_WIDTH: usize = 40;

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("invalid blank line pattern"));

/// 简化后的 HTML 节点树
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Text(String),
    Element { tag: String, children: Vec<HtmlNode> },
}

impl HtmlNode {
    /// 解析 HTML 片段，返回包裹所有顶层节点的根元素
    ///
    /// 注释、doctype 等非元素非文本节点会被丢弃。
    pub fn parse_fragment(html: &str) -> Self {
        Self::from_element(Html::parse_fragment(html).root_element())
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        let children = element
            .children()
            .filter_map(|child| match ElementRef::wrap(child) {
                Some(el) => Some(Self::from_element(el)),
                None => child
                    .value()
                    .as_text()
                    .map(|text| HtmlNode::Text(String::from(&**text))),
            })
            .collect();

        HtmlNode::Element {
            tag: element.value().name().to_ascii_lowercase(),
            children,
        }
    }

    /// 所有后代文本节点拼接的结果，不做裁剪
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element { children, .. } => {
                children.iter().for_each(|c| c.collect_text(out))
            }
        }
    }

    fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Element { tag, .. } => Some(tag.as_str()),
            HtmlNode::Text(_) => None,
        }
    }

    fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Element { children, .. } => children.as_slice(),
            HtmlNode::Text(_) => &[],
        }
    }

    /// 直接子元素，跳过文本节点
    fn child_elements(&self) -> impl Iterator<Item = &HtmlNode> {
        self.children().iter().filter(|c| c.tag().is_some())
    }

    /// 按文档顺序收集指定标签的后代元素，不含自身
    fn descendants_by_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a HtmlNode>) {
        for child in self.children() {
            if child.tag() == Some(tag) {
                out.push(child);
            }
            child.descendants_by_tag(tag, out);
        }
    }
}

/// 元素的输出规则
enum Block {
    Table,
    Heading,
    Paragraph,
    List { ordered: bool },
    Inline,
}

impl Block {
    fn of(tag: &str) -> Self {
        match tag {
            "table" => Block::Table,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Block::Heading,
            "p" => Block::Paragraph,
            "ul" => Block::List { ordered: false },
            "ol" => Block::List { ordered: true },
            _ => Block::Inline,
        }
    }
}

/// 将 HTML 正文转换为排版后的纯文本
pub fn html_to_text(html: &str) -> String {
    let mut writer = TextWriter::default();
    writer.visit(&HtmlNode::parse_fragment(html));
    writer.finish()
}

#[derive(Default)]
struct TextWriter {
    out: String,
}

impl TextWriter {
    fn visit(&mut self, node: &HtmlNode) {
        let (tag, children) = match node {
            HtmlNode::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.out.push_str(text);
                    self.out.push('\n');
                }
                return;
            }
            HtmlNode::Element { tag, children } => (tag, children),
        };

        match Block::of(tag) {
            Block::Table => self.table(node),
            Block::Heading => {
                self.out.push('\n');
                self.out.push_str(node.text_content().trim());
                self.out.push('\n');
                self.out.push_str(&"=".repeat(HEADING_RULE_WIDTH));
                self.out.push_str("\n\n");
            }
            Block::Paragraph => {
                self.out.push('\n');
                self.out.push_str(node.text_content().trim());
                self.out.push_str("\n\n");
            }
            Block::List { ordered } => {
                self.out.push('\n');
                for (index, item) in node.child_elements().enumerate() {
                    if ordered {
                        self.out.push_str(&format!("{}. ", index + 1));
                    } else {
                        self.out.push_str("• ");
                    }
                    self.out.push_str(item.text_content().trim());
                    self.out.push('\n');
                }
                self.out.push('\n');
            }
            Block::Inline => children.iter().for_each(|c| self.visit(c)),
        }
    }

    /// 表头单元格或每行第一格作为属性名，其余作为属性值
    fn table(&mut self, table: &HtmlNode) {
        let mut rows = Vec::new();
        table.descendants_by_tag("tr", &mut rows);

        for row in rows {
            for (index, cell) in row.child_elements().enumerate() {
                let text = cell.text_content();
                if cell.tag() == Some("th") || index == 0 {
                    self.out.push_str(&format!("- {}: ", text.trim()));
                } else {
                    self.out.push_str(text.trim());
                    self.out.push('\n');
                }
            }
        }
        self.out.push('\n');
    }

    fn finish(self) -> String {
        BLANK_LINES
            .replace_all(&self.out, "\n\n")
            .trim()
            .to_string()
    }
}
