use super::{Tag, TagType};
use crate::core::Language;
use std::fmt::Write as _;

/// Пункт навигационной цепочки; последний обычно без ссылки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub href: Option<String>,
}

impl Crumb {
    #[must_use]
    pub fn new(label: impl Into<String>, href: Option<String>) -> Self {
        Self { label: label.into(), href }
    }
}

/// Страница до рендеринга
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub canonical: String,
    pub breadcrumbs: Vec<Crumb>,
    pub content: Vec<Tag>,
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_tag(tag: &Tag, out: &mut String) {
    let element = tag.kind().element();
    out.push('<');
    out.push_str(element);
    if let Some(id) = tag.id() {
        let _ = write!(out, " id=\"{}\"", escape_html(id));
    }
    if !tag.classes().is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_html(&tag.classes().join(" ")));
    }
    for (name, value) in tag.attributes() {
        let _ = write!(out, " {}=\"{}\"", escape_html(name), escape_html(value));
    }
    out.push('>');

    if tag.kind().is_void() {
        return;
    }

    if let Some(text) = tag.get_text() {
        out.push_str(&escape_html(text));
    }
    for child in tag.children() {
        render_tag(child, out);
    }
    let _ = write!(out, "</{element}>");
}

fn breadcrumbs(crumbs: &[Crumb]) -> Tag {
    let items = crumbs.iter().map(|crumb| {
        let item = Tag::new(TagType::ListItem).with_class("breadcrumb");
        match &crumb.href {
            Some(href) => item.with_child(Tag::link(href.clone(), crumb.label.clone())),
            None => item.with_child(Tag::text(TagType::Span, crumb.label.clone())),
        }
    });
    Tag::new(TagType::Navigation)
        .with_id("breadcrumbs")
        .with_child(Tag::new(TagType::UnorderedList).with_children(items))
}

/// Полный HTML5-документ
#[must_use]
pub fn render_document(document: &Document, language: Language, site_name: &str) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    let _ = write!(out, "<html lang=\"{}\">", language.code());
    out.push_str("<head><meta charset=\"utf-8\">");
    let _ = write!(out, "<title>{}</title>", escape_html(&document.title));
    let _ = write!(out, "<link rel=\"canonical\" href=\"{}\">", escape_html(&document.canonical));
    out.push_str("</head><body>");

    let header = Tag::new(TagType::Header)
        .with_id("header")
        .with_child(Tag::text(TagType::Heading1, site_name).with_class("site_name"));
    render_tag(&header, &mut out);

    if !document.breadcrumbs.is_empty() {
        render_tag(&breadcrumbs(&document.breadcrumbs), &mut out);
    }

    let main = Tag::new(TagType::Section)
        .with_id("content")
        .with_child(Tag::text(TagType::Heading2, document.title.clone()).with_class("page_title"))
        .with_children(document.content.iter().cloned());
    render_tag(&main, &mut out);

    out.push_str("</body></html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("<a href=\"x\">Tom & 'Jerry'</a>"), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_void_and_nested() {
        let mut out = String::new();
        let form = Tag::new(TagType::Form)
            .with_attribute("method", "post")
            .with_child(Tag::new(TagType::Input).with_attribute("name", "a\"b"));
        render_tag(&form, &mut out);
        assert_eq!(out, "<form method=\"post\"><input name=\"a&quot;b\"></form>");
    }

    #[test]
    fn test_render_document() {
        let document = Document {
            title: "Login <1>".to_string(),
            canonical: "https://localhost/u/login".to_string(),
            breadcrumbs: vec![
                Crumb::new("Home", Some("https://localhost/".to_string())),
                Crumb::new("Login", None),
            ],
            content: vec![Tag::text(TagType::Paragraph, "body")],
        };
        let html = render_document(&document, Language::Japanese, "Standard");
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"ja\">"));
        assert!(html.contains("<title>Login &lt;1&gt;</title>"));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://localhost/u/login\">"));
        assert!(html.contains("<a href=\"https://localhost/\">Home</a>"));
        assert!(html.contains("<p>body</p>"));
    }
}
