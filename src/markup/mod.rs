// Markup tree built by path handlers and rendered by the theme
pub mod theme;

pub use theme::{Crumb, Document, escape_html, render_document};

/// Тип элемента разметки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Anchor,
    Break,
    Button,
    Definition,
    DefinitionList,
    DefinitionTerm,
    Division,
    FieldSet,
    Form,
    Header,
    Heading1,
    Heading2,
    Heading3,
    Input,
    Label,
    Legend,
    ListItem,
    Navigation,
    Paragraph,
    Section,
    Span,
    UnorderedList,
}

impl TagType {
    #[must_use]
    pub const fn element(self) -> &'static str {
        match self {
            Self::Anchor => "a",
            Self::Break => "br",
            Self::Button => "button",
            Self::Definition => "dd",
            Self::DefinitionList => "dl",
            Self::DefinitionTerm => "dt",
            Self::Division => "div",
            Self::FieldSet => "fieldset",
            Self::Form => "form",
            Self::Header => "header",
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
            Self::Input => "input",
            Self::Label => "label",
            Self::Legend => "legend",
            Self::ListItem => "li",
            Self::Navigation => "nav",
            Self::Paragraph => "p",
            Self::Section => "section",
            Self::Span => "span",
            Self::UnorderedList => "ul",
        }
    }

    /// Элементы без закрывающего тега
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Break | Self::Input)
    }
}

/// Элемент разметки с дочерними элементами
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kind: TagType,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Tag>,
}

impl Tag {
    #[must_use]
    pub const fn new(kind: TagType) -> Self {
        Self {
            kind,
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Элемент с текстом
    #[must_use]
    pub fn text(kind: TagType, text: impl Into<String>) -> Self {
        Self::new(kind).with_text(text)
    }

    /// Ссылка `<a href>`
    #[must_use]
    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::text(TagType::Anchor, text).with_attribute("href", href)
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Повторная установка атрибута заменяет значение
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    #[must_use]
    pub const fn kind(&self) -> TagType {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(existing, _)| existing == name).map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[must_use]
    pub fn get_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Поиск в глубину по `id`
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let tag = Tag::new(TagType::Division)
            .with_id("content")
            .with_class("wrapper")
            .with_child(Tag::text(TagType::Paragraph, "hello").with_id("greeting"))
            .with_child(Tag::link("/u/logout", "Logout"));

        assert_eq!(tag.children().len(), 2);
        assert_eq!(tag.find_by_id("greeting").and_then(Tag::get_text), Some("hello"));
        assert_eq!(tag.children()[1].attribute("href"), Some("/u/logout"));
        assert!(tag.find_by_id("missing").is_none());
    }

    #[test]
    fn test_attribute_replaced() {
        let tag = Tag::new(TagType::Input).with_attribute("value", "a").with_attribute("value", "b");
        assert_eq!(tag.attributes().len(), 1);
        assert_eq!(tag.attribute("value"), Some("b"));
    }
}
