use serde::{Deserialize, Serialize};

/// Поддерживаемые языки интерфейса
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Japanese,
}

impl Language {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "ja",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split('-').next().unwrap_or(tag).trim();
        match primary.to_ascii_lowercase().as_str() {
            "en" | "eng" | "english" => Some(Self::English),
            "ja" | "jpn" | "japanese" => Some(Self::Japanese),
            _ => None,
        }
    }

    /// Выбирает язык по заголовку `Accept-Language`
    ///
    /// Берётся поддерживаемый тег с наибольшим `q`; при равенстве побеждает
    /// более ранний. Без совпадений возвращается английский.
    #[must_use]
    pub fn negotiate(accept_language: Option<&str>) -> Self {
        let Some(header) = accept_language else {
            return Self::default();
        };

        let mut best: Option<(Self, f32)> = None;
        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let tag = parts.next().unwrap_or_default().trim();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            if quality <= 0.0 {
                continue;
            }
            if let Some(language) = Self::from_tag(tag) {
                if best.is_none_or(|(_, q)| quality > q) {
                    best = Some((language, quality));
                }
            }
        }

        best.map(|(language, _)| language).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_default() {
        assert_eq!(Language::negotiate(None), Language::English);
        assert_eq!(Language::negotiate(Some("fr-FR, de")), Language::English);
    }

    #[test]
    fn test_negotiate_quality() {
        assert_eq!(Language::negotiate(Some("ja")), Language::Japanese);
        assert_eq!(Language::negotiate(Some("en-US;q=0.5, ja;q=0.9")), Language::Japanese);
        assert_eq!(Language::negotiate(Some("ja;q=0, en")), Language::English);
        assert_eq!(Language::negotiate(Some("fr, ja-JP;q=0.7, en;q=0.7")), Language::Japanese);
    }
}
