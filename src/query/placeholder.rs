use crate::core::{Result, SiteError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Префикс имени параметра в собранном SQL
pub const PLACEHOLDER_PREFIX: &str = ":qp_";

/// Типизированное значение параметра
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlaceholderValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl From<bool> for PlaceholderValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PlaceholderValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PlaceholderValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PlaceholderValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PlaceholderValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PlaceholderValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for PlaceholderValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Ссылка на зарегистрированный параметр, подставляется в SQL как `:qp_<id>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder {
    id: usize,
}

impl Placeholder {
    #[must_use]
    pub const fn id(self) -> usize {
        self.id
    }

    #[must_use]
    pub fn name(self) -> String {
        format!("{PLACEHOLDER_PREFIX}{}", self.id)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PLACEHOLDER_PREFIX}{}", self.id)
    }
}

/// Параметры, принадлежащие одному запросу
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placeholders {
    entries: BTreeMap<usize, PlaceholderValue>,
}

impl Placeholders {
    /// Регистрирует значение под следующим свободным номером
    pub fn add(&mut self, value: impl Into<PlaceholderValue>) -> Placeholder {
        let id = self.entries.keys().next_back().map_or(0, |last| last + 1);
        self.set(id, value)
    }

    /// Регистрирует значение под явным номером, заменяя прежнее
    pub fn set(&mut self, id: usize, value: impl Into<PlaceholderValue>) -> Placeholder {
        self.entries.insert(id, value.into());
        Placeholder { id }
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&PlaceholderValue> {
        self.entries.get(&id)
    }

    pub fn remove(&mut self, id: usize) -> Option<PlaceholderValue> {
        self.entries.remove(&id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Карта `:qp_<id>` -> значение для параметризованного выполнения
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, PlaceholderValue> {
        self.entries
            .iter()
            .map(|(id, value)| (Placeholder { id: *id }.name(), value.clone()))
            .collect()
    }
}

/// Переписывает `:qp_<id>` в позиционные `$1..$n` драйвера
///
/// Номера раздаются в порядке первого появления, повторная ссылка на тот же
/// параметр получает тот же номер. Возвращает SQL и значения по порядку.
pub fn positional(sql: &str, placeholders: &Placeholders) -> Result<(String, Vec<PlaceholderValue>)> {
    let mut output = String::with_capacity(sql.len());
    let mut binds = Vec::new();
    let mut positions: HashMap<usize, usize> = HashMap::new();
    let mut rest = sql;

    while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
        let after = &rest[start + PLACEHOLDER_PREFIX.len()..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();

        output.push_str(&rest[..start]);
        if digits == 0 {
            output.push_str(PLACEHOLDER_PREFIX);
            rest = after;
            continue;
        }

        let id: usize = after[..digits]
            .parse()
            .map_err(|_| SiteError::InvalidArgument(format!("{PLACEHOLDER_PREFIX}{}", &after[..digits])))?;
        let position = if let Some(position) = positions.get(&id) {
            *position
        } else {
            let value = placeholders
                .get(id)
                .ok_or_else(|| SiteError::InvalidArgument(Placeholder { id }.name()))?;
            binds.push(value.clone());
            positions.insert(id, binds.len());
            binds.len()
        };

        output.push_str(&format!("${position}"));
        rest = &after[digits..];
    }
    output.push_str(rest);

    Ok((output, binds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_next_id() {
        let mut placeholders = Placeholders::default();
        let first = placeholders.add("secret");
        let second = placeholders.add(42);
        assert_eq!(first.name(), ":qp_0");
        assert_eq!(second.to_string(), ":qp_1");

        placeholders.set(7, true);
        assert_eq!(placeholders.add(1.5).id(), 8);
        assert_eq!(placeholders.count(), 4);

        assert_eq!(placeholders.remove(0), Some(PlaceholderValue::Text("secret".into())));
        assert_eq!(placeholders.count(), 3);
    }

    #[test]
    fn test_to_map() {
        let mut placeholders = Placeholders::default();
        placeholders.add(Option::<i64>::None);
        placeholders.add("x");

        let map = placeholders.to_map();
        assert_eq!(map.get(":qp_0"), Some(&PlaceholderValue::Null));
        assert_eq!(map.get(":qp_1"), Some(&PlaceholderValue::Text("x".into())));
    }

    #[test]
    fn test_positional_rewrite() {
        let mut placeholders = Placeholders::default();
        let a = placeholders.add("a");
        let b = placeholders.add(2);

        let sql = format!("select {b}, {a}, {b}::text");
        let (rewritten, binds) = positional(&sql, &placeholders).unwrap();
        assert_eq!(rewritten, "select $1, $2, $1::text");
        assert_eq!(binds, vec![PlaceholderValue::Int(2), PlaceholderValue::Text("a".into())]);
    }

    #[test]
    fn test_positional_keeps_unrelated_text() {
        let placeholders = Placeholders::default();
        let (rewritten, binds) = positional("select ':qp_' as x", &placeholders).unwrap();
        assert_eq!(rewritten, "select ':qp_' as x");
        assert!(binds.is_empty());
    }

    #[test]
    fn test_positional_unknown_placeholder() {
        let placeholders = Placeholders::default();
        assert!(matches!(
            positional("select :qp_3", &placeholders),
            Err(SiteError::InvalidArgument(name)) if name == ":qp_3"
        ));
    }
}
