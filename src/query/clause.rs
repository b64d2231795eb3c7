use super::placeholder::Placeholder;
use std::fmt;

/// Роль в клаузах `owner to`, `for role`, `to`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleSpecification {
    Name(String),
    CurrentUser,
    SessionUser,
    Public,
}

impl From<&str> for RoleSpecification {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl fmt::Display for RoleSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::CurrentUser => f.write_str("current_user"),
            Self::SessionUser => f.write_str("session_user"),
            Self::Public => f.write_str("public"),
        }
    }
}

/// Список через запятую
pub(crate) fn comma_list<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Строковый литерал с удвоенными кавычками
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    Cascade,
    Restrict,
}

impl fmt::Display for Cascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
        })
    }
}

/// Параметр хранения `name[=value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageParameter {
    pub name: String,
    pub value: Option<String>,
}

impl StorageParameter {
    #[must_use]
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self { name: name.to_string(), value: value.map(str::to_string) }
    }
}

impl fmt::Display for StorageParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={value}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// `set (a=1, b)` / `reset (a, b)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageParameters {
    Set(Vec<StorageParameter>),
    Reset(Vec<String>),
}

impl fmt::Display for StorageParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(parameters) => write!(f, "set ({})", comma_list(parameters)),
            Self::Reset(names) => write!(f, "reset ({})", comma_list(names)),
        }
    }
}

/// Настройка конфигурационного параметра для роли, базы или системы
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Configuration {
    /// `set name to value`, без значения `set name to default`
    Set { name: String, value: Option<Placeholder> },
    SetFromCurrent(String),
    Reset(String),
    ResetAll,
}

impl Configuration {
    /// Параметр, занятый значением `set ... to`
    #[must_use]
    pub const fn placeholder(&self) -> Option<Placeholder> {
        match self {
            Self::Set { value, .. } => *value,
            _ => None,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { name, value: Some(value) } => write!(f, "set {name} to {value}"),
            Self::Set { name, value: None } => write!(f, "set {name} to default"),
            Self::SetFromCurrent(name) => write!(f, "set {name} from current"),
            Self::Reset(name) => write!(f, "reset {name}"),
            Self::ResetAll => f.write_str("reset all"),
        }
    }
}

/// Элемент `options (...)` внешних объектов
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericOption {
    Add(String, String),
    Set(String, String),
    Drop(String),
}

impl fmt::Display for GenericOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(name, value) => write!(f, "add {name} {}", quote_literal(value)),
            Self::Set(name, value) => write!(f, "set {name} {}", quote_literal(value)),
            Self::Drop(name) => write!(f, "drop {name}"),
        }
    }
}

pub(crate) fn generic_options(options: &[GenericOption]) -> String {
    format!("options ({})", comma_list(options))
}

/// Режим `enable [replica | always]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnableMode {
    #[default]
    Origin,
    Replica,
    Always,
}

impl fmt::Display for EnableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Origin => "enable",
            Self::Replica => "enable replica",
            Self::Always => "enable always",
        })
    }
}

/// Общие действия большинства `alter`: переименование, владелец, схема
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectAction {
    RenameTo(String),
    OwnerTo(RoleSpecification),
    SetSchema(String),
}

impl fmt::Display for ObjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::OwnerTo(role) => write!(f, "owner to {role}"),
            Self::SetSchema(schema) => write!(f, "set schema {schema}"),
        }
    }
}

/// `all in tablespace name [owned by ...] set tablespace new [nowait]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllInTablespace {
    pub owned_by: Vec<RoleSpecification>,
    pub new_tablespace: String,
    pub no_wait: bool,
}

impl AllInTablespace {
    pub(crate) fn format(&self, tablespace: &str) -> String {
        let mut out = format!("all in tablespace {tablespace}");
        if !self.owned_by.is_empty() {
            out.push_str(&format!(" owned by {}", comma_list(&self.owned_by)));
        }
        out.push_str(&format!(" set tablespace {}", self.new_tablespace));
        if self.no_wait {
            out.push_str(" nowait");
        }
        out
    }
}
