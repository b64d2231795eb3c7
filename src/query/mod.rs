// Statement builders for PostgreSQL
//
// Each builder holds optional clause values, `do_build()` assembles the
// lowercase statement text into `value()`. Values that need escaping are
// registered as placeholders and rewritten to `$n` before execution.

pub mod clause;
pub mod database;
pub mod object;
pub mod placeholder;
pub mod role;
pub mod table;
pub mod utility;

use crate::core::{Result, SiteError};
use std::collections::BTreeMap;

pub use clause::{Cascade, ObjectAction, RoleSpecification, StorageParameter};
pub use placeholder::{Placeholder, PlaceholderValue, Placeholders, positional};

/// Собранное значение и параметры, общие для всех построителей
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBase {
    value: Option<String>,
    placeholders: Placeholders,
}

/// Построитель одной SQL-команды
pub trait Query: Send + Sync {
    /// Ключевые слова команды, например `alter table`
    fn command(&self) -> &'static str;

    /// Части команды после ключевых слов; ошибка, если нет обязательного значения
    fn compose(&self) -> Result<String>;

    fn base(&self) -> &QueryBase;

    fn base_mut(&mut self) -> &mut QueryBase;

    /// Возвращает построитель в состояние сразу после создания
    fn do_reset(&mut self);

    /// Собирает команду в `value()`; при ошибке `value()` не меняется
    fn do_build(&mut self) -> Result<()> {
        let body = self.compose()?;
        let value = if body.is_empty() {
            self.command().to_string()
        } else {
            format!("{} {}", self.command(), body)
        };
        self.base_mut().value = Some(value);
        Ok(())
    }

    fn value(&self) -> Option<&str> {
        self.base().value.as_deref()
    }

    fn add_placeholder(&mut self, value: PlaceholderValue) -> Placeholder {
        self.base_mut().placeholders.add(value)
    }

    fn set_placeholder(&mut self, id: usize, value: PlaceholderValue) -> Placeholder {
        self.base_mut().placeholders.set(id, value)
    }

    fn remove_placeholder(&mut self, id: usize) -> Option<PlaceholderValue> {
        self.base_mut().placeholders.remove(id)
    }

    fn count_placeholders(&self) -> usize {
        self.base().placeholders.count()
    }

    fn placeholders(&self) -> &Placeholders {
        &self.base().placeholders
    }

    /// Параметры в виде `:qp_<id>` -> значение
    fn get_placeholders(&self) -> BTreeMap<String, PlaceholderValue> {
        self.base().placeholders.to_map()
    }
}

/// Накопитель частей команды, соединяемых одиночным пробелом
#[derive(Debug, Default)]
pub(crate) struct Clauses(Vec<String>);

impl Clauses {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, part: impl Into<String>) -> &mut Self {
        let part = part.into();
        if !part.is_empty() {
            self.0.push(part);
        }
        self
    }

    pub(crate) fn push_if(&mut self, condition: bool, part: &str) -> &mut Self {
        if condition {
            self.push(part);
        }
        self
    }

    pub(crate) fn push_opt(&mut self, part: Option<impl ToString>) -> &mut Self {
        if let Some(part) = part {
            self.push(part.to_string());
        }
        self
    }

    pub(crate) fn finish(&mut self) -> String {
        std::mem::take(&mut self.0).join(" ")
    }
}

/// Обязательное значение клаузы либо `SiteError::Incomplete`
pub(crate) fn required<'a, T>(value: &'a Option<T>, command: &'static str, clause: &'static str) -> Result<&'a T> {
    value.as_ref().ok_or(SiteError::Incomplete(command, clause))
}

/// Реализует `Query` для построителя с полем `base` и методом `compose_clauses`
macro_rules! statement {
    ($type:ty, $command:expr) => {
        impl $crate::query::Query for $type {
            fn command(&self) -> &'static str {
                $command
            }

            fn compose(&self) -> $crate::core::Result<String> {
                self.compose_clauses()
            }

            fn base(&self) -> &$crate::query::QueryBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::query::QueryBase {
                &mut self.base
            }

            fn do_reset(&mut self) {
                *self = Self::default();
            }
        }
    };
}

/// Удобные сеттеры для действий `rename to`, `owner to`, `set schema`
macro_rules! object_action_setters {
    ($type:ty, $action:ident) => {
        impl $type {
            pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
                self.action = rename_to.map(|name| $action::RenameTo(name.to_string()));
            }

            pub fn set_owner_to(&mut self, owner_to: Option<$crate::query::RoleSpecification>) {
                self.action = owner_to.map($action::OwnerTo);
            }

            pub fn set_schema(&mut self, schema: Option<&str>) {
                self.action = schema.map(|name| $action::SetSchema(name.to_string()));
            }
        }
    };
}

pub(crate) use object_action_setters;
pub(crate) use statement;

pub use database::{
    AlterDatabase, AlterEventTrigger, AlterExtension, AlterForeignDataWrapper, AlterLanguage, AlterLargeObject,
    AlterServer, AlterSubscription, AlterSystem, AlterTablespace,
};
pub use object::{
    AlterAggregate, AlterCollation, AlterConversion, AlterDomain, AlterFunction, AlterOperator, AlterOperatorClass,
    AlterRule, AlterSequence, AlterTextSearchConfiguration, AlterTextSearchDictionary, AlterTrigger, AlterType,
};
pub use role::{AlterDefaultPrivileges, AlterGroup, AlterPolicy, AlterRole, AlterUser, AlterUserMapping};
pub use table::{AlterForeignTable, AlterIndex, AlterMaterializedView, AlterTable, AlterView};
pub use utility::{Analyze, Begin, Rollback};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_incomplete<Q: Query + Default>() {
        let mut query = Q::default();
        let result = query.do_build();
        assert!(
            matches!(result, Err(SiteError::Incomplete(..))),
            "{} built without required clauses",
            query.command()
        );
        assert_eq!(query.value(), None);
    }

    #[test]
    fn test_every_statement_requires_its_name() {
        assert_incomplete::<AlterAggregate>();
        assert_incomplete::<AlterCollation>();
        assert_incomplete::<AlterConversion>();
        assert_incomplete::<AlterDatabase>();
        assert_incomplete::<AlterDefaultPrivileges>();
        assert_incomplete::<AlterDomain>();
        assert_incomplete::<AlterEventTrigger>();
        assert_incomplete::<AlterExtension>();
        assert_incomplete::<AlterForeignDataWrapper>();
        assert_incomplete::<AlterForeignTable>();
        assert_incomplete::<AlterFunction>();
        assert_incomplete::<AlterGroup>();
        assert_incomplete::<AlterIndex>();
        assert_incomplete::<AlterLanguage>();
        assert_incomplete::<AlterLargeObject>();
        assert_incomplete::<AlterMaterializedView>();
        assert_incomplete::<AlterOperator>();
        assert_incomplete::<AlterOperatorClass>();
        assert_incomplete::<AlterPolicy>();
        assert_incomplete::<AlterRole>();
        assert_incomplete::<AlterRule>();
        assert_incomplete::<AlterSequence>();
        assert_incomplete::<AlterServer>();
        assert_incomplete::<AlterSubscription>();
        assert_incomplete::<AlterSystem>();
        assert_incomplete::<AlterTable>();
        assert_incomplete::<AlterTablespace>();
        assert_incomplete::<AlterTextSearchConfiguration>();
        assert_incomplete::<AlterTextSearchDictionary>();
        assert_incomplete::<AlterTrigger>();
        assert_incomplete::<AlterType>();
        assert_incomplete::<AlterUser>();
        assert_incomplete::<AlterUserMapping>();
        assert_incomplete::<AlterView>();
    }

    #[test]
    fn test_failed_build_keeps_previous_value() {
        let mut query = AlterTable::default();
        query.set_name(Some("foo"));
        query.set_rename_to(Some("bar"));
        query.do_build().unwrap();

        query.set_name(None);
        assert!(query.do_build().is_err());
        assert_eq!(query.value(), Some("alter table foo rename to bar"));
    }

    #[test]
    fn test_reset_restores_constructor_state() {
        let mut query = AlterRole::default();
        query.set_role_specification(Some(RoleSpecification::from("alice")));
        query.set_password(Some("secret"));
        query.do_build().unwrap();
        assert_eq!(query.count_placeholders(), 1);

        query.do_reset();
        assert_eq!(query, AlterRole::default());
        assert_eq!(query.value(), None);
        assert!(query.get_placeholders().is_empty());
    }

    #[test]
    fn test_trait_placeholder_operations() {
        let mut query = Begin::default();
        let first = query.add_placeholder(PlaceholderValue::Bool(true));
        let explicit = query.set_placeholder(5, PlaceholderValue::Text("x".into()));
        assert_eq!(first.id(), 0);
        assert_eq!(explicit.name(), ":qp_5");
        assert_eq!(query.count_placeholders(), 2);
        assert_eq!(query.remove_placeholder(0), Some(PlaceholderValue::Bool(true)));
        assert_eq!(query.get_placeholders().keys().collect::<Vec<_>>(), vec![":qp_5"]);
    }

    #[test]
    fn test_clauses_skip_empty_parts() {
        let mut clauses = Clauses::new();
        clauses.push("a").push("").push_if(false, "b").push_opt(Some(3)).push_opt(None::<String>);
        assert_eq!(clauses.finish(), "a 3");
    }
}
