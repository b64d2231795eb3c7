use super::clause::{
    Configuration, EnableMode, GenericOption, RoleSpecification, StorageParameter, StorageParameters, comma_list,
    generic_options, quote_literal,
};
use super::{Clauses, QueryBase, required, statement};
use crate::core::{Result, SiteError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseOption {
    AllowConnections(bool),
    ConnectionLimit(i32),
    IsTemplate(bool),
}

impl fmt::Display for DatabaseOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllowConnections(allow) => write!(f, "allow_connections {allow}"),
            Self::ConnectionLimit(limit) => write!(f, "connection limit {limit}"),
            Self::IsTemplate(template) => write!(f, "is_template {template}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterDatabaseAction {
    With(Vec<DatabaseOption>),
    RenameTo(String),
    OwnerTo(RoleSpecification),
    SetTablespace(String),
    Configuration(Configuration),
}

/// `alter database`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterDatabase {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterDatabaseAction>,
}

impl AlterDatabase {
    const COMMAND: &'static str = "alter database";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_action(&mut self, action: Option<AlterDatabaseAction>) {
        if let Some(AlterDatabaseAction::Configuration(old)) = &self.action {
            if let Some(placeholder) = old.placeholder() {
                self.base.placeholders.remove(placeholder.id());
            }
        }
        self.action = action;
    }

    #[must_use]
    pub const fn action(&self) -> Option<&AlterDatabaseAction> {
        self.action.as_ref()
    }

    pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
        self.set_action(rename_to.map(|name| AlterDatabaseAction::RenameTo(name.to_string())));
    }

    pub fn set_owner_to(&mut self, owner_to: Option<RoleSpecification>) {
        self.set_action(owner_to.map(AlterDatabaseAction::OwnerTo));
    }

    /// `set name to :qp_#`, без значения `set name to default`
    pub fn set_configuration_value(&mut self, name: &str, value: Option<&str>) {
        self.set_action(None);
        let value = value.map(|v| self.base.placeholders.add(v));
        self.action = Some(AlterDatabaseAction::Configuration(Configuration::Set { name: name.to_string(), value }));
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        let action = match action {
            AlterDatabaseAction::With(options) if !options.is_empty() => {
                format!("with {}", options.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "))
            }
            AlterDatabaseAction::With(_) => return Err(SiteError::Incomplete(Self::COMMAND, "options")),
            AlterDatabaseAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
            AlterDatabaseAction::OwnerTo(role) => format!("owner to {role}"),
            AlterDatabaseAction::SetTablespace(tablespace) => format!("set tablespace {tablespace}"),
            AlterDatabaseAction::Configuration(configuration) => configuration.to_string(),
        };
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterDatabase, AlterDatabase::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTablespaceAction {
    RenameTo(String),
    OwnerTo(RoleSpecification),
    Options(StorageParameters),
}

/// `alter tablespace`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTablespace {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterTablespaceAction>,
}

impl AlterTablespace {
    const COMMAND: &'static str = "alter tablespace";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterTablespaceAction>) {
        self.action = action;
    }

    pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
        self.action = rename_to.map(|name| AlterTablespaceAction::RenameTo(name.to_string()));
    }

    pub fn set_owner_to(&mut self, owner_to: Option<RoleSpecification>) {
        self.action = owner_to.map(AlterTablespaceAction::OwnerTo);
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterTablespaceAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
            AlterTablespaceAction::OwnerTo(role) => format!("owner to {role}"),
            AlterTablespaceAction::Options(options) => options.to_string(),
        };
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterTablespace, AlterTablespace::COMMAND);

/// `alter system`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterSystem {
    base: QueryBase,
    configuration: Option<Configuration>,
}

impl AlterSystem {
    const COMMAND: &'static str = "alter system";

    pub fn set_configuration(&mut self, configuration: Option<Configuration>) {
        if let Some(placeholder) = self.configuration.take().and_then(|old| old.placeholder()) {
            self.base.placeholders.remove(placeholder.id());
        }
        self.configuration = configuration;
    }

    pub fn set_configuration_value(&mut self, name: &str, value: Option<&str>) {
        self.set_configuration(None);
        let value = value.map(|v| self.base.placeholders.add(v));
        self.configuration = Some(Configuration::Set { name: name.to_string(), value });
    }

    #[must_use]
    pub const fn configuration(&self) -> Option<&Configuration> {
        self.configuration.as_ref()
    }

    fn compose_clauses(&self) -> Result<String> {
        let configuration = required(&self.configuration, Self::COMMAND, "configuration")?;
        if matches!(configuration, Configuration::SetFromCurrent(_)) {
            return Err(SiteError::InvalidArgument(format!("{}: set from current", Self::COMMAND)));
        }
        Ok(configuration.to_string())
    }
}

statement!(AlterSystem, AlterSystem::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterServerAction {
    Change { version: Option<String>, options: Vec<GenericOption> },
    OwnerTo(RoleSpecification),
    RenameTo(String),
}

/// `alter server`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterServer {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterServerAction>,
}

impl AlterServer {
    const COMMAND: &'static str = "alter server";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterServerAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let mut clauses = Clauses::new();
        clauses.push(name.as_str());

        match required(&self.action, Self::COMMAND, "action")? {
            AlterServerAction::Change { version, options } => {
                if version.is_none() && options.is_empty() {
                    return Err(SiteError::Incomplete(Self::COMMAND, "version"));
                }
                clauses.push_opt(version.as_deref().map(|v| format!("version {}", quote_literal(v))));
                if !options.is_empty() {
                    clauses.push(generic_options(options));
                }
            }
            AlterServerAction::OwnerTo(role) => {
                clauses.push(format!("owner to {role}"));
            }
            AlterServerAction::RenameTo(rename_to) => {
                clauses.push(format!("rename to {rename_to}"));
            }
        }
        Ok(clauses.finish())
    }
}

statement!(AlterServer, AlterServer::COMMAND);

/// Функция обработчика или валидатора обёртки; `None` даёт `no handler`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperFunction(pub Option<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterForeignDataWrapperAction {
    Change {
        handler: Option<WrapperFunction>,
        validator: Option<WrapperFunction>,
        options: Vec<GenericOption>,
    },
    OwnerTo(RoleSpecification),
    RenameTo(String),
}

/// `alter foreign data wrapper`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterForeignDataWrapper {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterForeignDataWrapperAction>,
}

impl AlterForeignDataWrapper {
    const COMMAND: &'static str = "alter foreign data wrapper";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterForeignDataWrapperAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let mut clauses = Clauses::new();
        clauses.push(name.as_str());

        match required(&self.action, Self::COMMAND, "action")? {
            AlterForeignDataWrapperAction::Change { handler, validator, options } => {
                if handler.is_none() && validator.is_none() && options.is_empty() {
                    return Err(SiteError::Incomplete(Self::COMMAND, "handler"));
                }
                if let Some(WrapperFunction(function)) = handler {
                    clauses.push(function.as_ref().map_or_else(|| "no handler".to_string(), |f| format!("handler {f}")));
                }
                if let Some(WrapperFunction(function)) = validator {
                    clauses.push(
                        function.as_ref().map_or_else(|| "no validator".to_string(), |f| format!("validator {f}")),
                    );
                }
                if !options.is_empty() {
                    clauses.push(generic_options(options));
                }
            }
            AlterForeignDataWrapperAction::OwnerTo(role) => {
                clauses.push(format!("owner to {role}"));
            }
            AlterForeignDataWrapperAction::RenameTo(rename_to) => {
                clauses.push(format!("rename to {rename_to}"));
            }
        }
        Ok(clauses.finish())
    }
}

statement!(AlterForeignDataWrapper, AlterForeignDataWrapper::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterExtensionAction {
    /// Без версии обновляет до версии по умолчанию
    Update(Option<String>),
    SetSchema(String),
    /// Объект передаётся как есть, например `function f(integer)`
    AddMember(String),
    DropMember(String),
}

/// `alter extension`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterExtension {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterExtensionAction>,
}

impl AlterExtension {
    const COMMAND: &'static str = "alter extension";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterExtensionAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterExtensionAction::Update(Some(version)) => format!("update to {}", quote_literal(version)),
            AlterExtensionAction::Update(None) => "update".to_string(),
            AlterExtensionAction::SetSchema(schema) => format!("set schema {schema}"),
            AlterExtensionAction::AddMember(member) => format!("add {member}"),
            AlterExtensionAction::DropMember(member) => format!("drop {member}"),
        };
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterExtension, AlterExtension::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterSubscriptionAction {
    Connection(String),
    SetPublication { publications: Vec<String>, refresh: Option<bool> },
    RefreshPublication { copy_data: Option<bool> },
    Enable,
    Disable,
    SetOptions(Vec<StorageParameter>),
    OwnerTo(RoleSpecification),
    RenameTo(String),
}

/// `alter subscription`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterSubscription {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterSubscriptionAction>,
}

impl AlterSubscription {
    const COMMAND: &'static str = "alter subscription";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterSubscriptionAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterSubscriptionAction::Connection(connection) => format!("connection {}", quote_literal(connection)),
            AlterSubscriptionAction::SetPublication { publications, .. } if publications.is_empty() => {
                return Err(SiteError::Incomplete(Self::COMMAND, "publication"));
            }
            AlterSubscriptionAction::SetPublication { publications, refresh } => {
                let mut action = format!("set publication {}", comma_list(publications));
                if let Some(refresh) = refresh {
                    action.push_str(&format!(" with (refresh = {refresh})"));
                }
                action
            }
            AlterSubscriptionAction::RefreshPublication { copy_data: Some(copy_data) } => {
                format!("refresh publication with (copy_data = {copy_data})")
            }
            AlterSubscriptionAction::RefreshPublication { copy_data: None } => "refresh publication".to_string(),
            AlterSubscriptionAction::Enable => "enable".to_string(),
            AlterSubscriptionAction::Disable => "disable".to_string(),
            AlterSubscriptionAction::SetOptions(options) => format!("set ({})", comma_list(options)),
            AlterSubscriptionAction::OwnerTo(role) => format!("owner to {role}"),
            AlterSubscriptionAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
        };
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterSubscription, AlterSubscription::COMMAND);

/// `alter large object`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterLargeObject {
    base: QueryBase,
    oid: Option<u32>,
    owner_to: Option<RoleSpecification>,
}

impl AlterLargeObject {
    const COMMAND: &'static str = "alter large object";

    pub fn set_oid(&mut self, oid: Option<u32>) {
        self.oid = oid;
    }

    #[must_use]
    pub const fn oid(&self) -> Option<u32> {
        self.oid
    }

    pub fn set_owner_to(&mut self, owner_to: Option<RoleSpecification>) {
        self.owner_to = owner_to;
    }

    fn compose_clauses(&self) -> Result<String> {
        let oid = required(&self.oid, Self::COMMAND, "oid")?;
        let owner_to = required(&self.owner_to, Self::COMMAND, "owner_to")?;
        Ok(format!("{oid} owner to {owner_to}"))
    }
}

statement!(AlterLargeObject, AlterLargeObject::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterLanguageAction {
    RenameTo(String),
    OwnerTo(RoleSpecification),
}

/// `alter [procedural] language`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterLanguage {
    base: QueryBase,
    name: Option<String>,
    procedural: bool,
    action: Option<AlterLanguageAction>,
}

impl AlterLanguage {
    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_procedural(&mut self, procedural: bool) {
        self.procedural = procedural;
    }

    pub fn set_action(&mut self, action: Option<AlterLanguageAction>) {
        self.action = action;
    }

    pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
        self.action = rename_to.map(|name| AlterLanguageAction::RenameTo(name.to_string()));
    }

    pub fn set_owner_to(&mut self, owner_to: Option<RoleSpecification>) {
        self.action = owner_to.map(AlterLanguageAction::OwnerTo);
    }
}

impl super::Query for AlterLanguage {
    fn command(&self) -> &'static str {
        if self.procedural { "alter procedural language" } else { "alter language" }
    }

    fn compose(&self) -> Result<String> {
        let name = required(&self.name, self.command(), "name")?;
        let action = match required(&self.action, self.command(), "action")? {
            AlterLanguageAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
            AlterLanguageAction::OwnerTo(role) => format!("owner to {role}"),
        };
        Ok(format!("{name} {action}"))
    }

    fn base(&self) -> &QueryBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.base
    }

    fn do_reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterEventTriggerAction {
    Disable,
    Enable(EnableMode),
    OwnerTo(RoleSpecification),
    RenameTo(String),
}

/// `alter event trigger`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterEventTrigger {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterEventTriggerAction>,
}

impl AlterEventTrigger {
    const COMMAND: &'static str = "alter event trigger";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterEventTriggerAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterEventTriggerAction::Disable => "disable".to_string(),
            AlterEventTriggerAction::Enable(mode) => mode.to_string(),
            AlterEventTriggerAction::OwnerTo(role) => format!("owner to {role}"),
            AlterEventTriggerAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
        };
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterEventTrigger, AlterEventTrigger::COMMAND);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PlaceholderValue, Query};

    fn built(query: &mut impl Query) -> String {
        query.do_build().unwrap();
        query.value().unwrap().to_string()
    }

    #[test]
    fn test_alter_database() {
        let mut query = AlterDatabase::default();
        query.set_name(Some("standard"));
        query.set_action(Some(AlterDatabaseAction::With(vec![
            DatabaseOption::AllowConnections(false),
            DatabaseOption::ConnectionLimit(20),
        ])));
        assert_eq!(built(&mut query), "alter database standard with allow_connections false connection limit 20");

        query.set_configuration_value("timezone", Some("UTC"));
        assert_eq!(built(&mut query), "alter database standard set timezone to :qp_0");
        assert_eq!(query.get_placeholders().get(":qp_0"), Some(&PlaceholderValue::Text("UTC".into())));

        query.set_rename_to(Some("legacy"));
        assert_eq!(query.count_placeholders(), 0);
        assert_eq!(built(&mut query), "alter database standard rename to legacy");
    }

    #[test]
    fn test_alter_system() {
        let mut query = AlterSystem::default();
        query.set_configuration_value("work_mem", None);
        assert_eq!(built(&mut query), "alter system set work_mem to default");

        query.set_configuration(Some(Configuration::Reset("work_mem".into())));
        assert_eq!(built(&mut query), "alter system reset work_mem");

        query.set_configuration(Some(Configuration::SetFromCurrent("work_mem".into())));
        assert!(query.do_build().is_err());
    }

    #[test]
    fn test_alter_server_and_wrapper() {
        let mut server = AlterServer::default();
        server.set_name(Some("ldap"));
        server.set_action(Some(AlterServerAction::Change {
            version: Some("2.0".into()),
            options: vec![GenericOption::Set("host".into(), "ldap.local".into())],
        }));
        assert_eq!(built(&mut server), "alter server ldap version '2.0' options (set host 'ldap.local')");

        let mut wrapper = AlterForeignDataWrapper::default();
        wrapper.set_name(Some("ldap_fdw"));
        wrapper.set_action(Some(AlterForeignDataWrapperAction::Change {
            handler: Some(WrapperFunction(None)),
            validator: Some(WrapperFunction(Some("ldap_validator".into()))),
            options: vec![],
        }));
        assert_eq!(built(&mut wrapper), "alter foreign data wrapper ldap_fdw no handler validator ldap_validator");
    }

    #[test]
    fn test_alter_extension_and_subscription() {
        let mut extension = AlterExtension::default();
        extension.set_name(Some("pgcrypto"));
        extension.set_action(Some(AlterExtensionAction::Update(Some("1.3".into()))));
        assert_eq!(built(&mut extension), "alter extension pgcrypto update to '1.3'");

        let mut subscription = AlterSubscription::default();
        subscription.set_name(Some("sub"));
        subscription.set_action(Some(AlterSubscriptionAction::SetPublication {
            publications: vec!["a".into(), "b".into()],
            refresh: Some(false),
        }));
        assert_eq!(built(&mut subscription), "alter subscription sub set publication a, b with (refresh = false)");
    }

    #[test]
    fn test_alter_large_object_requires_owner() {
        let mut query = AlterLargeObject::default();
        query.set_oid(Some(16402));
        assert!(query.do_build().is_err());

        query.set_owner_to(Some(RoleSpecification::from("u_files")));
        assert_eq!(built(&mut query), "alter large object 16402 owner to u_files");
    }

    #[test]
    fn test_alter_language_procedural() {
        let mut query = AlterLanguage::default();
        query.set_name(Some("plpgsql"));
        query.set_owner_to(Some(RoleSpecification::SessionUser));
        assert_eq!(built(&mut query), "alter language plpgsql owner to session_user");

        query.set_procedural(true);
        query.set_rename_to(Some("plpgsql2"));
        assert_eq!(built(&mut query), "alter procedural language plpgsql rename to plpgsql2");
    }

    #[test]
    fn test_alter_event_trigger_and_tablespace() {
        let mut trigger = AlterEventTrigger::default();
        trigger.set_name(Some("audit_ddl"));
        trigger.set_action(Some(AlterEventTriggerAction::Enable(EnableMode::Replica)));
        assert_eq!(built(&mut trigger), "alter event trigger audit_ddl enable replica");

        let mut tablespace = AlterTablespace::default();
        tablespace.set_name(Some("fast"));
        tablespace.set_action(Some(AlterTablespaceAction::Options(StorageParameters::Set(vec![
            StorageParameter::new("random_page_cost", Some("1.1")),
        ]))));
        assert_eq!(built(&mut tablespace), "alter tablespace fast set (random_page_cost=1.1)");
    }
}
