use super::clause::{Cascade, Configuration, GenericOption, RoleSpecification, comma_list, generic_options};
use super::placeholder::Placeholder;
use super::{Clauses, QueryBase, required, statement};
use crate::core::{Result, SiteError};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Атрибут роли в `with ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOption {
    Superuser(bool),
    CreateDb(bool),
    CreateRole(bool),
    Inherit(bool),
    Login(bool),
    Replication(bool),
    BypassRls(bool),
    ConnectionLimit(i32),
    /// `None` снимает пароль (`password null`)
    Password(Option<Placeholder>),
    ValidUntil(Placeholder),
}

impl fmt::Display for RoleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn flag(f: &mut fmt::Formatter<'_>, enabled: bool, name: &str) -> fmt::Result {
            if enabled { f.write_str(name) } else { write!(f, "no{name}") }
        }

        match self {
            Self::Superuser(enabled) => flag(f, *enabled, "superuser"),
            Self::CreateDb(enabled) => flag(f, *enabled, "createdb"),
            Self::CreateRole(enabled) => flag(f, *enabled, "createrole"),
            Self::Inherit(enabled) => flag(f, *enabled, "inherit"),
            Self::Login(enabled) => flag(f, *enabled, "login"),
            Self::Replication(enabled) => flag(f, *enabled, "replication"),
            Self::BypassRls(enabled) => flag(f, *enabled, "bypassrls"),
            Self::ConnectionLimit(limit) => write!(f, "connection limit {limit}"),
            Self::Password(Some(password)) => write!(f, "password {password}"),
            Self::Password(None) => f.write_str("password null"),
            Self::ValidUntil(timestamp) => write!(f, "valid until {timestamp}"),
        }
    }
}

/// `alter role`
///
/// Три формы, по убыванию приоритета:
/// - `name rename to new_name`
/// - `{role | all} [in database db] set/reset ...`
/// - `role [with] option ...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterRole {
    base: QueryBase,
    role_specification: Option<RoleSpecification>,
    all: bool,
    in_database: Option<String>,
    options: Vec<RoleOption>,
    rename_to: Option<String>,
    configuration: Option<Configuration>,
}

impl AlterRole {
    pub fn set_role_specification(&mut self, role: Option<RoleSpecification>) {
        self.role_specification = role;
    }

    #[must_use]
    pub const fn role_specification(&self) -> Option<&RoleSpecification> {
        self.role_specification.as_ref()
    }

    /// Настройки для всех ролей (`alter role all`), только вместе с конфигурацией
    pub fn set_all(&mut self, all: bool) {
        self.all = all;
    }

    pub fn set_in_database(&mut self, database: Option<&str>) {
        self.in_database = database.map(str::to_string);
    }

    pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
        self.rename_to = rename_to.map(str::to_string);
    }

    #[must_use]
    pub fn rename_to(&self) -> Option<&str> {
        self.rename_to.as_deref()
    }

    /// Значение `set name to ...` регистрируется как параметр; `None` даёт `default`
    pub fn set_configuration_value(&mut self, name: &str, value: Option<&str>) {
        self.clear_configuration();
        let value = value.map(|v| self.base.placeholders.add(v));
        self.configuration = Some(Configuration::Set { name: name.to_string(), value });
    }

    pub fn set_configuration(&mut self, configuration: Option<Configuration>) {
        self.clear_configuration();
        self.configuration = configuration;
    }

    #[must_use]
    pub const fn configuration(&self) -> Option<&Configuration> {
        self.configuration.as_ref()
    }

    fn clear_configuration(&mut self) {
        if let Some(Configuration::Set { value: Some(value), .. }) = self.configuration.take() {
            self.base.placeholders.remove(value.id());
        }
    }

    /// Добавляет флаг или лимит; пароль и срок задаются отдельными сеттерами
    pub fn add_option(&mut self, option: RoleOption) {
        self.options.push(option);
    }

    #[must_use]
    pub fn options(&self) -> &[RoleOption] {
        &self.options
    }

    pub fn clear_options(&mut self) {
        for option in std::mem::take(&mut self.options) {
            self.release_option(option);
        }
    }

    pub fn set_password(&mut self, password: Option<&str>) {
        self.remove_option(|option| matches!(option, RoleOption::Password(_)));
        if let Some(password) = password {
            let placeholder = self.base.placeholders.add(password);
            self.options.push(RoleOption::Password(Some(placeholder)));
        }
    }

    pub fn set_valid_until(&mut self, valid_until: Option<&str>) {
        self.remove_option(|option| matches!(option, RoleOption::ValidUntil(_)));
        if let Some(valid_until) = valid_until {
            let placeholder = self.base.placeholders.add(valid_until);
            self.options.push(RoleOption::ValidUntil(placeholder));
        }
    }

    fn remove_option(&mut self, predicate: impl Fn(&RoleOption) -> bool) {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.options).into_iter().partition(predicate);
        self.options = kept;
        for option in removed {
            self.release_option(option);
        }
    }

    fn release_option(&mut self, option: RoleOption) {
        match option {
            RoleOption::Password(Some(placeholder)) | RoleOption::ValidUntil(placeholder) => {
                self.base.placeholders.remove(placeholder.id());
            }
            _ => {}
        }
    }

    fn compose_for(&self, command: &'static str) -> Result<String> {
        let mut clauses = Clauses::new();

        if let Some(rename_to) = &self.rename_to {
            let role = required(&self.role_specification, command, "name")?;
            let RoleSpecification::Name(name) = role else {
                return Err(SiteError::InvalidArgument(format!("{command}: cannot rename {role}")));
            };
            clauses.push(name.as_str()).push(format!("rename to {rename_to}"));
            return Ok(clauses.finish());
        }

        if let Some(configuration) = &self.configuration {
            if self.all {
                clauses.push("all");
            } else {
                clauses.push(required(&self.role_specification, command, "name")?.to_string());
            }
            if let Some(database) = &self.in_database {
                clauses.push(format!("in database {database}"));
            }
            clauses.push(configuration.to_string());
            return Ok(clauses.finish());
        }

        let role = required(&self.role_specification, command, "name")?;
        if self.options.is_empty() {
            return Err(SiteError::Incomplete(command, "options"));
        }
        clauses
            .push(role.to_string())
            .push("with")
            .push(self.options.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "));
        Ok(clauses.finish())
    }

    fn compose_clauses(&self) -> Result<String> {
        self.compose_for("alter role")
    }
}

statement!(AlterRole, "alter role");

/// `alter user`: та же грамматика, что у `alter role`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterUser(AlterRole);

impl Deref for AlterUser {
    type Target = AlterRole;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for AlterUser {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl super::Query for AlterUser {
    fn command(&self) -> &'static str {
        "alter user"
    }

    fn compose(&self) -> Result<String> {
        self.0.compose_for("alter user")
    }

    fn base(&self) -> &QueryBase {
        &self.0.base
    }

    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.0.base
    }

    fn do_reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterGroupAction {
    AddUser(Vec<String>),
    DropUser(Vec<String>),
    RenameTo(String),
}

/// `alter group`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterGroup {
    base: QueryBase,
    role_specification: Option<RoleSpecification>,
    action: Option<AlterGroupAction>,
}

impl AlterGroup {
    const COMMAND: &'static str = "alter group";

    pub fn set_role_specification(&mut self, role: Option<RoleSpecification>) {
        self.role_specification = role;
    }

    pub fn set_action(&mut self, action: Option<AlterGroupAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let role = required(&self.role_specification, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        let action = match action {
            AlterGroupAction::AddUser(users) if !users.is_empty() => format!("add user {}", comma_list(users)),
            AlterGroupAction::DropUser(users) if !users.is_empty() => format!("drop user {}", comma_list(users)),
            AlterGroupAction::RenameTo(name) => format!("rename to {name}"),
            _ => return Err(SiteError::Incomplete(Self::COMMAND, "user")),
        };
        Ok(format!("{role} {action}"))
    }
}

statement!(AlterGroup, AlterGroup::COMMAND);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeTarget {
    Tables,
    Sequences,
    Functions,
    Routines,
    Types,
    Schemas,
}

impl fmt::Display for PrivilegeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tables => "tables",
            Self::Sequences => "sequences",
            Self::Functions => "functions",
            Self::Routines => "routines",
            Self::Types => "types",
            Self::Schemas => "schemas",
        })
    }
}

/// Пустой список привилегий означает `all`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultPrivilege {
    Grant {
        privileges: Vec<String>,
        on: PrivilegeTarget,
        to: Vec<RoleSpecification>,
        with_grant_option: bool,
    },
    Revoke {
        grant_option_for: bool,
        privileges: Vec<String>,
        on: PrivilegeTarget,
        from: Vec<RoleSpecification>,
        cascade: Option<Cascade>,
    },
}

fn privilege_list(privileges: &[String]) -> String {
    if privileges.is_empty() { "all".to_string() } else { comma_list(privileges) }
}

impl fmt::Display for DefaultPrivilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grant { privileges, on, to, with_grant_option } => {
                write!(f, "grant {} on {on} to {}", privilege_list(privileges), comma_list(to))?;
                if *with_grant_option {
                    f.write_str(" with grant option")?;
                }
                Ok(())
            }
            Self::Revoke { grant_option_for, privileges, on, from, cascade } => {
                f.write_str("revoke ")?;
                if *grant_option_for {
                    f.write_str("grant option for ")?;
                }
                write!(f, "{} on {on} from {}", privilege_list(privileges), comma_list(from))?;
                if let Some(cascade) = cascade {
                    write!(f, " {cascade}")?;
                }
                Ok(())
            }
        }
    }
}

/// `alter default privileges`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterDefaultPrivileges {
    base: QueryBase,
    for_roles: Vec<RoleSpecification>,
    in_schemas: Vec<String>,
    abbreviated: Option<DefaultPrivilege>,
}

impl AlterDefaultPrivileges {
    const COMMAND: &'static str = "alter default privileges";

    pub fn set_for_roles(&mut self, roles: Vec<RoleSpecification>) {
        self.for_roles = roles;
    }

    pub fn set_in_schemas(&mut self, schemas: Vec<String>) {
        self.in_schemas = schemas;
    }

    pub fn set_abbreviated(&mut self, abbreviated: Option<DefaultPrivilege>) {
        self.abbreviated = abbreviated;
    }

    fn compose_clauses(&self) -> Result<String> {
        let abbreviated = required(&self.abbreviated, Self::COMMAND, "abbreviated")?;

        let mut clauses = Clauses::new();
        if !self.for_roles.is_empty() {
            clauses.push(format!("for role {}", comma_list(&self.for_roles)));
        }
        if !self.in_schemas.is_empty() {
            clauses.push(format!("in schema {}", comma_list(&self.in_schemas)));
        }
        clauses.push(abbreviated.to_string());
        Ok(clauses.finish())
    }
}

statement!(AlterDefaultPrivileges, AlterDefaultPrivileges::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterPolicyAction {
    RenameTo(String),
    Change {
        to: Vec<RoleSpecification>,
        using: Option<String>,
        with_check: Option<String>,
    },
}

/// `alter policy`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterPolicy {
    base: QueryBase,
    name: Option<String>,
    table: Option<String>,
    action: Option<AlterPolicyAction>,
}

impl AlterPolicy {
    const COMMAND: &'static str = "alter policy";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_table(&mut self, table: Option<&str>) {
        self.table = table.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterPolicyAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let table = required(&self.table, Self::COMMAND, "table")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        let mut clauses = Clauses::new();
        clauses.push(format!("{name} on {table}"));
        match action {
            AlterPolicyAction::RenameTo(rename_to) => {
                clauses.push(format!("rename to {rename_to}"));
            }
            AlterPolicyAction::Change { to, using, with_check } => {
                if to.is_empty() && using.is_none() && with_check.is_none() {
                    return Err(SiteError::Incomplete(Self::COMMAND, "action"));
                }
                if !to.is_empty() {
                    clauses.push(format!("to {}", comma_list(to)));
                }
                clauses.push_opt(using.as_ref().map(|using| format!("using ({using})")));
                clauses.push_opt(with_check.as_ref().map(|check| format!("with check ({check})")));
            }
        }
        Ok(clauses.finish())
    }
}

statement!(AlterPolicy, AlterPolicy::COMMAND);

/// `alter user mapping`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterUserMapping {
    base: QueryBase,
    user: Option<RoleSpecification>,
    server: Option<String>,
    options: Vec<GenericOption>,
}

impl AlterUserMapping {
    const COMMAND: &'static str = "alter user mapping";

    pub fn set_user(&mut self, user: Option<RoleSpecification>) {
        self.user = user;
    }

    pub fn set_server(&mut self, server: Option<&str>) {
        self.server = server.map(str::to_string);
    }

    pub fn set_options(&mut self, options: Vec<GenericOption>) {
        self.options = options;
    }

    fn compose_clauses(&self) -> Result<String> {
        let user = required(&self.user, Self::COMMAND, "user")?;
        let server = required(&self.server, Self::COMMAND, "server")?;
        if self.options.is_empty() {
            return Err(SiteError::Incomplete(Self::COMMAND, "options"));
        }
        Ok(format!("for {user} server {server} {}", generic_options(&self.options)))
    }
}

statement!(AlterUserMapping, AlterUserMapping::COMMAND);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PlaceholderValue, Query};

    fn built(query: &mut impl Query) -> String {
        query.do_build().unwrap();
        query.value().unwrap().to_string()
    }

    #[test]
    fn test_alter_role_with_options() {
        let mut query = AlterRole::default();
        query.set_role_specification(Some(RoleSpecification::from("alice")));
        query.add_option(RoleOption::Login(true));
        query.add_option(RoleOption::CreateDb(false));
        query.set_password(Some("secret"));
        query.add_option(RoleOption::ConnectionLimit(5));

        assert_eq!(
            built(&mut query),
            "alter role alice with login nocreatedb password :qp_0 connection limit 5"
        );
        assert_eq!(
            query.get_placeholders().get(":qp_0"),
            Some(&PlaceholderValue::Text("secret".into()))
        );
    }

    #[test]
    fn test_alter_role_password_replaced() {
        let mut query = AlterRole::default();
        query.set_role_specification(Some(RoleSpecification::CurrentUser));
        query.set_password(Some("one"));
        query.set_password(Some("two"));
        assert_eq!(query.count_placeholders(), 1);
        assert_eq!(built(&mut query), "alter role current_user with password :qp_0");

        query.set_password(None);
        assert_eq!(query.count_placeholders(), 0);
        assert!(query.do_build().is_err());
    }

    #[test]
    fn test_alter_role_rename_and_configuration() {
        let mut query = AlterRole::default();
        query.set_role_specification(Some(RoleSpecification::from("alice")));
        query.set_rename_to(Some("alicia"));
        assert_eq!(built(&mut query), "alter role alice rename to alicia");

        query.set_rename_to(None);
        query.set_all(true);
        query.set_in_database(Some("standard"));
        query.set_configuration_value("search_path", Some("public"));
        assert_eq!(built(&mut query), "alter role all in database standard set search_path to :qp_0");

        query.set_configuration(Some(Configuration::ResetAll));
        assert_eq!(query.count_placeholders(), 0);
        assert_eq!(built(&mut query), "alter role all in database standard reset all");
    }

    #[test]
    fn test_alter_role_rename_requires_named_role() {
        let mut query = AlterRole::default();
        query.set_role_specification(Some(RoleSpecification::SessionUser));
        query.set_rename_to(Some("x"));
        assert!(matches!(query.do_build(), Err(SiteError::InvalidArgument(_))));
    }

    #[test]
    fn test_alter_user_uses_own_keyword() {
        let mut query = AlterUser::default();
        query.set_role_specification(Some(RoleSpecification::from("bob")));
        query.add_option(RoleOption::Superuser(false));
        assert_eq!(built(&mut query), "alter user bob with nosuperuser");
    }

    #[test]
    fn test_alter_group() {
        let mut query = AlterGroup::default();
        query.set_role_specification(Some(RoleSpecification::from("editors")));
        query.set_action(Some(AlterGroupAction::AddUser(vec!["a".into(), "b".into()])));
        assert_eq!(built(&mut query), "alter group editors add user a, b");

        query.set_action(Some(AlterGroupAction::DropUser(vec![])));
        assert!(query.do_build().is_err());
    }

    #[test]
    fn test_alter_default_privileges() {
        let mut query = AlterDefaultPrivileges::default();
        query.set_for_roles(vec![RoleSpecification::from("admin")]);
        query.set_in_schemas(vec!["s_users".into()]);
        query.set_abbreviated(Some(DefaultPrivilege::Grant {
            privileges: vec!["select".into(), "insert".into()],
            on: PrivilegeTarget::Tables,
            to: vec![RoleSpecification::Public],
            with_grant_option: true,
        }));
        assert_eq!(
            built(&mut query),
            "alter default privileges for role admin in schema s_users grant select, insert on tables to public with grant option"
        );

        query.set_for_roles(vec![]);
        query.set_in_schemas(vec![]);
        query.set_abbreviated(Some(DefaultPrivilege::Revoke {
            grant_option_for: false,
            privileges: vec![],
            on: PrivilegeTarget::Sequences,
            from: vec![RoleSpecification::from("u")],
            cascade: Some(Cascade::Restrict),
        }));
        assert_eq!(built(&mut query), "alter default privileges revoke all on sequences from u restrict");
    }

    #[test]
    fn test_alter_policy() {
        let mut query = AlterPolicy::default();
        query.set_name(Some("p_self"));
        query.set_table(Some("t_users"));
        query.set_action(Some(AlterPolicyAction::Change {
            to: vec![RoleSpecification::from("u_users")],
            using: Some("name_machine = current_user".into()),
            with_check: None,
        }));
        assert_eq!(
            built(&mut query),
            "alter policy p_self on t_users to u_users using (name_machine = current_user)"
        );
    }

    #[test]
    fn test_alter_user_mapping() {
        let mut query = AlterUserMapping::default();
        query.set_user(Some(RoleSpecification::CurrentUser));
        query.set_server(Some("ldap"));
        assert!(query.do_build().is_err());

        query.set_options(vec![GenericOption::Set("password".into(), "x".into())]);
        assert_eq!(built(&mut query), "alter user mapping for current_user server ldap options (set password 'x')");
    }
}
