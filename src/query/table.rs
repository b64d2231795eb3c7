use super::clause::{
    AllInTablespace, Cascade, EnableMode, GenericOption, RoleSpecification, StorageParameter, StorageParameters,
    comma_list, generic_options,
};
use super::{Clauses, QueryBase, object_action_setters, required, statement};
use crate::core::Result;
use std::fmt;

/// Способ хранения колонки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStorage {
    Plain,
    External,
    Extended,
    Main,
}

impl fmt::Display for ColumnStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::External => "external",
            Self::Extended => "extended",
            Self::Main => "main",
        })
    }
}

/// Изменение существующей колонки
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnChange {
    Type { data_type: String, collation: Option<String>, using: Option<String> },
    SetDefault(String),
    DropDefault,
    SetNotNull,
    DropNotNull,
    SetStatistics(i32),
    SetStorage(ColumnStorage),
    SetOptions(Vec<StorageParameter>),
    ResetOptions(Vec<String>),
}

impl fmt::Display for ColumnChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { data_type, collation, using } => {
                write!(f, "type {data_type}")?;
                if let Some(collation) = collation {
                    write!(f, " collate {collation}")?;
                }
                if let Some(using) = using {
                    write!(f, " using {using}")?;
                }
                Ok(())
            }
            Self::SetDefault(expression) => write!(f, "set default {expression}"),
            Self::DropDefault => f.write_str("drop default"),
            Self::SetNotNull => f.write_str("set not null"),
            Self::DropNotNull => f.write_str("drop not null"),
            Self::SetStatistics(target) => write!(f, "set statistics {target}"),
            Self::SetStorage(storage) => write!(f, "set storage {storage}"),
            Self::SetOptions(options) => write!(f, "set ({})", comma_list(options)),
            Self::ResetOptions(options) => write!(f, "reset ({})", comma_list(options)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnAction {
    Add {
        column: String,
        data_type: String,
        if_not_exists: bool,
        collation: Option<String>,
        constraint: Option<String>,
    },
    Drop { column: String, if_exists: bool, cascade: Option<Cascade> },
    Alter { column: String, change: ColumnChange },
    Rename { column: String, rename_to: String },
}

impl fmt::Display for ColumnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { column, data_type, if_not_exists, collation, constraint } => {
                f.write_str("add column ")?;
                if *if_not_exists {
                    f.write_str("if not exists ")?;
                }
                write!(f, "{column} {data_type}")?;
                if let Some(collation) = collation {
                    write!(f, " collate {collation}")?;
                }
                if let Some(constraint) = constraint {
                    write!(f, " {constraint}")?;
                }
                Ok(())
            }
            Self::Drop { column, if_exists, cascade } => {
                f.write_str("drop column ")?;
                if *if_exists {
                    f.write_str("if exists ")?;
                }
                f.write_str(column)?;
                if let Some(cascade) = cascade {
                    write!(f, " {cascade}")?;
                }
                Ok(())
            }
            Self::Alter { column, change } => write!(f, "alter column {column} {change}"),
            Self::Rename { column, rename_to } => write!(f, "rename column {column} to {rename_to}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintAction {
    /// Определение ограничения передаётся как есть, например `unique (a, b)`
    Add { definition: String, not_valid: bool },
    Validate(String),
    Drop { name: String, if_exists: bool, cascade: Option<Cascade> },
    Rename { name: String, rename_to: String },
}

impl fmt::Display for ConstraintAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { definition, not_valid } => {
                write!(f, "add {definition}")?;
                if *not_valid {
                    f.write_str(" not valid")?;
                }
                Ok(())
            }
            Self::Validate(name) => write!(f, "validate constraint {name}"),
            Self::Drop { name, if_exists, cascade } => {
                f.write_str("drop constraint ")?;
                if *if_exists {
                    f.write_str("if exists ")?;
                }
                f.write_str(name)?;
                if let Some(cascade) = cascade {
                    write!(f, " {cascade}")?;
                }
                Ok(())
            }
            Self::Rename { name, rename_to } => write!(f, "rename constraint {name} to {rename_to}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerSelector {
    All,
    User,
    Named(String),
}

impl fmt::Display for TriggerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::User => f.write_str("user"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLevelSecurity {
    Enable,
    Disable,
    Force,
    NoForce,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicaIdentity {
    Default,
    UsingIndex(String),
    Full,
    Nothing,
}

impl fmt::Display for ReplicaIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("replica identity default"),
            Self::UsingIndex(index) => write!(f, "replica identity using index {index}"),
            Self::Full => f.write_str("replica identity full"),
            Self::Nothing => f.write_str("replica identity nothing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableAction {
    Column(ColumnAction),
    Constraint(ConstraintAction),
    DisableTrigger(TriggerSelector),
    EnableTrigger(TriggerSelector, EnableMode),
    DisableRule(String),
    EnableRule(String, EnableMode),
    RowLevelSecurity(RowLevelSecurity),
    ClusterOn(String),
    SetWithoutCluster,
    SetLogged,
    SetUnlogged,
    StorageParameters(StorageParameters),
    Inherit(String),
    NoInherit(String),
    Of(String),
    NotOf,
    OwnerTo(RoleSpecification),
    ReplicaIdentity(ReplicaIdentity),
    RenameTo(String),
    SetSchema(String),
    SetTablespace { tablespace: String, no_wait: bool },
    /// Без границ присоединяется как `default`
    AttachPartition { partition: String, bound: Option<String> },
    DetachPartition(String),
    /// Имя построителя трактуется как исходное табличное пространство
    AllInTablespace(AllInTablespace),
}

impl AlterTableAction {
    /// `only` и `*` допустимы не для всех форм команды
    #[must_use]
    pub const fn allows_descendants(&self) -> bool {
        !matches!(
            self,
            Self::RenameTo(_)
                | Self::SetSchema(_)
                | Self::AttachPartition { .. }
                | Self::DetachPartition(_)
                | Self::AllInTablespace(_)
        )
    }
}

impl fmt::Display for AlterTableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(action) => write!(f, "{action}"),
            Self::Constraint(action) => write!(f, "{action}"),
            Self::DisableTrigger(trigger) => write!(f, "disable trigger {trigger}"),
            Self::EnableTrigger(trigger, mode) => write!(f, "{mode} trigger {trigger}"),
            Self::DisableRule(rule) => write!(f, "disable rule {rule}"),
            Self::EnableRule(rule, mode) => write!(f, "{mode} rule {rule}"),
            Self::RowLevelSecurity(security) => f.write_str(match security {
                RowLevelSecurity::Enable => "enable row level security",
                RowLevelSecurity::Disable => "disable row level security",
                RowLevelSecurity::Force => "force row level security",
                RowLevelSecurity::NoForce => "no force row level security",
            }),
            Self::ClusterOn(index) => write!(f, "cluster on {index}"),
            Self::SetWithoutCluster => f.write_str("set without cluster"),
            Self::SetLogged => f.write_str("set logged"),
            Self::SetUnlogged => f.write_str("set unlogged"),
            Self::StorageParameters(parameters) => write!(f, "{parameters}"),
            Self::Inherit(parent) => write!(f, "inherit {parent}"),
            Self::NoInherit(parent) => write!(f, "no inherit {parent}"),
            Self::Of(type_name) => write!(f, "of {type_name}"),
            Self::NotOf => f.write_str("not of"),
            Self::OwnerTo(role) => write!(f, "owner to {role}"),
            Self::ReplicaIdentity(identity) => write!(f, "{identity}"),
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::SetSchema(schema) => write!(f, "set schema {schema}"),
            Self::SetTablespace { tablespace, no_wait } => {
                write!(f, "set tablespace {tablespace}")?;
                if *no_wait {
                    f.write_str(" nowait")?;
                }
                Ok(())
            }
            Self::AttachPartition { partition, bound: Some(bound) } => {
                write!(f, "attach partition {partition} for values {bound}")
            }
            Self::AttachPartition { partition, bound: None } => write!(f, "attach partition {partition} default"),
            Self::DetachPartition(partition) => write!(f, "detach partition {partition}"),
            // Formatted by the builder, it needs the tablespace name first.
            Self::AllInTablespace(_) => Ok(()),
        }
    }
}

/// `alter table`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTable {
    base: QueryBase,
    name: Option<String>,
    if_exists: bool,
    only: bool,
    descendants: bool,
    action: Option<AlterTableAction>,
}

impl AlterTable {
    const COMMAND: &'static str = "alter table";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_if_exists(&mut self, if_exists: bool) {
        self.if_exists = if_exists;
    }

    #[must_use]
    pub const fn if_exists(&self) -> bool {
        self.if_exists
    }

    pub fn set_only(&mut self, only: bool) {
        self.only = only;
    }

    #[must_use]
    pub const fn only(&self) -> bool {
        self.only
    }

    /// Добавляет `*` после имени, включая наследников
    pub fn set_descendants(&mut self, descendants: bool) {
        self.descendants = descendants;
    }

    #[must_use]
    pub const fn descendants(&self) -> bool {
        self.descendants
    }

    pub fn set_action(&mut self, action: Option<AlterTableAction>) {
        self.action = action;
    }

    #[must_use]
    pub const fn action(&self) -> Option<&AlterTableAction> {
        self.action.as_ref()
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        if let AlterTableAction::AllInTablespace(all) = action {
            return Ok(all.format(name));
        }

        let descendants = action.allows_descendants();
        let mut clauses = Clauses::new();
        clauses
            .push_if(self.if_exists, "if exists")
            .push_if(self.only && descendants, "only")
            .push(name.as_str())
            .push_if(self.descendants && descendants, "*")
            .push(action.to_string());
        Ok(clauses.finish())
    }
}

statement!(AlterTable, AlterTable::COMMAND);
object_action_setters!(AlterTable, AlterTableAction);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterForeignTableAction {
    Column(ColumnAction),
    Constraint(ConstraintAction),
    DisableTrigger(TriggerSelector),
    EnableTrigger(TriggerSelector, EnableMode),
    Inherit(String),
    NoInherit(String),
    OwnerTo(RoleSpecification),
    Options(Vec<GenericOption>),
    RenameTo(String),
    SetSchema(String),
}

impl AlterForeignTableAction {
    #[must_use]
    pub const fn allows_descendants(&self) -> bool {
        !matches!(self, Self::RenameTo(_) | Self::SetSchema(_))
    }
}

impl fmt::Display for AlterForeignTableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(action) => write!(f, "{action}"),
            Self::Constraint(action) => write!(f, "{action}"),
            Self::DisableTrigger(trigger) => write!(f, "disable trigger {trigger}"),
            Self::EnableTrigger(trigger, mode) => write!(f, "{mode} trigger {trigger}"),
            Self::Inherit(parent) => write!(f, "inherit {parent}"),
            Self::NoInherit(parent) => write!(f, "no inherit {parent}"),
            Self::OwnerTo(role) => write!(f, "owner to {role}"),
            Self::Options(options) => f.write_str(&generic_options(options)),
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::SetSchema(schema) => write!(f, "set schema {schema}"),
        }
    }
}

/// `alter foreign table`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterForeignTable {
    base: QueryBase,
    name: Option<String>,
    if_exists: bool,
    only: bool,
    descendants: bool,
    action: Option<AlterForeignTableAction>,
}

impl AlterForeignTable {
    const COMMAND: &'static str = "alter foreign table";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_if_exists(&mut self, if_exists: bool) {
        self.if_exists = if_exists;
    }

    pub fn set_only(&mut self, only: bool) {
        self.only = only;
    }

    pub fn set_descendants(&mut self, descendants: bool) {
        self.descendants = descendants;
    }

    pub fn set_action(&mut self, action: Option<AlterForeignTableAction>) {
        self.action = action;
    }

    #[must_use]
    pub const fn action(&self) -> Option<&AlterForeignTableAction> {
        self.action.as_ref()
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        let descendants = action.allows_descendants();
        let mut clauses = Clauses::new();
        clauses
            .push_if(self.if_exists, "if exists")
            .push_if(self.only && descendants, "only")
            .push(name.as_str())
            .push_if(self.descendants && descendants, "*")
            .push(action.to_string());
        Ok(clauses.finish())
    }
}

statement!(AlterForeignTable, AlterForeignTable::COMMAND);
object_action_setters!(AlterForeignTable, AlterForeignTableAction);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterIndexAction {
    RenameTo(String),
    SetTablespace(String),
    AttachPartition(String),
    DependsOnExtension(String),
    StorageParameters(StorageParameters),
    AllInTablespace(AllInTablespace),
}

impl fmt::Display for AlterIndexAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::SetTablespace(tablespace) => write!(f, "set tablespace {tablespace}"),
            Self::AttachPartition(index) => write!(f, "attach partition {index}"),
            Self::DependsOnExtension(extension) => write!(f, "depends on extension {extension}"),
            Self::StorageParameters(parameters) => write!(f, "{parameters}"),
            Self::AllInTablespace(_) => Ok(()),
        }
    }
}

/// `alter index`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterIndex {
    base: QueryBase,
    name: Option<String>,
    if_exists: bool,
    action: Option<AlterIndexAction>,
}

impl AlterIndex {
    const COMMAND: &'static str = "alter index";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_if_exists(&mut self, if_exists: bool) {
        self.if_exists = if_exists;
    }

    pub fn set_action(&mut self, action: Option<AlterIndexAction>) {
        self.action = action;
    }

    pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
        self.action = rename_to.map(|name| AlterIndexAction::RenameTo(name.to_string()));
    }

    #[must_use]
    pub const fn action(&self) -> Option<&AlterIndexAction> {
        self.action.as_ref()
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        if let AlterIndexAction::AllInTablespace(all) = action {
            return Ok(all.format(name));
        }

        let mut clauses = Clauses::new();
        clauses.push_if(self.if_exists, "if exists").push(name.as_str()).push(action.to_string());
        Ok(clauses.finish())
    }
}

statement!(AlterIndex, AlterIndex::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterViewAction {
    /// `None` снимает значение по умолчанию
    ColumnDefault { column: String, default: Option<String> },
    OwnerTo(RoleSpecification),
    RenameTo(String),
    SetSchema(String),
    Options(StorageParameters),
}

impl fmt::Display for AlterViewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnDefault { column, default: Some(expression) } => {
                write!(f, "alter column {column} set default {expression}")
            }
            Self::ColumnDefault { column, default: None } => write!(f, "alter column {column} drop default"),
            Self::OwnerTo(role) => write!(f, "owner to {role}"),
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::SetSchema(schema) => write!(f, "set schema {schema}"),
            Self::Options(options) => write!(f, "{options}"),
        }
    }
}

/// `alter view`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterView {
    base: QueryBase,
    name: Option<String>,
    if_exists: bool,
    action: Option<AlterViewAction>,
}

impl AlterView {
    const COMMAND: &'static str = "alter view";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_if_exists(&mut self, if_exists: bool) {
        self.if_exists = if_exists;
    }

    pub fn set_action(&mut self, action: Option<AlterViewAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        let mut clauses = Clauses::new();
        clauses.push_if(self.if_exists, "if exists").push(name.as_str()).push(action.to_string());
        Ok(clauses.finish())
    }
}

statement!(AlterView, AlterView::COMMAND);
object_action_setters!(AlterView, AlterViewAction);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterMaterializedViewAction {
    DependsOnExtension(String),
    RenameColumn { column: String, rename_to: String },
    RenameTo(String),
    SetSchema(String),
    SetTablespace(String),
    OwnerTo(RoleSpecification),
    ClusterOn(String),
    SetWithoutCluster,
    StorageParameters(StorageParameters),
    AllInTablespace(AllInTablespace),
}

impl fmt::Display for AlterMaterializedViewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DependsOnExtension(extension) => write!(f, "depends on extension {extension}"),
            Self::RenameColumn { column, rename_to } => write!(f, "rename column {column} to {rename_to}"),
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::SetSchema(schema) => write!(f, "set schema {schema}"),
            Self::SetTablespace(tablespace) => write!(f, "set tablespace {tablespace}"),
            Self::OwnerTo(role) => write!(f, "owner to {role}"),
            Self::ClusterOn(index) => write!(f, "cluster on {index}"),
            Self::SetWithoutCluster => f.write_str("set without cluster"),
            Self::StorageParameters(parameters) => write!(f, "{parameters}"),
            Self::AllInTablespace(_) => Ok(()),
        }
    }
}

/// `alter materialized view`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterMaterializedView {
    base: QueryBase,
    name: Option<String>,
    if_exists: bool,
    action: Option<AlterMaterializedViewAction>,
}

impl AlterMaterializedView {
    const COMMAND: &'static str = "alter materialized view";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_if_exists(&mut self, if_exists: bool) {
        self.if_exists = if_exists;
    }

    pub fn set_action(&mut self, action: Option<AlterMaterializedViewAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;

        if let AlterMaterializedViewAction::AllInTablespace(all) = action {
            return Ok(all.format(name));
        }

        let mut clauses = Clauses::new();
        clauses.push_if(self.if_exists, "if exists").push(name.as_str()).push(action.to_string());
        Ok(clauses.finish())
    }
}

statement!(AlterMaterializedView, AlterMaterializedView::COMMAND);
object_action_setters!(AlterMaterializedView, AlterMaterializedViewAction);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use pretty_assertions::assert_eq;

    fn built(query: &mut impl Query) -> String {
        query.do_build().unwrap();
        query.value().unwrap().to_string()
    }

    #[test]
    fn test_alter_table_rename() {
        let mut query = AlterTable::default();
        query.set_name(Some("foo"));
        query.set_rename_to(Some("bar"));
        assert_eq!(built(&mut query), "alter table foo rename to bar");
    }

    #[test]
    fn test_alter_table_rename_drops_only() {
        let mut query = AlterTable::default();
        query.set_name(Some("foo"));
        query.set_only(true);
        query.set_descendants(true);
        query.set_rename_to(Some("bar"));
        assert_eq!(built(&mut query), "alter table foo rename to bar");

        query.set_action(Some(AlterTableAction::SetSchema("archive".into())));
        assert_eq!(built(&mut query), "alter table foo set schema archive");

        query.set_action(Some(AlterTableAction::SetLogged));
        assert_eq!(built(&mut query), "alter table only foo * set logged");

        let mut foreign = AlterForeignTable::default();
        foreign.set_name(Some("remote_users"));
        foreign.set_only(true);
        foreign.set_action(Some(AlterForeignTableAction::RenameTo("remote_accounts".into())));
        assert_eq!(built(&mut foreign), "alter foreign table remote_users rename to remote_accounts");
    }

    #[test]
    fn test_alter_table_requires_action() {
        let mut query = AlterTable::default();
        query.set_name(Some("foo"));
        assert!(query.do_build().is_err());
        assert_eq!(query.value(), None);
    }

    #[test]
    fn test_alter_table_flags_and_columns() {
        let mut query = AlterTable::default();
        query.set_name(Some("accounts"));
        query.set_if_exists(true);
        query.set_only(true);
        query.set_action(Some(AlterTableAction::Column(ColumnAction::Add {
            column: "nick".into(),
            data_type: "text".into(),
            if_not_exists: true,
            collation: None,
            constraint: Some("not null".into()),
        })));
        assert_eq!(
            built(&mut query),
            "alter table if exists only accounts add column if not exists nick text not null"
        );

        query.set_action(Some(AlterTableAction::Column(ColumnAction::Alter {
            column: "nick".into(),
            change: ColumnChange::Type {
                data_type: "varchar(32)".into(),
                collation: Some("\"C\"".into()),
                using: Some("left(nick, 32)".into()),
            },
        })));
        assert_eq!(
            built(&mut query),
            "alter table if exists only accounts alter column nick type varchar(32) collate \"C\" using left(nick, 32)"
        );
    }

    #[test]
    fn test_alter_table_constraints_and_triggers() {
        let mut query = AlterTable::default();
        query.set_name(Some("t"));
        query.set_descendants(true);
        query.set_action(Some(AlterTableAction::Constraint(ConstraintAction::Drop {
            name: "t_pkey".into(),
            if_exists: true,
            cascade: Some(Cascade::Cascade),
        })));
        assert_eq!(built(&mut query), "alter table t * drop constraint if exists t_pkey cascade");

        query.set_descendants(false);
        query.set_action(Some(AlterTableAction::EnableTrigger(TriggerSelector::All, EnableMode::Always)));
        assert_eq!(built(&mut query), "alter table t enable always trigger all");

        query.set_action(Some(AlterTableAction::AttachPartition { partition: "t_2024".into(), bound: None }));
        assert_eq!(built(&mut query), "alter table t attach partition t_2024 default");
    }

    #[test]
    fn test_alter_table_all_in_tablespace() {
        let mut query = AlterTable::default();
        query.set_name(Some("slow"));
        query.set_if_exists(true);
        query.set_action(Some(AlterTableAction::AllInTablespace(AllInTablespace {
            owned_by: vec![RoleSpecification::from("reporting")],
            new_tablespace: "fast".into(),
            no_wait: false,
        })));
        assert_eq!(
            built(&mut query),
            "alter table all in tablespace slow owned by reporting set tablespace fast"
        );
    }

    #[test]
    fn test_alter_foreign_table_options() {
        let mut query = AlterForeignTable::default();
        query.set_name(Some("remote_users"));
        query.set_action(Some(AlterForeignTableAction::Options(vec![GenericOption::Set(
            "schema_name".into(),
            "public".into(),
        )])));
        assert_eq!(built(&mut query), "alter foreign table remote_users options (set schema_name 'public')");

        query.set_owner_to(Some(RoleSpecification::CurrentUser));
        assert_eq!(built(&mut query), "alter foreign table remote_users owner to current_user");
    }

    #[test]
    fn test_alter_index_and_views() {
        let mut index = AlterIndex::default();
        index.set_name(Some("idx_a"));
        index.set_action(Some(AlterIndexAction::StorageParameters(StorageParameters::Set(vec![
            StorageParameter::new("fillfactor", Some("80")),
        ]))));
        assert_eq!(built(&mut index), "alter index idx_a set (fillfactor=80)");

        let mut view = AlterView::default();
        view.set_name(Some("v_users"));
        view.set_action(Some(AlterViewAction::ColumnDefault { column: "state".into(), default: None }));
        assert_eq!(built(&mut view), "alter view v_users alter column state drop default");

        let mut materialized = AlterMaterializedView::default();
        materialized.set_name(Some("m_totals"));
        materialized.set_schema(Some("s_reports"));
        assert_eq!(built(&mut materialized), "alter materialized view m_totals set schema s_reports");
    }
}
