use super::clause::{Cascade, ObjectAction, RoleSpecification, StorageParameter, comma_list, quote_literal};
use super::{Clauses, QueryBase, object_action_setters, required, statement};
use crate::core::{Result, SiteError};
use std::fmt;

/// Граница последовательности: значение или `no minvalue`/`no maxvalue`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceBound {
    Value(i64),
    Unbounded,
}

/// `alter sequence`
///
/// Либо одно из `rename to`/`owner to`/`set schema`, либо набор опций
/// в фиксированном порядке.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterSequence {
    base: QueryBase,
    name: Option<String>,
    if_exists: bool,
    action: Option<ObjectAction>,
    as_data_type: Option<String>,
    increment_by: Option<i64>,
    min_value: Option<SequenceBound>,
    max_value: Option<SequenceBound>,
    start_with: Option<i64>,
    /// `Some(None)` даёт `restart` без значения
    restart_with: Option<Option<i64>>,
    cache: Option<i64>,
    cycle: Option<bool>,
    /// `Some(None)` даёт `owned by none`
    owned_by: Option<Option<String>>,
}

impl AlterSequence {
    const COMMAND: &'static str = "alter sequence";

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

    pub fn set_action(&mut self, action: Option<ObjectAction>) {
        self.action = action;
    }

    pub fn set_as_data_type(&mut self, data_type: Option<&str>) {
        self.as_data_type = data_type.map(str::to_string);
    }

    pub fn set_increment_by(&mut self, increment_by: Option<i64>) {
        self.increment_by = increment_by;
    }

    pub fn set_min_value(&mut self, min_value: Option<SequenceBound>) {
        self.min_value = min_value;
    }

    pub fn set_max_value(&mut self, max_value: Option<SequenceBound>) {
        self.max_value = max_value;
    }

    pub fn set_start_with(&mut self, start_with: Option<i64>) {
        self.start_with = start_with;
    }

    pub fn set_restart_with(&mut self, restart_with: Option<Option<i64>>) {
        self.restart_with = restart_with;
    }

    pub fn set_cache(&mut self, cache: Option<i64>) {
        self.cache = cache;
    }

    pub fn set_cycle(&mut self, cycle: Option<bool>) {
        self.cycle = cycle;
    }

    pub fn set_owned_by(&mut self, owned_by: Option<Option<&str>>) {
        self.owned_by = owned_by.map(|column| column.map(str::to_string));
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;

        let mut clauses = Clauses::new();
        clauses.push_if(self.if_exists, "if exists").push(name.as_str());

        if let Some(action) = &self.action {
            clauses.push(action.to_string());
            return Ok(clauses.finish());
        }

        let mut options = Clauses::new();
        options
            .push_opt(self.as_data_type.as_ref().map(|t| format!("as {t}")))
            .push_opt(self.increment_by.map(|by| format!("increment by {by}")))
            .push_opt(self.min_value.map(|bound| match bound {
                SequenceBound::Value(value) => format!("minvalue {value}"),
                SequenceBound::Unbounded => "no minvalue".to_string(),
            }))
            .push_opt(self.max_value.map(|bound| match bound {
                SequenceBound::Value(value) => format!("maxvalue {value}"),
                SequenceBound::Unbounded => "no maxvalue".to_string(),
            }))
            .push_opt(self.start_with.map(|start| format!("start with {start}")))
            .push_opt(self.restart_with.map(|restart| match restart {
                Some(value) => format!("restart with {value}"),
                None => "restart".to_string(),
            }))
            .push_opt(self.cache.map(|cache| format!("cache {cache}")))
            .push_opt(self.cycle.map(|cycle| if cycle { "cycle" } else { "no cycle" }))
            .push_opt(self.owned_by.as_ref().map(|owned| match owned {
                Some(column) => format!("owned by {column}"),
                None => "owned by none".to_string(),
            }));

        let options = options.finish();
        if options.is_empty() {
            return Err(SiteError::Incomplete(Self::COMMAND, "options"));
        }
        clauses.push(options);
        Ok(clauses.finish())
    }
}

statement!(AlterSequence, AlterSequence::COMMAND);

impl AlterSequence {
    pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
        self.action = rename_to.map(|name| ObjectAction::RenameTo(name.to_string()));
    }

    pub fn set_owner_to(&mut self, owner_to: Option<RoleSpecification>) {
        self.action = owner_to.map(ObjectAction::OwnerTo);
    }

    pub fn set_schema(&mut self, schema: Option<&str>) {
        self.action = schema.map(|name| ObjectAction::SetSchema(name.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterCollationAction {
    RefreshVersion,
    RenameTo(String),
    OwnerTo(RoleSpecification),
    SetSchema(String),
}

/// `alter collation`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterCollation {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterCollationAction>,
}

impl AlterCollation {
    const COMMAND: &'static str = "alter collation";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterCollationAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterCollationAction::RefreshVersion => "refresh version".to_string(),
            AlterCollationAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
            AlterCollationAction::OwnerTo(role) => format!("owner to {role}"),
            AlterCollationAction::SetSchema(schema) => format!("set schema {schema}"),
        };
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterCollation, AlterCollation::COMMAND);
object_action_setters!(AlterCollation, AlterCollationAction);

/// Построитель вида `alter <object> name {rename to | owner to | set schema}`
macro_rules! object_statement {
    ($type:ident, $command:expr) => {
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $type {
            base: QueryBase,
            name: Option<String>,
            action: Option<ObjectAction>,
        }

        impl $type {
            pub fn set_name(&mut self, name: Option<&str>) {
                self.name = name.map(str::to_string);
            }

            #[must_use]
            pub fn name(&self) -> Option<&str> {
                self.name.as_deref()
            }

            pub fn set_action(&mut self, action: Option<ObjectAction>) {
                self.action = action;
            }

            fn compose_clauses(&self) -> Result<String> {
                let name = required(&self.name, $command, "name")?;
                let action = required(&self.action, $command, "action")?;
                Ok(format!("{name} {action}"))
            }
        }

        statement!($type, $command);
        object_action_setters!($type, ObjectAction);
    };
}

object_statement!(AlterConversion, "alter conversion");
object_statement!(AlterTextSearchConfiguration, "alter text search configuration");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTriggerAction {
    RenameTo(String),
    DependsOnExtension(String),
}

/// `alter trigger name on table ...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTrigger {
    base: QueryBase,
    name: Option<String>,
    table: Option<String>,
    action: Option<AlterTriggerAction>,
}

impl AlterTrigger {
    const COMMAND: &'static str = "alter trigger";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_table(&mut self, table: Option<&str>) {
        self.table = table.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterTriggerAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let table = required(&self.table, Self::COMMAND, "table")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterTriggerAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
            AlterTriggerAction::DependsOnExtension(extension) => format!("depends on extension {extension}"),
        };
        Ok(format!("{name} on {table} {action}"))
    }
}

statement!(AlterTrigger, AlterTrigger::COMMAND);

/// `alter rule name on table rename to new_name`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterRule {
    base: QueryBase,
    name: Option<String>,
    table: Option<String>,
    rename_to: Option<String>,
}

impl AlterRule {
    const COMMAND: &'static str = "alter rule";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_table(&mut self, table: Option<&str>) {
        self.table = table.map(str::to_string);
    }

    pub fn set_rename_to(&mut self, rename_to: Option<&str>) {
        self.rename_to = rename_to.map(str::to_string);
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let table = required(&self.table, Self::COMMAND, "table")?;
        let rename_to = required(&self.rename_to, Self::COMMAND, "rename_to")?;
        Ok(format!("{name} on {table} rename to {rename_to}"))
    }
}

statement!(AlterRule, AlterRule::COMMAND);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePosition {
    Before(String),
    After(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTypeAction {
    AddValue { value: String, if_not_exists: bool, position: Option<ValuePosition> },
    RenameValue { value: String, rename_to: String },
    RenameAttribute { attribute: String, rename_to: String, cascade: Option<Cascade> },
    RenameTo(String),
    OwnerTo(RoleSpecification),
    SetSchema(String),
}

impl fmt::Display for AlterTypeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddValue { value, if_not_exists, position } => {
                f.write_str("add value ")?;
                if *if_not_exists {
                    f.write_str("if not exists ")?;
                }
                f.write_str(&quote_literal(value))?;
                match position {
                    Some(ValuePosition::Before(neighbor)) => write!(f, " before {}", quote_literal(neighbor)),
                    Some(ValuePosition::After(neighbor)) => write!(f, " after {}", quote_literal(neighbor)),
                    None => Ok(()),
                }
            }
            Self::RenameValue { value, rename_to } => {
                write!(f, "rename value {} to {}", quote_literal(value), quote_literal(rename_to))
            }
            Self::RenameAttribute { attribute, rename_to, cascade } => {
                write!(f, "rename attribute {attribute} to {rename_to}")?;
                if let Some(cascade) = cascade {
                    write!(f, " {cascade}")?;
                }
                Ok(())
            }
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::OwnerTo(role) => write!(f, "owner to {role}"),
            Self::SetSchema(schema) => write!(f, "set schema {schema}"),
        }
    }
}

/// `alter type`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterType {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterTypeAction>,
}

impl AlterType {
    const COMMAND: &'static str = "alter type";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterTypeAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterType, AlterType::COMMAND);
object_action_setters!(AlterType, AlterTypeAction);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterDomainAction {
    SetDefault(String),
    DropDefault,
    SetNotNull,
    DropNotNull,
    AddConstraint { definition: String, not_valid: bool },
    DropConstraint { name: String, if_exists: bool, cascade: Option<Cascade> },
    ValidateConstraint(String),
    RenameConstraint { name: String, rename_to: String },
    RenameTo(String),
    OwnerTo(RoleSpecification),
    SetSchema(String),
}

impl fmt::Display for AlterDomainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetDefault(expression) => write!(f, "set default {expression}"),
            Self::DropDefault => f.write_str("drop default"),
            Self::SetNotNull => f.write_str("set not null"),
            Self::DropNotNull => f.write_str("drop not null"),
            Self::AddConstraint { definition, not_valid } => {
                write!(f, "add {definition}")?;
                if *not_valid {
                    f.write_str(" not valid")?;
                }
                Ok(())
            }
            Self::DropConstraint { name, if_exists, cascade } => {
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
            Self::ValidateConstraint(name) => write!(f, "validate constraint {name}"),
            Self::RenameConstraint { name, rename_to } => write!(f, "rename constraint {name} to {rename_to}"),
            Self::RenameTo(name) => write!(f, "rename to {name}"),
            Self::OwnerTo(role) => write!(f, "owner to {role}"),
            Self::SetSchema(schema) => write!(f, "set schema {schema}"),
        }
    }
}

/// `alter domain`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterDomain {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterDomainAction>,
}

impl AlterDomain {
    const COMMAND: &'static str = "alter domain";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterDomainAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterDomain, AlterDomain::COMMAND);
object_action_setters!(AlterDomain, AlterDomainAction);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterFunctionAction {
    RenameTo(String),
    OwnerTo(RoleSpecification),
    SetSchema(String),
    DependsOnExtension(String),
}

/// `alter function name[(argument types)]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterFunction {
    base: QueryBase,
    name: Option<String>,
    /// `None` опускает список аргументов, допустимо для неперегруженных функций
    arguments: Option<Vec<String>>,
    action: Option<AlterFunctionAction>,
}

impl AlterFunction {
    const COMMAND: &'static str = "alter function";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_arguments(&mut self, arguments: Option<Vec<String>>) {
        self.arguments = arguments;
    }

    pub fn set_action(&mut self, action: Option<AlterFunctionAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterFunctionAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
            AlterFunctionAction::OwnerTo(role) => format!("owner to {role}"),
            AlterFunctionAction::SetSchema(schema) => format!("set schema {schema}"),
            AlterFunctionAction::DependsOnExtension(extension) => format!("depends on extension {extension}"),
        };
        let signature = match &self.arguments {
            Some(arguments) => format!("{name}({})", comma_list(arguments)),
            None => name.clone(),
        };
        Ok(format!("{signature} {action}"))
    }
}

statement!(AlterFunction, AlterFunction::COMMAND);
object_action_setters!(AlterFunction, AlterFunctionAction);

/// `alter aggregate name(argument types)`; без аргументов `(*)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterAggregate {
    base: QueryBase,
    name: Option<String>,
    arguments: Vec<String>,
    action: Option<ObjectAction>,
}

impl AlterAggregate {
    const COMMAND: &'static str = "alter aggregate";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_arguments(&mut self, arguments: Vec<String>) {
        self.arguments = arguments;
    }

    pub fn set_action(&mut self, action: Option<ObjectAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = required(&self.action, Self::COMMAND, "action")?;
        let arguments = if self.arguments.is_empty() { "*".to_string() } else { comma_list(&self.arguments) };
        Ok(format!("{name}({arguments}) {action}"))
    }
}

statement!(AlterAggregate, AlterAggregate::COMMAND);
object_action_setters!(AlterAggregate, ObjectAction);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterOperatorAction {
    OwnerTo(RoleSpecification),
    SetSchema(String),
}

/// `alter operator name ({left | none}, right)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterOperator {
    base: QueryBase,
    name: Option<String>,
    left_type: Option<String>,
    right_type: Option<String>,
    action: Option<AlterOperatorAction>,
}

impl AlterOperator {
    const COMMAND: &'static str = "alter operator";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    /// `None` для префиксных операторов
    pub fn set_left_type(&mut self, left_type: Option<&str>) {
        self.left_type = left_type.map(str::to_string);
    }

    pub fn set_right_type(&mut self, right_type: Option<&str>) {
        self.right_type = right_type.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterOperatorAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let right = required(&self.right_type, Self::COMMAND, "right_type")?;
        let left = self.left_type.as_deref().unwrap_or("none");
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterOperatorAction::OwnerTo(role) => format!("owner to {role}"),
            AlterOperatorAction::SetSchema(schema) => format!("set schema {schema}"),
        };
        Ok(format!("{name} ({left}, {right}) {action}"))
    }
}

statement!(AlterOperator, AlterOperator::COMMAND);

/// `alter operator class name using index_method`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterOperatorClass {
    base: QueryBase,
    name: Option<String>,
    index_method: Option<String>,
    action: Option<ObjectAction>,
}

impl AlterOperatorClass {
    const COMMAND: &'static str = "alter operator class";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_index_method(&mut self, index_method: Option<&str>) {
        self.index_method = index_method.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<ObjectAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let index_method = required(&self.index_method, Self::COMMAND, "index_method")?;
        let action = required(&self.action, Self::COMMAND, "action")?;
        Ok(format!("{name} using {index_method} {action}"))
    }
}

statement!(AlterOperatorClass, AlterOperatorClass::COMMAND);
object_action_setters!(AlterOperatorClass, ObjectAction);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTextSearchDictionaryAction {
    Options(Vec<StorageParameter>),
    RenameTo(String),
    OwnerTo(RoleSpecification),
    SetSchema(String),
}

/// `alter text search dictionary`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTextSearchDictionary {
    base: QueryBase,
    name: Option<String>,
    action: Option<AlterTextSearchDictionaryAction>,
}

impl AlterTextSearchDictionary {
    const COMMAND: &'static str = "alter text search dictionary";

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn set_action(&mut self, action: Option<AlterTextSearchDictionaryAction>) {
        self.action = action;
    }

    fn compose_clauses(&self) -> Result<String> {
        let name = required(&self.name, Self::COMMAND, "name")?;
        let action = match required(&self.action, Self::COMMAND, "action")? {
            AlterTextSearchDictionaryAction::Options(options) if options.is_empty() => {
                return Err(SiteError::Incomplete(Self::COMMAND, "options"));
            }
            AlterTextSearchDictionaryAction::Options(options) => format!("({})", comma_list(options)),
            AlterTextSearchDictionaryAction::RenameTo(rename_to) => format!("rename to {rename_to}"),
            AlterTextSearchDictionaryAction::OwnerTo(role) => format!("owner to {role}"),
            AlterTextSearchDictionaryAction::SetSchema(schema) => format!("set schema {schema}"),
        };
        Ok(format!("{name} {action}"))
    }
}

statement!(AlterTextSearchDictionary, AlterTextSearchDictionary::COMMAND);
object_action_setters!(AlterTextSearchDictionary, AlterTextSearchDictionaryAction);
