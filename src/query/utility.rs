use super::clause::{comma_list, quote_literal};
use super::{Clauses, QueryBase, statement};
use crate::core::Result;
use std::fmt;

/// Необязательное слово после `begin`/`rollback`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKeyword {
    Work,
    Transaction,
}

impl fmt::Display for TransactionKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Work => "work",
            Self::Transaction => "transaction",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    Serializable,
    RepeatableRead,
    ReadCommitted,
    ReadUncommitted,
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Serializable => "isolation level serializable",
            Self::RepeatableRead => "isolation level repeatable read",
            Self::ReadCommitted => "isolation level read committed",
            Self::ReadUncommitted => "isolation level read uncommitted",
        })
    }
}

/// `begin [work | transaction] [transaction_mode, ...]`
///
/// Все части необязательны, пустой построитель даёт просто `begin`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Begin {
    base: QueryBase,
    keyword: Option<TransactionKeyword>,
    isolation_level: Option<IsolationLevel>,
    /// `Some(true)` = `read write`, `Some(false)` = `read only`
    read_write: Option<bool>,
    deferrable: Option<bool>,
}

impl Begin {
    const COMMAND: &'static str = "begin";

    pub fn set_keyword(&mut self, keyword: Option<TransactionKeyword>) {
        self.keyword = keyword;
    }

    pub fn set_isolation_level(&mut self, isolation_level: Option<IsolationLevel>) {
        self.isolation_level = isolation_level;
    }

    pub fn set_read_write(&mut self, read_write: Option<bool>) {
        self.read_write = read_write;
    }

    pub fn set_deferrable(&mut self, deferrable: Option<bool>) {
        self.deferrable = deferrable;
    }

    fn compose_clauses(&self) -> Result<String> {
        let mut modes = Vec::new();
        if let Some(level) = self.isolation_level {
            modes.push(level.to_string());
        }
        if let Some(read_write) = self.read_write {
            modes.push(if read_write { "read write" } else { "read only" }.to_string());
        }
        if let Some(deferrable) = self.deferrable {
            modes.push(if deferrable { "deferrable" } else { "not deferrable" }.to_string());
        }

        let mut clauses = Clauses::new();
        clauses.push_opt(self.keyword).push(comma_list(&modes));
        Ok(clauses.finish())
    }
}

statement!(Begin, Begin::COMMAND);

/// `rollback`: обычный, до точки сохранения или подготовленной транзакции
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollback {
    base: QueryBase,
    keyword: Option<TransactionKeyword>,
    chain: Option<bool>,
    to_savepoint: Option<String>,
    prepared: Option<String>,
}

impl Rollback {
    const COMMAND: &'static str = "rollback";

    pub fn set_keyword(&mut self, keyword: Option<TransactionKeyword>) {
        self.keyword = keyword;
    }

    /// `and chain` / `and no chain`
    pub fn set_chain(&mut self, chain: Option<bool>) {
        self.chain = chain;
    }

    pub fn set_to_savepoint(&mut self, savepoint: Option<&str>) {
        self.to_savepoint = savepoint.map(str::to_string);
    }

    /// Имеет приоритет над остальными частями
    pub fn set_prepared(&mut self, transaction_id: Option<&str>) {
        self.prepared = transaction_id.map(str::to_string);
    }

    fn compose_clauses(&self) -> Result<String> {
        if let Some(transaction_id) = &self.prepared {
            return Ok(format!("prepared {}", quote_literal(transaction_id)));
        }

        let mut clauses = Clauses::new();
        clauses.push_opt(self.keyword);
        if let Some(savepoint) = &self.to_savepoint {
            clauses.push(format!("to savepoint {savepoint}"));
        } else if let Some(chain) = self.chain {
            clauses.push(if chain { "and chain" } else { "and no chain" });
        }
        Ok(clauses.finish())
    }
}

statement!(Rollback, Rollback::COMMAND);

/// Таблица для `analyze` с необязательным списком колонок
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeTable {
    pub name: String,
    pub columns: Vec<String>,
}

impl fmt::Display for AnalyzeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.columns.is_empty() {
            write!(f, " ({})", comma_list(&self.columns))?;
        }
        Ok(())
    }
}

/// `analyze [(verbose, skip_locked)] [table [(columns)], ...]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analyze {
    base: QueryBase,
    verbose: bool,
    skip_locked: bool,
    tables: Vec<AnalyzeTable>,
}

impl Analyze {
    const COMMAND: &'static str = "analyze";

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_skip_locked(&mut self, skip_locked: bool) {
        self.skip_locked = skip_locked;
    }

    pub fn add_table(&mut self, name: &str, columns: &[&str]) {
        self.tables.push(AnalyzeTable {
            name: name.to_string(),
            columns: columns.iter().map(|column| (*column).to_string()).collect(),
        });
    }

    pub fn clear_tables(&mut self) {
        self.tables.clear();
    }

    fn compose_clauses(&self) -> Result<String> {
        let mut options = Vec::new();
        if self.verbose {
            options.push("verbose");
        }
        if self.skip_locked {
            options.push("skip_locked");
        }

        let mut clauses = Clauses::new();
        if !options.is_empty() {
            clauses.push(format!("({})", comma_list(&options)));
        }
        clauses.push(comma_list(&self.tables));
        Ok(clauses.finish())
    }
}

statement!(Analyze, Analyze::COMMAND);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;

    #[test]
    fn test_empty_builders_produce_bare_command() {
        let mut begin = Begin::default();
        let mut rollback = Rollback::default();
        let mut analyze = Analyze::default();
        begin.do_build().unwrap();
        rollback.do_build().unwrap();
        analyze.do_build().unwrap();
        assert_eq!(begin.value(), Some("begin"));
        assert_eq!(rollback.value(), Some("rollback"));
        assert_eq!(analyze.value(), Some("analyze"));
    }

    #[test]
    fn test_begin_modes() {
        let mut query = Begin::default();
        query.set_keyword(Some(TransactionKeyword::Transaction));
        query.set_isolation_level(Some(IsolationLevel::RepeatableRead));
        query.set_read_write(Some(false));
        query.set_deferrable(Some(true));
        query.do_build().unwrap();
        assert_eq!(
            query.value(),
            Some("begin transaction isolation level repeatable read, read only, deferrable")
        );
    }

    #[test]
    fn test_rollback_forms() {
        let mut query = Rollback::default();
        query.set_keyword(Some(TransactionKeyword::Work));
        query.set_chain(Some(false));
        query.do_build().unwrap();
        assert_eq!(query.value(), Some("rollback work and no chain"));

        query.set_to_savepoint(Some("sp_1"));
        query.do_build().unwrap();
        assert_eq!(query.value(), Some("rollback work to savepoint sp_1"));

        query.set_prepared(Some("tx'1"));
        query.do_build().unwrap();
        assert_eq!(query.value(), Some("rollback prepared 'tx''1'"));
    }

    #[test]
    fn test_analyze_tables() {
        let mut query = Analyze::default();
        query.set_verbose(true);
        query.set_skip_locked(true);
        query.add_table("s_tables.t_users", &["id", "name_machine"]);
        query.add_table("s_tables.t_logs", &[]);
        query.do_build().unwrap();
        assert_eq!(
            query.value(),
            Some("analyze (verbose, skip_locked) s_tables.t_users (id, name_machine), s_tables.t_logs")
        );
    }
}
