use clap::{Parser, Subcommand, ValueEnum};
use pgsite::query::utility::IsolationLevel;
use pgsite::query::{
    AlterDatabase, AlterRole, AlterSequence, AlterTable, Analyze, Begin, Query, RoleSpecification, Rollback,
    positional,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Isolation {
    Serializable,
    RepeatableRead,
    ReadCommitted,
    ReadUncommitted,
}

impl From<Isolation> for IsolationLevel {
    fn from(isolation: Isolation) -> Self {
        match isolation {
            Isolation::Serializable => Self::Serializable,
            Isolation::RepeatableRead => Self::RepeatableRead,
            Isolation::ReadCommitted => Self::ReadCommitted,
            Isolation::ReadUncommitted => Self::ReadUncommitted,
        }
    }
}

/// Общие действия над именованным объектом
#[derive(Debug, clap::Args)]
struct ObjectArgs {
    /// Object name
    name: String,

    #[arg(long, conflicts_with_all = ["owner_to", "set_schema"])]
    rename_to: Option<String>,

    #[arg(long, conflicts_with = "set_schema")]
    owner_to: Option<String>,

    #[arg(long)]
    set_schema: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// alter table
    Table {
        #[command(flatten)]
        object: ObjectArgs,

        #[arg(long)]
        if_exists: bool,

        #[arg(long)]
        only: bool,
    },
    /// alter sequence
    Sequence {
        #[command(flatten)]
        object: ObjectArgs,

        #[arg(long)]
        increment_by: Option<i64>,

        #[arg(long)]
        restart_with: Option<i64>,
    },
    /// alter database
    Database {
        name: String,

        #[arg(long)]
        rename_to: Option<String>,

        #[arg(long)]
        owner_to: Option<String>,
    },
    /// alter role
    Role {
        name: String,

        #[arg(long)]
        rename_to: Option<String>,

        /// Passed as a placeholder
        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        valid_until: Option<String>,
    },
    /// begin
    Begin {
        #[arg(long, value_enum)]
        isolation: Option<Isolation>,

        #[arg(long, conflicts_with = "read_write")]
        read_only: bool,

        #[arg(long)]
        read_write: bool,

        #[arg(long)]
        deferrable: bool,
    },
    /// rollback
    Rollback {
        #[arg(long, conflicts_with = "prepared")]
        savepoint: Option<String>,

        #[arg(long)]
        prepared: Option<String>,

        #[arg(long)]
        chain: bool,
    },
    /// analyze
    Analyze {
        #[arg(long)]
        verbose: bool,

        #[arg(long)]
        skip_locked: bool,

        /// Tables as `name` or `name:column,column`
        tables: Vec<String>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "pgs_query")]
#[command(about = "Build PostgreSQL statements and print the SQL", long_about = None)]
struct Args {
    /// Print `$n` parameters instead of named placeholders
    #[arg(short = 'p', long)]
    positional: bool,

    #[command(subcommand)]
    command: Command,
}

fn object_action(object: &ObjectArgs) -> (Option<&str>, Option<RoleSpecification>, Option<&str>) {
    (
        object.rename_to.as_deref(),
        object.owner_to.as_deref().map(RoleSpecification::from),
        object.set_schema.as_deref(),
    )
}

fn build(command: Command) -> Box<dyn Query> {
    match command {
        Command::Table { object, if_exists, only } => {
            let mut query = AlterTable::default();
            query.set_name(Some(&object.name));
            query.set_if_exists(if_exists);
            query.set_only(only);
            let (rename_to, owner_to, schema) = object_action(&object);
            if rename_to.is_some() {
                query.set_rename_to(rename_to);
            } else if owner_to.is_some() {
                query.set_owner_to(owner_to);
            } else {
                query.set_schema(schema);
            }
            Box::new(query)
        }
        Command::Sequence { object, increment_by, restart_with } => {
            let mut query = AlterSequence::default();
            query.set_name(Some(&object.name));
            query.set_increment_by(increment_by);
            query.set_restart_with(restart_with.map(Some));
            let (rename_to, owner_to, schema) = object_action(&object);
            if rename_to.is_some() {
                query.set_rename_to(rename_to);
            } else if owner_to.is_some() {
                query.set_owner_to(owner_to);
            } else if schema.is_some() {
                query.set_schema(schema);
            }
            Box::new(query)
        }
        Command::Database { name, rename_to, owner_to } => {
            let mut query = AlterDatabase::default();
            query.set_name(Some(&name));
            if rename_to.is_some() {
                query.set_rename_to(rename_to.as_deref());
            } else {
                query.set_owner_to(owner_to.as_deref().map(RoleSpecification::from));
            }
            Box::new(query)
        }
        Command::Role { name, rename_to, password, valid_until } => {
            let mut query = AlterRole::default();
            query.set_role_specification(Some(RoleSpecification::from(name.as_str())));
            if rename_to.is_some() {
                query.set_rename_to(rename_to.as_deref());
            }
            query.set_password(password.as_deref());
            query.set_valid_until(valid_until.as_deref());
            Box::new(query)
        }
        Command::Begin { isolation, read_only, read_write, deferrable } => {
            let mut query = Begin::default();
            query.set_isolation_level(isolation.map(IsolationLevel::from));
            query.set_read_write(if read_only { Some(false) } else { read_write.then_some(true) });
            query.set_deferrable(deferrable.then_some(true));
            Box::new(query)
        }
        Command::Rollback { savepoint, prepared, chain } => {
            let mut query = Rollback::default();
            query.set_to_savepoint(savepoint.as_deref());
            query.set_prepared(prepared.as_deref());
            query.set_chain(chain.then_some(true));
            Box::new(query)
        }
        Command::Analyze { verbose, skip_locked, tables } => {
            let mut query = Analyze::default();
            query.set_verbose(verbose);
            query.set_skip_locked(skip_locked);
            for table in &tables {
                let (name, columns) = table.split_once(':').unwrap_or((table, ""));
                let columns: Vec<&str> = columns.split(',').filter(|column| !column.is_empty()).collect();
                query.add_table(name, &columns);
            }
            Box::new(query)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut query = build(args.command);
    query.do_build()?;
    let sql = query.value().unwrap_or_default();

    if args.positional {
        let (sql, binds) = positional(sql, query.placeholders())?;
        println!("{sql}");
        for (index, value) in binds.iter().enumerate() {
            println!("${} = {}", index + 1, serde_json::to_string(value)?);
        }
    } else {
        println!("{sql}");
        for (name, value) in query.get_placeholders() {
            println!("{name} = {}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
