// pgsite - session-aware web site over PostgreSQL
// Requests run through Index -> paths -> handler, database access goes
// through per-user connections and the statement builders in `query`.

// Clippy configuration - allow non-critical warnings
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::format_push_string)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::type_complexity)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

// Errors, settings, languages, roles and users
pub mod core;

// Statement builders (alter ..., begin, rollback, analyze)
pub mod query;

// PostgreSQL connections, user loading and audit log
pub mod database;

// Server-side sessions and the session cookie lifecycle
pub mod session;

// Request, response and cookie plumbing
pub mod http;

// Markup tree and HTML theme
pub mod markup;

// Path table, access control and handlers
pub mod paths;

// Per-request lifecycle controller
pub mod index;

// axum server
pub mod server;

// Re-export commonly used types for convenience
pub use core::{ErrorCode, Language, Result, Role, Settings, SiteError, User};
pub use database::{ConnectionString, Database, PgDatabase};
pub use http::{Request, Response};
pub use index::Index;
pub use paths::{Paths, do_process_path};
pub use query::Query;
pub use server::{AppState, create_router, serve};
pub use session::{MemorySessionStore, Session, SessionStore};
