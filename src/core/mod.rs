// Module declarations
pub mod error;
pub mod language;
pub mod role;
pub mod settings;
pub mod user;

// Re-exports for convenience
pub use error::{ErrorCode, Result, SiteError};
pub use language::Language;
pub use role::{Role, Roles};
pub use settings::Settings;
pub use user::User;
