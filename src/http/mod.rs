// HTTP plumbing shared by the index controller and the server
pub mod cookie;
pub mod request;
pub mod response;

pub use cookie::SessionCookie;
pub use request::Request;
pub use response::Response;
