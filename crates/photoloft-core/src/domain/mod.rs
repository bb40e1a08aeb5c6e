//! Domain entities of the photo library client.

pub mod connection;
pub mod credentials;
pub mod page;
pub mod session;

pub use connection::ConnectionParams;
pub use credentials::Credentials;
pub use page::{DataPage, PagingOrder};
pub use session::{Session, SessionHolder};
