pub mod database;
pub mod providers;

pub use database::ContactDb;
pub use providers::{ContactStore, MailTransport, TextGenerator};
