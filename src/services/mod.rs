// Service exports
pub mod accounts;
pub mod dashboard;
pub mod mailer;
pub mod memory;
pub mod postgres;
pub mod requests;
pub mod store;
pub mod tokens;

pub use accounts::AccountService;
pub use dashboard::DashboardService;
pub use mailer::{acceptance_email, DisabledMailer, Email, HttpMailer, MailError, Notifier};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use requests::RequestService;
pub use store::{Store, StoreError};
pub use tokens::{Claims, Identity, IssuedToken, TokenError, TokenIssuer};
