/*
 * Responsibility
 * - record store の契約 (trait) と実装 (Postgres / in-memory)
 * - 認証コアは AccountStore の読み取りだけに依存する
 */
pub mod account_repo;
pub mod error;
pub mod memory;
pub mod message_repo;
pub mod postgres;

pub use account_repo::{Account, AccountStore, NewAccount, ProfileUpdate};
pub use error::{RepoError, RepoResult};
pub use memory::MemoryStore;
pub use message_repo::{ContactMessage, Feedback, MessageStore, NewContactMessage, NewFeedback};
pub use postgres::PgStore;
