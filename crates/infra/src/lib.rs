//! Infrastructure layer: document storage and the repositories built on it.

pub mod error;
pub mod history;
pub mod schedules;
pub mod store;
pub mod users;

pub use error::RepositoryError;
pub use history::{HISTORY_LIMIT, HistoryRepository};
pub use schedules::ScheduleRepository;
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore, StoreError, load_json, save_json};
pub use users::{DEFAULT_ADMIN_USERNAME, UserDirectory};
