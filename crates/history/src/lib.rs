pub mod history;
pub mod storage;

pub use history::{HistoryError, NavigationHistory};
pub use storage::HistoryStore;
