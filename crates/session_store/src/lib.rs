mod error;
mod export;
pub mod keys;
mod kv;
mod schema;
mod store;
mod window;

pub use error::StoreError;
pub use export::{export_document, ExportDocument, APP_NAME};
pub use kv::{get_json, set_json, FileKvStore, KeyValueStore, MemoryKvStore};
pub use schema::{Message, Role, Session, DEFAULT_SESSION_TITLE, MAX_TITLE_CHARS};
pub use store::SessionStore;
pub use window::{select_window, WindowMessage, DEFAULT_MEMORY_WINDOW};
