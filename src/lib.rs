pub mod admin;
pub mod client;
pub mod defaults;
pub mod ids;
pub mod intake;
pub mod relay;
pub mod settings;
pub mod storage;
pub mod store;
pub mod structures;
pub mod texts;
pub mod views;

pub use settings::{PersistencePolicy, Settings};
pub use storage::Storage;
pub use store::{AppState, PortalStore};
