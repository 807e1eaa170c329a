pub mod archive;
pub mod assemble;
pub mod chats;
pub mod cli;
pub mod codes;
pub mod config;
pub mod contacts;
pub mod error;
pub mod identity;
pub mod loaders;
pub mod logging;
pub mod model;
pub mod store;

pub use archive::{build_archive, ArchiveBuilder};
pub use config::Config;
pub use contacts::Contacts;
pub use error::{ArchiveError, Result};
pub use model::Archive;
pub use store::Snapshot;
