// ABOUTME: Persistence layer for yiyi: the file and hosted media plus the content stores built on them.
// ABOUTME: Exposes settings, show, and music sample stores over whichever medium was selected at startup.

pub mod decode;
pub mod error;
pub mod file;
pub mod frontmatter;
pub mod hosted;
pub mod kv;
pub mod medium;
pub mod samples;
pub mod settings;
pub mod shows;
pub mod testing;

pub use error::StoreError;
pub use file::FileMedium;
pub use hosted::HostedMedium;
pub use kv::{KvClient, KvError, RestKv};
pub use medium::{DocumentKey, HostedCredentials, Medium, MediumKind, StorageConfig, connect};
pub use samples::SampleStore;
pub use settings::SettingsStore;
pub use shows::ShowStore;
