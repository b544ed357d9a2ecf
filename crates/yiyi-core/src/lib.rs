// ABOUTME: Core library for yiyi, containing the site's domain types and pure content rules.
// ABOUTME: This crate defines the shared data model used by the store and the HTTP server.

pub mod de;
pub mod error;
pub mod sample;
pub mod settings;
pub mod show;
pub mod video;

pub use error::ModelError;
pub use sample::{MediaKind, MoveDirection, MusicSample, SampleCatalog};
pub use settings::{SiteSettings, SiteText};
pub use show::Show;
