// ABOUTME: Store for the show collection, keyed by slug.
// ABOUTME: Every operation re-reads the whole list, mutates it, and writes it back in full.

use std::sync::Arc;

use yiyi_core::Show;
use yiyi_core::show::validate_slug;

use crate::error::StoreError;
use crate::medium::Medium;

const KIND: &str = "show";

#[derive(Clone)]
pub struct ShowStore {
    medium: Arc<dyn Medium>,
}

impl ShowStore {
    pub fn new(medium: Arc<dyn Medium>) -> Self {
        Self { medium }
    }

    /// All shows in the medium's order. The file medium lists newest
    /// first; the hosted medium keeps insertion order. Callers that need a
    /// particular order sort for themselves.
    pub async fn list(&self) -> Vec<Show> {
        self.medium.read_shows().await
    }

    /// Add a show. An empty slug is derived from date and title. A slug
    /// already in use is rejected.
    pub async fn create(&self, mut show: Show) -> Result<Show, StoreError> {
        show.ensure_slug()?;
        validate_slug(&show.slug)?;
        show.clear_empty_links();

        let mut shows = self.medium.read_shows().await;
        if shows.iter().any(|s| s.slug == show.slug) {
            return Err(StoreError::Conflict {
                kind: KIND,
                id: show.slug,
            });
        }

        shows.push(show.clone());
        self.medium.write_shows(&shows).await?;
        tracing::info!("created show {}", show.slug);
        Ok(show)
    }

    /// Replace the show with the same slug.
    pub async fn update(&self, mut show: Show) -> Result<Show, StoreError> {
        if show.slug.is_empty() {
            return Err(StoreError::Validation("show slug is required".to_string()));
        }
        show.clear_empty_links();

        let mut shows = self.medium.read_shows().await;
        let Some(slot) = shows.iter_mut().find(|s| s.slug == show.slug) else {
            return Err(StoreError::not_found(KIND, show.slug));
        };
        *slot = show.clone();

        self.medium.write_shows(&shows).await?;
        tracing::info!("updated show {}", show.slug);
        Ok(show)
    }

    /// Remove every show with `slug`.
    pub async fn delete(&self, slug: &str) -> Result<(), StoreError> {
        if slug.is_empty() {
            return Err(StoreError::Validation("show slug is required".to_string()));
        }

        let mut shows = self.medium.read_shows().await;
        let before = shows.len();
        shows.retain(|s| s.slug != slug);
        if shows.len() == before {
            return Err(StoreError::not_found(KIND, slug));
        }

        self.medium.write_shows(&shows).await?;
        tracing::info!("deleted show {}", slug);
        Ok(())
    }
}
