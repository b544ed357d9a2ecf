// ABOUTME: Store for the music sample catalog: id assignment, display ordering, and reordering.
// ABOUTME: Reorder and move are built on update, so every change goes through the same write path.

use std::sync::Arc;

use yiyi_core::sample::{
    assign_sample_id, next_free_order, renumber, sort_for_display, swap_with_neighbour,
    timestamp_sample_id,
};
use yiyi_core::{MoveDirection, MusicSample};

use crate::error::StoreError;
use crate::medium::Medium;

const KIND: &str = "music sample";

#[derive(Clone)]
pub struct SampleStore {
    medium: Arc<dyn Medium>,
}

impl SampleStore {
    pub fn new(medium: Arc<dyn Medium>) -> Self {
        Self { medium }
    }

    /// All samples in display order.
    pub async fn list(&self) -> Vec<MusicSample> {
        let mut samples = self.medium.read_samples().await.samples;
        sort_for_display(&mut samples);
        samples
    }

    /// Add a sample. Any client-supplied id is replaced by one derived from
    /// the title; an explicit order is bumped past orders already in use.
    pub async fn create(&self, mut sample: MusicSample) -> Result<MusicSample, StoreError> {
        let mut catalog = self.medium.read_samples().await;

        sample.id = assign_sample_id(&sample.title, &catalog.samples, timestamp_sample_id);
        sample.normalize_video();
        if let Some(order) = sample.order {
            let free = next_free_order(order, &catalog.samples).ok_or_else(|| {
                StoreError::Validation(format!("no free display order at or after {}", order))
            })?;
            sample.order = Some(free);
        }

        catalog.samples.push(sample.clone());
        self.medium.write_samples(&catalog).await?;
        tracing::info!("created music sample {}", sample.id);
        Ok(sample)
    }

    /// Replace the sample with the same id.
    pub async fn update(&self, mut sample: MusicSample) -> Result<MusicSample, StoreError> {
        if sample.id.is_empty() {
            return Err(StoreError::Validation(
                "music sample id is required".to_string(),
            ));
        }
        sample.normalize_video();

        let mut catalog = self.medium.read_samples().await;
        let Some(slot) = catalog.samples.iter_mut().find(|s| s.id == sample.id) else {
            return Err(StoreError::not_found(KIND, sample.id));
        };
        *slot = sample.clone();

        self.medium.write_samples(&catalog).await?;
        tracing::debug!("updated music sample {}", sample.id);
        Ok(sample)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        if id.is_empty() {
            return Err(StoreError::Validation(
                "music sample id is required".to_string(),
            ));
        }

        let mut catalog = self.medium.read_samples().await;
        let before = catalog.samples.len();
        catalog.samples.retain(|s| s.id != id);
        if catalog.samples.len() == before {
            return Err(StoreError::not_found(KIND, id));
        }

        self.medium.write_samples(&catalog).await?;
        tracing::info!("deleted music sample {}", id);
        Ok(())
    }

    /// Persist `sequence` as the new display order: each sample gets
    /// order = position + 1 and is written through `update`. Stops at the
    /// first failure; samples already written keep their new order.
    pub async fn reorder(
        &self,
        mut sequence: Vec<MusicSample>,
    ) -> Result<Vec<MusicSample>, StoreError> {
        renumber(&mut sequence);
        for sample in sequence {
            self.update(sample).await?;
        }
        tracing::info!("music samples reordered");
        Ok(self.list().await)
    }

    /// Swap a sample with its neighbour in display order, then renumber the
    /// whole catalog. Moving past either end is a no-op.
    pub async fn move_sample(
        &self,
        id: &str,
        direction: MoveDirection,
    ) -> Result<Vec<MusicSample>, StoreError> {
        let mut current = self.list().await;
        match swap_with_neighbour(&mut current, id, direction) {
            None => Err(StoreError::not_found(KIND, id)),
            Some(false) => Ok(current),
            Some(true) => self.reorder(current).await,
        }
    }
}
