use tokio::sync::RwLock;

use super::seed;
use crate::features::disasters::models::Disaster;
use crate::features::reports::models::Report;
use crate::features::resources::models::Resource;

/// Rows of all three entities. Writers that touch several tables lock them in
/// the order disasters, reports, resources.
#[derive(Default)]
pub struct FixtureStore {
    pub disasters: RwLock<Vec<Disaster>>,
    pub reports: RwLock<Vec<Report>>,
    pub resources: RwLock<Vec<Resource>>,
}

impl FixtureStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store preloaded with demo disasters, reports and resources
    pub fn seeded() -> Self {
        let data = seed::build();
        Self {
            disasters: RwLock::new(data.disasters),
            reports: RwLock::new(data.reports),
            resources: RwLock::new(data.resources),
        }
    }

    pub async fn counts(&self) -> (usize, usize, usize) {
        (
            self.disasters.read().await.len(),
            self.reports.read().await.len(),
            self.resources.read().await.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_rows_reference_seeded_disasters() {
        let store = FixtureStore::seeded();
        let disasters = store.disasters.read().await;
        let ids: Vec<_> = disasters.iter().map(|d| d.id).collect();

        assert!(!disasters.is_empty());
        assert!(store
            .reports
            .read()
            .await
            .iter()
            .all(|r| ids.contains(&r.disaster_id)));
        assert!(store
            .resources
            .read()
            .await
            .iter()
            .all(|r| ids.contains(&r.disaster_id)));
    }

    #[tokio::test]
    async fn test_empty_store() {
        assert_eq!(FixtureStore::empty().counts().await, (0, 0, 0));
    }
}
