use crate::CliError;
use mga_core::models::{Dimension, Direction};
use mga_explorer::{PathCache, PathKey, StepRecord};

/// The anchors a cached walk visits, one per step of the prefix
pub fn find(
    cache: &PathCache,
    order: Vec<String>,
    directions: Vec<Direction>,
) -> anyhow::Result<Vec<StepRecord>> {
    let order: Vec<Dimension> = order.into_iter().map(Dimension::from).collect();
    match cache.path(&order, &directions) {
        Some(records) => Ok(records.to_vec()),
        None => Err(CliError::NotCached(PathKey::new(&order, &directions).to_string()))?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mga_core::models::{DEFAULT_EPSILON, FeasibleRegion};

    #[test]
    fn finds_cached_prefixes_only() {
        let region = FeasibleRegion::from_rows(
            vec![Dimension::new("A"), Dimension::new("B")],
            vec![vec![0.0, 10.0], vec![10.0, 0.0]],
        )
        .unwrap();
        let mut cache = PathCache::new(&region, DEFAULT_EPSILON);
        let start = region.centroid();
        cache.insert(
            PathKey::new(&[Dimension::new("B")], &[Direction::Hold]),
            vec![StepRecord::from((1, start.clone()))],
        );

        let records = find(&cache, vec!["B".into()], vec![Direction::Hold]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].solution(), start);

        let missing = find(&cache, vec!["A".into()], vec![Direction::Hold]).unwrap_err();
        assert!(matches!(
            missing.downcast_ref::<CliError>(),
            Some(CliError::NotCached(_))
        ));
    }
}
