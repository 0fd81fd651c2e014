use std::hash::Hash;

/// A map keyed by dimension (values default to f64) that iterates in the
/// order its keys were inserted.
///
/// A region's dimensions arrive in column order, and that order is reused
/// for every point, every constraint set and every cached path. The solver
/// adapter emits one LP row per constrained dimension while walking a
/// constraint set, so the same walk always hands Clarabel the same matrix.
/// Points written into a path cache keep the column order too, which keeps
/// cache files diffable between runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Map<K: Eq + Hash, V = f64>(indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>);

impl<K: Eq + Hash, V> Map<K, V> {
    /// Create an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self(indexmap::IndexMap::with_capacity_and_hasher(
            capacity,
            Default::default(),
        ))
    }
}

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self(indexmap::IndexMap::default())
    }
}

impl<K: Eq + Hash, V> std::ops::Deref for Map<K, V> {
    type Target = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Eq + Hash, V> std::ops::DerefMut for Map<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Eq + Hash, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(indexmap::IndexMap::from_iter(iter))
    }
}
