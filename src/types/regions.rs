//! Region sets assembled from the blind-region hierarchy.

use serde::{Deserialize, Serialize};

use super::geometry::BlindRegion;

/// Hierarchy level a blind region was registered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionScope {
    /// Owned by a single browser pattern
    Local,
    /// Shared by every pattern of a category, per browser
    Category,
    /// Shared by every pattern, per browser
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedRegion {
    pub scope: RegionScope,
    #[serde(flatten)]
    pub region: BlindRegion,
}

/// Ordered collection of blind regions combined from several hierarchy levels.
///
/// Overlapping and duplicate regions are kept as-is: masking is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSet {
    entries: Vec<ScopedRegion>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set whose regions all belong to one scope.
    pub fn from_scope(scope: RegionScope, regions: impl IntoIterator<Item = BlindRegion>) -> Self {
        let mut set = Self::new();
        set.extend_scope(scope, regions);
        set
    }

    pub fn push(&mut self, scope: RegionScope, region: BlindRegion) {
        self.entries.push(ScopedRegion { scope, region });
    }

    pub fn extend_scope(
        &mut self,
        scope: RegionScope,
        regions: impl IntoIterator<Item = BlindRegion>,
    ) {
        self.entries
            .extend(regions.into_iter().map(|region| ScopedRegion { scope, region }));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ScopedRegion] {
        &self.entries
    }

    /// Every region in insertion order, regardless of scope.
    pub fn regions(&self) -> impl Iterator<Item = BlindRegion> + '_ {
        self.entries.iter().map(|entry| entry.region)
    }

    pub fn in_scope(&self, scope: RegionScope) -> Vec<BlindRegion> {
        self.entries
            .iter()
            .filter(|entry| entry.scope == scope)
            .map(|entry| entry.region)
            .collect()
    }

    pub fn global(&self) -> Vec<BlindRegion> {
        self.in_scope(RegionScope::Global)
    }

    pub fn to_vec(&self) -> Vec<BlindRegion> {
        self.regions().collect()
    }
}

/// Blind regions grouped by level, as exchanged with region files and the
/// review dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionLayers {
    #[serde(default)]
    pub local: Vec<BlindRegion>,
    #[serde(default)]
    pub category: Vec<BlindRegion>,
    #[serde(default)]
    pub global: Vec<BlindRegion>,
}

impl RegionLayers {
    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.category.is_empty() && self.global.is_empty()
    }

    /// Flatten into a [`RegionSet`] ordered local, category, global.
    pub fn to_region_set(&self) -> RegionSet {
        let mut set = RegionSet::new();
        set.extend_scope(RegionScope::Local, self.local.iter().copied());
        set.extend_scope(RegionScope::Category, self.category.iter().copied());
        set.extend_scope(RegionScope::Global, self.global.iter().copied());
        set
    }
}

impl From<&RegionSet> for RegionLayers {
    fn from(set: &RegionSet) -> Self {
        Self {
            local: set.in_scope(RegionScope::Local),
            category: set.in_scope(RegionScope::Category),
            global: set.in_scope(RegionScope::Global),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(left: i64) -> BlindRegion {
        BlindRegion::new(left, 0, 1, 1).unwrap()
    }

    #[test]
    fn preserves_insertion_order_and_duplicates() {
        let mut set = RegionSet::new();
        set.push(RegionScope::Global, region(3));
        set.push(RegionScope::Local, region(1));
        set.push(RegionScope::Local, region(1));

        let lefts: Vec<u32> = set.regions().map(|r| r.left()).collect();
        assert_eq!(lefts, vec![3, 1, 1]);
        assert_eq!(set.global(), vec![region(3)]);
    }

    #[test]
    fn layers_flatten_local_first() {
        let layers = RegionLayers {
            local: vec![region(1)],
            category: vec![region(2)],
            global: vec![region(3), region(4)],
        };
        let set = layers.to_region_set();
        let lefts: Vec<u32> = set.regions().map(|r| r.left()).collect();
        assert_eq!(lefts, vec![1, 2, 3, 4]);
        assert_eq!(RegionLayers::from(&set), layers);
    }

    #[test]
    fn layers_deserialize_with_missing_levels() {
        let layers: RegionLayers =
            serde_json::from_str(r#"{"global":[{"left":40,"top":40,"width":30,"height":30}]}"#)
                .expect("layers json");
        assert!(layers.local.is_empty());
        assert_eq!(layers.global.len(), 1);
    }

    #[test]
    fn scoped_set_serializes_flat_entries() {
        let set = RegionSet::from_scope(RegionScope::Category, [region(7)]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"scope":"category","left":7,"top":0,"width":1,"height":1}])
        );
    }
}
