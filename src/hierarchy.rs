//! Blind-region hierarchy: global scope, categories and browser patterns.
//!
//! Scopes live in an arena keyed by identifier and are combined by explicit
//! lookups. Every region mutation recomputes the baseline hash of each
//! affected pattern before returning, so a stored hash always matches the
//! regions currently resolved for its pattern.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::baseline::BaselineRecord;
use crate::error::{CompareError, Result};
use crate::types::{BlindRegion, RegionLayers, RegionScope, RegionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "category #{}", self.0)
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pattern #{}", self.0)
    }
}

/// Identifies the pattern, its owning category and the browser whose global
/// scope applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyContext {
    pub pattern: PatternId,
    pub category: CategoryId,
    pub browser: String,
}

/// A group of test cases sharing blind regions, per browser.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    regions: BTreeMap<String, Vec<BlindRegion>>,
}

impl Category {
    pub fn regions_for_browser(&self, browser: &str) -> &[BlindRegion] {
        self.regions.get(browser).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The approved screenshot of one test case in one browser.
#[derive(Debug, Clone)]
pub struct BrowserPattern {
    pub id: PatternId,
    pub category: CategoryId,
    pub screenshot_name: String,
    pub browser: String,
    /// Unix seconds, supplied by the caller
    pub created_on: u64,
    is_active: bool,
    local_regions: Vec<BlindRegion>,
    baseline: BaselineRecord,
}

impl BrowserPattern {
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn local_regions(&self) -> &[BlindRegion] {
        &self.local_regions
    }

    pub fn baseline(&self) -> &BaselineRecord {
        &self.baseline
    }

    pub fn context(&self) -> HierarchyContext {
        HierarchyContext {
            pattern: self.id,
            category: self.category,
            browser: self.browser.clone(),
        }
    }
}

/// Input for [`BlindRegionHierarchy::add_pattern`].
#[derive(Debug, Clone)]
pub struct NewPattern {
    pub category: CategoryId,
    pub screenshot_name: String,
    pub browser: String,
    pub image_bytes: Vec<u8>,
    pub local_regions: Vec<BlindRegion>,
    pub created_on: u64,
}

#[derive(Debug, Clone, Default)]
pub struct BlindRegionHierarchy {
    global: BTreeMap<String, Vec<BlindRegion>>,
    categories: BTreeMap<CategoryId, Category>,
    patterns: BTreeMap<PatternId, BrowserPattern>,
    next_category: u64,
    next_pattern: u64,
}

impl BlindRegionHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the (empty) global scope for `browser` if it does not exist yet.
    pub fn register_browser(&mut self, browser: impl Into<String>) {
        self.global.entry(browser.into()).or_default();
    }

    pub fn add_category(&mut self, name: impl Into<String>) -> CategoryId {
        self.next_category += 1;
        let id = CategoryId(self.next_category);
        self.categories.insert(
            id,
            Category {
                id,
                name: name.into(),
                regions: BTreeMap::new(),
            },
        );
        id
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn pattern(&self, id: PatternId) -> Option<&BrowserPattern> {
        self.patterns.get(&id)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &BrowserPattern> {
        self.patterns.values()
    }

    /// Approve a new pattern; its baseline hash is computed with the regions
    /// it resolves to.
    pub fn add_pattern(&mut self, new: NewPattern) -> Result<PatternId> {
        let category = self.category_ref(new.category)?;
        let inherited = self.inherited_regions(category, &new.browser)?;

        let mut regions = new.local_regions.clone();
        regions.extend(inherited);
        let baseline = BaselineRecord::new(new.image_bytes, regions)?;

        self.next_pattern += 1;
        let id = PatternId(self.next_pattern);
        self.patterns.insert(
            id,
            BrowserPattern {
                id,
                category: new.category,
                screenshot_name: new.screenshot_name,
                browser: new.browser,
                created_on: new.created_on,
                is_active: true,
                local_regions: new.local_regions,
                baseline,
            },
        );
        tracing::debug!(pattern = id.0, "registered browser pattern");
        Ok(id)
    }

    pub fn context_for(&self, id: PatternId) -> Result<HierarchyContext> {
        Ok(self.pattern_ref(id)?.context())
    }

    /// Local, then category, then global regions for the context's browser.
    pub fn resolve(&self, context: &HierarchyContext) -> Result<RegionSet> {
        let pattern = self.pattern_ref(context.pattern)?;
        if pattern.category != context.category {
            return Err(CompareError::unresolved(format!(
                "{} does not belong to {}",
                context.pattern, context.category
            )));
        }
        if pattern.browser != context.browser {
            return Err(CompareError::unresolved(format!(
                "{} was approved for browser '{}', not '{}'",
                context.pattern, pattern.browser, context.browser
            )));
        }
        let category = self.category_ref(context.category)?;
        let global = self.global_ref(&context.browser)?;

        let mut set = RegionSet::new();
        set.extend_scope(RegionScope::Local, pattern.local_regions.iter().copied());
        set.extend_scope(
            RegionScope::Category,
            category.regions_for_browser(&context.browser).iter().copied(),
        );
        set.extend_scope(RegionScope::Global, global.iter().copied());
        Ok(set)
    }

    /// Regions of a pattern grouped by level.
    pub fn resolve_layers(&self, context: &HierarchyContext) -> Result<RegionLayers> {
        Ok(RegionLayers::from(&self.resolve(context)?))
    }

    /// The active pattern approved for `screenshot_name` in `browser`.
    pub fn find_active_pattern(&self, screenshot_name: &str, browser: &str) -> Option<&BrowserPattern> {
        self.patterns
            .values()
            .find(|p| p.is_active && p.screenshot_name == screenshot_name && p.browser == browser)
    }

    pub fn deactivate(&mut self, id: PatternId) -> Result<()> {
        self.pattern_mut(id)?.is_active = false;
        Ok(())
    }

    pub fn replace_local_regions(&mut self, id: PatternId, regions: Vec<BlindRegion>) -> Result<()> {
        let pattern = self.pattern_ref(id)?;
        let category = self.category_ref(pattern.category)?;
        let mut all = regions.clone();
        all.extend(self.inherited_regions(category, &pattern.browser)?);

        let mut baseline = pattern.baseline.clone();
        baseline.recompute_hash(all)?;

        let pattern = self.pattern_mut(id)?;
        pattern.local_regions = regions;
        pattern.baseline = baseline;
        Ok(())
    }

    /// Replace a category's regions for one browser and rehash every pattern
    /// of that category in that browser. Returns the rehashed patterns.
    pub fn replace_category_regions(
        &mut self,
        id: CategoryId,
        browser: &str,
        regions: Vec<BlindRegion>,
    ) -> Result<Vec<PatternId>> {
        self.category_ref(id)?;
        self.global_ref(browser)?;
        let previous = self.category_mut(id)?.regions.insert(browser.to_string(), regions);

        match self.rehash(|p| p.category == id && p.browser == browser) {
            Ok(ids) => Ok(ids),
            Err(err) => {
                let category = self.category_mut(id)?;
                match previous {
                    Some(old) => category.regions.insert(browser.to_string(), old),
                    None => category.regions.remove(browser),
                };
                Err(err)
            }
        }
    }

    /// Replace the global regions for one browser and rehash every pattern in
    /// that browser. Registers the browser if needed.
    pub fn replace_global_regions(
        &mut self,
        browser: &str,
        regions: Vec<BlindRegion>,
    ) -> Result<Vec<PatternId>> {
        let previous = self.global.insert(browser.to_string(), regions);

        match self.rehash(|p| p.browser == browser) {
            Ok(ids) => Ok(ids),
            Err(err) => {
                match previous {
                    Some(old) => self.global.insert(browser.to_string(), old),
                    None => self.global.remove(browser),
                };
                Err(err)
            }
        }
    }

    /// Approve a new screenshot for an existing pattern.
    pub fn update_baseline_image(&mut self, id: PatternId, image_bytes: Vec<u8>) -> Result<()> {
        let mut baseline = self.pattern_ref(id)?.baseline.clone();
        baseline.replace_image(image_bytes)?;
        self.pattern_mut(id)?.baseline = baseline;
        Ok(())
    }

    /// Recompute hashes of the selected patterns; all or nothing.
    fn rehash(&mut self, selector: impl Fn(&BrowserPattern) -> bool) -> Result<Vec<PatternId>> {
        let mut updated = Vec::new();
        for pattern in self.patterns.values().filter(|p| selector(*p)) {
            let regions = self.resolve(&pattern.context())?.to_vec();
            let mut baseline = pattern.baseline.clone();
            baseline.recompute_hash(regions)?;
            updated.push((pattern.id, baseline));
        }

        let ids: Vec<PatternId> = updated.iter().map(|(id, _)| *id).collect();
        for (id, baseline) in updated {
            self.pattern_mut(id)?.baseline = baseline;
        }
        tracing::debug!(patterns = ids.len(), "rehashed patterns after region change");
        Ok(ids)
    }

    fn inherited_regions(&self, category: &Category, browser: &str) -> Result<Vec<BlindRegion>> {
        let global = self.global_ref(browser)?;
        let mut regions = category.regions_for_browser(browser).to_vec();
        regions.extend_from_slice(global);
        Ok(regions)
    }

    fn pattern_ref(&self, id: PatternId) -> Result<&BrowserPattern> {
        self.patterns
            .get(&id)
            .ok_or_else(|| CompareError::unresolved(format!("{id} not found")))
    }

    fn pattern_mut(&mut self, id: PatternId) -> Result<&mut BrowserPattern> {
        self.patterns
            .get_mut(&id)
            .ok_or_else(|| CompareError::unresolved(format!("{id} not found")))
    }

    fn category_ref(&self, id: CategoryId) -> Result<&Category> {
        self.categories
            .get(&id)
            .ok_or_else(|| CompareError::unresolved(format!("{id} not found")))
    }

    fn category_mut(&mut self, id: CategoryId) -> Result<&mut Category> {
        self.categories
            .get_mut(&id)
            .ok_or_else(|| CompareError::unresolved(format!("{id} not found")))
    }

    fn global_ref(&self, browser: &str) -> Result<&[BlindRegion]> {
        self.global
            .get(browser)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                CompareError::unresolved(format!("no global scope registered for browser '{browser}'"))
            })
    }
}

#[cfg(test)]
mod tests;
