use image::{Rgba, RgbaImage};

use super::*;
use crate::hash::masked_hash;
use crate::raster::encode_png;

const CHROME: &str = "chrome";
const FIREFOX: &str = "firefox";

fn region(left: i64, top: i64, width: i64, height: i64) -> BlindRegion {
    BlindRegion::new(left, top, width, height).unwrap()
}

fn screenshot() -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
    for i in 0..40 {
        img.put_pixel(i, i, Rgba([10, 20, 30, 255]));
    }
    encode_png(&img).unwrap()
}

fn setup() -> (BlindRegionHierarchy, CategoryId, PatternId) {
    let mut hierarchy = BlindRegionHierarchy::new();
    hierarchy.register_browser(CHROME);
    hierarchy.register_browser(FIREFOX);
    let category = hierarchy.add_category("checkout");
    let pattern = hierarchy
        .add_pattern(NewPattern {
            category,
            screenshot_name: "cart".to_string(),
            browser: CHROME.to_string(),
            image_bytes: screenshot(),
            local_regions: vec![region(0, 0, 5, 5)],
            created_on: 1_700_000_000,
        })
        .expect("add pattern");
    (hierarchy, category, pattern)
}

fn assert_hash_current(hierarchy: &BlindRegionHierarchy, id: PatternId) {
    let pattern = hierarchy.pattern(id).unwrap();
    let regions = hierarchy.resolve(&pattern.context()).unwrap().to_vec();
    let baseline = pattern.baseline();
    assert!(baseline.is_current_for(&regions));
    assert_eq!(
        baseline.content_hash(),
        &masked_hash(baseline.image_bytes(), &regions).unwrap()
    );
}

#[test]
fn resolve_concatenates_levels_in_order() {
    let (mut hierarchy, category, pattern) = setup();
    hierarchy
        .replace_category_regions(category, CHROME, vec![region(10, 10, 5, 5)])
        .unwrap();
    hierarchy
        .replace_global_regions(CHROME, vec![region(20, 20, 5, 5), region(0, 0, 5, 5)])
        .unwrap();

    let set = hierarchy.resolve(&hierarchy.context_for(pattern).unwrap()).unwrap();
    let scopes: Vec<RegionScope> = set.entries().iter().map(|e| e.scope).collect();
    assert_eq!(
        scopes,
        vec![
            RegionScope::Local,
            RegionScope::Category,
            RegionScope::Global,
            RegionScope::Global
        ]
    );
    // Duplicates across levels are kept.
    assert_eq!(set.to_vec()[0], set.to_vec()[3]);
}

#[test]
fn category_regions_are_per_browser() {
    let (mut hierarchy, category, pattern) = setup();
    hierarchy
        .replace_category_regions(category, FIREFOX, vec![region(1, 1, 1, 1)])
        .unwrap();
    let set = hierarchy.resolve(&hierarchy.context_for(pattern).unwrap()).unwrap();
    assert!(set.in_scope(RegionScope::Category).is_empty());
}

#[test]
fn missing_category_is_unresolved() {
    let (hierarchy, _, pattern) = setup();
    let mut context = hierarchy.context_for(pattern).unwrap();
    context.category = CategoryId(999);
    assert!(matches!(
        hierarchy.resolve(&context),
        Err(CompareError::UnresolvedHierarchy(_))
    ));
}

#[test]
fn missing_global_scope_is_unresolved() {
    let mut hierarchy = BlindRegionHierarchy::new();
    let category = hierarchy.add_category("home");
    let err = hierarchy
        .add_pattern(NewPattern {
            category,
            screenshot_name: "hero".to_string(),
            browser: "safari".to_string(),
            image_bytes: screenshot(),
            local_regions: Vec::new(),
            created_on: 0,
        })
        .unwrap_err();
    assert!(matches!(err, CompareError::UnresolvedHierarchy(_)));
    assert!(err.to_string().contains("safari"));
}

#[test]
fn browser_mismatch_is_unresolved() {
    let (hierarchy, _, pattern) = setup();
    let mut context = hierarchy.context_for(pattern).unwrap();
    context.browser = FIREFOX.to_string();
    assert!(matches!(
        hierarchy.resolve(&context),
        Err(CompareError::UnresolvedHierarchy(_))
    ));
}

#[test]
fn missing_pattern_is_unresolved() {
    let (hierarchy, _, _) = setup();
    assert!(matches!(
        hierarchy.context_for(PatternId(42)),
        Err(CompareError::UnresolvedHierarchy(_))
    ));
}

#[test]
fn local_region_change_rehashes_pattern() {
    let (mut hierarchy, _, pattern) = setup();
    let before = hierarchy.pattern(pattern).unwrap().baseline().content_hash().clone();

    hierarchy
        .replace_local_regions(pattern, vec![region(10, 10, 10, 10)])
        .unwrap();

    let after = hierarchy.pattern(pattern).unwrap().baseline().content_hash().clone();
    assert_ne!(before, after);
    assert_hash_current(&hierarchy, pattern);
}

#[test]
fn category_change_rehashes_only_affected_patterns() {
    let (mut hierarchy, category, chrome_pattern) = setup();
    let other_category = hierarchy.add_category("search");
    let firefox_pattern = hierarchy
        .add_pattern(NewPattern {
            category,
            screenshot_name: "cart".to_string(),
            browser: FIREFOX.to_string(),
            image_bytes: screenshot(),
            local_regions: Vec::new(),
            created_on: 0,
        })
        .unwrap();
    let other_pattern = hierarchy
        .add_pattern(NewPattern {
            category: other_category,
            screenshot_name: "results".to_string(),
            browser: CHROME.to_string(),
            image_bytes: screenshot(),
            local_regions: Vec::new(),
            created_on: 0,
        })
        .unwrap();

    let rehashed = hierarchy
        .replace_category_regions(category, CHROME, vec![region(3, 3, 10, 10)])
        .unwrap();
    assert_eq!(rehashed, vec![chrome_pattern]);
    for id in [chrome_pattern, firefox_pattern, other_pattern] {
        assert_hash_current(&hierarchy, id);
    }
}

#[test]
fn global_change_rehashes_every_pattern_of_browser() {
    let (mut hierarchy, _, pattern) = setup();
    let other_category = hierarchy.add_category("search");
    let other = hierarchy
        .add_pattern(NewPattern {
            category: other_category,
            screenshot_name: "results".to_string(),
            browser: CHROME.to_string(),
            image_bytes: screenshot(),
            local_regions: Vec::new(),
            created_on: 0,
        })
        .unwrap();

    let rehashed = hierarchy
        .replace_global_regions(CHROME, vec![region(30, 30, 10, 10)])
        .unwrap();
    assert_eq!(rehashed, vec![pattern, other]);
    assert_hash_current(&hierarchy, pattern);
    assert_hash_current(&hierarchy, other);
}

#[test]
fn category_change_for_unknown_browser_fails_without_changes() {
    let (mut hierarchy, category, pattern) = setup();
    let err = hierarchy
        .replace_category_regions(category, "opera", vec![region(1, 1, 1, 1)])
        .unwrap_err();
    assert!(matches!(err, CompareError::UnresolvedHierarchy(_)));
    assert!(hierarchy
        .category(category)
        .unwrap()
        .regions_for_browser("opera")
        .is_empty());
    assert_hash_current(&hierarchy, pattern);
}

#[test]
fn find_active_pattern_skips_deactivated() {
    let (mut hierarchy, _, pattern) = setup();
    assert_eq!(
        hierarchy.find_active_pattern("cart", CHROME).map(|p| p.id),
        Some(pattern)
    );
    assert!(hierarchy.find_active_pattern("cart", FIREFOX).is_none());

    hierarchy.deactivate(pattern).unwrap();
    assert!(!hierarchy.pattern(pattern).unwrap().is_active());
    assert!(hierarchy.find_active_pattern("cart", CHROME).is_none());
}

#[test]
fn update_baseline_image_rehashes() {
    let (mut hierarchy, _, pattern) = setup();
    let before = hierarchy.pattern(pattern).unwrap().baseline().content_hash().clone();
    let blank = encode_png(&RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]))).unwrap();

    hierarchy.update_baseline_image(pattern, blank.clone()).unwrap();
    let baseline = hierarchy.pattern(pattern).unwrap().baseline();
    assert_eq!(baseline.image_bytes(), blank.as_slice());
    assert_ne!(baseline.content_hash(), &before);
    assert_hash_current(&hierarchy, pattern);
}

#[test]
fn resolve_layers_splits_by_level() {
    let (mut hierarchy, category, pattern) = setup();
    hierarchy
        .replace_category_regions(category, CHROME, vec![region(10, 10, 5, 5)])
        .unwrap();
    let layers = hierarchy
        .resolve_layers(&hierarchy.context_for(pattern).unwrap())
        .unwrap();
    assert_eq!(layers.local, vec![region(0, 0, 5, 5)]);
    assert_eq!(layers.category, vec![region(10, 10, 5, 5)]);
    assert!(layers.global.is_empty());
}
