//! Integration tests for region selection, export and input discovery.

mod common;

use common::*;
use roicut::export::{annotate, clip_to_page, crop_region, export_regions, region_file_name};
use roicut::input::{load_input, page_name};
use roicut::{RegionFilter, Rejection};
use std::path::Path;

#[test]
fn test_region_filter_checks_in_order() {
    let filter = RegionFilter::default();

    assert_eq!(filter.check(&Rectangle::new(10, 10, 60, 60), 400, 300), Ok(()));
    assert_eq!(
        filter.check(&Rectangle::new(0, 0, 400, 300), 400, 300),
        Err(Rejection::FullPage)
    );
    // Narrow and short: width is reported first
    assert_eq!(
        filter.check(&Rectangle::new(0, 0, 20, 20), 400, 300),
        Err(Rejection::TooNarrow { width: 20, min: 50 })
    );
    assert_eq!(
        filter.check(&Rectangle::new(0, 0, 80, 49), 400, 300),
        Err(Rejection::TooShort { height: 49, min: 50 })
    );
}

#[test]
fn test_region_filter_can_keep_full_page() {
    let filter = RegionFilter {
        exclude_full_page: false,
        ..RegionFilter::default()
    };
    assert_eq!(filter.check(&Rectangle::new(0, 0, 400, 300), 400, 300), Ok(()));
}

#[test]
fn test_full_page_rule_compares_area_only() {
    // Same area as the page but a different shape still counts as full page.
    let filter = RegionFilter::default();
    assert_eq!(
        filter.check(&Rectangle::new(0, 0, 300, 400), 400, 300),
        Err(Rejection::FullPage)
    );
}

#[test]
fn test_clip_to_page() {
    assert_eq!(clip_to_page(&Rectangle::new(-5, 10, 20, 20), 100, 100), Some((0, 10, 15, 20)));
    assert_eq!(clip_to_page(&Rectangle::new(90, 90, 20, 20), 100, 100), Some((90, 90, 10, 10)));
    assert_eq!(clip_to_page(&Rectangle::new(120, 0, 20, 20), 100, 100), None);
    assert_eq!(clip_to_page(&Rectangle::new(10, 10, 0, 20), 100, 100), None);
}

#[test]
fn test_crop_region_takes_rectangle_size() {
    let page = sample_page();
    let roi = crop_region(&page, &Rectangle::new(258, 38, 104, 84)).expect("on page");
    assert_eq!((roi.width(), roi.height()), (104, 84));
}

#[test]
fn test_annotate_outlines_regions_in_red() {
    let page = page_with_blocks(100, 100, &[]);
    let canvas = annotate(&page, &[Rectangle::new(10, 10, 50, 40)]);

    assert_eq!(canvas.get_pixel(10, 10).0, [255, 0, 0]);
    assert_eq!(canvas.get_pixel(11, 30).0, [255, 0, 0]);
    assert_eq!(canvas.get_pixel(59, 49).0, [255, 0, 0]);
    // Interior and outside untouched
    assert_eq!(canvas.get_pixel(30, 30).0, [255, 255, 255]);
    assert_eq!(canvas.get_pixel(5, 5).0, [255, 255, 255]);
}

#[test]
fn test_export_writes_regions_and_annotated_page() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let page = sample_page();
    let regions = [Rectangle::new(38, 38, 164, 164), Rectangle::new(258, 38, 104, 84)];

    let report = export_regions(&page, "lang-99", &regions, dir.path(), true)?;

    assert_eq!(
        report.regions,
        vec![dir.path().join("lang-99_roi-1.png"), dir.path().join("lang-99_roi-2.png")]
    );
    let second = image::open(&report.regions[1])?;
    assert_eq!((second.width(), second.height()), (104, 84));

    let annotated = report.annotated.expect("annotated page requested");
    assert_eq!(annotated, dir.path().join("lang-99_annotated.png"));
    let annotated = image::open(annotated)?;
    assert_eq!((annotated.width(), annotated.height()), (400, 300));

    Ok(())
}

#[test]
fn test_export_without_original() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let report = export_regions(&sample_page(), "p", &[], dir.path(), false)?;

    assert!(report.regions.is_empty());
    assert!(report.annotated.is_none());
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_region_file_name() {
    assert_eq!(region_file_name("scan", 3), "scan_roi-3.png");
}

#[test]
fn test_load_input_lists_png_pages() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let page = page_with_blocks(10, 10, &[]);
    save_page(dir.path(), "b.png", &page);
    save_page(dir.path(), "a.png", &page);
    std::fs::write(dir.path().join("notes.txt"), "not a page")?;
    std::fs::create_dir(dir.path().join("nested.png"))?;

    let pages = load_input(dir.path())?;
    assert_eq!(pages, vec![dir.path().join("a.png"), dir.path().join("b.png")]);
    Ok(())
}

#[test]
fn test_load_input_accepts_single_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = save_page(dir.path(), "only.png", &page_with_blocks(10, 10, &[]));

    assert_eq!(load_input(&path)?, vec![path]);
    Ok(())
}

#[test]
fn test_load_input_missing_folder() {
    let err = load_input(Path::new("/definitely/not/here")).unwrap_err();
    assert!(err.to_string().contains("doesn't exist"));
}

#[test]
fn test_page_name_is_file_stem() {
    assert_eq!(page_name(Path::new("/scans/lang-99.png")), "lang-99");
    assert_eq!(page_name(Path::new("page.v2.png")), "page.v2");
}
