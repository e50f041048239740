//! Integration tests for page-range resolution and export page selection

use signwiz::pages::{
    resolve, ExportLayout, PageRangeError, PageRanges, PageSelectionMode, PageSelector,
};

#[test]
fn test_documented_examples() {
    assert_eq!(resolve("1,3,5-7", 10).unwrap().as_slice(), &[1, 3, 5, 6, 7]);
    assert_eq!(
        resolve("1,3,12", 10),
        Err(PageRangeError::OutOfBounds {
            page: 12,
            page_count: 10
        })
    );
    assert!(matches!(
        resolve("abc", 10),
        Err(PageRangeError::InvalidSyntax { .. })
    ));
}

#[test]
fn test_every_resolved_page_in_bounds() {
    for expression in ["1-10", "10", "2,4,6-8", " 1 , 9-10 "] {
        let pages = resolve(expression, 10).unwrap();
        assert!(pages.iter().all(|p| (1..=10).contains(p)), "{}", expression);
    }
}

#[test]
fn test_overlapping_tokens_resolve_distinct_ascending() {
    assert_eq!(resolve("5,1-3,2", 10).unwrap().as_slice(), &[1, 2, 3, 5]);
    assert_eq!(resolve("1,7-5", 10).unwrap().as_slice(), &[1]);
}

#[test]
fn test_current_page_on_empty_document() {
    let selector = PageSelector::new(0, 1);
    assert_eq!(
        selector.export_pages(),
        Err(PageRangeError::OutOfBounds {
            page: 1,
            page_count: 0
        })
    );
}

#[test]
fn test_syntax_checked_before_bounds() {
    assert!(matches!(
        resolve("500,1-", 3),
        Err(PageRangeError::InvalidSyntax { .. })
    ));
}

#[test]
fn test_parsed_ranges_reusable_across_documents() {
    let ranges = PageRanges::parse("2-4").unwrap();
    assert_eq!(ranges.resolve(4).unwrap().len(), 3);
    assert_eq!(
        ranges.resolve(3),
        Err(PageRangeError::OutOfBounds {
            page: 4,
            page_count: 3
        })
    );
}

#[test]
fn test_export_selection_flow() {
    let mut selector = PageSelector::new(8, 3);
    assert_eq!(selector.export_pages().unwrap().pages.as_slice(), &[3]);

    selector.edit_range_text("1,");
    assert!(selector.export_pages().is_err());
    selector.edit_range_text("1,7-8");
    selector.set_layout(ExportLayout::SingleFile);
    let export = selector.export_pages().unwrap();
    assert_eq!(export.pages.as_slice(), &[1, 7, 8]);
    assert_eq!(export.layout, ExportLayout::SingleFile);

    selector.select(PageSelectionMode::All);
    assert_eq!(selector.export_pages().unwrap().pages.len(), 8);
}
