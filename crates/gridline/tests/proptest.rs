//! Property-based tests for pagination, filtering, and sorting.

use gridline::{
    apply_filters, sort_records, ColumnPolicy, DataView, Dataset, Dir, FilterSpec, PageSize,
    PaginationConfig, Paginator, RecordId, SortState, ViewConfig,
};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
struct Row {
    post_id: i64,
    name: String,
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (0i64..6, "[a-zA-Z ]{0,8}").prop_map(|(post_id, name)| Row { post_id, name })
}

fn dataset(rows: &[Row]) -> Dataset {
    let values = rows
        .iter()
        .enumerate()
        .map(|(i, row)| json!({ "id": i as i64 + 1, "postId": row.post_id, "name": row.name }))
        .collect();
    Dataset::from_values(values).unwrap()
}

fn view(rows: &[Row], page_size: usize) -> DataView {
    let config = ViewConfig {
        pagination: PaginationConfig {
            enabled: true,
            page_size,
        },
        exact_filter_field: "postId".into(),
        columns: ColumnPolicy::new(),
        ..ViewConfig::default()
    };
    let mut view = DataView::new(&config).unwrap();
    view.replace_dataset(dataset(rows));
    view
}

// ============================================================================
// Pagination
// ============================================================================

proptest! {
    #[test]
    fn total_pages_formula(len in 0usize..1000, size in 1usize..200) {
        let paginator = Paginator::new(PageSize::limited(size).unwrap());
        let expected = std::cmp::max(1, len.div_ceil(size));
        prop_assert_eq!(paginator.total_pages(len), expected);
    }

    #[test]
    fn pages_partition_the_sequence(len in 0usize..500, size in 1usize..50) {
        let items: Vec<usize> = (0..len).collect();
        let mut paginator = Paginator::new(PageSize::limited(size).unwrap());

        let mut seen = Vec::new();
        for page in paginator.page_numbers(len) {
            prop_assert!(paginator.set_page(page, len));
            let page = paginator.paginate(&items);
            prop_assert!(page.items.len() <= size);
            seen.extend(page.items);
        }
        prop_assert_eq!(seen, items);
    }

    #[test]
    fn sync_keeps_page_in_range(
        start in 1usize..20,
        before in 0usize..400,
        after in 0usize..400,
        size in 1usize..30,
    ) {
        let mut paginator = Paginator::new(PageSize::limited(size).unwrap());
        paginator.set_page(start, before);
        let start = paginator.current_page();
        paginator.sync(after);

        let page = paginator.current_page();
        let last = paginator.total_pages(after);
        prop_assert!(page >= 1);
        prop_assert!(page <= last);
        if start > last {
            prop_assert_eq!(page, last);
        } else {
            prop_assert_eq!(page, start);
        }
        if after >= before {
            prop_assert_eq!(page, start);
        }
    }

    #[test]
    fn deletions_keep_view_page_valid(
        rows in prop::collection::vec(row_strategy(), 0..120),
        deletions in prop::collection::vec(1i64..120, 0..80),
        size in 1usize..25,
        target in 1usize..10,
    ) {
        let mut view = view(&rows, size);
        view.set_page(target);
        for id in deletions {
            view.delete_row(&RecordId::Int(id));
            prop_assert!(view.current_page() >= 1);
            prop_assert!(view.current_page() <= view.total_pages());
        }
    }
}

// ============================================================================
// Filtering and sorting
// ============================================================================

proptest! {
    #[test]
    fn filters_are_a_conjunction(
        rows in prop::collection::vec(row_strategy(), 0..60),
        post_id in 0i64..6,
        needle in "[a-z]{1,2}",
    ) {
        let data = dataset(&rows);
        let exact = FilterSpec::new("postId").with_exact(post_id);
        let search = FilterSpec::new("postId").with_search(needle.clone());
        let both = FilterSpec::new("postId").with_exact(post_id).with_search(needle);

        let combined = apply_filters(&data, &both);
        let by_exact = apply_filters(&data, &exact);
        let by_search = apply_filters(&data, &search);

        let expected: Vec<_> = by_exact
            .iter()
            .filter(|r| by_search.iter().any(|s| s.id() == r.id()))
            .copied()
            .collect();
        prop_assert_eq!(combined, expected);
    }

    #[test]
    fn inactive_filter_keeps_everything(rows in prop::collection::vec(row_strategy(), 0..60)) {
        let data = dataset(&rows);
        let mut spec = FilterSpec::new("postId");
        spec.set_exact_text("not a number");
        spec.set_search("   ");
        prop_assert!(!spec.is_active());
        prop_assert_eq!(apply_filters(&data, &spec).len(), data.len());
    }

    #[test]
    fn sort_is_a_stable_permutation(
        rows in prop::collection::vec(row_strategy(), 0..60),
        desc in any::<bool>(),
    ) {
        let data = dataset(&rows);
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let sorted = sort_records(data.iter().collect(), &SortState::by("postId", dir));

        prop_assert_eq!(sorted.len(), data.len());
        for pair in sorted.windows(2) {
            let a = pair[0].get("postId").and_then(|v| v.as_i64()).unwrap();
            let b = pair[1].get("postId").and_then(|v| v.as_i64()).unwrap();
            let ida = pair[0].id().as_int().unwrap();
            let idb = pair[1].id().as_int().unwrap();
            match dir {
                Dir::Asc => prop_assert!(a < b || (a == b && ida < idb)),
                Dir::Desc => prop_assert!(a > b || (a == b && ida < idb)),
            }
        }
    }

    #[test]
    fn page_is_a_slice_of_visible(
        rows in prop::collection::vec(row_strategy(), 0..120),
        size in 1usize..25,
        page in 1usize..8,
    ) {
        let mut view = view(&rows, size);
        view.handle_sort("name");
        view.set_page(page);

        let visible = view.visible();
        let current = view.page();
        let start = current.offset;
        prop_assert_eq!(&visible[start..start + current.items.len()], current.items.as_slice());
    }
}
