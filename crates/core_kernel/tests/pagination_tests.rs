//! Tests for feed pagination

use core_kernel::{Page, PageRequest, Paginator, POSTS_PER_PAGE};
use proptest::prelude::*;

#[test]
fn test_thirteen_posts_split_into_ten_and_three() {
    let posts: Vec<u32> = (0..POSTS_PER_PAGE + 3).collect();
    let paginator = Paginator::default();

    let first = Page::from_slice(posts.clone(), paginator, PageRequest::first());
    assert_eq!(first.len(), POSTS_PER_PAGE as usize);
    assert!(first.has_next());
    assert!(!first.has_previous());
    assert_eq!(first.next_page_number(), Some(2));

    let second = Page::from_slice(posts, paginator, PageRequest::parse(Some("2")));
    assert_eq!(second.len(), 3);
    assert_eq!(second.items, vec![10, 11, 12]);
    assert_eq!(second.previous_page_number(), Some(1));
    assert_eq!(second.next_page_number(), None);
    assert_eq!(second.start_index(), 11);
}

#[test]
fn test_overflowing_page_numbers_clamp_to_last_page() {
    let posts: Vec<u32> = (0..13).collect();
    let paginator = Paginator::default();

    let huge = Page::from_slice(posts.clone(), paginator, PageRequest::parse(Some("99999999999999999999")));
    assert_eq!(huge.number, 2);
    assert_eq!(huge.items, vec![10, 11, 12]);

    let negative = Page::from_slice(posts.clone(), paginator, PageRequest::parse(Some("-99999999999999999999")));
    assert_eq!(negative.number, 2);

    let garbage = Page::from_slice(posts, paginator, PageRequest::parse(Some("12abc")));
    assert_eq!(garbage.number, 1);
}

#[test]
fn test_empty_page_metadata() {
    let page: Page<u32> = Page::from_slice(Vec::new(), Paginator::default(), PageRequest::new(5));
    assert!(page.is_empty());
    assert_eq!(page.number, 1);
    assert_eq!(page.num_pages, 1);
    assert_eq!(page.start_index(), 0);
}

#[test]
fn test_map_keeps_metadata() {
    let page = Page::from_slice(vec![1, 2, 3], Paginator::new(2), PageRequest::new(2));
    let mapped = page.map(|n| n.to_string());
    assert_eq!(mapped.items, vec!["3".to_string()]);
    assert_eq!(mapped.number, 2);
    assert_eq!(mapped.num_pages, 2);
}

proptest! {
    #[test]
    fn prop_resolved_window_is_always_in_range(
        total in 0u64..10_000,
        per_page in 1u32..50,
        requested in proptest::num::i64::ANY,
    ) {
        let paginator = Paginator::new(per_page);
        let window = paginator.resolve(PageRequest::new(requested), total);

        prop_assert!(window.number >= 1);
        prop_assert!(window.number <= window.num_pages);
        prop_assert!(window.offset <= total.max(window.offset));
        if total > 0 {
            prop_assert!(window.offset < total);
        }
    }

    #[test]
    fn prop_pages_partition_the_listing(total in 0usize..200, per_page in 1u32..25) {
        let items: Vec<usize> = (0..total).collect();
        let paginator = Paginator::new(per_page);
        let num_pages = paginator.num_pages(total as u64);

        let mut seen = Vec::new();
        for number in 1..=num_pages {
            let page = Page::from_slice(items.clone(), paginator, PageRequest::new(number as i64));
            prop_assert!(page.len() <= per_page as usize);
            seen.extend(page.items);
        }
        prop_assert_eq!(seen, items);
    }
}
