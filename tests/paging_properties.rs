use hnfeed::aggregator::{AggregationPolicy, StoryAggregator, StoryCache};
use hnfeed::service::StoryService;
use hnfeed::test_support::{MockStorySource, story};
use proptest::prelude::*;
use std::sync::Arc;

fn service_with(count: u64) -> StoryService {
    let source = Arc::new(MockStorySource::new());
    source.set_ids((1..=count).collect());
    for id in 1..=count {
        let title = if id % 3 == 0 { "Show HN: thing" } else { "Other news" };
        source.add_story(story(id, title));
    }
    let aggregator = StoryAggregator::new(
        source,
        Arc::new(StoryCache::new(None)),
        AggregationPolicy::default(),
    );
    StoryService::new(Arc::new(aggregator))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn page_never_exceeds_page_size(count in 0u64..60, page in 1i64..20, page_size in 1i64..25) {
        let service = service_with(count);
        let result = runtime().block_on(service.get_paged(page, page_size, None)).unwrap();

        prop_assert!(result.items.len() as i64 <= page_size);
        prop_assert!(result.items.len() <= result.total_count);
        prop_assert_eq!(result.total_count as u64, count);
    }

    #[test]
    fn blank_query_matches_unfiltered_total(count in 0u64..40, blank in "[ \t]{0,4}") {
        let service = service_with(count);
        let rt = runtime();
        let unfiltered = rt.block_on(service.get_paged(1, 10, None)).unwrap();
        let with_blank = rt.block_on(service.get_paged(1, 10, Some(blank.as_str()))).unwrap();

        prop_assert_eq!(unfiltered.total_count, with_blank.total_count);
    }

    #[test]
    fn filtered_pages_partition_matches(count in 0u64..60, page_size in 1i64..10) {
        let service = service_with(count);
        let rt = runtime();
        let total = rt.block_on(service.get_paged(1, page_size, Some("show hn"))).unwrap().total_count;

        let mut seen = 0usize;
        let mut page = 1;
        loop {
            let result = rt.block_on(service.get_paged(page, page_size, Some("SHOW HN"))).unwrap();
            prop_assert_eq!(result.total_count, total);
            if result.items.is_empty() {
                break;
            }
            prop_assert!(result.items.iter().all(|s| s.title.starts_with("Show HN")));
            seen += result.items.len();
            page += 1;
        }
        prop_assert_eq!(seen, total);
        prop_assert_eq!(total as u64, count / 3);
    }
}
