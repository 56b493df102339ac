use spotbot::{
    Error,
    reddit::{MAX_PAGE_SIZE, collect_pages},
    spotify::{MAX_TRACKS_PER_REQUEST, insert_batches, replace_batches, track_uri},
    types::{RedditListing, RedditListingChild, RedditListingData, RedditPostData},
};

// Helper function to create a listing page with `count` posts
fn create_test_listing(first: usize, count: usize, after: Option<&str>) -> RedditListing {
    RedditListing {
        data: RedditListingData {
            children: (first..first + count)
                .map(|i| RedditListingChild {
                    data: RedditPostData {
                        title: format!("Artist - Song {}", i),
                        domain: "youtube.com".to_string(),
                        score: 1000 - i as i64,
                        permalink: format!("/r/popheads/comments/{}", i),
                    },
                })
                .collect(),
            after: after.map(str::to_string),
        },
    }
}

fn create_test_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("t{}", i)).collect()
}

#[tokio::test]
async fn test_collect_pages_follows_after_cursor() {
    let mut calls = Vec::new();

    let posts = collect_pages(200, |page_size, after| {
        calls.push((page_size, after.clone()));
        let page = match after.as_deref() {
            None => create_test_listing(0, page_size, Some("t3_a")),
            Some("t3_a") => create_test_listing(100, page_size, Some("t3_b")),
            _ => panic!("unexpected cursor {:?}", after),
        };
        async move { Ok(page) }
    })
    .await
    .unwrap();

    assert_eq!(posts.len(), 200);
    assert_eq!(posts[0].title, "Artist - Song 0");
    assert_eq!(posts[199].title, "Artist - Song 199");
    assert_eq!(posts[5].permalink, "/r/popheads/comments/5");
    assert_eq!(
        calls,
        vec![(MAX_PAGE_SIZE, None), (MAX_PAGE_SIZE, Some("t3_a".to_string()))]
    );
}

#[tokio::test]
async fn test_collect_pages_requests_only_what_is_missing() {
    let mut sizes = Vec::new();

    let posts = collect_pages(150, |page_size, after| {
        sizes.push(page_size);
        let first = if after.is_some() { 100 } else { 0 };
        async move { Ok(create_test_listing(first, page_size, Some("next"))) }
    })
    .await
    .unwrap();

    assert_eq!(posts.len(), 150);
    assert_eq!(sizes, vec![100, 50]);
}

#[tokio::test]
async fn test_collect_pages_stops_when_listing_ends() {
    let mut calls = 0;
    let posts = collect_pages(200, |_, _| {
        calls += 1;
        async { Ok(create_test_listing(0, 30, None)) }
    })
    .await
    .unwrap();

    assert_eq!(posts.len(), 30);
    assert_eq!(calls, 1);
}

#[tokio::test]
async fn test_collect_pages_stops_on_empty_page() {
    let mut calls = 0;
    let posts = collect_pages(200, |_, after| {
        calls += 1;
        let page = if after.is_none() {
            create_test_listing(0, 100, Some("t3_a"))
        } else {
            create_test_listing(0, 0, Some("t3_b"))
        };
        async move { Ok(page) }
    })
    .await
    .unwrap();

    assert_eq!(posts.len(), 100);
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn test_collect_pages_truncates_oversized_pages() {
    let posts = collect_pages(10, |_, _| async { Ok(create_test_listing(0, 25, Some("more"))) })
        .await
        .unwrap();

    assert_eq!(posts.len(), 10);
}

#[tokio::test]
async fn test_collect_pages_propagates_errors() {
    let err = collect_pages(10, |_, _| async {
        Err(Error::Api {
            service: "Reddit",
            status: 429,
            message: "Too Many Requests".to_string(),
        })
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Api { status: 429, .. }));
}

#[test]
fn test_insert_batches_keep_block_order() {
    let ids = create_test_ids(250);
    let batches = insert_batches(&ids, 3);

    let layout: Vec<(usize, usize)> = batches.iter().map(|(pos, chunk)| (*pos, chunk.len())).collect();
    assert_eq!(layout, vec![(3, 100), (103, 100), (203, 50)]);
    assert_eq!(batches[1].1[0], "t100");
    assert_eq!(batches[2].1[49], "t249");
}

#[test]
fn test_insert_batches_small_and_empty() {
    let ids = create_test_ids(2);
    let batches = insert_batches(&ids, 0);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].0, 0);
    assert_eq!(batches[0].1, &ids[..]);

    assert!(insert_batches(&[], 0).is_empty());
}

#[test]
fn test_replace_batches_append_after_head() {
    let ids = create_test_ids(230);
    let (head, appends) = replace_batches(&ids);

    assert_eq!(head.len(), MAX_TRACKS_PER_REQUEST);
    assert_eq!(head[0], "t0");
    let layout: Vec<(usize, usize)> = appends.iter().map(|(pos, chunk)| (*pos, chunk.len())).collect();
    assert_eq!(layout, vec![(100, 100), (200, 30)]);
    assert_eq!(appends[0].1[0], "t100");
}

#[test]
fn test_replace_batches_within_one_request() {
    let ids = create_test_ids(40);
    let (head, appends) = replace_batches(&ids);
    assert_eq!(head.len(), 40);
    assert!(appends.is_empty());

    // Replacing with nothing still sends one (empty) replace call
    let (head, appends) = replace_batches(&[]);
    assert!(head.is_empty());
    assert!(appends.is_empty());
}

#[test]
fn test_track_uri() {
    assert_eq!(track_uri("4uLU6hMCjMI75M1A2tKUQC"), "spotify:track:4uLU6hMCjMI75M1A2tKUQC");
}
