// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Pagination behaviour of the catalog scan against a real SQLite store.

mod common;

use std::{collections::HashSet, sync::Arc, thread};

use musify::{
    Catalog, CatalogError, PageLimits, PageRequest, Track, TrackKey, cursor, db::SqliteTrackStore,
    store::TrackStore,
};

use common::{UnavailableStore, catalog_with, keys_of, signer, track};

fn request(limit: i64) -> PageRequest {
    PageRequest {
        limit: Some(limit),
        ..PageRequest::default()
    }
}

#[test]
fn two_page_walk_over_three_tracks() {
    let catalog = catalog_with(&[("B", "1"), ("A", "2"), ("A", "1")]);

    let first = catalog.list_tracks(&request(2)).unwrap();
    assert_eq!(
        keys_of(&first.items),
        vec![("A", "1"), ("A", "2")]
    );
    let token = first.next_cursor.clone().expect("more pages follow");
    assert_eq!(cursor::decode(&token), Some(TrackKey::new("A", "2").unwrap()));

    let second = catalog
        .list_tracks(&PageRequest {
            limit: Some(2),
            cursor: Some(token),
            search: None,
        })
        .unwrap();
    assert_eq!(keys_of(&second.items), vec![("B", "1")]);
    assert_eq!(second.next_cursor, None);
}

#[test]
fn full_walk_returns_every_track_once_in_key_order() {
    let mut keys = Vec::new();
    for artist in ["Zappa", "ABBA", "abba", "Ärzte", "Beck", "Air"] {
        for song in ["One", "Two", "three", "Four|Five", "Ω"] {
            keys.push((artist, song));
        }
    }
    let catalog = catalog_with(&keys);

    for limit in [1, 3, 5, 7, 30, 100] {
        let mut seen = Vec::new();
        let mut request = request(limit);
        let mut pages = 0;
        loop {
            let page = catalog.list_tracks(&request).unwrap();
            pages += 1;
            seen.extend(page.items.iter().map(Track::key));
            match request.next(&page) {
                Some(next) => request = next,
                None => break,
            }
        }

        assert_eq!(seen.len(), keys.len(), "limit {limit}");
        let distinct: HashSet<_> = seen.iter().cloned().collect();
        assert_eq!(distinct.len(), keys.len(), "limit {limit}");

        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(seen, sorted, "limit {limit}");

        let limit = usize::try_from(limit).unwrap();
        assert_eq!(pages, keys.len().div_ceil(limit).max(1), "limit {limit}");
    }
}

#[test]
fn last_page_has_no_cursor_when_catalog_size_is_a_multiple_of_limit() {
    let catalog = catalog_with(&[("A", "1"), ("A", "2"), ("B", "1"), ("B", "2")]);

    let first = catalog.list_tracks(&request(2)).unwrap();
    let second = catalog.list_tracks(&request(2).next(&first).unwrap()).unwrap();

    assert_eq!(second.items.len(), 2);
    assert!(second.is_last());
}

#[test]
fn empty_catalog_is_a_single_empty_last_page() {
    let catalog = catalog_with(&[]);
    let page = catalog.list_tracks(&PageRequest::default()).unwrap();
    assert!(page.items.is_empty());
    assert!(page.is_last());
}

#[test]
fn search_page_may_be_short_while_more_follows() {
    // Windows of two: [Alpha, Beta] then [Gamma, Zeta].
    let catalog = catalog_with(&[("Alpha", "x"), ("Beta", "y"), ("Gamma", "z"), ("Zeta", "alphabet")]);

    let search = PageRequest {
        limit: Some(2),
        cursor: None,
        search: Some("  ALPHA ".into()),
    };
    let first = catalog.list_tracks(&search).unwrap();
    assert_eq!(keys_of(&first.items), vec![("Alpha", "x")]);
    assert!(!first.is_last(), "a short page is not the end");

    let second = catalog.list_tracks(&search.next(&first).unwrap()).unwrap();
    assert_eq!(keys_of(&second.items), vec![("Zeta", "alphabet")]);
    assert!(second.is_last());
}

#[test]
fn search_matches_song_names_too() {
    let catalog = catalog_with(&[("Gamma", "z"), ("Zeta", "Alphabet")]);
    let page = catalog
        .list_tracks(&PageRequest {
            limit: Some(10),
            cursor: None,
            search: Some("alpha".into()),
        })
        .unwrap();
    assert_eq!(keys_of(&page.items), vec![("Zeta", "Alphabet")]);
}

#[test]
fn empty_window_match_still_carries_cursor() {
    let catalog = catalog_with(&[("A", "1"), ("A", "2"), ("B", "1"), ("Needle", "x")]);

    let page = catalog
        .list_tracks(&PageRequest {
            limit: Some(2),
            cursor: None,
            search: Some("needle".into()),
        })
        .unwrap();
    assert!(page.items.is_empty());
    assert!(page.next_cursor.is_some());
}

#[test]
fn cursor_reflects_the_window_not_the_matches() {
    // Both records fall into the window of two; only one has an "a" in
    // its artist. Nothing follows the window, so there is no cursor.
    let catalog = catalog_with(&[("Bach", "Prelude"), ("Lully", "Te Deum")]);

    let page = catalog
        .list_tracks(&PageRequest {
            limit: Some(2),
            cursor: None,
            search: Some("a".into()),
        })
        .unwrap();
    assert_eq!(keys_of(&page.items), vec![("Bach", "Prelude")]);
    assert_eq!(page.next_cursor, None);

    // With a third record after the window, the cursor appears.
    let catalog = catalog_with(&[("Bach", "Prelude"), ("Lully", "Te Deum"), ("Satie", "Gnossienne")]);
    let page = catalog
        .list_tracks(&PageRequest {
            limit: Some(2),
            cursor: None,
            search: Some("a".into()),
        })
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(
        page.next_cursor.as_deref().and_then(cursor::decode),
        Some(TrackKey::new("Lully", "Te Deum").unwrap())
    );
}

#[test]
fn blank_search_does_not_filter() {
    let catalog = catalog_with(&[("A", "1"), ("B", "2")]);
    let page = catalog
        .list_tracks(&PageRequest {
            limit: None,
            cursor: None,
            search: Some("   ".into()),
        })
        .unwrap();
    assert_eq!(page.items.len(), 2);
}

#[test]
fn malformed_cursor_restarts_from_the_beginning() {
    let catalog = catalog_with(&[("A", "1"), ("B", "1")]);

    for garbage in ["", "%%%", "QQ", "bm90IGpzb24", "W10"] {
        let page = catalog
            .list_tracks(&PageRequest {
                limit: Some(1),
                cursor: Some(garbage.into()),
                search: None,
            })
            .unwrap();
        assert_eq!(keys_of(&page.items), vec![("A", "1")], "{garbage:?}");
    }
}

#[test]
fn cursor_of_deleted_track_still_resumes_after_it() {
    let catalog = catalog_with(&[("A", "1"), ("A", "2"), ("B", "1")]);
    let first = catalog.list_tracks(&request(2)).unwrap();

    catalog.delete_track("A", "2").unwrap();

    let second = catalog.list_tracks(&request(2).next(&first).unwrap()).unwrap();
    assert_eq!(keys_of(&second.items), vec![("B", "1")]);
}

#[test]
fn non_positive_limit_is_rejected() {
    let catalog = catalog_with(&[("A", "1")]);
    assert!(matches!(
        catalog.list_tracks(&request(0)),
        Err(CatalogError::InvalidLimit(0))
    ));
    assert!(matches!(
        catalog.list_tracks(&request(-3)),
        Err(CatalogError::InvalidLimit(-3))
    ));
}

#[test]
fn oversized_limit_is_clamped() {
    let keys: Vec<(String, String)> = (0..5).map(|i| ("A".to_string(), format!("{i}"))).collect();
    let store = SqliteTrackStore::open_in_memory().unwrap();
    for (artist, song) in &keys {
        store.put(&track(artist, song)).unwrap();
    }
    let catalog = Catalog::with_limits(store, signer(), PageLimits::new(2, 3));

    let page = catalog.list_tracks(&request(1_000_000)).unwrap();
    assert_eq!(page.items.len(), 3);
    assert!(!page.is_last());

    let page = catalog.list_tracks(&PageRequest::default()).unwrap();
    assert_eq!(page.items.len(), 2);
}

#[test]
fn store_failure_is_an_error_not_an_empty_page() {
    let catalog = Catalog::new(UnavailableStore, signer());
    let err = catalog.list_tracks(&PageRequest::default()).unwrap_err();
    assert!(matches!(err, CatalogError::Store(_)));
    assert!(err.is_retryable());
}

#[test]
fn concurrent_readers_share_one_store() {
    let store = Arc::new(SqliteTrackStore::open_in_memory().unwrap());
    for i in 0..50 {
        store.put(&track("Artist", &format!("{i:03}"))).unwrap();
    }

    let handles: Vec<_> = (1..=4)
        .map(|limit| {
            let catalog = Catalog::new(Arc::clone(&store), signer());
            thread::spawn(move || {
                let mut request = request(limit * 3);
                let mut count = 0;
                loop {
                    let page = catalog.list_tracks(&request).unwrap();
                    count += page.items.len();
                    match request.next(&page) {
                        Some(next) => request = next,
                        None => break count,
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 50);
    }
}
