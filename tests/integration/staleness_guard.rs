//! Out-of-order completion: only the most recently issued refresh may render
//! or cache, whatever order the storage answers in.

use super::support::{files, folders, ScriptedStorage};
use cloudshelf::cache::{ListingCache, DEFAULT_TTL_MS};
use cloudshelf::clock::SystemClock;
use cloudshelf::fetch::{FetchOrchestrator, ListingView, RefreshOutcome};
use cloudshelf::navigation::NavigationIntent;
use cloudshelf::session::Session;
use cloudshelf::storage::StorageLayout;
use cloudshelf::types::ListingContext;
use cloudshelf::view::RecordingSink;
use futures::future::join_all;
use std::sync::Arc;

fn orchestrator(storage: Arc<ScriptedStorage>) -> (Arc<ListingCache>, FetchOrchestrator) {
    let cache = Arc::new(ListingCache::new(DEFAULT_TTL_MS, Arc::new(SystemClock)));
    let fetcher = FetchOrchestrator::new(storage, StorageLayout::default(), cache.clone());
    (cache, fetcher)
}

fn cached_names(cache: &ListingCache, context: &ListingContext) -> Vec<String> {
    cache
        .get(context)
        .map(|c| c.items.iter().map(|i| i.name().to_string()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn newer_refresh_wins_when_older_answers_last() {
    let storage = Arc::new(ScriptedStorage::new());
    let old_gate = storage.script_gated("projects/acme", files("projects/acme", &["old.pdf"]));
    let new_gate = storage.script_gated("projects/acme", files("projects/acme", &["new.pdf"]));
    let (cache, fetcher) = orchestrator(storage.clone());
    let sink = RecordingSink::new();
    let context = ListingContext::Folder("acme".into());
    let view = ListingView::default();

    let (older, newer, ()) = tokio::join!(
        fetcher.refresh(&context, &view, &sink),
        fetcher.refresh(&context, &view, &sink),
        async {
            tokio::task::yield_now().await;
            let _ = new_gate.send(());
            tokio::task::yield_now().await;
            let _ = old_gate.send(());
        }
    );

    assert!(older.is_superseded());
    assert!(newer.is_committed());
    assert!(newer.token() > older.token());
    assert_eq!(cached_names(&cache, &context), vec!["new.pdf"]);

    let rendered = sink.authoritative_frames();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].token, newer.token());
    assert_eq!(rendered[0].names(), vec!["new.pdf"]);
}

#[tokio::test]
async fn slow_root_listing_never_overwrites_folder_view() {
    let storage = Arc::new(ScriptedStorage::new());
    let root_gate = storage.script_gated("projects", folders(&["acme", "zeta"]));
    storage.script("projects/acme", files("projects/acme", &["1_plan.pdf"]));
    let (cache, fetcher) = orchestrator(storage.clone());
    let sink = RecordingSink::new();
    let view = ListingView::default();
    let root = ListingContext::Root;
    let folder = ListingContext::Folder("acme".into());

    let (root_outcome, folder_outcome) = tokio::join!(
        fetcher.refresh(&root, &view, &sink),
        async {
            let outcome = fetcher.refresh(&folder, &view, &sink).await;
            let _ = root_gate.send(());
            outcome
        }
    );

    assert!(root_outcome.is_superseded());
    assert!(folder_outcome.is_committed());
    assert!(!cache.contains(&root));
    assert_eq!(sink.last_frame().unwrap().context, folder);
    assert!(sink
        .authoritative_frames()
        .iter()
        .all(|frame| frame.context == folder));
}

#[tokio::test]
async fn only_the_last_of_many_overlapping_refreshes_commits() {
    let storage = Arc::new(ScriptedStorage::new());
    let gates: Vec<_> = (0..5)
        .map(|i| {
            let name = format!("v{}.pdf", i);
            storage.script_gated("projects/acme", files("projects/acme", &[name.as_str()]))
        })
        .collect();
    let (cache, fetcher) = orchestrator(storage.clone());
    let sink = RecordingSink::new();
    let context = ListingContext::Folder("acme".into());
    let view = ListingView::default();

    let refreshes = join_all((0..5).map(|_| fetcher.refresh(&context, &view, &sink)));
    let release = async {
        tokio::task::yield_now().await;
        for gate in gates.into_iter().rev() {
            let _ = gate.send(());
            tokio::task::yield_now().await;
        }
    };
    let (outcomes, ()) = tokio::join!(refreshes, release);

    let committed: Vec<&RefreshOutcome> = outcomes.iter().filter(|o| o.is_committed()).collect();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].token(), fetcher.tokens().current());
    assert_eq!(cached_names(&cache, &context), vec!["v4.pdf"]);
    assert_eq!(sink.authoritative_frames().len(), 1);
}

#[tokio::test]
async fn failure_of_a_superseded_refresh_is_not_reported() {
    let storage = Arc::new(ScriptedStorage::new());
    let failing = storage.script_gated_failure("projects/acme", "timeout");
    storage.script("projects/acme", files("projects/acme", &["a.png"]));
    let (_cache, fetcher) = orchestrator(storage.clone());
    let sink = RecordingSink::new();
    let context = ListingContext::Folder("acme".into());
    let view = ListingView::default();

    let (first, second) = tokio::join!(fetcher.refresh(&context, &view, &sink), async {
        let outcome = fetcher.refresh(&context, &view, &sink).await;
        let _ = failing.send(());
        outcome
    });

    assert!(first.is_superseded());
    assert!(second.is_committed());
    assert_eq!(sink.last_frame().unwrap().names(), vec!["a.png"]);
}

#[tokio::test]
async fn rapid_navigation_renders_the_last_destination() {
    let storage = Arc::new(ScriptedStorage::new());
    let slow = storage.script_gated("projects/acme", files("projects/acme", &["acme.pdf"]));
    storage.script("projects/zeta", files("projects/zeta", &["zeta.pdf"]));
    let sink = Arc::new(RecordingSink::new());
    let session = Session::builder(storage.clone()).sink(sink.clone()).build();

    let (first, second) = tokio::join!(
        session.on_navigate(NavigationIntent::Enter {
            id: "acme".into(),
            name: "Acme".into(),
        }),
        async {
            let outcome = session.on_navigate(NavigationIntent::Home).await;
            let outcome2 = session
                .on_navigate(NavigationIntent::Enter {
                    id: "zeta".into(),
                    name: "Zeta".into(),
                })
                .await;
            let _ = slow.send(());
            (outcome, outcome2)
        }
    );

    assert!(first.is_superseded());
    assert!(second.1.is_committed());
    assert_eq!(session.context(), ListingContext::Folder("zeta".into()));
    let last = sink.last_frame().unwrap();
    assert_eq!(last.context, ListingContext::Folder("zeta".into()));
    assert_eq!(last.names(), vec!["zeta.pdf"]);
    assert!(!session.cache().contains(&ListingContext::Folder("acme".into())));
}
