//! End-to-end flows through a session: listing, folder markers, batch
//! uploads and folder purges.

use super::support::{folders, ScriptedStorage};
use cloudshelf::auth::sha256_hex;
use cloudshelf::fetch::RefreshOutcome;
use cloudshelf::listing::compare_names;
use cloudshelf::navigation::NavigationIntent;
use cloudshelf::session::{Mutation, MutationOutcome, Session};
use cloudshelf::storage::MemoryStorage;
use cloudshelf::types::{Item, ListingContext};
use cloudshelf::upload::UploadFile;
use cloudshelf::view::RecordingSink;
use std::cmp::Ordering;
use std::sync::Arc;

async fn admin_session(storage: Arc<MemoryStorage>) -> (Arc<RecordingSink>, Session) {
    let sink = Arc::new(RecordingSink::new());
    let session = Session::builder(storage)
        .admin_secret(Some(sha256_hex("password")))
        .sink(sink.clone())
        .build();
    session.authorize_admin("password").await.unwrap();
    sink.clear();
    (sink, session)
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(Item::name).collect()
}

#[tokio::test]
async fn duplicate_folder_spellings_collapse_and_sort() {
    let storage = Arc::new(ScriptedStorage::new());
    storage.script("projects", folders(&["Beta", "alpha", "ALPHA "]));
    let sink = Arc::new(RecordingSink::new());
    let session = Session::builder(storage.clone()).sink(sink.clone()).build();

    let items = match session.refresh().await {
        RefreshOutcome::Committed { items, .. } => items,
        other => panic!("expected a committed refresh, got {:?}", other),
    };

    // "alpha" is seen before "ALPHA " and sorts ahead of "Beta".
    assert_eq!(names(&items), vec!["alpha", "Beta"]);
    assert_eq!(sink.last_frame().unwrap().names(), vec!["alpha", "Beta"]);
    let cached = session.cache().get(&ListingContext::Root).unwrap();
    assert_eq!(names(&cached.items), vec!["alpha", "Beta"]);
    assert_eq!(storage.list_calls(), 1);
}

#[tokio::test]
async fn rendered_listings_put_folders_first_in_name_order() {
    let storage = Arc::new(MemoryStorage::new());
    for path in [
        "projects/acme/b.png",
        "projects/acme/A.pdf",
        "projects/acme/a.stl",
        "projects/acme/sub/x.txt",
    ] {
        storage.insert(path, b"x".to_vec());
    }
    let sink = Arc::new(RecordingSink::new());
    let session = Session::builder(storage).sink(sink.clone()).build();
    session
        .on_navigate(NavigationIntent::Enter {
            id: "acme".into(),
            name: "acme".into(),
        })
        .await;

    let frame = sink.last_frame().unwrap();
    assert_eq!(frame.names(), vec!["A.pdf", "a.stl", "b.png"]);
    for pair in frame.items.windows(2) {
        assert!(pair[0].is_folder() || !pair[1].is_folder());
        assert_ne!(compare_names(pair[0].name(), pair[1].name()), Ordering::Greater);
    }
}

#[tokio::test]
async fn created_folder_shows_marker_name() {
    let storage = Arc::new(MemoryStorage::new());
    let (sink, session) = admin_session(storage.clone()).await;

    let outcome = session
        .on_mutate(Mutation::CreateFolder {
            name: "Acme".into(),
        })
        .await
        .unwrap();
    assert_eq!(outcome, MutationOutcome::FolderCreated { id: "acme".into() });
    assert!(storage.contains("projects/acme/__folder__.json"));

    let frame = sink.last_frame().unwrap();
    assert_eq!(frame.context, ListingContext::Root);
    match &frame.items[..] {
        [Item::Folder(folder)] => {
            assert_eq!(folder.id, "acme");
            assert_eq!(folder.name, "Acme");
        }
        other => panic!("unexpected root listing: {:?}", other),
    }
}

#[tokio::test]
async fn batch_upload_reports_aggregate_progress_and_invalidates_once() {
    let storage = Arc::new(MemoryStorage::new());
    let (sink, session) = admin_session(storage.clone()).await;
    session
        .on_navigate(NavigationIntent::Enter {
            id: "acme".into(),
            name: "Acme".into(),
        })
        .await;
    let before = session.cache().stats().invalidations;

    let outcome = session
        .on_mutate(Mutation::Upload {
            folder_id: None,
            files: vec![
                UploadFile::new("a.png", vec![0u8; 300]),
                UploadFile::new("b.pdf", vec![0u8; 700]),
            ],
        })
        .await
        .unwrap();

    let report = match outcome {
        MutationOutcome::Uploaded(report) => report,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(report.total_bytes, 1000);
    assert_eq!(report.paths.len(), 2);

    let percents: Vec<u8> = sink.progress().iter().map(|p| p.percent).collect();
    assert_eq!(percents, vec![30, 100]);

    // One folder entry and one root entry, not one pair per file.
    assert_eq!(session.cache().stats().invalidations - before, 2);
    assert_eq!(storage.calls().upload, 2);
    let frame = sink.last_frame().unwrap();
    assert_eq!(frame.context, ListingContext::Folder("acme".into()));
    assert_eq!(frame.items.len(), 2);
}

#[tokio::test]
async fn purge_survives_a_failed_delete() {
    let storage = Arc::new(MemoryStorage::new());
    storage.insert("projects/acme/1_a.png", b"a".to_vec());
    storage.insert("projects/acme/2_b.pdf", b"b".to_vec());
    storage.insert("projects/acme/3_c.stl", b"c".to_vec());
    storage.fail_delete("projects/acme/2_b.pdf");

    let (_sink, session) = admin_session(storage.clone()).await;
    session.open_folder_panel("acme").await.unwrap();
    assert!(session.cache().contains(&ListingContext::Folder("acme".into())));
    let before = session.cache().stats().invalidations;

    let report = match session
        .on_mutate(Mutation::DeleteFolder { id: "acme".into() })
        .await
    {
        Ok(MutationOutcome::FolderPurged(report)) => report,
        other => panic!("unexpected purge result: {:?}", other),
    };

    assert_eq!(report.deleted.len(), 2);
    assert_eq!(
        report.failed.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>(),
        vec!["projects/acme/2_b.pdf"]
    );
    assert!(!report.is_complete());
    assert_eq!(storage.paths(), vec!["projects/acme/2_b.pdf".to_string()]);

    assert_eq!(session.cache().stats().invalidations - before, 2);
    assert!(!session.cache().contains(&ListingContext::Folder("acme".into())));
}

#[tokio::test]
async fn stale_cache_is_shown_before_storage_answers() {
    use cloudshelf::cache::Freshness;
    use cloudshelf::clock::ManualClock;
    use cloudshelf::view::RenderSource;

    let clock = Arc::new(ManualClock::new(1_000));
    let storage = Arc::new(MemoryStorage::new());
    storage.insert("projects/acme/__folder__.json", b"{}".to_vec());
    let sink = Arc::new(RecordingSink::new());
    let session = Session::builder(storage.clone())
        .clock(clock.clone())
        .ttl_ms(10_000)
        .sink(sink.clone())
        .build();

    session.refresh().await;
    storage.insert("projects/zeta/__folder__.json", b"{}".to_vec());
    clock.advance(10_000);
    sink.clear();
    session.refresh().await;

    let frames = sink.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].source, RenderSource::Cache(Freshness::Stale));
    assert_eq!(frames[0].names(), vec!["acme"]);
    assert_eq!(frames[1].source, RenderSource::Storage);
    assert_eq!(frames[1].names(), vec!["acme", "zeta"]);
}
