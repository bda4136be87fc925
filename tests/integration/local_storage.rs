use cloudshelf::error::StorageError;
use cloudshelf::navigation::NavigationIntent;
use cloudshelf::session::{FolderPreview, Mutation, MutationOutcome, Session};
use cloudshelf::storage::{LocalStorage, ObjectStorage};
use cloudshelf::types::{Item, ListingContext};
use cloudshelf::upload::UploadFile;
use cloudshelf::view::RecordingSink;
use std::sync::Arc;
use tempfile::TempDir;

async fn unlocked(temp: &TempDir) -> (Arc<RecordingSink>, Session) {
    let storage = Arc::new(LocalStorage::new(temp.path().join("objects")));
    let sink = Arc::new(RecordingSink::new());
    let session = Session::builder(storage)
        .admin_secret(Some("pw".to_string()))
        .sink(sink.clone())
        .build();
    session.authorize_admin("pw").await.unwrap();
    (sink, session)
}

#[tokio::test]
async fn missing_base_directory_lists_empty() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp.path().join("nothing-here"));
    let listing = storage.list("projects").await.unwrap();
    assert!(listing.folders.is_empty());
    assert!(listing.files.is_empty());
    assert!(matches!(
        storage.metadata("projects/acme/a.png").await,
        Err(StorageError::NotFound(_))
    ));
}

#[tokio::test]
async fn upload_reports_progress_and_lands_on_disk() {
    let temp = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp.path());
    let seen = parking_lot::Mutex::new(Vec::new());
    let progress = |bytes: u64| seen.lock().push(bytes);

    let data = vec![7u8; 150 * 1024];
    let meta = storage
        .upload("projects/acme/1_big.bin", data, &progress)
        .await
        .unwrap();
    assert_eq!(meta.size, 150 * 1024);
    assert_eq!(*seen.lock().last().unwrap(), 150 * 1024);
    assert!(seen.lock().windows(2).all(|w| w[0] < w[1]));
    assert!(temp.path().join("projects/acme/1_big.bin").is_file());

    let url = storage.download_url("projects/acme/1_big.bin").await.unwrap();
    assert!(url.starts_with("file://"));
}

#[tokio::test]
async fn folder_lifecycle_on_disk() {
    let temp = TempDir::new().unwrap();
    let (sink, session) = unlocked(&temp).await;

    session
        .on_mutate(Mutation::CreateFolder {
            name: "Acme Site".into(),
        })
        .await
        .unwrap();
    session
        .on_navigate(NavigationIntent::Enter {
            id: "acme site".into(),
            name: "Acme Site".into(),
        })
        .await;
    session
        .on_mutate(Mutation::Upload {
            folder_id: None,
            files: vec![
                UploadFile::new("floor plan.pdf", b"%PDF".to_vec()),
                UploadFile::new("render.png", b"png".to_vec()),
            ],
        })
        .await
        .unwrap();

    let frame = sink.last_frame().unwrap();
    assert_eq!(frame.context, ListingContext::Folder("acme site".into()));
    assert_eq!(frame.items.len(), 2);
    assert!(frame.items.iter().all(|i| !i.is_folder()));

    let preview = session.folder_preview("acme site").await;
    assert!(matches!(preview, FolderPreview::Image { .. }));
    assert!(preview.url().unwrap().starts_with("file://"));

    session.on_navigate(NavigationIntent::Home).await;
    match &sink.last_frame().unwrap().items[..] {
        [Item::Folder(folder)] => assert_eq!(folder.name, "Acme Site"),
        other => panic!("unexpected root listing: {:?}", other),
    }

    let outcome = session
        .on_mutate(Mutation::DeleteFolder {
            id: "acme site".into(),
        })
        .await
        .unwrap();
    match outcome {
        MutationOutcome::FolderPurged(report) => {
            assert!(report.is_complete());
            assert_eq!(report.deleted.len(), 3);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!temp.path().join("objects/projects/acme site").exists());
    assert!(sink.last_frame().unwrap().items.is_empty());
}
