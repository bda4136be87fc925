use std::fs;

use cloudshelf::tooling::cli::Commands;
use tempfile::TempDir;

use crate::cli::support::local_context;

fn ls_json(folder: Option<&str>) -> Commands {
    Commands::Ls {
        folder: folder.map(str::to_string),
        filter: "all".to_string(),
        search: None,
        format: "json".to_string(),
    }
}

#[tokio::test]
async fn ls_json_contract_has_required_fields() {
    let temp = TempDir::new().unwrap();
    let cli = local_context(&temp);
    cli.execute(&Commands::Mkdir {
        name: "Acme".to_string(),
    })
    .await
    .unwrap();

    let upload = temp.path().join("plan.pdf");
    fs::write(&upload, b"%PDF-1.7").unwrap();
    cli.execute(&Commands::Upload {
        folder: "acme".to_string(),
        files: vec![upload],
    })
    .await
    .unwrap();

    let root: serde_json::Value =
        serde_json::from_str(&cli.execute(&ls_json(None)).await.unwrap()).unwrap();
    let folder = &root.as_array().unwrap()[0];
    assert_eq!(folder.get("type").and_then(|v| v.as_str()), Some("folder"));
    assert_eq!(folder.get("id").and_then(|v| v.as_str()), Some("acme"));
    assert_eq!(folder.get("name").and_then(|v| v.as_str()), Some("Acme"));
    let thumbnail = folder.get("thumbnail_url").and_then(|v| v.as_str()).unwrap();
    assert!(thumbnail.starts_with("file://"));
    assert!(thumbnail.ends_with("plan.pdf"));

    let files: serde_json::Value =
        serde_json::from_str(&cli.execute(&ls_json(Some("acme"))).await.unwrap()).unwrap();
    let file = &files.as_array().unwrap()[0];
    assert_eq!(file.get("type").and_then(|v| v.as_str()), Some("file"));
    assert_eq!(
        file.get("file_type").and_then(|v| v.as_str()),
        Some("application/pdf")
    );
    assert!(file
        .get("file_path")
        .and_then(|v| v.as_str())
        .unwrap()
        .starts_with("projects/acme/"));
    assert!(file.get("id").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn preview_json_contract_is_tagged() {
    let temp = TempDir::new().unwrap();
    let cli = local_context(&temp);
    let output = cli
        .execute(&Commands::Preview {
            id: "empty".to_string(),
            format: "json".to_string(),
        })
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.get("kind").and_then(|v| v.as_str()), Some("none"));
}

#[tokio::test]
async fn rmdir_text_reports_deleted_objects() {
    let temp = TempDir::new().unwrap();
    let cli = local_context(&temp);
    cli.execute(&Commands::Mkdir {
        name: "Acme".to_string(),
    })
    .await
    .unwrap();

    let output = cli
        .execute(&Commands::Rmdir {
            id: "acme".to_string(),
            force: true,
        })
        .await
        .unwrap();
    assert!(output.contains("Objects deleted: 1"));

    let root: serde_json::Value =
        serde_json::from_str(&cli.execute(&ls_json(None)).await.unwrap()).unwrap();
    assert!(root.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn mkdir_twice_reports_existing_folder() {
    let temp = TempDir::new().unwrap();
    let cli = local_context(&temp);
    let mkdir = Commands::Mkdir {
        name: "Acme".to_string(),
    };
    cli.execute(&mkdir).await.unwrap();
    let err = cli.execute(&mkdir).await.unwrap_err();
    assert!(err.to_string().contains("already exists"));
}
