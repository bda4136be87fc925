use clap::{CommandFactory, Parser};
use cloudshelf::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["cloudshelf", "ls"],
        vec!["cloudshelf", "ls", "acme", "--filter", "images"],
        vec!["cloudshelf", "ls", "--search", "plan", "--format", "json"],
        vec!["cloudshelf", "mkdir", "Acme"],
        vec!["cloudshelf", "rename", "acme", "Acme Corp"],
        vec!["cloudshelf", "cover", "acme", "./cover.png"],
        vec!["cloudshelf", "rmdir", "acme", "--force"],
        vec!["cloudshelf", "rm", "projects/acme/1_a.png"],
        vec!["cloudshelf", "upload", "acme", "a.png", "b.pdf"],
        vec!["cloudshelf", "url", "projects/acme/1_a.png"],
        vec!["cloudshelf", "preview", "acme", "--format", "json"],
        vec!["cloudshelf", "hash-password", "secret"],
        vec![
            "cloudshelf",
            "--data-dir",
            "/tmp/objects",
            "--admin-password",
            "pw",
            "--log-output",
            "stderr",
            "ls",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_incomplete_commands() {
    for args in [
        vec!["cloudshelf"],
        vec!["cloudshelf", "mkdir"],
        vec!["cloudshelf", "rename", "acme"],
        vec!["cloudshelf", "upload", "acme"],
        vec!["cloudshelf", "cover", "acme"],
    ] {
        assert!(
            Cli::try_parse_from(args.clone()).is_err(),
            "expected parse failure for args: {args:?}"
        );
    }
}

#[test]
fn upload_collects_every_file() {
    let cli = Cli::try_parse_from(["cloudshelf", "upload", "acme", "a.png", "b.pdf"]).unwrap();
    match cli.command {
        Commands::Upload { folder, files } => {
            assert_eq!(folder, "acme");
            assert_eq!(files.len(), 2);
        }
        _ => panic!("expected upload command"),
    }
}

#[test]
fn help_lists_every_subcommand() {
    let help = Cli::command().render_long_help().to_string();
    for name in [
        "ls",
        "mkdir",
        "rename",
        "cover",
        "rmdir",
        "rm",
        "upload",
        "url",
        "preview",
        "hash-password",
    ] {
        assert!(help.contains(name), "help is missing {name}");
    }
}
