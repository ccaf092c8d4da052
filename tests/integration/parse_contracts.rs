use clap::Parser;
use eaglebridge::tooling::cli::{Cli, Commands, EagleCommands};
use eaglebridge::types::MediaType;

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["eaglebridge", "scan"],
        vec!["eaglebridge", "scan", "/lib/Main.library", "--include-deleted"],
        vec![
            "eaglebridge",
            "scan",
            "--type",
            "image",
            "--type",
            "video",
            "--tag",
            "a",
            "--show",
            "skipped",
            "--format",
            "json",
            "--jobs",
            "4",
        ],
        vec!["eaglebridge", "sidegen", "--dry", "--missing-only"],
        vec![
            "eaglebridge",
            "send-to-immich",
            "--immich-url",
            "http://immich.local",
            "--api-key",
            "k",
            "--concurrency",
            "8",
            "--skip-check",
        ],
        vec!["eaglebridge", "eagle", "info"],
        vec!["eaglebridge", "eagle", "--format", "json", "folders", "--recent"],
        vec!["eaglebridge", "eagle", "create-folder", "Inbox", "--parent", "P1"],
        vec!["eaglebridge", "eagle", "rename-folder", "F1", "Archive"],
        vec!["eaglebridge", "eagle", "items", "--limit", "10", "--tag", "x", "--folder", "F1"],
        vec!["eaglebridge", "eagle", "trash", "I1", "I2"],
        vec!["eaglebridge", "--verbose", "--log-format", "json", "scan"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_input() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["eaglebridge"],
        vec!["eaglebridge", "scan", "--type", "hologram"],
        vec!["eaglebridge", "scan", "--jobs", "many"],
        vec!["eaglebridge", "eagle", "trash"],
        vec!["eaglebridge", "eagle", "rename-folder", "F1"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_err(), "expected parse failure for args: {args:?}");
    }
}

#[test]
fn parse_scan_types_into_media_types() {
    let cli = Cli::try_parse_from(["eaglebridge", "scan", "--type", "Audio"]).unwrap();
    match cli.command {
        Commands::Scan { types, .. } => assert_eq!(types, vec![MediaType::Audio]),
        _ => panic!("expected scan command"),
    }
}

#[test]
fn parse_eagle_items_defaults() {
    let cli = Cli::try_parse_from(["eaglebridge", "eagle", "items"]).unwrap();
    match cli.command {
        Commands::Eagle {
            format,
            command: EagleCommands::Items { limit, offset, .. },
        } => {
            assert_eq!(format, "text");
            assert_eq!(limit, 200);
            assert_eq!(offset, 0);
        }
        _ => panic!("expected eagle items command"),
    }
}
