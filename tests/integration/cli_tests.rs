use clap::Parser;
use dupefinder::cli::{Cli, Commands, OutputFormat};
use dupefinder::error::ExitCode;
use dupefinder::run_app;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Parse `scan` arguments with an isolated, nonexistent config file.
fn scan_cli(config_dir: &Path, extra: &[&str]) -> Cli {
    let config = config_dir.join("none.toml");
    let mut args = vec![
        "dupefinder".to_string(),
        "-q".to_string(),
        "--config".to_string(),
        config.to_string_lossy().into_owned(),
        "scan".to_string(),
    ];
    args.extend(extra.iter().map(|s| (*s).to_string()));
    Cli::try_parse_from(args).unwrap()
}

fn dir_with_duplicates() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    fs::write(dir.path().join("c.txt"), "world").unwrap();
    dir
}

#[test]
fn test_scan_with_duplicates_exits_success() {
    let dir = dir_with_duplicates();
    let config_dir = tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    let code = run_app(scan_cli(config_dir.path(), &[&root])).unwrap();

    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_scan_without_duplicates_exits_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "one").unwrap();
    fs::write(dir.path().join("b.txt"), "two").unwrap();
    let config_dir = tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    let code = run_app(scan_cli(config_dir.path(), &[&root])).unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_recursive_flag_reaches_nested_duplicates() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("top.txt"), "same").unwrap();
    fs::write(sub.join("deep.txt"), "same").unwrap();
    let config_dir = tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    let flat = run_app(scan_cli(config_dir.path(), &[&root])).unwrap();
    let deep = run_app(scan_cli(config_dir.path(), &["-r", &root])).unwrap();

    assert_eq!(flat, ExitCode::NoDuplicates);
    assert_eq!(deep, ExitCode::Success);
}

#[test]
fn test_config_file_enables_recursion() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("top.txt"), "same").unwrap();
    fs::write(sub.join("deep.txt"), "same").unwrap();

    let config_dir = tempdir().unwrap();
    let config = config_dir.path().join("dupefinder.toml");
    fs::write(&config, "recursive = true\n").unwrap();

    let cli = Cli::try_parse_from([
        "dupefinder",
        "-q",
        "--config",
        config.to_str().unwrap(),
        "scan",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(run_app(cli).unwrap(), ExitCode::Success);
}

#[test]
fn test_machine_readable_outputs() {
    let dir = dir_with_duplicates();
    let config_dir = tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    for format in ["json", "plan"] {
        let cli = scan_cli(config_dir.path(), &["--output", format, &root]);
        assert_eq!(run_app(cli).unwrap(), ExitCode::Success, "{}", format);
    }
}

#[test]
fn test_scan_leaves_files_untouched() {
    let dir = dir_with_duplicates();
    let config_dir = tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    run_app(scan_cli(
        config_dir.path(),
        &["--output", "plan", "--tie-break", "by-name", &root],
    ))
    .unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "hello");
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let root = missing.to_string_lossy().into_owned();

    let err = run_app(scan_cli(dir.path(), &[&root])).unwrap_err();

    assert!(err.to_string().contains("Path not found"));
}

#[test]
fn test_file_root_is_an_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();
    let root = file.to_string_lossy().into_owned();

    let err = run_app(scan_cli(dir.path(), &[&root])).unwrap_err();

    assert!(err.to_string().contains("Not a directory"));
}

#[test]
fn test_inverted_size_range_is_an_error() {
    let dir = dir_with_duplicates();
    let config_dir = tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();

    let cli = scan_cli(
        config_dir.path(),
        &["--min-size", "1MB", "--max-size", "1KB", &root],
    );

    assert!(run_app(cli).is_err());
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = dir_with_duplicates();
    let config_dir = tempdir().unwrap();
    let config = config_dir.path().join("bad.toml");
    fs::write(&config, "io_threads = \"many\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "dupefinder",
        "-q",
        "--config",
        config.to_str().unwrap(),
        "scan",
        dir.path().to_str().unwrap(),
    ])
    .unwrap();

    let err = run_app(cli).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid configuration"));
}

#[test]
fn test_config_subcommand_succeeds() {
    let config_dir = tempdir().unwrap();
    let config = config_dir.path().join("none.toml");

    let cli =
        Cli::try_parse_from(["dupefinder", "-q", "--config", config.to_str().unwrap(), "config"])
            .unwrap();

    assert!(matches!(cli.command, Commands::Config));
    assert_eq!(run_app(cli).unwrap(), ExitCode::Success);
}

#[test]
fn test_scan_argument_parsing() {
    let cli = Cli::try_parse_from([
        "dupefinder",
        "scan",
        "-r",
        "--tie-break",
        "by-last-modified",
        "-o",
        "json",
        "--io-threads",
        "2",
        "--json-errors",
        "one",
        "two",
    ])
    .unwrap();

    assert!(cli.json_errors());
    let Commands::Scan(args) = cli.command else {
        panic!("expected scan");
    };
    assert!(args.recursive);
    assert_eq!(args.output, OutputFormat::Json);
    assert_eq!(args.io_threads, Some(2));
    assert_eq!(args.paths.len(), 2);
}

#[test]
fn test_scan_requires_a_path() {
    assert!(Cli::try_parse_from(["dupefinder", "scan"]).is_err());
}

#[test]
fn test_zero_io_threads_rejected() {
    assert!(Cli::try_parse_from(["dupefinder", "scan", "--io-threads", "0", "."]).is_err());
}
