// tests/cli_args.rs

use clap::Parser;

use dagboard::cli::{CliArgs, Command, LogLevel, WatchPanel};
use dagboard::logging::{build_filter, resolve_level};

#[test]
fn task_command_keeps_identifiers_as_text() {
    let args = CliArgs::try_parse_from([
        "dagboard", "task", "7", "t1", "0", "2_1_2", "--offset", "3", "--limit", "10",
    ])
    .unwrap();

    match args.command {
        Command::Task {
            run_id,
            task_id,
            retry,
            pos,
            offset,
            limit,
        } => {
            assert_eq!(run_id, "7");
            assert_eq!(task_id, "t1");
            assert_eq!(retry, "0");
            assert_eq!(pos, "2_1_2");
            assert_eq!(offset, 3);
            assert_eq!(limit, Some(10));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn global_flags_work_after_subcommand() {
    let args = CliArgs::try_parse_from([
        "dagboard",
        "watch",
        "run",
        "--run-id",
        "12",
        "--iterations",
        "3",
        "--mock",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert!(args.mock);
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    match args.command {
        Command::Watch {
            panel,
            run_id,
            iterations,
            interval,
        } => {
            assert_eq!(panel, WatchPanel::Run);
            assert_eq!(run_id.as_deref(), Some("12"));
            assert_eq!(iterations, Some(3));
            assert_eq!(interval, None);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn runs_count_is_optional() {
    let args = CliArgs::try_parse_from(["dagboard", "runs"]).unwrap();
    assert!(matches!(args.command, Command::Runs { num: None }));

    let args = CliArgs::try_parse_from(["dagboard", "runs", "-n", "25"]).unwrap();
    assert!(matches!(args.command, Command::Runs { num: Some(ref n) } if n == "25"));
}

#[test]
fn subcommand_is_required() {
    assert!(CliArgs::try_parse_from(["dagboard"]).is_err());
    assert!(CliArgs::try_parse_from(["dagboard", "dags"]).is_err());
}

#[test]
fn log_level_priority() {
    assert_eq!(
        resolve_level(Some(LogLevel::Warn), Some("trace")),
        tracing::Level::WARN
    );
    assert_eq!(resolve_level(None, Some(" DEBUG ")), tracing::Level::DEBUG);
    assert_eq!(resolve_level(None, Some("warning")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, Some("loud")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}

#[test]
fn env_directives_are_used_without_cli_flag() {
    let filter = build_filter(None, Some("dagboard=debug,reqwest=warn"))
        .to_string()
        .to_lowercase();
    assert!(filter.contains("dagboard=debug"));
    assert!(filter.contains("reqwest=warn"));

    let filter = build_filter(Some(LogLevel::Warn), Some("dagboard=debug"))
        .to_string()
        .to_lowercase();
    assert!(!filter.contains("dagboard"));
    assert!(filter.contains("warn"));

    let filter = build_filter(None, Some("dagboard=loud"))
        .to_string()
        .to_lowercase();
    assert!(!filter.contains("dagboard"));
    assert!(filter.contains("info"));
}
