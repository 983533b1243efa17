use automatey::cli::{CliArgs, LogLevel};
use clap::Parser;

#[test]
fn defaults_search_for_automatey_toml_with_everything_enabled() {
    let args = CliArgs::try_parse_from(["automatey"]).expect("parse");
    let options = args.to_options();

    assert_eq!(options.config_file, "automatey.toml");
    assert!(options.configure_logging);
    assert!(options.register_exit_timer);
    assert_eq!(options.level_override, None);
    assert_eq!(options.start_dir, None);
}

#[test]
fn flags_map_onto_options() {
    let args = CliArgs::try_parse_from([
        "automatey",
        "--config",
        "/etc/jobs/nightly.toml",
        "--disable-logging",
        "--disable-exit-timer",
        "--log-level",
        "warn",
    ])
    .expect("parse");

    assert_eq!(args.log_level, Some(LogLevel::Warn));
    let options = args.to_options();
    assert_eq!(options.config_file, "/etc/jobs/nightly.toml");
    assert!(!options.configure_logging);
    assert!(!options.register_exit_timer);
    assert_eq!(options.level_override.as_deref(), Some("WARNING"));
}

#[test]
fn unknown_level_is_rejected_by_the_parser() {
    assert!(CliArgs::try_parse_from(["automatey", "--log-level", "loud"]).is_err());
}
