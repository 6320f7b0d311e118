//! logpager - Paged Navigation over Large Log Files
//!
//! Prints one page of a log file: from a record, from the end, or around a search match.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use logpager::{Anchor, FixtureLogSource, LogFileParser, LogPager, LogRecord, Page, ParserConfig};
use std::path::PathBuf;

fn build_cli() -> Command {
    let command = Command::new("logpager")
        .version(logpager::VERSION)
        .about("Page, search and filter large multi-line log files")
        .long_about(
            "logpager prints one page of log records from a log4j-style file. Records may \
             span several lines (stack traces); pages can be read forward or backward from \
             any record, from the end of the file, or around a search match.",
        )
        .arg(
            Arg::new("file")
                .help("Path to the log file")
                .required_unless_present("demo")
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("page-size")
                .short('n')
                .long("page-size")
                .help("Number of records per page")
                .value_parser(clap::value_parser!(usize))
                .default_value("20"),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .help("Anchor: number of records before the page; negative continues from the end")
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("find")
                .long("find")
                .help("Jump to the first record matching EXPR and show the records after it")
                .value_name("EXPR")
                .conflicts_with("filter"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .help("Show only records matching EXPR")
                .value_name("EXPR"),
        )
        .arg(
            Arg::new("regex")
                .short('e')
                .long("regex")
                .help("Treat EXPR as a regular expression instead of a literal")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("backward")
                .short('b')
                .long("backward")
                .help("Read before the anchor instead of after it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("last")
                .long("last")
                .help("Show the last page of the file")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["from", "find", "filter"]),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Page through a built-in sample log instead of a file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("boundary")
                .long("boundary")
                .help("Regex matching the first line of each record")
                .value_name("PATTERN"),
        )
        .arg(
            Arg::new("timestamp-format")
                .long("timestamp-format")
                .help("chrono format of the leading timestamp")
                .value_name("FORMAT"),
        );

    #[cfg(feature = "config")]
    let command = command.arg(
        Arg::new("config")
            .long("config")
            .help("TOML configuration file (defaults to <config dir>/logpager/config.toml)")
            .value_parser(clap::value_parser!(PathBuf)),
    );

    command
}

fn load_config(matches: &ArgMatches) -> Result<ParserConfig> {
    #[cfg(feature = "config")]
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ParserConfig::load(path)?,
        None => ParserConfig::load_default()?,
    };
    #[cfg(not(feature = "config"))]
    let mut config = ParserConfig::default();

    if let Some(pattern) = matches.get_one::<String>("boundary") {
        config = config.with_boundary_pattern(pattern);
    }
    if let Some(format) = matches.get_one::<String>("timestamp-format") {
        config = config.with_timestamp_format(format);
    }
    Ok(config)
}

fn run(pager: &mut dyn LogPager, matches: &ArgMatches) -> Result<Page<LogRecord>> {
    let page_size = *matches.get_one::<usize>("page-size").unwrap_or(&20);
    let use_regex = matches.get_flag("regex");
    let backward = matches.get_flag("backward");

    if matches.get_flag("last") {
        return Ok(pager.prev_page(Anchor::Resume, page_size)?);
    }

    let anchor = match matches.get_one::<i64>("from") {
        Some(value) => Anchor::from(*value),
        None if backward => Anchor::Resume,
        None => Anchor::Ordinal(0),
    };

    let page = match (
        matches.get_one::<String>("find"),
        matches.get_one::<String>("filter"),
    ) {
        (Some(expr), _) if backward => pager.find_prev(expr, use_regex, anchor, page_size)?,
        (Some(expr), _) => pager.find_next(expr, use_regex, anchor, page_size)?,
        (_, Some(expr)) if backward => pager.filter_prev(expr, use_regex, anchor, page_size)?,
        (_, Some(expr)) => pager.filter_next(expr, use_regex, anchor, page_size)?,
        _ if backward => pager.prev_page(anchor, page_size)?,
        _ => pager.next_page(anchor, page_size)?,
    };
    Ok(page)
}

fn print_page(page: &Page<LogRecord>) {
    for record in page {
        let timestamp = record
            .timestamp()
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if record.expand_required() { '+' } else { ' ' };

        println!(
            "{:>7}{marker} {timestamp} {:<5} [{}] {} - {}",
            record.start_line(),
            record.level().as_str(),
            record.thread_name(),
            record.logger_name(),
            record.message()
        );
        for line in record.continuation_lines() {
            println!("{:>8} {line}", "");
        }
    }

    for failure in &page.failures {
        eprintln!("warning: {failure}");
    }
}

fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let matches = build_cli().get_matches();

    let mut pager: Box<dyn LogPager> = if matches.get_flag("demo") {
        Box::new(FixtureLogSource::demo())
    } else {
        let Some(file_path) = matches.get_one::<PathBuf>("file") else {
            anyhow::bail!("A log file is required unless --demo is given");
        };
        let config = load_config(&matches)?;
        let parser = LogFileParser::with_config(file_path, &config)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        Box::new(parser)
    };

    let page = run(pager.as_mut(), &matches)?;
    if page.is_empty() && page.failures.is_empty() {
        eprintln!("no records");
    }
    print_page(&page);

    Ok(())
}
