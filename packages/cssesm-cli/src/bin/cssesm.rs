use clap::{Arg, ArgAction, Command};
use cssesm_cli::{scope, OutputFormat, ScopeOptions, Source};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let matches = Command::new("cssesm")
        .version(cssesm_cli::version())
        .about("Scope the class names of a stylesheet")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .required(true)
                .help("Stylesheet path or URL, or - to read CSS from stdin"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Base URL for relative paths (default: the current directory)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to a JSON configuration file"),
        )
        .arg(
            Arg::new("exports")
                .long("exports")
                .action(ArgAction::SetTrue)
                .conflicts_with("json")
                .help("Print the class-name mapping instead of the CSS"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print CSS and mapping as JSON"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Suppress warnings; errors are still reported"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .get_matches();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match matches.get_count("verbose") {
        0 => EnvFilter::new("cssesm=warn"),
        1 => EnvFilter::new("cssesm=info"),
        _ => EnvFilter::new("cssesm=debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let source = match matches.get_one::<String>("source").map(String::as_str) {
        Some("-") => {
            let mut text = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut text) {
                eprintln!("Error: failed to read stdin: {}", e);
                process::exit(1);
            }
            Source::Inline(text)
        }
        Some(path) => Source::Path(path.to_string()),
        None => unreachable!("source is required"),
    };

    let format = if matches.get_flag("json") {
        OutputFormat::Json
    } else if matches.get_flag("exports") {
        OutputFormat::Exports
    } else {
        OutputFormat::Css
    };

    let options = ScopeOptions {
        source,
        base_url: matches.get_one::<String>("base-url").cloned(),
        config: matches.get_one::<String>("config").map(PathBuf::from),
        format,
        quiet: matches.get_flag("quiet"),
    };

    match LocalSet::new().run_until(scope(&options)).await {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
