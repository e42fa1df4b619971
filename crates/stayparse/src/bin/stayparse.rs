// ABOUTME: CLI binary for the stayparse listing scraper.
// ABOUTME: Extracts listings from URLs (or a saved HTML page) and prints them as a JSON array.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use stayparse::{Listing, ListingParser};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stayparse")]
#[command(about = "Extract vacation-rental listings from booking sites as JSON")]
struct Args {
    /// Spaces of indentation in the JSON output
    #[arg(long = "indent", default_value_t = 4, conflicts_with = "compact")]
    indent: usize,

    /// Print the JSON array on a single line
    #[arg(long = "compact")]
    compact: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Log extraction details to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Saved HTML page to parse instead of fetching (requires --url)
    #[arg(long = "html", requires = "url", conflicts_with = "urls")]
    html: Option<PathBuf>,

    /// URL the saved HTML page was taken from
    #[arg(long = "url", requires = "html")]
    url: Option<String>,

    /// Listing URLs to fetch and parse
    #[arg(required_unless_present = "html")]
    urls: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_output(listings: &[Listing], indent: usize, compact: bool) -> anyhow::Result<String> {
    if compact {
        return Ok(serde_json::to_string(listings)?);
    }
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    listings.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let parser = ListingParser::builder()
        .build()
        .context("failed to set up the HTTP client")?;

    let listings: Vec<Listing> = match (&args.html, &args.url) {
        (Some(path), Some(url)) => {
            let html = fs::read_to_string(path)
                .with_context(|| format!("error reading file {:?}", path))?;
            parser.parse_html(url, &html).into_iter().collect()
        }
        _ => parser.parse(&args.urls).collect(),
    };
    tracing::info!(extracted = listings.len(), "done");

    let output = format_output(&listings, args.indent, args.compact)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("error writing to {:?}", path))?
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_is_an_empty_array() {
        assert_eq!(format_output(&[], 4, false).unwrap(), "[]");
        assert_eq!(format_output(&[], 4, true).unwrap(), "[]");
    }

    #[test]
    fn indentation_is_configurable() {
        let listing = Listing {
            url: "https://www.booking.com/hotel/gb/x.html".to_string(),
            title: "X".to_string(),
            source: "booking".to_string(),
            ..Default::default()
        };
        let two = format_output(std::slice::from_ref(&listing), 2, false).unwrap();
        assert!(two.contains("\n    \"url\""));
        let compact = format_output(&[listing], 4, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.starts_with("[{\"url\":"));
    }
}
