//! `xml2json`: print the JSON tree of each XML file given on the command line.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};

use xmljson::{to_json_from_file_sync, to_xml, tree_from_json, Options, Profile, Result};

/// Convert XML files to JSON trees, one JSON document per line.
#[derive(Parser, Debug)]
#[command(name = "xml2json", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Files to convert.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Option profile: strict, simple or compact.
    #[arg(long, default_value_t = Profile::Strict)]
    profile: Profile,

    // -- Overrides on top of the profile -------------------------------------
    /// Drop whitespace-only text.
    #[arg(long)]
    skip_empty_texts: bool,

    /// Write text nodes as bare strings.
    #[arg(long)]
    text_nodes_to_str: bool,

    /// Store a lone child in place of a one-element list.
    #[arg(long)]
    extract_only_childs: bool,

    /// Leave out empty attribute maps.
    #[arg(long)]
    omit_empty_attrs: bool,

    /// Leave out empty element content.
    #[arg(long)]
    omit_empty_content: bool,

    /// Read the files as JSON trees and print them as XML instead.
    #[arg(long)]
    to_xml: bool,

    /// Print debug log lines to standard error.
    #[arg(short, long)]
    verbose: bool,
}

/// Writes log records to standard error.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

impl Cli {
    fn options(&self) -> Options {
        let base = self.profile.options();
        base.skip_empty_texts(base.skip_empty_texts || self.skip_empty_texts)
            .text_nodes_to_str(base.text_nodes_to_str || self.text_nodes_to_str)
            .extract_only_childs(base.extract_only_childs || self.extract_only_childs)
            .omit_empty_attrs(base.omit_empty_attrs || self.omit_empty_attrs)
            .omit_empty_content(base.omit_empty_content || self.omit_empty_content)
    }

    fn convert(&self, path: &Path) -> Result<String> {
        if self.to_xml {
            return Ok(to_xml(&tree_from_json(&fs::read_to_string(path)?)?));
        }
        let node = to_json_from_file_sync(path, self.options())?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&node)?
        } else {
            serde_json::to_string(&node)?
        };
        Ok(json)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let mut status = ExitCode::SUCCESS;
    for path in &cli.files {
        match cli.convert(path) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
