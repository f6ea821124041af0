// Copyright 2016 Adam Perry. Dual-licensed MIT and Apache 2.0 (see LICENSE files for details).

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

lazy_static! {
    pub static ref CONFIG: Config = match init() {
        Ok(c) => {
            info!("Configuration parsed from environment variables.");
            c
        }
        Err(bad_vars) => {
            for var in &bad_vars {
                error!("Unable to parse environment variable {}", var);
            }
            panic!("Unable to parse environment variables {:?}", bad_vars);
        }
    };
}

#[derive(Debug)]
pub struct Config {
    pub exceptions_file: PathBuf,
    pub extension: String,
    pub directory: Option<PathBuf>,
    pub address: String,
    pub port: u16,
}

impl Config {
    /// Force parsing at startup and report what will be used.
    pub fn check(&self) {
        info!(
            "Using exception list {} and .{} subtitle files",
            self.exceptions_file.display(),
            self.extension
        );
    }
}

const EXCEPTIONS_FILE: &str = "SUBVOCAB_EXCEPTIONS_FILE";
const EXTENSION: &str = "SUBVOCAB_EXTENSION";
const DIRECTORY: &str = "SUBVOCAB_DIRECTORY";
const ADDRESS: &str = "SUBVOCAB_ADDRESS";
const PORT: &str = "SUBVOCAB_PORT";

const DEFAULT_EXCEPTIONS_FILE: &str = "exceptions.txt";
const DEFAULT_EXTENSION: &str = "srt";
const DEFAULT_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

pub fn init() -> Result<Config, Vec<&'static str>> {
    let vars = [EXCEPTIONS_FILE, EXTENSION, DIRECTORY, ADDRESS, PORT]
        .iter()
        .filter_map(|&k| env::var(k).ok().map(|v| (k, v)))
        .collect::<BTreeMap<_, _>>();

    init_from(&vars)
}

fn init_from(vars: &BTreeMap<&'static str, String>) -> Result<Config, Vec<&'static str>> {
    let mut bad = Vec::new();

    let value = move |key: &'static str| {
        vars.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };

    let port = match value(PORT) {
        Some(p) => p.parse::<u16>().unwrap_or_else(|_| {
            bad.push(PORT);
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    };

    let extension = value(EXTENSION)
        .map(normalize_extension)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    if extension.is_empty() {
        bad.push(EXTENSION);
    }

    if !bad.is_empty() {
        return Err(bad);
    }

    Ok(Config {
        exceptions_file: PathBuf::from(value(EXCEPTIONS_FILE).unwrap_or(DEFAULT_EXCEPTIONS_FILE)),
        extension,
        directory: value(DIRECTORY).map(PathBuf::from),
        address: value(ADDRESS).unwrap_or(DEFAULT_ADDRESS).to_string(),
        port,
    })
}

/// `.SRT`, `srt` and `.srt` all mean the same extension.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
