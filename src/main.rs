#![deny(rust_2018_idioms)]
#![feature(proc_macro_hygiene, decl_macro)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
#[cfg(test)]
#[macro_use]
extern crate maplit;

#[macro_use]
mod macros;

mod cli;
mod config;
mod domain;
mod error;
mod exceptions;
mod ingester;
mod server;
mod store;
mod subtitles;
mod utils;

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use chrono::Local;

use crate::config::CONFIG;

fn main() {
    use std::io::Write;

    // init environment variables, CLI, and logging
    dotenv::dotenv().ok();

    env_logger::Builder::new()
        .format(|buf, rec| {
            writeln!(
                buf,
                "[{} {}:{} {}] {}",
                rec.level(),
                rec.module_path().unwrap_or("<unnamed>"),
                rec.line().unwrap_or(0),
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                rec.args()
            )
        })
        .parse_filters(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    debug!("Logging initialized.");
    CONFIG.check();

    let preset = CONFIG
        .directory
        .clone()
        .or_else(|| env::args_os().nth(1).map(PathBuf::from));

    let store = {
        let stdin = io::stdin();
        let mut prompt = cli::Prompt::new(stdin.lock(), io::stdout());

        if let Err(why) = cli::check_exception_file(&mut prompt, &CONFIG.exceptions_file) {
            error!("Unable to write to the terminal: {}", why);
            process::exit(1);
        }

        let loaded = cli::load_vocabulary(
            &mut prompt,
            preset.as_deref(),
            &CONFIG.exceptions_file,
            &CONFIG.extension,
        );

        match loaded {
            Ok(Some(store)) => store,
            Ok(None) => {
                info!("No vocabulary loaded, shutting down.");
                return;
            }
            Err(why) => {
                error!("Unable to load vocabulary: {}", why);
                process::exit(1);
            }
        }
    };

    println!("\nStarting web server...");
    println!("Open http://localhost:{} in your browser", CONFIG.port);

    if let Err(why) = server::serve(store) {
        error!("{}", why);
        process::exit(1);
    }
}
