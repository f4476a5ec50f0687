//! `typed-json`: decode a JSON document against a type signature.
//!
//! Usage:
//!   typed-json '<signature>' [options.json]
//!
//! The document is read from stdin and written back to stdout in canonical
//! form, for example `typed-json 'map<str,seq<date>>' < dates.json`.

use std::io::{self, Write};

use stream_util::{read_all_text, Charset};
use typed_json::cli::{init_tracing, load_codec, normalize, CliError};

fn run(args: &[String]) -> Result<String, CliError> {
    let signature = args.get(1).ok_or(CliError::MissingSignature)?;
    let codec = load_codec(args.get(2).map(String::as_str))?;
    let input = read_all_text(&mut io::stdin().lock(), Charset::Utf8)?;
    normalize(&codec, &input, signature)
}

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(result) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
