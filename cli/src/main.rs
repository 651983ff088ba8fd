use std::error::Error;
use std::fs::File;
use std::io::{self, Read};

use clap::Parser;
use dsv_stream::{LineReader, ReadOptions, Reader};

#[derive(Parser, Debug)]
#[command(name = "dsvcat", version, about = "Preview delimiter-separated value files")]
struct Args {
    /// Input file path. Use '-' to read from stdin.
    input: String,

    /// Field separator.
    #[arg(short, long, value_name = "char", default_value = "|", value_parser = parse_separator)]
    separator: u8,

    /// Expected fields per row. 0 infers the count from the heading.
    #[arg(short, long, value_name = "count", default_value_t = 0)]
    fields: usize,

    /// Treat the first line as a heading.
    #[arg(long)]
    skip_heading: bool,

    /// Characters shown per field before truncation.
    #[arg(long, value_name = "chars", default_value_t = 24)]
    limit: usize,

    /// Use the line-splitting reader instead of the streaming one.
    #[arg(long)]
    simple: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let options = ReadOptions::new()
        .with_separator(args.separator)
        .with_fields(args.fields)
        .with_skip_heading(args.skip_heading);
    let src = open_input(&args.input)?;

    if args.simple {
        LineReader::with_options(src, options).read_all(|row| {
            println!(
                "{}",
                preview_row(row.iter().map(|field| field.as_bytes()), args.limit)
            );
        })?;
    } else {
        Reader::with_options(src, options).read_all(|row| {
            println!("{}", preview_row(row.iter(), args.limit));
        })?;
    }
    Ok(())
}

fn open_input(input: &str) -> Result<Box<dyn Read>, Box<dyn Error>> {
    match input {
        "-" => Ok(Box::new(io::stdin().lock())),
        path => Ok(Box::new(File::open(path)?)),
    }
}

fn parse_separator(raw: &str) -> Result<u8, String> {
    match raw.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(format!(
            "separator must be a single byte, got \"{raw}\""
        )),
    }
}

/// One row as `[0:"…", 1:"…"]`: fields quote-delimited and index-prefixed,
/// embedded newlines rendered as `\n`, long fields cut at `limit` characters
/// with a `...` suffix.
fn preview_row<'a, I>(fields: I, limit: usize) -> String
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut out = String::from("[");
    for (idx, field) in fields.into_iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("{idx}:\""));
        let text = String::from_utf8_lossy(field).replace('\n', "\\n");
        match text.char_indices().nth(limit) {
            Some((cut, _)) => {
                out.push_str(&text[..cut]);
                out.push_str("...");
            }
            None => out.push_str(&text),
        }
        out.push('"');
    }
    out.push(']');
    out
}
