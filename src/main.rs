use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::{
    env,
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

use kindle_clippings::{
    clippings::book::DATE_FORMAT,
    parse_reader, parse_reader_best_effort, Book, BookIdentity, Books, Clip, ClipType,
    ParseOptions, ParseReport,
};

enum OutputFormat {
    Summary,
    Json,
    Csv,
}

enum SortKey {
    Location,
    Time,
}

struct Args {
    clippings_path: PathBuf,
    format: OutputFormat,
    sort: Option<SortKey>,
    clip_type: Option<ClipType>,
    reverse: bool,
    best_effort: bool,
    identity: BookIdentity,
}

fn get_args() -> Result<Option<Args>> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "kindle-clippings".to_owned());
    let args: Vec<String> = args.collect();

    let mut opts = getopts::Options::new();
    opts.optopt("f", "format", "output format (default: summary)", "summary|json|csv");
    opts.optopt("s", "sort", "sort clippings of each book", "location|time");
    opts.optopt("t", "type", "only this clip type", "highlight|note|bookmark");
    opts.optflag("r", "reverse", "reverse the sort order");
    opts.optflag("b", "best-effort", "skip records that cannot be parsed");
    opts.optflag("", "strict-identity", "group books by title and attribution");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => bail!(f),
    };

    if matches.opt_present("h") {
        let brief = format!("Usage: {} [options] <My Clippings.txt>", program);
        print!("{}", opts.usage(&brief));
        return Ok(None);
    }

    let clippings_path = matches
        .free
        .first()
        .context("path to clippings file is required")?
        .into();

    let format = match matches.opt_str("f").as_deref() {
        None | Some("summary") => OutputFormat::Summary,
        Some("json") => OutputFormat::Json,
        Some("csv") => OutputFormat::Csv,
        Some(f) => bail!("Unknown format: {}", f),
    };

    let sort = match matches.opt_str("s").as_deref() {
        None => None,
        Some("location") => Some(SortKey::Location),
        Some("time") => Some(SortKey::Time),
        Some(s) => bail!("Unknown sort key: {}", s),
    };

    let clip_type = match matches.opt_str("t") {
        Some(t) => Some(t.parse::<ClipType>()?),
        None => None,
    };

    let identity = if matches.opt_present("strict-identity") {
        BookIdentity::TitleAndAttribution
    } else {
        BookIdentity::Title
    };

    Ok(Some(Args {
        clippings_path,
        format,
        sort,
        clip_type,
        reverse: matches.opt_present("r"),
        best_effort: matches.opt_present("b"),
        identity,
    }))
}

fn select_clips<'a>(book: &'a Book, args: &Args) -> Vec<&'a Clip> {
    match args.sort {
        Some(SortKey::Location) => book.by_location(args.reverse, args.clip_type),
        Some(SortKey::Time) => book.by_time(args.reverse, args.clip_type),
        None => book.clips_of_type(args.clip_type),
    }
}

// HashMap の順序は不定なのでタイトル順に並べる
fn sorted_books(books: &Books) -> Vec<&Book> {
    let mut books: Vec<_> = books.values().collect();
    books.sort_by(|a, b| a.title.cmp(&b.title));
    books
}

fn print_summary(out: &mut impl Write, books: &Books, args: &Args) -> Result<()> {
    let total: usize = books.values().map(|b| b.clippings.len()).sum();
    writeln!(out, "{} books with {} clippings total", books.len(), total)?;

    for book in sorted_books(books) {
        writeln!(out, "{}", book)?;
        for clip in select_clips(book, args) {
            writeln!(out, "  {}", clip)?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonBook<'a> {
    title: &'a str,
    attribution: Option<&'a str>,
    clippings: Vec<&'a Clip>,
}

fn print_json(out: &mut impl Write, books: &Books, args: &Args) -> Result<()> {
    let books: Vec<_> = sorted_books(books)
        .into_iter()
        .map(|book| JsonBook {
            title: &book.title,
            attribution: book.attribution.as_deref(),
            clippings: select_clips(book, args),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &books)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    attribution: Option<&'a str>,
    clip_type: ClipType,
    location: &'a str,
    datetime: String,
    notes: &'a str,
}

fn print_csv(out: &mut impl Write, books: &Books, args: &Args) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    for book in sorted_books(books) {
        for clip in select_clips(book, args) {
            writer.serialize(CsvRow {
                title: &book.title,
                attribution: book.attribution.as_deref(),
                clip_type: clip.clip_type,
                location: &clip.location,
                datetime: clip.datetime.format(DATE_FORMAT).to_string(),
                notes: &clip.notes,
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let Some(args) = get_args()? else {
        return Ok(());
    };

    let file = File::open(&args.clippings_path)
        .with_context(|| format!("File not found: {}", args.clippings_path.display()))?;
    let reader = BufReader::new(file);

    let options = ParseOptions {
        identity: args.identity,
        ..Default::default()
    };

    let books = if args.best_effort {
        let ParseReport { books, failures } = parse_reader_best_effort(reader, &options)
            .with_context(|| format!("Failed to read {}", args.clippings_path.display()))?;
        for failure in &failures {
            eprintln!(
                "Skipped record {} at line {}: {}",
                failure.index, failure.line, failure.error
            );
        }
        books
    } else {
        parse_reader(reader, &options)
            .with_context(|| format!("Failed to parse {}", args.clippings_path.display()))?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Summary => print_summary(&mut out, &books, &args)?,
        OutputFormat::Json => print_json(&mut out, &books, &args)?,
        OutputFormat::Csv => print_csv(&mut out, &books, &args)?,
    }

    Ok(())
}
