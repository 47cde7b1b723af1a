pub mod clippings;
pub mod utility;

pub use clippings::{
    book::{Book, Clip, ClipType},
    error::{ClipParseError, Result},
    field_parser::Syntax,
    parser::{
        parse, parse_reader, parse_reader_best_effort, parse_str, parse_with_options, BookIdentity,
        Books, ParseOptions, ParseReport, RecordFailure,
    },
};
