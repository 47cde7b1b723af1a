use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader, Cursor},
    path::Path,
};

use crate::{
    clippings::{
        book::{Book, Clip},
        error::{ClipParseError, Result},
        field_parser::Syntax,
        record_parser::parse_record,
    },
    utility::text::{decode_utf8, skip_bom, Preamble},
};

const DIVIDER: &str = "==========";

pub type Books = HashMap<String, Book>;

// 同じ本とみなす基準
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookIdentity {
    // タイトルだけで纏める。著者が違っても 1 冊になり、最初に出た著者が残る
    #[default]
    Title,
    // タイトルと著者の組で纏める
    TitleAndAttribution,
}

// 行で分割しているのでタイトルに改行は入らない
const KEY_SEPARATOR: char = '\n';

impl BookIdentity {
    fn key(&self, book: &Book) -> String {
        match (self, &book.attribution) {
            (BookIdentity::TitleAndAttribution, Some(attribution)) => {
                format!("{}{}{}", book.title, KEY_SEPARATOR, attribution)
            }
            _ => book.title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub syntax: Syntax,
    pub identity: BookIdentity,
}

#[derive(Debug)]
pub struct RecordFailure {
    pub index: usize,
    pub line: usize,
    pub error: ClipParseError,
}

#[derive(Debug, Default)]
pub struct ParseReport {
    pub books: Books,
    pub failures: Vec<RecordFailure>,
}

// 区切り行で閉じられた 1 レコード分の行
#[derive(Debug)]
pub(crate) struct RawRecord {
    pub index: usize,
    // 先頭行の行番号 (1 始まり)
    pub line: usize,
    pub lines: Vec<String>,
}

// 入力を区切り行ごとに RawRecord へ分割する
pub(crate) struct RecordSplitter<R> {
    reader: R,
    buffer: Vec<u8>,
    // BOM 判定で読んでしまった先頭のバイト列
    carry: Vec<u8>,
    record: Vec<String>,
    record_start: usize,
    line_number: usize,
    next_index: usize,
    finished: bool,
}

impl<R: BufRead> RecordSplitter<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let carry = match skip_bom(&mut reader)? {
            Preamble::Present => Vec::new(),
            Preamble::Missing(carry) => {
                tracing::warn!("Expected preamble missing");
                carry
            }
        };

        Ok(RecordSplitter {
            reader,
            buffer: Vec::new(),
            carry,
            record: Vec::new(),
            record_start: 1,
            line_number: 0,
            next_index: 0,
            finished: false,
        })
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>> {
        loop {
            self.buffer.clear();
            self.buffer.append(&mut self.carry);
            if self.reader.read_until(b'\n', &mut self.buffer)? == 0 && self.buffer.is_empty() {
                if !self.record.is_empty() {
                    tracing::debug!(
                        "Discarding {} trailing lines without divider",
                        self.record.len()
                    );
                    self.record.clear();
                }
                return Ok(None);
            }
            self.line_number += 1;

            let line = decode_utf8(&self.buffer).ok_or(ClipParseError::InvalidEncoding {
                line: self.line_number,
            })?;
            let line = line.trim();

            if line == DIVIDER {
                let record = RawRecord {
                    index: self.next_index,
                    line: self.record_start,
                    lines: std::mem::take(&mut self.record),
                };
                self.next_index += 1;
                self.record_start = self.line_number + 1;
                return Ok(Some(record));
            }

            self.record.push(line.to_owned());
        }
    }
}

impl<R: BufRead> Iterator for RecordSplitter<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let next = self.next_record().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.finished = true;
        }
        next
    }
}

fn merge(books: &mut Books, identity: BookIdentity, book: Book, clip: Clip) {
    books
        .entry(identity.key(&book))
        .or_insert(book)
        .clippings
        .push(clip);
}

pub fn parse<P: AsRef<Path>>(path: P) -> Result<Books> {
    parse_with_options(path, &ParseOptions::default())
}

pub fn parse_with_options<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Books> {
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), options)
}

pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Books> {
    parse_reader(Cursor::new(text.as_bytes()), options)
}

// 1 レコードでも失敗したら全体を失敗とする
pub fn parse_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Books> {
    let mut books = Books::new();

    for record in RecordSplitter::new(reader)? {
        let record = record?;
        let (book, clip) = parse_record(&record.lines, &options.syntax)
            .map_err(|e| e.at_record(record.index, record.line))?;
        merge(&mut books, options.identity, book, clip);
    }

    Ok(books)
}

// 解析できないレコードは飛ばして続ける
//
// I/O エラーと不正な UTF-8 はこちらでも全体の失敗になる
pub fn parse_reader_best_effort<R: BufRead>(
    reader: R,
    options: &ParseOptions,
) -> Result<ParseReport> {
    let mut report = ParseReport::default();

    for record in RecordSplitter::new(reader)? {
        let record = record?;
        match parse_record(&record.lines, &options.syntax) {
            Ok((book, clip)) => merge(&mut report.books, options.identity, book, clip),
            Err(error) => {
                tracing::debug!(
                    "Skipping record {} at line {}: {}",
                    record.index,
                    record.line,
                    error
                );
                report.failures.push(RecordFailure {
                    index: record.index,
                    line: record.line,
                    error,
                });
            }
        }
    }

    Ok(report)
}
