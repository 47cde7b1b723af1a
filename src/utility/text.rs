use std::{
    borrow::Cow,
    io::{self, BufRead},
};

pub const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

#[derive(Debug, PartialEq, Eq)]
pub enum Preamble {
    Present,
    // BOM の途中まで一致して読んでしまったバイト列。本文の先頭として扱う
    Missing(Vec<u8>),
}

// BOM と一致する間だけ 1 バイトずつ消費する
// 一度に返るバイト数が少ない reader でも判定できる
pub fn skip_bom<R: BufRead>(reader: &mut R) -> io::Result<Preamble> {
    let mut matched = Vec::new();
    for &expected in &UTF8_BOM {
        let next = reader.fill_buf()?.first().copied();
        match next {
            Some(b) if b == expected => {
                reader.consume(1);
                matched.push(b);
            }
            _ => return Ok(Preamble::Missing(matched)),
        }
    }
    Ok(Preamble::Present)
}

// 不正な UTF-8 は None
pub fn decode_utf8(bytes: &[u8]) -> Option<Cow<'_, str>> {
    encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
}
