use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    clippings::{
        book::ClipType,
        error::{ClipParseError, Result},
    },
    utility::date::{parse_date_time, truncate_to_minute},
};

const DATE_FORMAT: &str = "%A, %B %d, %Y, %I:%M %p";
// 秒付きの版は年の後のカンマが無い
const DATE_FORMAT_WITH_SECOND: &str = "%A, %B %d, %Y %I:%M:%S %p";

const ADDED_ON: &str = "Added on ";

// レコードの各フィールドを取り出す関数の組
//
// 書き出し形式の方言に合わせて差し替えられる
#[derive(Debug, Clone, Copy)]
pub struct Syntax {
    pub title: fn(&str) -> Result<String>,
    pub attribution: fn(&str) -> Result<Option<String>>,
    pub clip_type: fn(&str) -> Result<ClipType>,
    pub location: fn(&str) -> Result<String>,
    pub datetime: fn(&str) -> Result<NaiveDateTime>,
}

impl Default for Syntax {
    fn default() -> Self {
        Syntax {
            title: parse_title,
            attribution: parse_attribution,
            clip_type: parse_clip_type,
            location: parse_location,
            datetime: parse_datetime,
        }
    }
}

// "<Title> (<Attribution>)" の " (" と ")" の位置
fn attribution_span(title_meta: &str) -> Option<(usize, usize)> {
    if !title_meta.ends_with(')') {
        return None;
    }
    let open = title_meta.rfind(" (")?;
    let close = title_meta.rfind(')')?;
    Some((open, close))
}

// 末尾の括弧書きは著者とみなすので、タイトル自体が括弧で終わる場合は誤って切れる
pub fn parse_title(title_meta: &str) -> Result<String> {
    let title_meta = title_meta.trim();
    let title = match attribution_span(title_meta) {
        Some((open, _)) => &title_meta[..open],
        None => title_meta,
    };
    Ok(title.to_owned())
}

pub fn parse_attribution(title_meta: &str) -> Result<Option<String>> {
    let title_meta = title_meta.trim();
    Ok(attribution_span(title_meta).map(|(open, close)| title_meta[open + 2..close].to_owned()))
}

pub fn parse_clip_type(meta: &str) -> Result<ClipType> {
    let unrecognized = || ClipParseError::UnrecognizedClipType {
        line: meta.to_owned(),
    };

    let body = meta.strip_prefix("- ").ok_or_else(unrecognized)?;
    let type_str = match body.find('|') {
        Some(end) => &body[..end],
        None => body,
    };

    ClipType::ALL
        .into_iter()
        .find(|t| type_str.starts_with(t.as_str()))
        .ok_or_else(unrecognized)
}

pub fn parse_location(meta: &str) -> Result<String> {
    static REGEX_LOCATION: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^- \w+ (Loc\.|on Page) (\d+(?:-\d+)?)\s+\|").unwrap());

    let Some(captures) = REGEX_LOCATION.captures(meta) else {
        tracing::warn!("Malformed location: {}", meta);
        return Err(ClipParseError::MalformedLocation {
            line: meta.to_owned(),
        });
    };

    let unit = match &captures[1] {
        "on Page" => "Page",
        unit => unit,
    };
    Ok(format!("{} {}", unit, &captures[2]))
}

// 秒は常に 0 に揃える
pub fn parse_datetime(meta: &str) -> Result<NaiveDateTime> {
    let Some(start) = meta.find(ADDED_ON) else {
        return Err(ClipParseError::MalformedDate {
            text: meta.to_owned(),
            source: None,
        });
    };
    let text = meta[start + ADDED_ON.len()..].trim();

    parse_date_time(text, &[DATE_FORMAT, DATE_FORMAT_WITH_SECOND])
        .map(truncate_to_minute)
        .map_err(|source| ClipParseError::MalformedDate {
            text: text.to_owned(),
            source,
        })
}
