use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clippings::error::ClipParseError;

pub const DATE_FORMAT: &str = "%F %R";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClipType {
    Highlight,
    Note,
    Bookmark,
}

impl ClipType {
    // 判定順は固定 (Bookmark, Note, Highlight)
    pub const ALL: [ClipType; 3] = [ClipType::Bookmark, ClipType::Note, ClipType::Highlight];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClipType::Highlight => "Highlight",
            ClipType::Note => "Note",
            ClipType::Bookmark => "Bookmark",
        }
    }

    pub fn of(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ClipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipType {
    type Err = ClipParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s).ok_or_else(|| ClipParseError::UnrecognizedClipType { line: s.to_owned() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clip {
    pub clip_type: ClipType,
    pub location: String,
    pub datetime: NaiveDateTime,
    pub notes: String,
}

impl Clip {
    pub fn new(clip_type: ClipType, location: String, datetime: NaiveDateTime, notes: &str) -> Self {
        Clip {
            clip_type,
            location,
            datetime,
            notes: notes.trim().to_owned(),
        }
    }

    // `"<location>, <YYYY-MM-DD HH:MM>\n<notes>\n"`
    pub fn render(&self) -> String {
        format!(
            "{}, {}\n{}\n",
            self.location,
            self.datetime.format(DATE_FORMAT),
            self.notes
        )
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.notes.chars().take(10).collect();
        write!(
            f,
            "<{} at {}, {}, \"{}...\">",
            self.clip_type,
            self.datetime.format(DATE_FORMAT),
            self.location,
            head
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub title: String,
    pub attribution: Option<String>,
    pub clippings: Vec<Clip>,
}

impl Book {
    pub fn new(title: String, attribution: Option<String>) -> Self {
        Book {
            title,
            attribution,
            clippings: Vec::new(),
        }
    }

    // `clip_type` が `None` なら全件。挿入順を保った `Vec` を返す (遅延評価はしない)
    pub fn clips_of_type(&self, clip_type: Option<ClipType>) -> Vec<&Clip> {
        self.clippings
            .iter()
            .filter(|clip| clip_type.map_or(true, |t| clip.clip_type == t))
            .collect()
    }

    // location は文字列として比較する。1 冊の中では "Loc." か "Page" のどちらかに揃っている
    pub fn by_location(&self, reverse: bool, clip_type: Option<ClipType>) -> Vec<&Clip> {
        let mut clips = self.clips_of_type(clip_type);
        // 安定ソート。reverse でも同値の順序は保つ
        if reverse {
            clips.sort_by(|a, b| b.location.cmp(&a.location));
        } else {
            clips.sort_by(|a, b| a.location.cmp(&b.location));
        }
        clips
    }

    pub fn by_time(&self, reverse: bool, clip_type: Option<ClipType>) -> Vec<&Clip> {
        let mut clips = self.clips_of_type(clip_type);
        if reverse {
            clips.sort_by(|a, b| b.datetime.cmp(&a.datetime));
        } else {
            clips.sort_by(|a, b| a.datetime.cmp(&b.datetime));
        }
        clips
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Book \"{}\" by \"{}\">",
            self.title,
            self.attribution.as_deref().unwrap_or("Unknown")
        )
    }
}
