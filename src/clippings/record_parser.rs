use crate::clippings::{
    book::{Book, Clip},
    error::{ClipParseError, Result},
    field_parser::Syntax,
};

pub const RECORD_LINES: usize = 4;

// [タイトル行, メタ行, 空行, 本文] から (Book, Clip) を作る
// 失敗したら title, attribution, clip_type, location, datetime の順で最初のエラーを返す
pub fn parse_record<S: AsRef<str>>(lines: &[S], syntax: &Syntax) -> Result<(Book, Clip)> {
    let [title_meta, meta, _blank, notes] = lines else {
        return Err(ClipParseError::StructuralMismatch {
            expected: RECORD_LINES,
            found: lines.len(),
        });
    };
    let (title_meta, meta) = (title_meta.as_ref(), meta.as_ref());

    let title = (syntax.title)(title_meta)?;
    let attribution = (syntax.attribution)(title_meta)?;
    let clip_type = (syntax.clip_type)(meta)?;
    let location = (syntax.location)(meta)?;
    let datetime = (syntax.datetime)(meta)?;

    let book = Book::new(title, attribution);
    let clip = Clip::new(clip_type, location, datetime, notes.as_ref());
    Ok((book, clip))
}
