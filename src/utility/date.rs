use chrono::{NaiveDateTime, Timelike};

// 先に書いた書式から順に試す。全て失敗したら最後のエラーを返す
pub fn parse_date_time(
    text: &str,
    formats: &[&str],
) -> Result<NaiveDateTime, Option<chrono::ParseError>> {
    let mut last_error = None;
    for format in formats {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(date_time) => return Ok(date_time),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error)
}

// 分単位に丸める (秒以下を捨てる)
pub fn truncate_to_minute(date_time: NaiveDateTime) -> NaiveDateTime {
    date_time
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(date_time)
}
