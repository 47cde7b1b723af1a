// "My Clippings.txt" の解析
//
// 1 レコードは 4 行 + 区切り行:
//
//   <Title> (<Attribution>)
//   - <Type> <Loc.|on Page> <n>[-<m>]  | Added on <Weekday, Month DD, YYYY, HH:MM[:SS] AM|PM>
//
//   <notes>
//   ==========
//
// - 先頭に BOM (EF BB BF) が付くことがあるが無い場合もある
// - 改行は CR+LF だが LF のみでも読める
// - 最後の区切り行が無いレコードは捨てる

pub mod book;
pub mod error;
pub mod field_parser;
pub mod parser;
pub mod record_parser;
