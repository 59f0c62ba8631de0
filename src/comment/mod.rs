mod parser;

pub use parser::{ParsedComment, build_translated_line, parse_comment_line};
