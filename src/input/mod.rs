mod reader;

pub use reader::{InputReader, SourceFile};
