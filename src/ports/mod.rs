use crate::domain::ast::SyntaxTree;
use crate::domain::error::ParseError;
use std::path::Path;

/// Turns source text into a syntax tree. Fails atomically: no partial trees.
pub trait SourceParser {
    fn parse(&self, src: &str) -> Result<SyntaxTree, ParseError>;

    fn parse_file(&self, path: &Path) -> Result<SyntaxTree, ParseError> {
        let src = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&src)
    }
}

/// Consumes report lines in the order they are produced.
pub trait LineSink<L> {
    fn emit(&mut self, line: L) -> std::io::Result<()>;
}

impl<L> LineSink<L> for Vec<L> {
    fn emit(&mut self, line: L) -> std::io::Result<()> {
        self.push(line);
        Ok(())
    }
}
