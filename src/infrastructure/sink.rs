use crate::ports::LineSink;
use std::fmt::Display;
use std::io::{self, Write};

/// Writes each line to `W` as soon as it is emitted, newline-terminated.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write, L: Display> LineSink<L> for WriterSink<W> {
    fn emit(&mut self, line: L) -> io::Result<()> {
        writeln!(self.writer, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_newline_terminated() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit("type int (field decl)").unwrap();
        sink.emit("package p (package decl)").unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "type int (field decl)\npackage p (package decl)\n");
    }
}
