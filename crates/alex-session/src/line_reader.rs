use std::io::{self, BufRead, Read};

/// `BufRead` over a source that is borrowed for one line at a time.
///
/// The session reads through this instead of a held `StdinLock`, so code
/// evaluated inside a session can start a nested session on the same input.
/// At most the current line is buffered here; everything after it stays in the
/// underlying source.
pub struct LineReader<F> {
    read_line: F,
    line: String,
    pos: usize,
}

impl<F> LineReader<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    pub fn new(read_line: F) -> Self {
        Self {
            read_line,
            line: String::new(),
            pos: 0,
        }
    }
}

/// Standard input, locked per line.
pub fn stdin_lines() -> LineReader<impl FnMut(&mut String) -> io::Result<usize>> {
    LineReader::new(|line: &mut String| io::stdin().read_line(line))
}

impl<F> Read for LineReader<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let count = available.len().min(buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.consume(count);
        Ok(count)
    }
}

impl<F> BufRead for LineReader<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            (self.read_line)(&mut self.line)?;
        }
        Ok(&self.line.as_bytes()[self.pos..])
    }

    fn consume(&mut self, amount: usize) {
        self.pos = (self.pos + amount).min(self.line.len());
    }
}
