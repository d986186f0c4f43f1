use std::io;

use scan_framework::{Source, SourceError};

/// Char source over an owned string buffer.
#[derive(Debug)]
pub struct StrSource {
    text: String,
    pos: usize,
}

impl StrSource {
    /// Wraps the input text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
        }
    }
}

impl Source for StrSource {
    type Elem = char;

    fn pull(&mut self) -> Result<Option<char>, SourceError> {
        let ch = self.text[self.pos..].chars().next();
        if let Some(c) = ch {
            self.pos += c.len_utf8();
        }
        Ok(ch)
    }
}

/// Char source over an arbitrary byte reader, decoding UTF-8 incrementally.
///
/// Invalid bytes are skipped, not surfaced: the lexing stage promises that
/// invalid input never reaches transition functions. Each skip logs a
/// warning. Read failures are reported as [`SourceError`] and downgraded to
/// exhaustion by the engine.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    eof: bool,
}

const READ_CHUNK: usize = 4096;

impl<R: io::Read> ReaderSource<R> {
    /// Wraps the reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    fn refill(&mut self) -> Result<(), SourceError> {
        self.buf.drain(..self.pos);
        self.pos = 0;
        let mut chunk = [0u8; READ_CHUNK];
        let n = self.reader.read(&mut chunk)?;
        if n == 0 {
            self.eof = true;
        } else {
            self.buf.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }
}

impl<R: io::Read> Source for ReaderSource<R> {
    type Elem = char;

    fn pull(&mut self) -> Result<Option<char>, SourceError> {
        loop {
            if self.pos >= self.buf.len() {
                if self.eof {
                    return Ok(None);
                }
                self.refill()?;
                continue;
            }
            let lead = self.buf[self.pos];
            let width = utf8_width(lead);
            if width == 0 {
                tracing::warn!(byte = lead, "skipping invalid utf-8 byte");
                self.pos += 1;
                continue;
            }
            if self.pos + width > self.buf.len() {
                if self.eof {
                    tracing::warn!("skipping truncated utf-8 sequence at end of input");
                    self.pos = self.buf.len();
                    return Ok(None);
                }
                self.refill()?;
                continue;
            }
            match std::str::from_utf8(&self.buf[self.pos..self.pos + width]) {
                Ok(s) => {
                    self.pos += width;
                    if let Some(ch) = s.chars().next() {
                        return Ok(Some(ch));
                    }
                }
                Err(_) => {
                    tracing::warn!(byte = lead, "skipping invalid utf-8 sequence");
                    self.pos += 1;
                }
            }
        }
    }
}

/// Expected sequence length for a UTF-8 leading byte; 0 if the byte cannot
/// start a sequence.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    }
}
