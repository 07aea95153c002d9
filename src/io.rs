use super::types::Record;
use std::io::{BufRead, Write};
use tracing::warn;

/// A raw input line with its 1-based position in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct InputLine {
    pub number: usize,
    pub text: String,
}

/// Splits a byte stream into numbered lines. Only the `\n` is dropped, so a CRLF line keeps
/// its `\r` and diagnostics echo it as read; both layouts treat it as whitespace. A read
/// failure is treated as end of input.
pub struct LineReader<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    number: usize,
    done: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            number: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = InputLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                return None;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(after_line = self.number, %err, "failed reading input, stopping");
                self.done = true;
                return None;
            }
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }

        // Bad UTF-8 shouldn't end the stream; such lines just fail to parse later on
        self.number += 1;
        Some(InputLine {
            number: self.number,
            text: String::from_utf8_lossy(&self.buf).into_owned(),
        })
    }
}

/// The shape of a primary output line, serialised by the csv crate with a space delimiter
/// and no quoting.
#[derive(serde::Serialize)]
struct OutputRow<'a> {
    year: u16,
    office: &'a str,
    price: &'a str,
    name: &'a str,
}

pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(output: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .delimiter(b' ')
                .quote_style(csv::QuoteStyle::Never)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(output),
        }
    }

    pub fn write(&mut self, record: &Record) -> Result<(), csv::Error> {
        self.writer.serialize(OutputRow {
            year: record.year.0,
            office: &record.office,
            price: record.price.as_str(),
            name: &record.name,
        })
    }

    pub fn flush(&mut self) -> Result<(), csv::Error> {
        self.writer.flush().map_err(csv::Error::from)
    }
}

/// Writes one `Error in line N:<text>` row per rejected line.
pub struct DiagnosticWriter<W: Write> {
    output: W,
}

impl<W: Write> DiagnosticWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn report(&mut self, line: &InputLine) -> std::io::Result<()> {
        writeln!(self.output, "Error in line {}:{}", line.number, line.text)?;
        self.output.flush()
    }
}
