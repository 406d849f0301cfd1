//! Text file access with transparent bzip2/gzip handling.
//!
//! Compression is picked from the path as given: any occurrence of `bz2`
//! selects bzip2, otherwise any occurrence of `gz` selects gzip. The match is
//! a plain substring test over every component, not an extension check, so
//! `gzX.txt`, `bz2_data.txt` and `gzdir/list.txt` are all treated as
//! compressed. Existing data sets rely on this.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::error::CoreResult;

/// Stream format inferred from a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Bzip2,
    Gzip,
    Plain,
}

impl Compression {
    /// Infers the format from a substring anywhere in the path as given,
    /// directory components included. "bz2" is checked before "gz".
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy();
        if name.contains("bz2") {
            Compression::Bzip2
        } else if name.contains("gz") {
            Compression::Gzip
        } else {
            Compression::Plain
        }
    }
}

/// How [`open_writer`] treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate and start over.
    #[default]
    Write,
    /// Keep existing content. Compressed files get a new stream appended,
    /// which the multi-stream readers decode as one continuous text.
    Append,
}

/// Opens `path` for buffered reading, decompressing according to its name.
pub fn open_reader(path: impl AsRef<Path>) -> CoreResult<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    log::trace!("Opening {} for reading", path.display());

    let reader: Box<dyn Read> = match Compression::from_path(path) {
        Compression::Bzip2 => Box::new(MultiBzDecoder::new(file)),
        Compression::Gzip => Box::new(MultiGzDecoder::new(file)),
        Compression::Plain => Box::new(file),
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Reads the whole (possibly compressed) file as UTF-8 text.
pub fn read_to_string(path: impl AsRef<Path>) -> CoreResult<String> {
    let mut text = String::new();
    open_reader(path)?.read_to_string(&mut text)?;
    Ok(text)
}

enum Sink {
    Bzip2(BzEncoder<BufWriter<File>>),
    Gzip(GzEncoder<BufWriter<File>>),
    Plain(BufWriter<File>),
}

/// Writable text handle returned by [`open_writer`].
///
/// Call [`TextWriter::finish`] when done: it writes the compression trailer
/// and flushes, reporting any error. Dropping without finishing still
/// finalizes on a best-effort basis but swallows errors.
pub struct TextWriter {
    sink: Sink,
}

impl TextWriter {
    pub fn finish(self) -> CoreResult<()> {
        let mut inner = match self.sink {
            Sink::Bzip2(encoder) => encoder.finish()?,
            Sink::Gzip(encoder) => encoder.finish()?,
            Sink::Plain(writer) => writer,
        };
        inner.flush()?;
        Ok(())
    }
}

impl Write for TextWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Bzip2(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
            Sink::Plain(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Bzip2(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
            Sink::Plain(w) => w.flush(),
        }
    }
}

/// Opens `path` for writing, compressing according to its name.
pub fn open_writer(path: impl AsRef<Path>, mode: WriteMode) -> CoreResult<TextWriter> {
    let path = path.as_ref();
    let file = match mode {
        WriteMode::Write => File::create(path)?,
        WriteMode::Append => OpenOptions::new().append(true).create(true).open(path)?,
    };
    log::trace!("Opening {} for writing ({mode:?})", path.display());

    let buffered = BufWriter::new(file);
    let sink = match Compression::from_path(path) {
        Compression::Bzip2 => Sink::Bzip2(BzEncoder::new(buffered, bzip2::Compression::best())),
        Compression::Gzip => Sink::Gzip(GzEncoder::new(buffered, flate2::Compression::new(9))),
        Compression::Plain => Sink::Plain(buffered),
    };
    Ok(TextWriter { sink })
}

/// Writes `text` to `path` in one go, compressing according to its name.
pub fn write_string(path: impl AsRef<Path>, text: &str) -> CoreResult<()> {
    let mut writer = open_writer(path, WriteMode::Write)?;
    writer.write_all(text.as_bytes())?;
    writer.finish()
}
