//! Reader and writer entry points over paths, streams and stdio.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::dataset::Dataset;
use crate::encoding::decode_text;
use crate::error::Result;
use crate::formats::{arff, csv, libsvm};
use crate::options::{Format, ReadOptions, WriteOptions};

/// Where a dataset is read from.
pub enum Source<'a> {
    /// A file, opened and closed by the read call.
    Path(PathBuf),
    /// An already-open stream, read to the end.
    Reader(Box<dyn Read + 'a>),
    /// Standard input. Never closed.
    Stdin,
}

impl Source<'_> {
    pub fn path(path: impl AsRef<Path>) -> Self {
        Source::Path(path.as_ref().to_path_buf())
    }

    /// `-` means standard input, anything else a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::path(arg)
        }
    }

    fn read_all(self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        match self {
            Source::Path(path) => {
                File::open(&path)?.read_to_end(&mut data)?;
            }
            Source::Reader(mut reader) => {
                reader.read_to_end(&mut data)?;
            }
            Source::Stdin => {
                io::stdin().lock().read_to_end(&mut data)?;
            }
        }
        Ok(data)
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Reader(_) => f.write_str("Reader"),
            Source::Stdin => f.write_str("Stdin"),
        }
    }
}

/// Where a dataset is written to.
pub enum Destination<'a> {
    /// A file, created or truncated.
    Path(PathBuf),
    /// An already-open stream.
    Writer(Box<dyn Write + 'a>),
    /// Standard output. Never closed.
    Stdout,
}

impl Destination<'_> {
    pub fn path(path: impl AsRef<Path>) -> Self {
        Destination::Path(path.as_ref().to_path_buf())
    }

    /// `-` means standard output, anything else a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Destination::Stdout
        } else {
            Destination::path(arg)
        }
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Destination::Writer(_) => f.write_str("Writer"),
            Destination::Stdout => f.write_str("Stdout"),
        }
    }
}

/// Read a whole dataset.
///
/// The input is read completely, decoded to UTF-8, then parsed. Any error
/// aborts the read; no partial dataset is returned.
///
/// ```no_run
/// use featio::{read, Format, ReadOptions, Source};
///
/// let dataset = read(Source::path("iris.arff"), Format::Weka, &ReadOptions::default()).unwrap();
/// println!("{} samples", dataset.num_samples());
/// ```
pub fn read(source: Source<'_>, format: Format, options: &ReadOptions) -> Result<Dataset> {
    let data = source.read_all()?;
    debug!(
        "read {} bytes, {} lines of {format}",
        data.len(),
        bytecount::count(&data, b'\n')
    );
    let text = decode_text(&data);
    parse_text(&text, format, options)
}

/// Parse already-decoded text in `format`.
pub fn parse_text(text: &str, format: Format, options: &ReadOptions) -> Result<Dataset> {
    match format {
        Format::LibSvm => libsvm::read_libsvm(text),
        Format::Csv => csv::read_csv(text, &options.csv),
        Format::Weka => arff::read_arff(text, &options.arff),
    }
}

/// Write a dataset.
pub fn write(
    dataset: &Dataset,
    destination: Destination<'_>,
    format: Format,
    options: &WriteOptions,
) -> Result<()> {
    match destination {
        Destination::Path(path) => write_to(dataset, File::create(path)?, format, options),
        Destination::Writer(writer) => write_to(dataset, writer, format, options),
        Destination::Stdout => write_to(dataset, io::stdout().lock(), format, options),
    }
}

/// Write a dataset into any stream.
pub fn write_to<W: Write>(
    dataset: &Dataset,
    writer: W,
    format: Format,
    options: &WriteOptions,
) -> Result<()> {
    match format {
        Format::LibSvm => libsvm::write_libsvm(dataset, writer),
        Format::Csv => csv::write_csv(dataset, writer, &options.csv),
        Format::Weka => arff::write_arff(dataset, writer, options.arff_mode, &options.arff),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_source_from_arg() {
        assert!(matches!(Source::from_arg("-"), Source::Stdin));
        assert!(matches!(Source::from_arg("a.csv"), Source::Path(_)));
        assert!(matches!(Destination::from_arg("-"), Destination::Stdout));
    }

    #[test]
    fn test_read_from_reader() {
        let source = Source::Reader(Box::new(Cursor::new(b"1 1:2\n2 2:3\n".to_vec())));
        let ds = read(source, Format::LibSvm, &ReadOptions::default()).unwrap();
        assert_eq!(ds.num_samples(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read(
            Source::path("/nonexistent/featio/data.csv"),
            Format::Csv,
            &ReadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, crate::DatasetError::Io(_)));
    }

    #[test]
    fn test_write_to_boxed_writer() {
        let ds = parse_text("a 1:1\n", Format::LibSvm, &ReadOptions::default()).unwrap();
        let mut buf = Vec::new();
        write(
            &ds,
            Destination::Writer(Box::new(&mut buf)),
            Format::LibSvm,
            &WriteOptions::default(),
        )
        .unwrap();
        assert_eq!(buf, b"1 1:1.0\n");
    }
}
