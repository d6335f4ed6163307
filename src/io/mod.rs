use std::error;
use std::fs::File;
use std::io;
use std::marker::PhantomData;
use std::path::Path;

use crate::syntax::graph::Passage;

pub mod serialize;

pub trait Read {
    type Item;

    fn read(&mut self, buf: &mut Vec<Self::Item>) -> io::Result<usize> {
        self.read_upto(usize::MAX, buf)
    }

    fn read_upto(&mut self, num: usize, buf: &mut Vec<Self::Item>) -> io::Result<usize>;
}

pub trait Write {
    type Item;

    fn write(&mut self, buf: &[Self::Item]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()>;
}

pub trait FromLine: Sized {
    type Err: Into<Box<dyn error::Error + Send + Sync>>;

    fn from_line(line: &str) -> Result<Self, Self::Err>;
}

/// One JSON document per line.
impl FromLine for Passage {
    type Err = serde_json::Error;

    fn from_line(line: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(line)
    }
}

/// Reads one item per non-blank line.
#[derive(Debug)]
pub struct Reader<R, T> {
    inner: R,
    _phantom: PhantomData<T>,
}

impl<R: io::Read, T> Reader<R, T> {
    pub fn new(inner: R) -> Self {
        Reader {
            inner,
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn inner(&self) -> &R {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

impl<T> Reader<io::BufReader<File>, T> {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(io::BufReader::new(File::open(path)?)))
    }
}

impl<R: io::BufRead, T: FromLine> Read for Reader<R, T> {
    type Item = T;

    fn read_upto(&mut self, num: usize, buf: &mut Vec<Self::Item>) -> io::Result<usize> {
        read_upto(&mut self.inner, num, buf)
    }
}

pub fn read_upto<R: io::BufRead, T: FromLine>(
    reader: &mut R,
    num: usize,
    buf: &mut Vec<T>,
) -> io::Result<usize> {
    let mut count = 0;
    let mut line = String::new();
    while count < num {
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let item = T::from_line(trimmed)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                    buf.push(item);
                    count += 1;
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
        line.clear();
    }
    Ok(count)
}
