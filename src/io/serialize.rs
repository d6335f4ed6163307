use std::fs::File;
use std::io as std_io;
use std::io::Write as _;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::io as mod_io;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    JsonPretty,
}

fn invalid_data(err: serde_json::Error) -> std_io::Error {
    std_io::Error::new(std_io::ErrorKind::InvalidData, err)
}

pub fn serialize<T: Serialize>(data: &T, format: Format) -> std_io::Result<Vec<u8>> {
    match format {
        Format::Json => serde_json::to_vec(data).map_err(invalid_data),
        Format::JsonPretty => serde_json::to_vec_pretty(data).map_err(invalid_data),
    }
}

pub fn deserialize<'a, T: Deserialize<'a>>(bytes: &'a [u8], format: Format) -> std_io::Result<T> {
    match format {
        Format::Json | Format::JsonPretty => serde_json::from_slice(bytes).map_err(invalid_data),
    }
}

pub fn read_from<P: AsRef<Path>, T: DeserializeOwned>(path: P, format: Format) -> std_io::Result<T> {
    let file = File::open(path)?;
    match format {
        Format::Json | Format::JsonPretty => {
            serde_json::from_reader(std_io::BufReader::new(file)).map_err(invalid_data)
        }
    }
}

pub fn write_to<P: AsRef<Path>, T: Serialize>(
    path: P,
    data: &T,
    format: Format,
) -> std_io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(&serialize(data, format)?)?;
    file.flush()
}

/// Writes serialized items separated by newlines; `Format::Json` yields one item per line.
pub struct Serializer<IO, T> {
    _phantom: PhantomData<T>,
    inner: IO,
    format: Format,
}

impl<IO, T> Serializer<IO, T> {
    pub fn new(io: IO, format: Format) -> Self {
        Serializer {
            _phantom: PhantomData,
            inner: io,
            format,
        }
    }

    pub fn inner(&self) -> &IO {
        &self.inner
    }

    pub fn into_inner(self) -> IO {
        self.inner
    }
}

impl<T: Serialize, IO: std_io::Write> mod_io::Write for Serializer<IO, T> {
    type Item = T;

    fn write(&mut self, buf: &[Self::Item]) -> std_io::Result<usize> {
        for item in buf {
            let mut bytes = serialize(item, self.format)?;
            bytes.push(b'\n');
            self.inner.write_all(&bytes)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std_io::Result<()> {
        self.inner.flush()
    }
}
