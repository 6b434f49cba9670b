use std::error;
use std::fs::File;
use std::io;
use std::marker::PhantomData;
use std::path::Path;
use std::usize::MAX as USIZE_MAX;

pub mod prelude;

pub trait Read {
    type Item;

    fn read(&mut self, buf: &mut Vec<Self::Item>) -> io::Result<usize> {
        self.read_upto(USIZE_MAX, buf)
    }

    fn read_upto(&mut self, num: usize, buf: &mut Vec<Self::Item>) -> io::Result<usize>;
}

pub trait FileOpen: Sized {
    fn open<P: AsRef<Path>>(path: P) -> io::Result<Self>;
}

pub trait FromLine: Sized {
    type Err: Into<Box<dyn error::Error + Send + Sync>>;

    fn from_line(line: &str) -> Result<Self, Self::Err>;
}

#[derive(Debug)]
pub struct Reader<R, T> {
    inner: R,
    _phantom: PhantomData<T>,
}

impl<R: io::Read, T> Reader<R, T> {
    pub fn new(inner: R) -> Self {
        Reader {
            inner: inner,
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

impl<T> FileOpen for Reader<io::BufReader<File>, T> {
    fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(io::BufReader::new(File::open(path)?)))
    }
}

#[inline]
pub(crate) fn invalid_data<E>(error: E) -> io::Error
where
    E: Into<Box<dyn error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, error)
}
