//! Access to the bytes of a font file.

use std::fs::File;
use std::path::Path;

use log::debug;
use memmap2::Mmap;

use crate::binary::read::ReadScope;
use crate::error::{LoadError, ParseError};

/// The complete, read-only contents of a font file.
///
/// The bytes are either mapped from disk or owned in memory. They never change after creation
/// and are released when the image is dropped.
pub enum FontImage {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl FontImage {
    /// Map the file at `path` into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<FontImage, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(LoadError::Io)?;
        let len = file.metadata().map_err(LoadError::Io)?.len();
        if len == 0 {
            // Mapping an empty file fails on some platforms
            return Ok(FontImage::Owned(Vec::new()));
        }

        // The map is read-only. Changes made to the file by other processes while it is mapped
        // are outside our control.
        let mmap = unsafe { Mmap::map(&file) }.map_err(LoadError::Map)?;
        debug!("mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(FontImage::Mapped(mmap))
    }

    pub fn from_vec(data: Vec<u8>) -> FontImage {
        FontImage::Owned(data)
    }

    pub fn data(&self) -> &[u8] {
        match self {
            FontImage::Mapped(mmap) => &mmap[..],
            FontImage::Owned(data) => data.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// The `len` bytes starting at `offset`.
    ///
    /// Fails with `ParseError::BadEof` if the range extends past the end of the image.
    pub fn read_at(&self, offset: usize, len: usize) -> Result<&[u8], ParseError> {
        let end = offset.checked_add(len).ok_or(ParseError::BadEof)?;
        self.data().get(offset..end).ok_or(ParseError::BadEof)
    }

    /// A scope covering the whole image, for structured reads.
    pub fn scope(&self) -> ReadScope<'_> {
        ReadScope::new(self.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_at() {
        let image = FontImage::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(image.len(), 4);
        assert_eq!(image.read_at(1, 2), Ok(&[2, 3][..]));
        assert_eq!(image.read_at(4, 0), Ok(&[][..]));
        assert_eq!(image.read_at(3, 2), Err(ParseError::BadEof));
        assert_eq!(image.read_at(usize::MAX, 2), Err(ParseError::BadEof));
    }

    #[test]
    fn test_open_missing_file() {
        let path = std::env::temp_dir().join("glyphscope-does-not-exist.ttf");
        assert!(matches!(FontImage::open(&path), Err(LoadError::Io(_))));
    }

    #[test]
    fn test_open_mapped() {
        let path = std::env::temp_dir().join(format!("glyphscope-{}.bin", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0, 1, 0, 0]).unwrap();
        drop(file);

        let image = FontImage::open(&path).unwrap();
        assert_eq!(image.data(), &[0, 1, 0, 0]);
        assert_eq!(image.scope().ctxt().read_u32be().unwrap(), 0x00010000);
        drop(image);
        std::fs::remove_file(&path).unwrap();
    }
}
