use sha3::{Digest, Sha3_256};
use std::io::{self, Read, Write};

/// Size of the plaintext digest stored in the frame trailer
pub const DIGEST_SIZE: usize = 32;

/// Reader that hashes every byte it hands out
pub struct DigestReader<R> {
    inner: R,
    hasher: Sha3_256,
}

impl<R: Read> DigestReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha3_256::new(),
        }
    }

    /// Consume the reader and return the digest of everything read
    pub fn finalize(self) -> [u8; DIGEST_SIZE] {
        self.hasher.finalize().into()
    }
}

impl<R: Read> Read for DigestReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Writer that hashes every byte accepted by the inner writer
pub struct DigestWriter<W> {
    inner: W,
    hasher: Sha3_256,
}

impl<W: Write> DigestWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha3_256::new(),
        }
    }

    pub fn finalize(self) -> [u8; DIGEST_SIZE] {
        self.hasher.finalize().into()
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Digest of an in-memory buffer
pub fn digest_bytes(data: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha3_256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_matches_direct_digest() {
        let data: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        let mut reader = DigestReader::new(&data[..]);
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).unwrap();
        assert_eq!(sink, data);
        assert_eq!(reader.finalize(), digest_bytes(&data));
    }

    #[test]
    fn test_writer_matches_direct_digest() {
        let data = b"columnar transposition";
        let mut out = Vec::new();
        let mut writer = DigestWriter::new(&mut out);
        writer.write_all(&data[..5]).unwrap();
        writer.write_all(&data[5..]).unwrap();
        let digest = writer.finalize();
        assert_eq!(out, data);
        assert_eq!(digest, digest_bytes(data));
    }

    #[test]
    fn test_empty_digest() {
        let reader = DigestReader::new(&b""[..]);
        assert_eq!(reader.finalize(), digest_bytes(b""));
    }
}
