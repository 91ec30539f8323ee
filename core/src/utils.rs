use std::io::{self, Read};

/// Fill `buf` from `r`, looping over short reads. Stops early only at EOF.
///
/// Returns the number of bytes read; `< buf.len()` means the source is
/// exhausted, never that it merely under-delivered on one call.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut off = 0;

    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(off)
}

/// Append up to `len` bytes from `r` to `out`, looping over short reads.
///
/// The vector grows as bytes arrive, so a huge `len` taken from the wire does
/// not allocate up front.
pub fn append_exact_or_eof<R: Read + ?Sized>(r: &mut R, out: &mut Vec<u8>, len: usize) -> io::Result<usize> {
    r.take(len as u64).read_to_end(out)
}

/// Reader that can give bytes back.
///
/// Unread bytes are served again, in order, before anything else is pulled
/// from the inner reader.
#[derive(Debug)]
pub struct PushbackReader<R> {
    inner: R,
    pending: Vec<u8>,
    pos: usize,
}

impl<R> PushbackReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pending: Vec::new(), pos: 0 }
    }

    /// Put `bytes` in front of whatever is still pending.
    pub fn unread(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let mut pending = Vec::with_capacity(bytes.len() + self.pending.len() - self.pos);
        pending.extend_from_slice(bytes);
        pending.extend_from_slice(&self.pending[self.pos..]);
        self.pending = pending;
        self.pos = 0;
    }

    /// Bytes given back and not yet read again.
    pub fn pending(&self) -> usize {
        self.pending.len() - self.pos
    }
}

impl<R: Read> Read for PushbackReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos < self.pending.len() {
            let n = (self.pending.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
            self.pos += n;
            if self.pos == self.pending.len() {
                self.pending.clear();
                self.pos = 0;
            }
            return Ok(n);
        }
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn short_reads_are_not_eof() {
        let mut r = Trickle { data: b"0123456789", step: 3 };
        let mut buf = [0u8; 8];
        assert_eq!(read_exact_or_eof(&mut r, &mut buf).unwrap(), 8);
        assert_eq!(&buf, b"01234567");
        assert_eq!(read_exact_or_eof(&mut r, &mut buf).unwrap(), 2);
        assert_eq!(read_exact_or_eof(&mut r, &mut buf).unwrap(), 0);
    }

    #[test]
    fn append_stops_at_len_or_eof() {
        let mut r = Trickle { data: b"abcdef", step: 1 };
        let mut out = b"xy".to_vec();
        assert_eq!(append_exact_or_eof(&mut r, &mut out, 4).unwrap(), 4);
        assert_eq!(out, b"xyabcd");
        assert_eq!(append_exact_or_eof(&mut r, &mut out, usize::MAX).unwrap(), 2);
        assert_eq!(out, b"xyabcdef");
    }

    #[test]
    fn pushback_is_served_first() {
        let mut r = PushbackReader::new(&b"world"[..]);
        let mut buf = [0u8; 3];
        assert_eq!(r.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"wor");

        r.unread(b"lo ");
        r.unread(b"hel");
        assert_eq!(r.pending(), 6);

        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello ld");
        assert_eq!(r.pending(), 0);
    }
}
