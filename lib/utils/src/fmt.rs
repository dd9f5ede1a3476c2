//! Formatting into fixed, caller-owned byte buffers.
use core::fmt::{self, Write};

/// A [Write] sink over a byte slice.
///
/// Output that does not fit is dropped at the buffer boundary, which may split a multi-byte
/// character; [BufWriter::written] is the number of bytes actually stored.
#[derive(Debug)]
pub struct BufWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
    truncated: bool,
}

impl<'a> BufWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> BufWriter<'a> {
        BufWriter {
            buf,
            len: 0,
            truncated: false,
        }
    }

    pub fn written(&self) -> usize {
        self.len
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len() - self.len;
        let count = s.len().min(room);
        self.buf[self.len..self.len + count].copy_from_slice(&s.as_bytes()[..count]);
        self.len += count;
        if count < s.len() {
            self.truncated = true;
            return Err(fmt::Error);
        }
        Ok(())
    }
}

/// Format `args` into `buf`, returning how many bytes were stored.
pub fn format_into(buf: &mut [u8], args: fmt::Arguments) -> usize {
    let mut writer = BufWriter::new(buf);
    // Truncation is reported through the byte count.
    let _ = writer.write_fmt(args);
    writer.written()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_within_capacity() {
        let mut buf = [0u8; 16];
        let n = format_into(&mut buf, format_args!("{}-{}", "ab", 12));
        assert_eq!(&buf[..n], b"ab-12");
    }

    #[test]
    fn truncates_at_capacity() {
        let mut buf = [0u8; 4];
        let mut writer = BufWriter::new(&mut buf);
        assert!(writer.write_str("machine").is_err());
        assert!(writer.is_truncated());
        assert_eq!(writer.as_bytes(), b"mach");
    }
}
