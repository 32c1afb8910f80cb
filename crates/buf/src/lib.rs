//! A growable byte buffer.
//!
//! A [`Buf`] is either a text buffer, which only accepts UTF-8 text, or a binary
//! buffer, which additionally supports network byte order integers and sequential
//! reads from a cursor.

use std::fmt;

use pcl_error::{Error, ErrorCode, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufMode {
    Binary,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buf {
    mode: BufMode,
    data: Vec<u8>,
    pos: usize,
}

impl Buf {
    pub fn new(mode: BufMode) -> Self {
        Self::with_capacity(0, mode)
    }

    pub fn with_capacity(capacity: usize, mode: BufMode) -> Self {
        Self {
            mode,
            data: Vec::with_capacity(capacity),
            pos: 0,
        }
    }

    pub fn text() -> Self {
        Self::new(BufMode::Text)
    }

    pub fn binary() -> Self {
        Self::new(BufMode::Binary)
    }

    pub fn mode(&self) -> BufMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read cursor of a binary buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Contents of a text buffer.
    pub fn as_str(&self) -> Result<&str> {
        self.require(BufMode::Text)?;
        std::str::from_utf8(&self.data).map_err(|e| {
            Error::with_msg(ErrorCode::IllegalSeq, format!("buffer is not utf-8: {e}"))
        })
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn into_string(self) -> Result<String> {
        self.require(BufMode::Text)?;
        String::from_utf8(self.data).map_err(|e| {
            Error::with_msg(ErrorCode::IllegalSeq, format!("buffer is not utf-8: {e}"))
        })
    }

    /// Empties the buffer but keeps its allocation.
    pub fn reset(&mut self) {
        self.data.clear();
        self.pos = 0;
    }

    /// Empties the buffer and releases its memory.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.pos = 0;
    }

    /// Replaces this buffer's contents, mode and cursor with those of `src`.
    pub fn copy_from(&mut self, src: &Buf) {
        self.mode = src.mode;
        self.data.clear();
        self.data.extend_from_slice(&src.data);
        self.pos = src.pos;
    }

    /// Appends raw bytes. Text buffers only accept valid UTF-8.
    pub fn put(&mut self, bytes: &[u8]) -> Result<usize> {
        if self.mode == BufMode::Text {
            std::str::from_utf8(bytes).map_err(|e| {
                Error::with_msg(ErrorCode::IllegalSeq, format!("text buffer requires utf-8: {e}"))
            })?;
        }
        self.data.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Appends a string. Binary buffers also store a terminating NUL, which is
    /// included in the returned count.
    pub fn put_str(&mut self, s: &str) -> usize {
        self.data.extend_from_slice(s.as_bytes());
        if self.mode == BufMode::Binary {
            self.data.push(0);
            s.len() + 1
        } else {
            s.len()
        }
    }

    /// Appends a UTF-8 encoded character.
    pub fn put_char(&mut self, c: char) -> usize {
        let mut tmp = [0u8; 4];
        let encoded = c.encode_utf8(&mut tmp);
        self.data.extend_from_slice(encoded.as_bytes());
        encoded.len()
    }

    /// Appends formatted text, e.g. `buf.put_fmt(format_args!("{n} items"))`.
    pub fn put_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        let before = self.data.len();
        let _ = fmt::Write::write_fmt(self, args);
        self.data.len() - before
    }

    pub fn put_u8(&mut self, v: u8) -> Result<()> {
        self.put_int(&[v])
    }

    pub fn put_u16(&mut self, v: u16) -> Result<()> {
        self.put_int(&v.to_be_bytes())
    }

    pub fn put_u32(&mut self, v: u32) -> Result<()> {
        self.put_int(&v.to_be_bytes())
    }

    pub fn put_u64(&mut self, v: u64) -> Result<()> {
        self.put_int(&v.to_be_bytes())
    }

    fn put_int(&mut self, bytes: &[u8]) -> Result<()> {
        self.require(BufMode::Binary)?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Reads the next `n` bytes.
    pub fn get(&mut self, n: usize) -> Result<&[u8]> {
        self.require(BufMode::Binary)?;
        if n > self.remaining() {
            return Err(Error::with_msg(
                ErrorCode::Eof,
                format!("requested {n} bytes, {} remaining", self.remaining()),
            ));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    fn get_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get(N)?);
        Ok(out)
    }

    /// Reads a NUL-terminated string written by [`Buf::put_str`]. The NUL is
    /// consumed but not returned. Without a NUL, the rest of the buffer is read.
    pub fn get_str(&mut self) -> Result<String> {
        self.require(BufMode::Binary)?;
        if self.remaining() == 0 {
            return Err(Error::new(ErrorCode::Eof));
        }
        let rest = &self.data[self.pos..];
        let (end, consumed) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (nul, nul + 1),
            None => (rest.len(), rest.len()),
        };
        let s = std::str::from_utf8(&rest[..end])
            .map_err(|e| Error::with_msg(ErrorCode::IllegalSeq, e.to_string()))?
            .to_string();
        self.pos += consumed;
        Ok(s)
    }

    /// Reads one UTF-8 encoded character.
    pub fn get_char(&mut self) -> Result<char> {
        self.require(BufMode::Binary)?;
        let rest = &self.data[self.pos..];
        let Some(&first) = rest.first() else {
            return Err(Error::new(ErrorCode::Eof));
        };
        let width = match first {
            0x00..=0x7f => 1,
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => {
                return Err(Error::with_msg(
                    ErrorCode::IllegalSeq,
                    format!("invalid utf-8 lead byte 0x{first:02x}"),
                ));
            }
        };
        if rest.len() < width {
            return Err(Error::with_msg(ErrorCode::Eof, "truncated utf-8 sequence"));
        }
        let c = std::str::from_utf8(&rest[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| Error::with_msg(ErrorCode::IllegalSeq, "invalid utf-8 sequence"))?;
        self.pos += width;
        Ok(c)
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.get_array::<1>()?[0])
    }

    pub fn get_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.get_array()?))
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.get_array()?))
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.get_array()?))
    }

    #[track_caller]
    fn require(&self, mode: BufMode) -> Result<()> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(Error::with_msg(
                ErrorCode::Type,
                format!("operation requires a {mode:?} buffer"),
            ))
        }
    }
}

impl fmt::Write for Buf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.data.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl fmt::Display for Buf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_text_buffer() {
        let mut b = Buf::text();
        assert_eq!(b.put_str("hello"), 5);
        b.put_char(' ');
        write!(b, "{}-{}", 1, 2).unwrap();
        assert_eq!(b.put_fmt(format_args!("!{}", "x")), 2);
        assert_eq!(b.as_str().unwrap(), "hello 1-2!x");
        assert_eq!(b.len(), 11);
    }

    #[test]
    fn test_text_mode_rejects_binary_ops() {
        let mut b = Buf::text();
        assert_eq!(b.put_u32(7).unwrap_err().code(), ErrorCode::Type);
        assert_eq!(b.get_u8().unwrap_err().code(), ErrorCode::Type);
        assert_eq!(b.put(&[0xff]).unwrap_err().code(), ErrorCode::IllegalSeq);
    }

    #[test]
    fn test_binary_integers_are_big_endian() {
        let mut b = Buf::binary();
        b.put_u16(0x0102).unwrap();
        b.put_u32(0x03040506).unwrap();
        b.put_u64(1).unwrap();
        assert_eq!(&b.as_bytes()[..6], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(b.get_u16().unwrap(), 0x0102);
        assert_eq!(b.get_u32().unwrap(), 0x03040506);
        assert_eq!(b.get_u64().unwrap(), 1);
        assert_eq!(b.get_u8().unwrap_err().code(), ErrorCode::Eof);
    }

    #[test]
    fn test_binary_strings_and_chars() {
        let mut b = Buf::binary();
        assert_eq!(b.put_str("abc"), 4);
        assert_eq!(b.put_char('é'), 2);
        b.put_str("tail");
        assert_eq!(b.get_str().unwrap(), "abc");
        assert_eq!(b.get_char().unwrap(), 'é');
        assert_eq!(b.get_str().unwrap(), "tail");
        assert_eq!(b.remaining(), 0);
        assert_eq!(b.get_str().unwrap_err().code(), ErrorCode::Eof);
    }

    #[test]
    fn test_get_past_end() {
        let mut b = Buf::binary();
        b.put(&[1, 2, 3]).unwrap();
        assert_eq!(b.get(2).unwrap(), &[1, 2]);
        assert_eq!(b.get(2).unwrap_err().code(), ErrorCode::Eof);
        assert_eq!(b.pos(), 2);
    }

    #[test]
    fn test_reset_clear_and_copy() {
        let mut b = Buf::with_capacity(64, BufMode::Binary);
        b.put_u32(9).unwrap();
        b.reset();
        assert!(b.is_empty());
        assert!(b.capacity() >= 64);

        b.put_u8(1).unwrap();
        let mut other = Buf::text();
        other.copy_from(&b);
        assert_eq!(other, b);

        b.clear();
        assert_eq!(b.capacity(), 0);
    }
}
