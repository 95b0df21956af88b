use std::fmt::{self, Display, Write as _};

/// Chainable string builder over anything `Display`
///
/// ```rust,ignore
/// let mut b = Builder::new();
/// b.push("id=").push(42).push(',').push(true);
/// assert_eq!(b.as_str(), "id=42,true");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builder {
    buf: String,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    pub fn push<T: Display>(&mut self, value: T) -> &mut Self {
        // Writing into a String cannot fail
        let _ = write!(self.buf, "{value}");
        self
    }

    /// Append raw bytes; invalid UTF-8 becomes U+FFFD
    pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.push_str(&String::from_utf8_lossy(bytes));
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_push() {
        let mut b = Builder::new();
        b.push("id=").push(42).push(',').push(1.5).push_bytes(b"!");
        assert_eq!(b.as_str(), "id=42,1.5!");
        assert_eq!(b.to_string(), "id=42,1.5!");
        assert_eq!(b.len(), 10);
    }

    #[test]
    fn test_lossy_bytes() {
        let mut b = Builder::with_capacity(8);
        assert!(b.is_empty());
        b.push_bytes(&[0x61, 0xff]);
        assert_eq!(b.into_string(), "a\u{fffd}");
    }
}
