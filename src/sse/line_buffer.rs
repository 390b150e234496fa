//! Chunk-to-line reassembly
//!
//! Network reads arrive in arbitrary chunks that may split a line, or a UTF-8
//! sequence, anywhere. `LineBuffer` holds the partial tail and yields complete
//! lines terminated by `\n`, `\r\n` or a lone `\r`.

/// Accumulates raw chunks and yields complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    // Bytes of `pending` already known to hold no terminator
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text chunk and drain every completed line.
    pub fn push_str(&mut self, chunk: &str) -> Vec<String> {
        self.push_bytes(chunk.as_bytes())
    }

    /// Append a byte chunk and drain every completed line.
    ///
    /// Invalid UTF-8 inside a completed line is replaced, not rejected.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut i = self.scanned;
        while i < self.pending.len() {
            match self.pending[i] {
                b'\n' => {
                    lines.push(String::from_utf8_lossy(&self.pending[start..i]).into_owned());
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    // A trailing \r may be the first half of \r\n
                    if i + 1 == self.pending.len() {
                        break;
                    }
                    lines.push(String::from_utf8_lossy(&self.pending[start..i]).into_owned());
                    i += if self.pending[i + 1] == b'\n' { 2 } else { 1 };
                    start = i;
                }
                _ => i += 1,
            }
        }

        self.pending.drain(..start);
        self.scanned = i - start;
        lines
    }

    /// Flush the unterminated tail, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.last() == Some(&b'\r') {
            self.pending.pop();
        }
        self.scanned = 0;
        if self.pending.is_empty() {
            return None;
        }
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(tail)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_across_chunks() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push_str("data: {\"a\"").is_empty());
        assert_eq!(buffer.push_str(":1}\ndata: [DO"), vec!["data: {\"a\":1}"]);
        assert_eq!(buffer.push_str("NE]\n"), vec!["data: [DONE]"]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_mixed_terminators() {
        let mut buffer = LineBuffer::new();
        let lines = buffer.push_str("a\r\nb\rc\n\nd");
        assert_eq!(lines, vec!["a", "b", "c", ""]);
        assert_eq!(buffer.finish(), Some("d".to_string()));
    }

    #[test]
    fn test_crlf_split_between_chunks() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push_str("a\r").is_empty());
        assert_eq!(buffer.push_str("\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_trailing_cr_flushed_on_finish() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push_str("tail\r").is_empty());
        assert_eq!(buffer.finish(), Some("tail".to_string()));
    }

    #[test]
    fn test_utf8_sequence_split_between_chunks() {
        let bytes = "data: 你好\n".as_bytes();
        let mut buffer = LineBuffer::new();
        assert!(buffer.push_bytes(&bytes[..8]).is_empty());
        assert_eq!(buffer.push_bytes(&bytes[8..]), vec!["data: 你好"]);
    }

    #[test]
    fn test_long_line_in_small_chunks_scans_each_byte_once() {
        let line = "x".repeat(4096);
        let mut buffer = LineBuffer::new();
        for chunk in line.as_bytes().chunks(7) {
            assert!(buffer.push_bytes(chunk).is_empty());
            assert_eq!(buffer.scanned, buffer.pending.len());
        }
        assert_eq!(buffer.push_str("\r"), Vec::<String>::new());
        assert_eq!(buffer.scanned, line.len());
        assert_eq!(buffer.push_str("\nnext"), vec![line]);
        assert_eq!(buffer.scanned, 4);
        assert_eq!(buffer.finish(), Some("next".to_string()));
        assert_eq!(buffer.scanned, 0);
    }
}
