// src/gps/framer.rs
//! Splits a raw byte stream into `\r\n` terminated candidate sentences

const DELIMITER: &str = "\r\n";

/// Accumulates decoded text and hands out complete lines.
///
/// A chunk that is not valid UTF-8 throws away everything buffered so far,
/// so a corrupted byte run costs at most the sentence in flight.
#[derive(Debug, Default)]
pub struct SentenceFramer {
    buffer: String,
}

impl SentenceFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of raw bytes. Returns `false` if the chunk failed to
    /// decode and the buffer was reset.
    pub fn push(&mut self, bytes: &[u8]) -> bool {
        match std::str::from_utf8(bytes) {
            Ok(text) => {
                self.buffer.push_str(text);
                true
            }
            Err(e) => {
                log::warn!(
                    "Discarding {} buffered bytes after invalid UTF-8 input: {}",
                    self.buffer.len() + bytes.len(),
                    e
                );
                self.buffer.clear();
                false
            }
        }
    }

    /// Remove and return the next complete sentence, without its delimiter
    pub fn next_sentence(&mut self) -> Option<String> {
        let end = self.buffer.find(DELIMITER)?;
        let sentence = self.buffer[..end].to_string();
        self.buffer.drain(..end + DELIMITER.len());
        Some(sentence)
    }

    /// Lazily drain every complete sentence currently buffered
    pub fn sentences(&mut self) -> Sentences<'_> {
        Sentences { framer: self }
    }

    /// Text still waiting for its delimiter
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

pub struct Sentences<'a> {
    framer: &'a mut SentenceFramer,
}

impl Iterator for Sentences<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.framer.next_sentence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_across_chunks() {
        let mut framer = SentenceFramer::new();
        assert!(framer.push(b"$GPGGA,1,2"));
        assert_eq!(framer.next_sentence(), None);

        assert!(framer.push(b",3*00\r\n$GPRMC"));
        assert_eq!(framer.next_sentence().as_deref(), Some("$GPGGA,1,2,3*00"));
        assert_eq!(framer.next_sentence(), None);
        assert_eq!(framer.pending(), "$GPRMC");
    }

    #[test]
    fn test_multiple_sentences_in_one_chunk() {
        let mut framer = SentenceFramer::new();
        framer.push(b"$A*00\r\n$B*00\r\n\r\n$C");
        let lines: Vec<String> = framer.sentences().collect();
        assert_eq!(lines, vec!["$A*00", "$B*00", ""]);
        assert_eq!(framer.pending(), "$C");
    }

    #[test]
    fn test_delimiter_split_between_chunks() {
        let mut framer = SentenceFramer::new();
        framer.push(b"$A*00\r");
        assert_eq!(framer.next_sentence(), None);
        framer.push(b"\n");
        assert_eq!(framer.next_sentence().as_deref(), Some("$A*00"));
    }

    #[test]
    fn test_bare_newline_is_not_a_delimiter() {
        let mut framer = SentenceFramer::new();
        framer.push(b"$A*00\n$B*00\r\n");
        assert_eq!(framer.next_sentence().as_deref(), Some("$A*00\n$B*00"));
    }

    #[test]
    fn test_invalid_utf8_resets_buffer() {
        let mut framer = SentenceFramer::new();
        framer.push(b"$GPGGA,partial");
        assert!(!framer.push(&[0xff, 0xfe, b'\r', b'\n']));
        assert_eq!(framer.pending(), "");

        // Framing resumes on the next clean chunk
        framer.push(b"$B*00\r\n");
        assert_eq!(framer.next_sentence().as_deref(), Some("$B*00"));
    }
}
