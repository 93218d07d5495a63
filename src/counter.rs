// src/counter.rs
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const READ_BUF: usize = 64 * 1024;

/// Count lines whose content is non-empty after trimming ASCII whitespace.
///
/// Works on raw bytes with a fixed-size buffer, so peak memory stays bounded
/// regardless of file size and no decode step can fail. A line is any maximal
/// run of bytes between `\n` terminators or file boundaries; CRLF endings and
/// a missing trailing newline need no special casing since `\r` is whitespace.
pub fn count_lines(path: &Path) -> std::io::Result<usize> {
    let file = File::open(path)?;
    count_from(BufReader::with_capacity(READ_BUF, file))
}

fn count_from<R: Read>(mut reader: BufReader<R>) -> std::io::Result<usize> {
    let mut count = 0;
    let mut has_content = false;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        for &b in buf {
            if b == b'\n' {
                if has_content {
                    count += 1;
                }
                has_content = false;
            } else if !has_content && !b.is_ascii_whitespace() {
                has_content = true;
            }
        }
        let len = buf.len();
        reader.consume(len);
    }
    if has_content {
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn count_bytes(bytes: &[u8]) -> usize {
        count_from(BufReader::new(Cursor::new(bytes.to_vec()))).unwrap()
    }

    #[test]
    fn blank_lines_are_not_counted() {
        assert_eq!(count_bytes(b"a\n\nb\n   \nc\n"), 3);
    }

    #[test]
    fn whitespace_only_lines_are_blank() {
        assert_eq!(count_bytes(b" \t \n\t\n"), 0);
    }

    #[test]
    fn missing_trailing_newline_still_counts() {
        assert_eq!(count_bytes(b"a\nb"), 2);
        assert_eq!(count_bytes(b"a"), 1);
    }

    #[test]
    fn crlf_matches_lf_behavior() {
        assert_eq!(count_bytes(b"a\r\nb\r\n\r\nc"), 3);
        assert_eq!(count_bytes(b"a\nb\n\nc"), 3);
    }

    #[test]
    fn empty_input_is_zero_lines() {
        assert_eq!(count_bytes(b""), 0);
    }

    #[test]
    fn non_utf8_bytes_are_fine() {
        assert_eq!(count_bytes(b"\xff\xfe\n\x80\n"), 2);
    }

    #[test]
    fn content_straddling_buffer_boundaries() {
        // Larger than one BufReader refill to exercise the chunk loop.
        let mut data = Vec::new();
        for _ in 0..10_000 {
            data.extend_from_slice(b"line with content\n\n");
        }
        assert_eq!(count_bytes(&data), 10_000);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(count_lines(Path::new("/nonexistent/nope.py")).is_err());
    }
}
