use std::io::{BufRead, Read, Write};

use crate::error::Error;

/// Reads a single `\n`-terminated line, stripping a trailing `\r` if present.
/// Returns `Error::Closed` on EOF with no bytes read.
pub fn read_line<R: BufRead>(r: &mut R) -> Result<String, Error> {
    let mut buf = String::new();
    let n = r.read_line(&mut buf)?;
    if n == 0 {
        return Err(Error::Closed);
    }
    while buf.ends_with('\n') || buf.ends_with('\r') {
        buf.pop();
    }
    Ok(buf)
}

/// Reads lines until one consisting of exactly `.`, per the dot-terminated
/// multi-line payload convention. The terminator itself is not included.
pub fn read_multiline<R: BufRead>(r: &mut R) -> Result<Vec<String>, Error> {
    let mut lines = Vec::new();
    loop {
        let line = read_line(r)?;
        if line == "." {
            return Ok(lines);
        }
        lines.push(line);
    }
}

/// Reads exactly `n` bytes, opaquely (no line interpretation). Used after a
/// server announces a sized block is coming.
pub fn read_block<R: Read>(r: &mut R, n: usize) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// A parsed numeric response line: `DDD TEXT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: u32,
    pub text: String,
}

/// Parses a response line of the form `DDD[ TEXT]`, where `DDD` is one or
/// more decimal digits. Any following text (after the first space) is kept
/// verbatim, trailing whitespace stripped.
pub fn parse_response(line: &str) -> Result<Response, Error> {
    let line = line.trim_end();
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_end == 0 {
        return Err(Error::MalformedResponse(line.to_string()));
    }
    let code: u32 = line[..digits_end]
        .parse()
        .map_err(|_| Error::MalformedResponse(line.to_string()))?;
    let text = line[digits_end..].trim_start().to_string();
    Ok(Response { code, text })
}

/// Encodes a command line: `NAME[ ARG1 sep ARG2 ...]\n`.
pub fn encode_command(name: &str, args: &[&str], sep: char) -> Vec<u8> {
    let mut out = String::with_capacity(name.len() + 16);
    out.push_str(name);
    if !args.is_empty() {
        out.push(' ');
        for (i, a) in args.iter().enumerate() {
            if i > 0 {
                out.push(sep);
            }
            out.push_str(a);
        }
    }
    out.push('\n');
    out.into_bytes()
}

pub fn write_command<W: Write>(w: &mut W, name: &str, args: &[&str], sep: char) -> Result<(), Error> {
    w.write_all(&encode_command(name, args, sep))?;
    Ok(())
}

pub fn write_block<W: Write>(w: &mut W, data: &[u8]) -> Result<(), Error> {
    w.write_all(data)?;
    Ok(())
}

/// Normalizes body text read off the wire (internal terminator `\r`) to `\n`.
pub fn normalize_to_lf(body: &[u8]) -> Vec<u8> {
    body.iter()
        .map(|&b| if b == b'\r' { b'\n' } else { b })
        .collect()
}

/// Normalizes body text before writing to the wire (`\n` -> `\r`).
pub fn normalize_to_cr(body: &[u8]) -> Vec<u8> {
    body.iter()
        .map(|&b| if b == b'\n' { b'\r' } else { b })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_response_with_text() {
        let r = parse_response("220 ready\r\n").unwrap();
        assert_eq!(r.code, 220);
        assert_eq!(r.text, "ready");
    }

    #[test]
    fn parses_response_without_text() {
        let r = parse_response("200").unwrap();
        assert_eq!(r.code, 200);
        assert_eq!(r.text, "");
    }

    #[test]
    fn rejects_non_numeric_response() {
        assert!(parse_response("OK").is_err());
    }

    #[test]
    fn reads_lines_and_strips_crlf() {
        let mut c = Cursor::new(b"hello\r\nworld\n".to_vec());
        assert_eq!(read_line(&mut c).unwrap(), "hello");
        assert_eq!(read_line(&mut c).unwrap(), "world");
        assert!(read_line(&mut c).is_err());
    }

    #[test]
    fn reads_multiline_up_to_dot() {
        let mut c = Cursor::new(b"one\r\ntwo\r\n.\r\nleftover\r\n".to_vec());
        let lines = read_multiline(&mut c).unwrap();
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(read_line(&mut c).unwrap(), "leftover");
    }

    #[test]
    fn reads_sized_block() {
        let mut c = Cursor::new(b"abcdef".to_vec());
        let block = read_block(&mut c, 4).unwrap();
        assert_eq!(block, b"abcd");
    }

    #[test]
    fn round_trips_cr_lf_normalization() {
        let body = b"line one\nline two\n";
        let wire = normalize_to_cr(body);
        assert_eq!(wire, b"line one\rline two\r");
        let back = normalize_to_lf(&wire);
        assert_eq!(back, body);
    }

    #[test]
    fn encodes_command_with_separator() {
        let cmd = encode_command("FSUM", &["12", "1-5"], ',');
        assert_eq!(cmd, b"FSUM 12,1-5\n");
    }
}
