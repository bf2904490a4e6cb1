/// Pascal-style encoding: a one-byte length prefix followed by that many
/// raw bytes. The notify-control protocol uses this for the opaque notice
/// payload carried by `NOTIFY`, rather than a separate length argument on
/// the command line.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let len = data.len().min(u8::MAX as usize) as u8;
    let mut out = Vec::with_capacity(1 + len as usize);
    out.push(len);
    out.extend_from_slice(&data[..len as usize]);
    out
}

#[derive(Debug, thiserror::Error)]
pub enum PascalError {
    #[error("pascal payload truncated: declared length {declared} but only {actual} bytes present")]
    Truncated { declared: usize, actual: usize },
    #[error("empty pascal payload")]
    Empty,
}

/// Decodes a Pascal-encoded buffer, returning the payload bytes and any
/// trailing bytes beyond it.
pub fn decode(buf: &[u8]) -> Result<(&[u8], &[u8]), PascalError> {
    let (&len, rest) = buf.split_first().ok_or(PascalError::Empty)?;
    let len = len as usize;
    if rest.len() < len {
        return Err(PascalError::Truncated {
            declared: len,
            actual: rest.len(),
        });
    }
    Ok(rest.split_at(len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_short_payload() {
        let encoded = encode(b"hello");
        assert_eq!(encoded, vec![5, b'h', b'e', b'l', b'l', b'o']);
        let (payload, rest) = decode(&encoded).unwrap();
        assert_eq!(payload, b"hello");
        assert!(rest.is_empty());
    }

    #[test]
    fn rejects_truncated_payload() {
        assert!(decode(&[5, b'h', b'i']).is_err());
    }

    #[test]
    fn rejects_empty_buffer() {
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn clamps_payloads_over_255_bytes() {
        let data = vec![7u8; 300];
        let encoded = encode(&data);
        assert_eq!(encoded[0], 255);
        assert_eq!(encoded.len(), 256);
    }
}
