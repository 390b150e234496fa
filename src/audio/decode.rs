use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

/// Audio payload failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("Base64 audio string is empty")]
    Empty,

    #[error("Invalid Base64 format: length {length} is not a multiple of 4")]
    InvalidFormat { length: usize },

    #[error("Base64 decode error: {0}")]
    Decode(String),

    #[error("Memory allocation error: {0}")]
    Allocation(String),

    #[error("No valid audio data in chunks")]
    NoValidData,
}

/// Decode a base64 audio payload.
///
/// Rejects blank input and lengths that are not a multiple of four before
/// attempting to decode.
pub fn decode(payload: &str) -> Result<Bytes, AudioError> {
    if payload.trim().is_empty() {
        return Err(AudioError::Empty);
    }
    if payload.len() % 4 != 0 {
        return Err(AudioError::InvalidFormat {
            length: payload.len(),
        });
    }

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(base64::decoded_len_estimate(payload.len()))
        .map_err(|e| AudioError::Allocation(e.to_string()))?;
    STANDARD
        .decode_vec(payload, &mut buffer)
        .map_err(|e| AudioError::Decode(e.to_string()))?;

    Ok(Bytes::from(buffer))
}

/// Cheap pre-check: non-blank and a multiple of four characters.
pub fn is_valid_base64(payload: &str) -> bool {
    !payload.trim().is_empty() && payload.len() % 4 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_payload() {
        let decoded = decode("SGVsbG8=").unwrap();
        assert_eq!(decoded.as_ref(), b"Hello");
    }

    #[test]
    fn test_decode_empty_and_blank() {
        assert_eq!(decode(""), Err(AudioError::Empty));
        assert_eq!(decode("   "), Err(AudioError::Empty));
    }

    #[test]
    fn test_decode_bad_length() {
        assert_eq!(decode("abc"), Err(AudioError::InvalidFormat { length: 3 }));
    }

    #[test]
    fn test_decode_bad_alphabet() {
        assert!(matches!(decode("ab$="), Err(AudioError::Decode(_))));
    }

    #[test]
    fn test_is_valid_base64() {
        assert!(is_valid_base64("AAAA"));
        assert!(!is_valid_base64("AAA"));
        assert!(!is_valid_base64("    "));
    }

    #[test]
    fn test_decode_recovers_encoded_bytes() {
        let mut seed: u32 = 0x2545_f491;
        for len in 1..=64 {
            let original: Vec<u8> = (0..len)
                .map(|_| {
                    seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    (seed >> 24) as u8
                })
                .collect();
            let decoded = decode(&STANDARD.encode(&original)).unwrap();
            assert_eq!(decoded.as_ref(), original.as_slice(), "length {}", len);
        }

        let every_byte: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&STANDARD.encode(&every_byte)).unwrap().as_ref(), every_byte.as_slice());
    }

    #[test]
    fn test_encoded_empty_buffer_is_rejected() {
        assert_eq!(STANDARD.encode(b""), "");
        assert_eq!(decode(&STANDARD.encode(b"")), Err(AudioError::Empty));
    }
}
