//! Wire primitives for the canonical header encoding.
//!
//! All integers are little-endian. Variable-length byte strings carry a
//! var-uint length prefix:
//!
//! | value               | encoding            |
//! |---------------------|---------------------|
//! | `< 0xfd`            | 1 byte              |
//! | `<= 0xffff`         | `0xfd` + u16        |
//! | `<= 0xffff_ffff`    | `0xfe` + u32        |
//! | otherwise           | `0xff` + u64        |
//!
//! Readers reject non-minimal prefixes so that every header has exactly one
//! byte representation.

use bytes::{Buf, BufMut};

use crate::error::DecodeError;

pub fn write_u32(buf: &mut impl BufMut, value: u32) {
    buf.put_u32_le(value);
}

pub fn write_u64(buf: &mut impl BufMut, value: u64) {
    buf.put_u64_le(value);
}

/// Write a var-uint in its minimal form.
pub fn write_var_uint(buf: &mut impl BufMut, value: u64) {
    if value < 0xfd {
        buf.put_u8(value as u8);
    } else if value <= 0xffff {
        buf.put_u8(0xfd);
        buf.put_u16_le(value as u16);
    } else if value <= 0xffff_ffff {
        buf.put_u8(0xfe);
        buf.put_u32_le(value as u32);
    } else {
        buf.put_u8(0xff);
        buf.put_u64_le(value);
    }
}

/// Write a length-prefixed byte string.
pub fn write_var_bytes(buf: &mut impl BufMut, bytes: &[u8]) {
    write_var_uint(buf, bytes.len() as u64);
    buf.put_slice(bytes);
}

/// Number of bytes [`write_var_uint`] emits for `value`.
pub fn var_uint_size(value: u64) -> usize {
    if value < 0xfd {
        1
    } else if value <= 0xffff {
        3
    } else if value <= 0xffff_ffff {
        5
    } else {
        9
    }
}

fn ensure(remaining: usize, field: &'static str, needed: usize) -> Result<(), DecodeError> {
    if remaining < needed {
        return Err(DecodeError::UnexpectedEnd {
            field,
            needed,
            remaining,
        });
    }
    Ok(())
}

pub fn read_u32(buf: &mut impl Buf, field: &'static str) -> Result<u32, DecodeError> {
    ensure(buf.remaining(), field, 4)?;
    Ok(buf.get_u32_le())
}

pub fn read_u64(buf: &mut impl Buf, field: &'static str) -> Result<u64, DecodeError> {
    ensure(buf.remaining(), field, 8)?;
    Ok(buf.get_u64_le())
}

/// Read a var-uint, rejecting non-minimal encodings.
pub fn read_var_uint(buf: &mut impl Buf, field: &'static str) -> Result<u64, DecodeError> {
    ensure(buf.remaining(), field, 1)?;
    let (value, min) = match buf.get_u8() {
        0xfd => {
            ensure(buf.remaining(), field, 2)?;
            (u64::from(buf.get_u16_le()), 0xfd)
        }
        0xfe => {
            ensure(buf.remaining(), field, 4)?;
            (u64::from(buf.get_u32_le()), 0x1_0000)
        }
        0xff => {
            ensure(buf.remaining(), field, 8)?;
            (buf.get_u64_le(), 0x1_0000_0000)
        }
        b => return Ok(u64::from(b)),
    };
    if value < min {
        return Err(DecodeError::NonCanonicalVarInt { field });
    }
    Ok(value)
}

/// Read a length-prefixed byte string of at most `max` bytes.
pub fn read_var_bytes(
    buf: &mut impl Buf,
    field: &'static str,
    max: usize,
) -> Result<bytes::Bytes, DecodeError> {
    let len = read_var_uint(buf, field)?;
    if len > max as u64 {
        return Err(DecodeError::LengthExceeded { field, len, max });
    }
    let len = len as usize;
    ensure(buf.remaining(), field, len)?;
    Ok(buf.copy_to_bytes(len))
}

/// Read a length-prefixed byte string that must be exactly 32 bytes.
pub fn read_var_hash256(buf: &mut impl Buf, field: &'static str) -> Result<[u8; 32], DecodeError> {
    let len = read_var_uint(buf, field)?;
    if len != 32 {
        return Err(DecodeError::InvalidLength {
            field,
            expected: 32,
            got: usize::try_from(len).unwrap_or(usize::MAX),
        });
    }
    ensure(buf.remaining(), field, 32)?;
    let mut arr = [0u8; 32];
    buf.copy_to_slice(&mut arr);
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_uint_boundaries() {
        let cases: [(u64, &[u8]); 8] = [
            (0, &[0x00]),
            (0xfc, &[0xfc]),
            (0xfd, &[0xfd, 0xfd, 0x00]),
            (0xffff, &[0xfd, 0xff, 0xff]),
            (0x1_0000, &[0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0xffff_ffff, &[0xfe, 0xff, 0xff, 0xff, 0xff]),
            (0x1_0000_0000, &[0xff, 0, 0, 0, 0, 1, 0, 0, 0]),
            (u64::MAX, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        ];
        for (value, expected) in cases {
            let mut buf = Vec::new();
            write_var_uint(&mut buf, value);
            assert_eq!(buf, expected, "encoding of {value:#x}");
            assert_eq!(var_uint_size(value), expected.len());

            let mut reader = &buf[..];
            assert_eq!(read_var_uint(&mut reader, "test").unwrap(), value);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_var_uint_rejects_non_minimal() {
        for bytes in [
            &[0xfd, 0xfc, 0x00][..],
            &[0xfe, 0xff, 0xff, 0x00, 0x00][..],
            &[0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0][..],
        ] {
            let mut reader = bytes;
            assert_eq!(
                read_var_uint(&mut reader, "len"),
                Err(DecodeError::NonCanonicalVarInt { field: "len" })
            );
        }
    }

    #[test]
    fn test_read_u32_truncated() {
        let mut reader = &[0x01, 0x02, 0x03][..];
        assert_eq!(
            read_u32(&mut reader, "version"),
            Err(DecodeError::UnexpectedEnd {
                field: "version",
                needed: 4,
                remaining: 3
            })
        );
    }

    #[test]
    fn test_read_var_bytes_limits() {
        let mut buf = Vec::new();
        write_var_bytes(&mut buf, &[7u8; 10]);

        let mut reader = &buf[..];
        assert!(matches!(
            read_var_bytes(&mut reader, "signer", 9),
            Err(DecodeError::LengthExceeded { len: 10, max: 9, .. })
        ));

        let mut reader = &buf[..5];
        assert!(matches!(
            read_var_bytes(&mut reader, "signer", 64),
            Err(DecodeError::UnexpectedEnd { needed: 10, remaining: 4, .. })
        ));

        let mut reader = &buf[..];
        assert_eq!(read_var_bytes(&mut reader, "signer", 10).unwrap().as_ref(), &[7u8; 10]);
    }

    #[test]
    fn test_read_var_hash256_requires_32_bytes() {
        let mut buf = Vec::new();
        write_var_bytes(&mut buf, &[1u8; 20]);
        let mut reader = &buf[..];
        assert_eq!(
            read_var_hash256(&mut reader, "stateRoot"),
            Err(DecodeError::InvalidLength {
                field: "stateRoot",
                expected: 32,
                got: 20
            })
        );
    }
}
