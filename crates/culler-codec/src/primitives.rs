use crate::{Codec, DecodeError};

fn take<'a>(buf: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], DecodeError> {
    let end = pos.checked_add(n).ok_or(DecodeError::UnexpectedEof)?;
    if end > buf.len() {
        return Err(DecodeError::UnexpectedEof);
    }
    let slice = &buf[*pos..end];
    *pos = end;
    Ok(slice)
}

impl Codec for bool {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(*self as u8);
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        match take(buf, pos, 1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(DecodeError::InvalidBool(v)),
        }
    }
}

macro_rules! codec_le_bytes {
    ($($ty:ty),*) => {
        $(
            impl Codec for $ty {
                fn encode(&self, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&self.to_le_bytes());
                }

                fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
                    let bytes = take(buf, pos, size_of::<$ty>())?;
                    Ok(<$ty>::from_le_bytes(bytes.try_into().unwrap()))
                }
            }
        )*
    };
}

codec_le_bytes!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Codec for String {
    fn encode(&self, buf: &mut Vec<u8>) {
        (self.len() as u32).encode(buf);
        buf.extend_from_slice(self.as_bytes());
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        let len = u32::decode(buf, pos)? as usize;
        let bytes = take(buf, pos, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn encode(&self, buf: &mut Vec<u8>) {
        (self.len() as u32).encode(buf);
        for item in self {
            item.encode(buf);
        }
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        let len = u32::decode(buf, pos)? as usize;
        // Cap preallocation at what the buffer could actually hold, so a
        // corrupt length cannot force a huge allocation before EOF hits.
        let mut vec = Vec::with_capacity(len.min(buf.len() - *pos));
        for _ in 0..len {
            vec.push(T::decode(buf, pos)?);
        }
        Ok(vec)
    }
}

impl<T: Codec> Codec for Option<T> {
    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            None => false.encode(buf),
            Some(value) => {
                true.encode(buf);
                value.encode(buf);
            }
        }
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        if bool::decode(buf, pos)? {
            Ok(Some(T::decode(buf, pos)?))
        } else {
            Ok(None)
        }
    }
}
