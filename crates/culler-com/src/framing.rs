use crate::ComError;
use culler_codec::Codec;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Telemetry frames are small; anything near this cap is a protocol fault.
pub const MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Encode `value` and write it with a 4-byte little-endian length prefix.
pub async fn write_frame<T: Codec, W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    value: &T,
) -> Result<(), ComError> {
    let payload = value.to_bytes();
    let len = u32::try_from(payload.len()).map_err(|_| ComError::MessageTooLarge(u32::MAX))?;
    if len > MAX_FRAME_SIZE {
        return Err(ComError::MessageTooLarge(len));
    }

    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(&payload).await?;
    Ok(())
}

/// Read one length-prefixed frame and decode it.
///
/// EOF at either the prefix or the payload maps to
/// [`ComError::ConnectionClosed`]; a length above [`MAX_FRAME_SIZE`] is
/// rejected before the payload buffer is allocated.
pub async fn read_frame<T: Codec, R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<T, ComError> {
    let mut prefix = [0u8; 4];
    read_exact_or_closed(reader, &mut prefix).await?;

    let len = u32::from_le_bytes(prefix);
    if len > MAX_FRAME_SIZE {
        return Err(ComError::MessageTooLarge(len));
    }

    let mut payload = vec![0u8; len as usize];
    read_exact_or_closed(reader, &mut payload).await?;

    T::from_bytes(&payload).map_err(ComError::from)
}

async fn read_exact_or_closed<R: AsyncReadExt + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<(), ComError> {
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(ComError::ConnectionClosed),
        Err(e) => Err(e.into()),
    }
}
