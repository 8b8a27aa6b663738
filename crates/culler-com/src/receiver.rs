use crate::{framing, ComError};
use culler_codec::Codec;
use std::marker::PhantomData;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpStream, ToSocketAddrs};

/// Read side of a [`crate::SenderServer`] connection.
pub struct ReceiverClient<T> {
    reader: OwnedReadHalf,
    _marker: PhantomData<T>,
}

impl<T: Codec> ReceiverClient<T> {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, _) = stream.into_split();

        Ok(Self {
            reader,
            _marker: PhantomData,
        })
    }

    /// Receive the next broadcast frame.
    ///
    /// Returns [`ComError::ConnectionClosed`] when the server goes away.
    pub async fn recv(&mut self) -> Result<T, ComError> {
        framing::read_frame(&mut self.reader).await
    }
}
