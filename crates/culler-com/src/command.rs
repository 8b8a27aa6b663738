use crate::{framing, ComError};
use culler_codec::Codec;
use std::marker::PhantomData;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Inbound command channel: any number of operator clients, one consumer.
///
/// Each client gets its own reader task so a stalled client never blocks
/// the others; decoded messages are multiplexed into a single channel.
pub struct CommandServer<T> {
    rx: mpsc::Receiver<T>,
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl<T: Codec + Send + 'static> CommandServer<T> {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let (tx, rx) = mpsc::channel(64);

        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, addr)) => {
                        log::debug!("operator connected from {addr}");
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let (mut reader, _) = stream.into_split();
                            loop {
                                match framing::read_frame::<T, _>(&mut reader).await {
                                    Ok(msg) => {
                                        if tx.send(msg).await.is_err() {
                                            return; // consumer dropped
                                        }
                                    }
                                    Err(e) => {
                                        log::debug!("operator {addr} disconnected: {e}");
                                        return;
                                    }
                                }
                            }
                        });
                    }
                    Err(e) => {
                        log::warn!("accept failed: {e}");
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    }
                }
            }
        });

        Ok(Self {
            rx,
            accept_task,
            local_addr,
        })
    }

    /// Next command from any connected client; waits if there is none.
    pub async fn recv(&mut self) -> Result<T, ComError> {
        self.rx.recv().await.ok_or(ComError::ConnectionClosed)
    }

    /// Next command if one is already queued.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl<T> Drop for CommandServer<T> {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// Write side used by operator tools to push commands at the agent.
pub struct CommandClient<T> {
    stream: TcpStream,
    _marker: PhantomData<T>,
}

impl<T: Codec> CommandClient<T> {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            _marker: PhantomData,
        })
    }

    pub async fn send(&mut self, value: &T) -> Result<(), ComError> {
        framing::write_frame(&mut self.stream, value).await
    }
}
