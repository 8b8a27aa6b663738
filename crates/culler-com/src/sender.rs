use crate::{framing, ComError};
use culler_codec::Codec;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Frames a client may fall behind before it is dropped.
const SEND_QUEUE_DEPTH: usize = 32;

struct ClientHandle<T> {
    queue: mpsc::Sender<T>,
    writer_task: JoinHandle<()>,
}

type ClientMap<T> = Arc<RwLock<HashMap<SocketAddr, ClientHandle<T>>>>;

/// Broadcast-only server: monitors connect, the agent pushes frames.
///
/// Each client gets its own writer task fed by a bounded queue, so a
/// connected-but-not-reading monitor stalls only its own queue; `send`
/// never waits on a socket. A client whose queue fills is dropped.
pub struct SenderServer<T> {
    clients: ClientMap<T>,
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl<T: Codec + Clone + Send + Sync + 'static> SenderServer<T> {
    /// Bind the listener and start accepting connections in the background.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let clients: ClientMap<T> = Arc::new(RwLock::new(HashMap::new()));

        let accept_task = tokio::spawn({
            let clients = clients.clone();
            async move {
                loop {
                    match listener.accept().await {
                        Ok((stream, addr)) => {
                            log::debug!("monitor connected from {addr}");
                            let (_, mut write_half) = stream.into_split();

                            let (queue, mut rx) = mpsc::channel::<T>(SEND_QUEUE_DEPTH);
                            let writer_task = tokio::spawn({
                                let clients = clients.clone();
                                async move {
                                    while let Some(value) = rx.recv().await {
                                        if let Err(e) =
                                            framing::write_frame(&mut write_half, &value).await
                                        {
                                            log::warn!("dropping monitor {addr}: {e}");
                                            clients.write().await.remove(&addr);
                                            return;
                                        }
                                    }
                                }
                            });

                            clients
                                .write()
                                .await
                                .insert(addr, ClientHandle { queue, writer_task });
                        }
                        Err(e) => {
                            log::warn!("accept failed: {e}");
                            // Back off so a persistent accept error cannot spin.
                            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            clients,
            accept_task,
            local_addr,
        })
    }

    /// Broadcast one frame to every connected client.
    ///
    /// Frames are handed to the per-client writer queues without waiting
    /// on any socket. A client whose queue is full (it stopped reading)
    /// or whose writer is gone is dropped from the map and logged; the
    /// remaining clients still get the frame, and the call succeeds.
    pub async fn send(&self, value: &T) -> Result<(), ComError> {
        let mut dead = Vec::new();
        {
            let clients = self.clients.read().await;
            for (addr, client) in clients.iter() {
                match client.queue.try_send(value.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        log::warn!("dropping monitor {addr}: send queue full");
                        dead.push(*addr);
                    }
                    Err(TrySendError::Closed(_)) => {
                        dead.push(*addr);
                    }
                }
            }
        }

        if !dead.is_empty() {
            let mut clients = self.clients.write().await;
            for addr in dead {
                if let Some(client) = clients.remove(&addr) {
                    client.writer_task.abort();
                }
            }
        }

        Ok(())
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl<T> Drop for SenderServer<T> {
    fn drop(&mut self) {
        self.accept_task.abort();
        // Writer tasks own the sockets; abort them so connections close.
        if let Ok(mut clients) = self.clients.try_write() {
            for (_, client) in clients.drain() {
                client.writer_task.abort();
            }
        }
    }
}
