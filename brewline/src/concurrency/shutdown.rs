//! Broadcast shutdown signaling for pipeline workers.
//!
//! Abstracts a tokio watch channel into a shutdown-specific pair of types.
//! The signal carries no payload; receivers detect it through `changed()` at
//! their suspension points.

use tokio::sync::watch;

/// Transmitter side of the pipeline shutdown channel.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<()>);

impl ShutdownTx {
    /// Notifies all subscribed receivers that shutdown was requested.
    ///
    /// Fails only when no receiver is subscribed anymore, which means every
    /// worker has already exited.
    pub fn shutdown(&self) -> Result<(), watch::error::SendError<()>> {
        self.0.send(())
    }

    /// Creates a new shutdown receiver subscription.
    pub fn subscribe(&self) -> ShutdownRx {
        self.0.subscribe()
    }
}

/// Receiver side of the pipeline shutdown channel.
pub type ShutdownRx = watch::Receiver<()>;

/// Creates a new shutdown channel.
///
/// Receivers must subscribe before the signal is sent; a receiver created
/// afterwards does not observe it.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(());
    (ShutdownTx(tx), rx)
}
