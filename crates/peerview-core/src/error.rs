use crate::PeerHandle;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0} is not registered (released or never created)")]
    PeerNotRegistered(PeerHandle),

    /// The peer called back into the bridge while one of its own callbacks
    /// was still running on this thread.
    #[error("reentrant call into {0} while one of its callbacks is running")]
    ReentrantPeerCall(PeerHandle),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
