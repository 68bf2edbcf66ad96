//! Process-wide peer storage.
//!
//! Peers live here rather than inside their views so a handle can cross the
//! host boundary as a plain integer. A peer is checked out of the map for the
//! duration of each call, so a callback may reach other peers freely; reaching
//! its own peer again is reported as [`Error::ReentrantPeerCall`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, const_mutex};
use smallvec::SmallVec;

use peerview_core::{Error, PeerHandle, Result, ViewPeer};

static PEER_MAP: Mutex<BTreeMap<PeerHandle, Box<dyn ViewPeer>>> = const_mutex(BTreeMap::new());
static NEXT_PEER_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CHECKED_OUT: RefCell<SmallVec<[PeerHandle; 4]>> = RefCell::new(SmallVec::new());
}

pub fn register_view_peer(peer: impl ViewPeer + 'static) -> PeerHandle {
    let handle = PeerHandle::from_raw(NEXT_PEER_ID.fetch_add(1, Ordering::Relaxed));
    PEER_MAP.lock().insert(handle, Box::new(peer));
    log::debug!("registered {handle}");
    handle
}

pub fn is_registered(handle: PeerHandle) -> bool {
    PEER_MAP.lock().contains_key(&handle) || is_checked_out(handle)
}

/// Remove a peer from the registry and hand it back for its final call.
pub fn release_view_peer(handle: PeerHandle) -> Result<Box<dyn ViewPeer>> {
    if is_checked_out(handle) {
        return Err(Error::ReentrantPeerCall(handle));
    }
    let peer = PEER_MAP
        .lock()
        .remove(&handle)
        .ok_or(Error::PeerNotRegistered(handle))?;
    log::debug!("released {handle}");
    Ok(peer)
}

pub fn try_with_peer<T>(handle: PeerHandle, f: impl FnOnce(&mut dyn ViewPeer) -> T) -> Result<T> {
    let peer = PEER_MAP.lock().remove(&handle);
    let Some(peer) = peer else {
        return Err(if is_checked_out(handle) {
            Error::ReentrantPeerCall(handle)
        } else {
            Error::PeerNotRegistered(handle)
        });
    };

    let mut checkout = Checkout::new(handle, peer);
    Ok(f(checkout.peer()))
}

/// Like [`try_with_peer`], but any failure is fatal: the host has no way to
/// continue with a view whose peer is gone.
pub fn with_peer<T>(handle: PeerHandle, f: impl FnOnce(&mut dyn ViewPeer) -> T) -> T {
    match try_with_peer(handle, f) {
        Ok(out) => out,
        Err(e) => {
            log::error!("peer call failed: {e}");
            panic!("{e}");
        }
    }
}

fn is_checked_out(handle: PeerHandle) -> bool {
    CHECKED_OUT.with(|c| c.borrow().contains(&handle))
}

/// A peer taken out of the map. Goes back on drop, unwinding included.
struct Checkout {
    handle: PeerHandle,
    peer: Option<Box<dyn ViewPeer>>,
}

impl Checkout {
    fn new(handle: PeerHandle, peer: Box<dyn ViewPeer>) -> Self {
        CHECKED_OUT.with(|c| c.borrow_mut().push(handle));
        Self {
            handle,
            peer: Some(peer),
        }
    }

    fn peer(&mut self) -> &mut dyn ViewPeer {
        match self.peer.as_deref_mut() {
            Some(peer) => peer,
            None => unreachable!("checkout is only emptied on drop"),
        }
    }
}

impl Drop for Checkout {
    fn drop(&mut self) {
        CHECKED_OUT.with(|c| c.borrow_mut().retain(|h| *h != self.handle));
        if let Some(peer) = self.peer.take() {
            PEER_MAP.lock().insert(self.handle, peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl ViewPeer for Idle {}

    #[test]
    fn handles_are_unique() {
        let a = register_view_peer(Idle);
        let b = register_view_peer(Idle);
        assert_ne!(a, b);
        assert!(is_registered(a) && is_registered(b));
        release_view_peer(a).unwrap();
        release_view_peer(b).unwrap();
    }

    #[test]
    fn released_handle_is_an_error() {
        let handle = register_view_peer(Idle);
        release_view_peer(handle).unwrap();

        assert!(!is_registered(handle));
        assert_eq!(
            try_with_peer(handle, |_| ()).unwrap_err(),
            Error::PeerNotRegistered(handle)
        );
        assert!(matches!(
            release_view_peer(handle),
            Err(Error::PeerNotRegistered(_))
        ));
    }

    #[test]
    fn nested_call_on_same_peer_is_reentrant() {
        let handle = register_view_peer(Idle);

        let nested = with_peer(handle, |_| {
            assert!(is_registered(handle));
            assert_eq!(
                release_view_peer(handle).err().unwrap(),
                Error::ReentrantPeerCall(handle)
            );
            try_with_peer(handle, |_| ()).unwrap_err()
        });
        assert_eq!(nested, Error::ReentrantPeerCall(handle));

        // back in the map afterwards
        assert!(try_with_peer(handle, |_| ()).is_ok());
        release_view_peer(handle).unwrap();
    }

    #[test]
    fn nested_call_on_other_peer_is_fine() {
        let outer = register_view_peer(Idle);
        let inner = register_view_peer(Idle);

        let ok = with_peer(outer, |_| try_with_peer(inner, |_| ()).is_ok());
        assert!(ok);

        release_view_peer(outer).unwrap();
        release_view_peer(inner).unwrap();
    }

    #[test]
    fn peer_returns_after_panic() {
        let handle = register_view_peer(Idle);
        let result = std::panic::catch_unwind(|| with_peer(handle, |_| panic!("peer blew up")));
        assert!(result.is_err());
        assert!(try_with_peer(handle, |_| ()).is_ok());
        release_view_peer(handle).unwrap();
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn with_peer_on_unknown_handle_is_fatal() {
        with_peer(PeerHandle::from_raw(u64::MAX), |_| ());
    }
}
