use std::fmt;

/// Node id in the peer's virtual accessibility tree.
///
/// Ids are assigned by the peer and only mean something for the duration of
/// the query they appear in. [`HOST_ROOT`] stands for the host view itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualViewId(pub i32);

/// The containing host view, as opposed to any peer-owned node. Also used as
/// the "none" value of focus and hover state.
pub const HOST_ROOT: VirtualViewId = VirtualViewId(-1);

impl VirtualViewId {
    pub fn is_host_root(self) -> bool {
        self == HOST_ROOT
    }

    /// `None` for the host root, the id otherwise.
    pub fn virtual_child(self) -> Option<VirtualViewId> {
        (!self.is_host_root()).then_some(self)
    }
}

impl Default for VirtualViewId {
    fn default() -> Self {
        HOST_ROOT
    }
}

impl fmt::Display for VirtualViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_host_root() {
            f.write_str("host")
        } else {
            write!(f, "v{}", self.0)
        }
    }
}

/// Opaque reference to one registered peer instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerHandle(u64);

impl PeerHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}
