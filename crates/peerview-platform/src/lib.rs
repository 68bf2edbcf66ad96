//! The native side of a peer-backed view.
//!
//! A [`View`] wraps a [`Host`](peerview_core::Host) and a registered
//! [`ViewPeer`](peerview_core::ViewPeer). The platform glue calls one `View`
//! method per native event; the view forwards it to the peer, applies the
//! host default where the event has one, and runs the accessibility and
//! text-input protocols in between.
//!
//! ```rust
//! use peerview_core::{MeasureSpec, ViewPeer};
//! use peerview_devtools::RecordingHost;
//! use peerview_platform::{View, ViewOptions};
//!
//! struct Blank;
//! impl ViewPeer for Blank {}
//!
//! let mut view = View::new(RecordingHost::new(), ViewOptions::default(), |_| Blank);
//! assert_eq!(
//!     view.measure(MeasureSpec::exactly(320), MeasureSpec::at_most(200)),
//!     (320, 200)
//! );
//! view.release();
//! ```

pub mod accessibility;
mod link;
pub mod logging;
pub mod options;
pub mod policy;
pub mod registry;
pub mod text_session;
pub mod view;


pub use accessibility::AccessibilityState;
pub use options::{AccessibilityMode, OptionsError, ViewOptions};
pub use registry::{is_registered, register_view_peer, release_view_peer, try_with_peer, with_peer};
pub use text_session::TextSession;
pub use view::{NodeProvider, View};
