//! # Peers and hosts
//!
//! A native host view is a thin shell around a *peer*: an engine that owns
//! all real UI state (layout, rendering, the accessibility tree, editable
//! text). This crate holds the vocabulary both sides share:
//!
//! - [`ViewPeer`] is what the engine implements. Every method has a "not
//!   interested" default.
//! - [`Host`] is what the native view implements: its default event
//!   handling plus the outward operations (accessibility events,
//!   invalidation, frame scheduling, the soft keyboard).
//! - [`CallbackCtx`] is handed to the peer on every call and is the only
//!   way back to the host from inside a callback.
//!
//! ```rust
//! use peerview_core::*;
//!
//! struct Label;
//!
//! impl ViewPeer for Label {
//!     fn populate_accessibility_node_info(
//!         &mut self,
//!         _ctx: &mut CallbackCtx<'_>,
//!         x: i32,
//!         y: i32,
//!         id: VirtualViewId,
//!         node: &mut NodeInfo,
//!     ) -> bool {
//!         if id != VirtualViewId(0) {
//!             return false;
//!         }
//!         node.role = Role::Text;
//!         node.text = Some("Hello".into());
//!         node.bounds_in_screen = IntRect::new(0, 0, 100, 20).offset(x, y);
//!         true
//!     }
//! }
//! ```
//!
//! Text positions exchanged with input methods and assistive services are
//! UTF-16 code units throughout.

#[macro_use]
mod macros;

pub mod accessibility;
pub mod callback_ctx;
pub mod diff;
pub mod error;
pub mod geometry;
pub mod host;
pub mod id;
pub mod ime;
pub mod input;
pub mod peer;
pub mod prelude;
pub mod scheduler;
pub mod semantics;
mod tests;

pub use accessibility::*;
pub use callback_ctx::*;
pub use diff::*;
pub use error::*;
pub use geometry::*;
pub use host::*;
pub use id::*;
pub use ime::*;
pub use input::*;
pub use peer::*;
pub use scheduler::*;
pub use semantics::*;
