//! Peer-side text editing.
//!
//! [`EditBuffer`] is the state an input method edits: text, selection,
//! composing region and batch nesting, all addressed in UTF-16 code units.
//! [`EditSession`] wraps a buffer as a
//! [`InputConnection`](peerview_core::InputConnection) and turns each net
//! change into the accessibility events and redraw requests a host expects.
//!
//! ```rust
//! use peerview_text::EditBuffer;
//!
//! let mut buf = EditBuffer::with_text("Hello");
//! buf.begin_batch_edit();
//! buf.commit_text(", world", 1);
//! assert!(!buf.end_batch_edit());
//!
//! let change = buf.take_change().unwrap();
//! assert_eq!(change.after, "Hello, world");
//! assert_eq!(change.selection, (12, 12));
//! ```

pub mod buffer;
pub mod offsets;
pub mod session;
pub mod traverse;

pub use buffer::{EditBuffer, TextChange};
pub use session::EditSession;
