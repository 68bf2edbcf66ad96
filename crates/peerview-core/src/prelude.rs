pub use crate::accessibility::{AccessibilityEvent, Action, ActionArgs, EventType, FocusKind, Granularity};
pub use crate::callback_ctx::CallbackCtx;
pub use crate::error::{Error, Result};
pub use crate::geometry::{IntRect, Vec2};
pub use crate::host::Host;
pub use crate::id::{HOST_ROOT, PeerHandle, VirtualViewId};
pub use crate::ime::{CapsMode, EditorAction, EditorInfo, InputConnection, InputType};
pub use crate::input::{KeyEvent, MeasureSpec, MotionAction, MotionEvent};
pub use crate::peer::{AccessibilityNodeProvider, ViewPeer};
pub use crate::semantics::{NodeInfo, Role};
