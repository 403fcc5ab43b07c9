//! Damage tracking and painting for the text-edit widget.
//!
//! Every logical operation reports a [`RenderDelta`] describing what it
//! invalidated. Callers that are visible hand the delta (or several, merged
//! through [`RenderScheduler`]) to the [`Painter`], which turns it into the
//! minimal set of [`RenderSurface`] calls. Callers that are not visible
//! (bulk loads, hidden widgets) simply drop the delta; this is the whole of
//! the draw/no-draw split.
//!
//! Exposed components:
//! - `scheduler`: merges deltas into a per-frame [`Decision`].
//! - `surface`: the drawing and scrollbar contracts implemented by the host.
//! - `painter`: full, line and cursor-only repaint paths plus scrollbar sync.

pub mod painter;
pub mod scheduler;
pub mod surface;

pub use painter::{PaintStats, Painter};
pub use scheduler::{Decision, RenderDelta, RenderScheduler};
pub use surface::{DrawCall, RecordingSurface, RenderSurface, Scrollbar};
