pub mod button;
pub mod layout;

pub use button::{Button, ButtonId, ButtonMode, ButtonState, ButtonVisuals, VisualHandle};
pub use layout::{Layout, Point, Rect};
