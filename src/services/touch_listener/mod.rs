//! Источник событий указателя: сенсорный экран через evdev или эмуляция в dry-run.

mod dry_touch_listener;
mod pointer_tracker;
mod r#trait;
mod touch_listener;

pub use self::pointer_tracker::{AxisRange, PointerTracker, TouchDecoder};
pub use self::r#trait::{create_touch_listener, TouchListenerTrait};
