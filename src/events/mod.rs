pub mod keyboard;
pub mod pointer;
pub mod window;

pub use keyboard::{KeyCode, KeyState, VirtualKeyEvent};
pub use pointer::{DispatchEvent, PointerEvent};
pub use window::{WindowHandle, WindowInfo};
