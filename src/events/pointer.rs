use crate::model::ButtonId;
use std::fmt;

/// Переход указателя относительно одной кнопки оверлея
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Pressed(ButtonId),
    Released(ButtonId),
    /// Указатель вошёл в кнопку; `held` - основная кнопка/касание удерживается
    Entered { button: ButtonId, held: bool },
    Exited { button: ButtonId, held: bool },
}

impl PointerEvent {
    pub fn button(&self) -> ButtonId {
        match *self {
            PointerEvent::Pressed(button)
            | PointerEvent::Released(button)
            | PointerEvent::Entered { button, .. }
            | PointerEvent::Exited { button, .. } => button,
        }
    }
}

impl fmt::Display for PointerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerEvent::Pressed(b) => write!(f, "press {}", b),
            PointerEvent::Released(b) => write!(f, "release {}", b),
            PointerEvent::Entered { button, held } => write!(f, "enter {} (held: {})", button, held),
            PointerEvent::Exited { button, held } => write!(f, "exit {} (held: {})", button, held),
        }
    }
}

/// Сообщения единственного контекста диспетчеризации
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    Pointer(PointerEvent),
    Shutdown,
}

impl From<PointerEvent> for DispatchEvent {
    fn from(event: PointerEvent) -> Self {
        DispatchEvent::Pointer(event)
    }
}
