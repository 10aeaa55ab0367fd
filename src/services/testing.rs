//! Записывающие заглушки InputService/WindowService для модульных тестов.

use crate::error::{KioskError, Result};
use crate::events::{KeyCode, WindowHandle};
use crate::model::{Button, ButtonState};
use crate::services::button_view::ButtonView;
use crate::services::foreground_resolver::ForegroundResolver;
use crate::services::input_service::InputService;
use crate::services::key_relay::{KeyRegistry, KeyRelay};
use crate::services::window_service::WindowService;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;

pub const OVERLAY: &str = "Sunset Simulation Button Overlay";
pub const TARGET: &str = "Sunset Eruption Sony No Skybox";

pub mod keys {
    use crate::events::KeyCode;

    pub const A: KeyCode = KeyCode(30);
    pub const B: KeyCode = KeyCode(48);
    pub const C: KeyCode = KeyCode(46);
    pub const X: KeyCode = KeyCode(45);
    pub const FIVE: KeyCode = KeyCode(6);
    pub const CTRL: KeyCode = KeyCode(29);
    pub const ALT: KeyCode = KeyCode(56);
    pub const SHIFT: KeyCode = KeyCode(42);
    pub const SPACE: KeyCode = KeyCode(57);
    pub const UP: KeyCode = KeyCode(103);
    pub const DOWN: KeyCode = KeyCode(108);
    pub const LEFT: KeyCode = KeyCode(105);
    pub const RIGHT: KeyCode = KeyCode(106);

    pub const REGISTERED: [KeyCode; 13] = [LEFT, RIGHT, UP, DOWN, FIVE, C, CTRL, ALT, SPACE, SHIFT, X, A, B];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    InputFailed(KeyCode),
    Foreground(String),
    Restore(String),
}

impl Call {
    pub fn is_key(&self) -> bool {
        matches!(self, Call::KeyDown(_) | Call::KeyUp(_))
    }
}

/// Общий журнал вызовов с отметками времени tokio (работает с приостановленным временем)
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<(Instant, Call)>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.lock().push((Instant::now(), call));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().iter().map(|(_, call)| call.clone()).collect()
    }

    pub fn stamped(&self) -> Vec<(Instant, Call)> {
        self.0.lock().clone()
    }

    pub fn key_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_key).collect()
    }

    pub fn failed_key_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::InputFailed(_)))
            .count()
    }

    /// Момент первого вхождения вызова
    pub fn time_of(&self, call: &Call) -> Option<Instant> {
        self.0
            .lock()
            .iter()
            .find(|(_, c)| c == call)
            .map(|(at, _)| *at)
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

pub struct RecordingInput {
    journal: Journal,
    fail: bool,
}

impl RecordingInput {
    pub fn new(journal: Journal) -> Self {
        Self { journal, fail: false }
    }

    pub fn failing(journal: Journal) -> Self {
        Self { journal, fail: true }
    }

    fn record(&self, call: Call, key: KeyCode) -> Result<()> {
        if self.fail {
            self.journal.push(Call::InputFailed(key));
            return Err(KioskError::Input(format!("отказ для {}", key)));
        }
        self.journal.push(call);
        Ok(())
    }
}

impl InputService for RecordingInput {
    fn key_down(&mut self, key: KeyCode) -> Result<()> {
        self.record(Call::KeyDown(key), key)
    }

    fn key_up(&mut self, key: KeyCode) -> Result<()> {
        self.record(Call::KeyUp(key), key)
    }
}

pub struct FakeWindows {
    journal: Journal,
    titles: Vec<String>,
    foreground: Mutex<Option<WindowHandle>>,
}

impl FakeWindows {
    pub fn new(journal: Journal, titles: &[&str]) -> Self {
        Self {
            journal,
            titles: titles.iter().map(|t| t.to_string()).collect(),
            foreground: Mutex::new(None),
        }
    }

    pub fn handle(index: usize) -> WindowHandle {
        WindowHandle::new(0x100 + index as u64)
    }

    fn index(&self, window: WindowHandle) -> Result<usize> {
        let index = window.value().wrapping_sub(0x100) as usize;
        if index < self.titles.len() {
            Ok(index)
        } else {
            Err(KioskError::Window(format!("нет окна {}", window)))
        }
    }
}

impl WindowService for FakeWindows {
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        Ok((0..self.titles.len()).map(Self::handle).collect())
    }

    fn title(&self, window: WindowHandle) -> Result<String> {
        Ok(self.titles[self.index(window)?].clone())
    }

    fn set_foreground(&self, window: WindowHandle) -> Result<()> {
        let index = self.index(window)?;
        self.journal.push(Call::Foreground(self.titles[index].clone()));
        *self.foreground.lock() = Some(window);
        Ok(())
    }

    fn foreground(&self) -> Result<Option<WindowHandle>> {
        Ok(*self.foreground.lock())
    }

    fn restore(&self, window: WindowHandle) -> Result<()> {
        let index = self.index(window)?;
        self.journal.push(Call::Restore(self.titles[index].clone()));
        Ok(())
    }
}

/// Реле с оверлеем, терминалом и симуляцией на «рабочем столе»
pub fn relay(journal: &Journal) -> KeyRelay {
    let windows = FakeWindows::new(journal.clone(), &[OVERLAY, "Terminal", TARGET]);
    KeyRelay::new(
        Box::new(RecordingInput::new(journal.clone())),
        ForegroundResolver::new(Box::new(windows)),
        TARGET,
        KeyRegistry::new(keys::REGISTERED),
    )
}

/// Реле без окна симуляции и с отказывающим синтезом ввода
pub fn failing_relay(journal: &Journal) -> KeyRelay {
    let windows = FakeWindows::new(journal.clone(), &[OVERLAY]);
    KeyRelay::new(
        Box::new(RecordingInput::failing(journal.clone())),
        ForegroundResolver::new(Box::new(windows)),
        TARGET,
        KeyRegistry::new(keys::REGISTERED),
    )
}

/// Запоминает каждую смену состояния, отданную адаптеру отрисовки
#[derive(Debug, Clone, Default)]
pub struct RecordingView(Arc<Mutex<Vec<(String, ButtonState)>>>);

impl RecordingView {
    pub fn transitions(&self) -> Vec<(String, ButtonState)> {
        self.0.lock().clone()
    }

    /// Последнее показанное состояние кнопки
    pub fn last_state(&self, name: &str) -> Option<ButtonState> {
        self.0
            .lock()
            .iter()
            .rev()
            .find(|(button, _)| button == name)
            .map(|(_, state)| *state)
    }
}

impl ButtonView for RecordingView {
    fn show(&mut self, button: &Button) {
        self.0.lock().push((button.name().to_string(), button.state()));
    }
}
