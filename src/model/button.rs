use crate::events::KeyCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Индекс кнопки в наборе контроллера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(pub usize);

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Режим кнопки, задаётся один раз при создании
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonMode {
    /// Клавиша удерживается ровно столько, сколько удерживается кнопка
    Continuous,
    /// Радио-кнопка: короткий импульс клавиши, после отпускания остаётся выбранной
    Momentary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonState {
    Idle,
    Clicked,
    /// Только для `ButtonMode::Momentary`
    Active,
}

/// Непрозрачный визуальный ресурс; ядро только хранит и передаёт его
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualHandle(Arc<Path>);

impl VisualHandle {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(Arc::from(path.as_ref()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Визуалы по состояниям; `None` означает деградировавший (отсутствующий) ресурс
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonVisuals {
    pub idle: Option<VisualHandle>,
    pub clicked: Option<VisualHandle>,
    pub active: Option<VisualHandle>,
}

impl ButtonVisuals {
    pub fn for_state(&self, state: ButtonState) -> Option<&VisualHandle> {
        match state {
            ButtonState::Idle => self.idle.as_ref(),
            ButtonState::Clicked => self.clicked.as_ref(),
            ButtonState::Active => self.active.as_ref(),
        }
    }
}

/// Модель одной экранной кнопки. Поведения нет, только текущее состояние.
#[derive(Debug, Clone)]
pub struct Button {
    name: String,
    key: KeyCode,
    mode: ButtonMode,
    state: ButtonState,
    visuals: ButtonVisuals,
}

impl Button {
    pub fn new(name: impl Into<String>, key: KeyCode, mode: ButtonMode) -> Self {
        Self {
            name: name.into(),
            key,
            mode,
            state: ButtonState::Idle,
            visuals: ButtonVisuals::default(),
        }
    }

    pub fn continuous(name: impl Into<String>, key: KeyCode) -> Self {
        Self::new(name, key, ButtonMode::Continuous)
    }

    pub fn momentary(name: impl Into<String>, key: KeyCode) -> Self {
        Self::new(name, key, ButtonMode::Momentary)
    }

    pub fn with_visuals(mut self, visuals: ButtonVisuals) -> Self {
        self.visuals = visuals;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    pub fn mode(&self) -> ButtonMode {
        self.mode
    }

    pub fn is_momentary(&self) -> bool {
        self.mode == ButtonMode::Momentary
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn visual(&self) -> Option<&VisualHandle> {
        self.visuals.for_state(self.state)
    }

    /// Меняется только контроллером. ACTIVE у непрерывной кнопки сводится к IDLE.
    pub(crate) fn set_state(&mut self, state: ButtonState) {
        self.state = match (self.mode, state) {
            (ButtonMode::Continuous, ButtonState::Active) => ButtonState::Idle,
            (_, state) => state,
        };
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' [{}, {:?}]", self.name, self.key, self.mode)
    }
}
