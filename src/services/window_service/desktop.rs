use crate::error::{KioskError, Result};
use crate::events::{WindowHandle, WindowInfo};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::r#trait::WindowService;
use super::wmctrl::Wmctrl;
use super::xdotool::Xdotool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkingMethod {
    /// wmctrl для перечисления и активации, xdotool для активного окна
    Wmctrl,
    Xdotool,
}

/// Рабочий стол X11 через wmctrl/xdotool
pub struct DesktopWindows {
    method: Mutex<WorkingMethod>,
    // Заголовки из последнего перечисления, чтобы не вызывать xdotool на каждое окно
    titles: Mutex<HashMap<WindowHandle, String>>,
    wmctrl: Wmctrl,
    xdotool: Xdotool,
}

impl DesktopWindows {
    pub fn new() -> Result<Self> {
        info!("Инициализация DesktopWindows");

        let wmctrl = Wmctrl::new();
        let xdotool = Xdotool::new();
        let method = Self::detect_working_method(&wmctrl, &xdotool)?;

        Ok(Self {
            method: Mutex::new(method),
            titles: Mutex::new(HashMap::new()),
            wmctrl,
            xdotool,
        })
    }

    fn detect_working_method(wmctrl: &Wmctrl, xdotool: &Xdotool) -> Result<WorkingMethod> {
        info!("Определяем рабочий метод управления окнами...");

        if wmctrl.test().is_ok() {
            info!("Используем wmctrl");
            return Ok(WorkingMethod::Wmctrl);
        }

        if xdotool.test().is_ok() {
            info!("Используем xdotool");
            return Ok(WorkingMethod::Xdotool);
        }

        Err(KioskError::ServiceUnavailable(
            "Ни wmctrl, ни xdotool не работают - управлять фокусом невозможно".to_string(),
        ))
    }

    fn method(&self) -> WorkingMethod {
        *self.method.lock()
    }

    fn remember(&self, windows: &[WindowInfo]) {
        let mut titles = self.titles.lock();
        titles.clear();
        titles.extend(windows.iter().map(|w| (w.handle, w.title.clone())));
    }

    fn enumerate_with(&self, method: WorkingMethod) -> Result<Vec<WindowHandle>> {
        match method {
            WorkingMethod::Wmctrl => {
                let windows = self.wmctrl.list()?;
                self.remember(&windows);
                Ok(windows.into_iter().map(|w| w.handle).collect())
            }
            WorkingMethod::Xdotool => {
                self.titles.lock().clear();
                self.xdotool.search_all()
            }
        }
    }
}

impl WindowService for DesktopWindows {
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        let method = self.method();
        match self.enumerate_with(method) {
            Ok(windows) => Ok(windows),
            Err(e) if method == WorkingMethod::Wmctrl => {
                warn!("wmctrl перестал работать: {}. Переключаемся на xdotool", e);
                let windows = self.enumerate_with(WorkingMethod::Xdotool)?;
                *self.method.lock() = WorkingMethod::Xdotool;
                Ok(windows)
            }
            Err(e) => Err(e),
        }
    }

    fn title(&self, window: WindowHandle) -> Result<String> {
        if let Some(title) = self.titles.lock().get(&window) {
            return Ok(title.clone());
        }
        self.xdotool.window_name(window)
    }

    fn set_foreground(&self, window: WindowHandle) -> Result<()> {
        debug!("Поднимаем окно {} на передний план", window);
        match self.method() {
            WorkingMethod::Wmctrl => self.wmctrl.activate(window),
            WorkingMethod::Xdotool => self.xdotool.activate(window),
        }
    }

    fn foreground(&self) -> Result<Option<WindowHandle>> {
        self.xdotool.active_window()
    }

    fn restore(&self, window: WindowHandle) -> Result<()> {
        match self.method() {
            WorkingMethod::Wmctrl => self.wmctrl.restore(window),
            WorkingMethod::Xdotool => self.xdotool.map(window),
        }
    }
}
