use crate::error::{KioskError, Result};
use crate::events::{WindowHandle, WindowInfo};
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::WindowService;

/// Эмуляция рабочего стола для режима сухого запуска
pub struct DryRunWindows {
    windows: Vec<WindowInfo>,
    foreground: Mutex<Option<WindowHandle>>,
}

impl DryRunWindows {
    pub fn new(titles: &[&str]) -> Self {
        info!("Dry-run режим - WindowService эмулирует {} окон", titles.len());

        let windows = titles
            .iter()
            .enumerate()
            .map(|(i, title)| WindowInfo::new(WindowHandle::new(0x0100_0001 + i as u64), *title))
            .collect();

        Self {
            windows,
            foreground: Mutex::new(None),
        }
    }

    fn find(&self, window: WindowHandle) -> Result<&WindowInfo> {
        self.windows
            .iter()
            .find(|w| w.handle == window)
            .ok_or_else(|| KioskError::Window(format!("Окно {} не существует", window)))
    }
}

impl WindowService for DryRunWindows {
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        Ok(self.windows.iter().map(|w| w.handle).collect())
    }

    fn title(&self, window: WindowHandle) -> Result<String> {
        Ok(self.find(window)?.title.clone())
    }

    fn set_foreground(&self, window: WindowHandle) -> Result<()> {
        let info = self.find(window)?;
        info!("[DRY RUN] Передний план: {}", info);
        *self.foreground.lock() = Some(window);
        Ok(())
    }

    fn foreground(&self) -> Result<Option<WindowHandle>> {
        Ok(*self.foreground.lock())
    }

    fn restore(&self, window: WindowHandle) -> Result<()> {
        info!("[DRY RUN] Разворачиваем окно {}", self.find(window)?);
        Ok(())
    }
}
