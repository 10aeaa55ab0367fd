use crate::config::Config;
use crate::error::Result;
use crate::events::WindowHandle;

/// Оконная служба ОС
pub trait WindowService: Send {
    /// Окна верхнего уровня в порядке, определённом ОС
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>>;
    fn title(&self, window: WindowHandle) -> Result<String>;
    fn set_foreground(&self, window: WindowHandle) -> Result<()>;
    fn foreground(&self) -> Result<Option<WindowHandle>>;
    /// Вернуть свёрнутое окно в обычное состояние
    fn restore(&self, window: WindowHandle) -> Result<()>;
}

/// Фабрика: реальный рабочий стол X11 или эмуляция в зависимости от dry_run
pub fn create_window_service(config: &Config, dry_run: bool) -> Result<Box<dyn WindowService>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunWindows::new(&[
            config.overlay.window_name.as_str(),
            "Terminal - dry_run",
            config.target.window_name.as_str(),
        ])))
    } else {
        Ok(Box::new(super::desktop::DesktopWindows::new()?))
    }
}
