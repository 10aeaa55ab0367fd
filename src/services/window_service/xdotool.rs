use crate::error::{KioskError, Result};
use crate::events::WindowHandle;
use std::process::Command;
use tracing::debug;

pub struct Xdotool;

impl Xdotool {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = Command::new("xdotool").args(["getactivewindow"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(KioskError::Window("xdotool failed".to_string()))
        }
    }

    /// Все видимые окна с непустым именем
    pub fn search_all(&self) -> Result<Vec<WindowHandle>> {
        let stdout = self.output(&["search", "--onlyvisible", "--name", "."])?;
        Ok(stdout.lines().filter_map(WindowHandle::parse).collect())
    }

    pub fn window_name(&self, window: WindowHandle) -> Result<String> {
        let title = self.output(&["getwindowname", &window.value().to_string()])?;
        Ok(title.trim_end_matches('\n').to_string())
    }

    pub fn active_window(&self) -> Result<Option<WindowHandle>> {
        match self.output(&["getactivewindow"]) {
            Ok(stdout) => Ok(WindowHandle::parse(&stdout)),
            // Нет активного окна (например, фокус на корневом окне)
            Err(KioskError::Window(msg)) if msg.contains("exit") => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn activate(&self, window: WindowHandle) -> Result<()> {
        self.output(&["windowactivate", &window.value().to_string()]).map(|_| ())
    }

    pub fn map(&self, window: WindowHandle) -> Result<()> {
        self.output(&["windowmap", &window.value().to_string()]).map(|_| ())
    }

    fn output(&self, args: &[&str]) -> Result<String> {
        debug!("xdotool {}", args.join(" "));
        let output = Command::new("xdotool")
            .args(args)
            .output()
            .map_err(|e| KioskError::Window(format!("xdotool не найден: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KioskError::Window(format!(
                "xdotool {} exit {:?}: {}",
                args.join(" "),
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
