use crate::error::{KioskError, Result};
use crate::events::{WindowHandle, WindowInfo};
use std::process::Command;
use tracing::debug;

pub struct Wmctrl;

impl Wmctrl {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = Command::new("wmctrl").args(["-l"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(KioskError::Window("wmctrl failed".to_string()))
        }
    }

    /// `wmctrl -l`: окна в порядке стека клиентов оконного менеджера
    pub fn list(&self) -> Result<Vec<WindowInfo>> {
        let output = Command::new("wmctrl")
            .args(["-l"])
            .output()
            .map_err(|e| KioskError::Window(format!("wmctrl не найден: {}", e)))?;

        if !output.status.success() {
            return Err(KioskError::Window("wmctrl вернул ошибку".to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().filter_map(parse_list_line).collect())
    }

    pub fn activate(&self, window: WindowHandle) -> Result<()> {
        self.run(&["-i", "-a", &window.to_hex()])
    }

    pub fn restore(&self, window: WindowHandle) -> Result<()> {
        self.run(&["-i", "-r", &window.to_hex(), "-b", "remove,hidden"])
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        debug!("wmctrl {}", args.join(" "));
        let output = Command::new("wmctrl")
            .args(args)
            .output()
            .map_err(|e| KioskError::Window(format!("wmctrl не найден: {}", e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(KioskError::Window(format!("wmctrl {} вернул ошибку: {}", args.join(" "), stderr.trim())))
        }
    }
}

/// Строка `wmctrl -l`: `<id> <desktop> <host> <title...>`; заголовок сохраняется как есть
fn parse_list_line(line: &str) -> Option<WindowInfo> {
    let mut rest = line;
    let mut columns = Vec::with_capacity(3);

    for _ in 0..3 {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        columns.push(&rest[..end]);
        rest = &rest[end..];
    }

    let handle = WindowHandle::parse(columns[0])?;
    let title = rest.strip_prefix(' ').unwrap_or(rest);
    Some(WindowInfo::new(handle, title))
}
