use crate::error::Result;
use crate::events::{KeyCode, VirtualKeyEvent};
use tracing::info;

use super::r#trait::InputService;

/// Ничего не отправляет в ОС, только пишет события в лог
#[derive(Debug, Default)]
pub struct DryRunInput {
    sent: u64,
}

impl DryRunInput {
    pub fn new() -> Self {
        info!("Инициализация DryRunInput - синтез клавиш эмулируется");
        Self::default()
    }

    fn log(&mut self, event: VirtualKeyEvent) {
        self.sent += 1;
        info!("[DRY RUN] Виртуальное событие #{}: {}", self.sent, event);
    }
}

impl InputService for DryRunInput {
    fn key_down(&mut self, key: KeyCode) -> Result<()> {
        self.log(VirtualKeyEvent::press(key));
        Ok(())
    }

    fn key_up(&mut self, key: KeyCode) -> Result<()> {
        self.log(VirtualKeyEvent::release(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_never_fails_and_counts() {
        let mut input = DryRunInput::new();
        assert!(input.key_down(KeyCode::new(57)).is_ok());
        assert!(input.key_up(KeyCode::new(57)).is_ok());
        assert_eq!(input.sent, 2);
    }
}
