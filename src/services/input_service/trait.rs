use crate::error::Result;
use crate::events::KeyCode;
use crate::services::VirtualDevice;

/// Служба синтеза ввода ОС
pub trait InputService: Send {
    fn key_down(&mut self, key: KeyCode) -> Result<()>;
    fn key_up(&mut self, key: KeyCode) -> Result<()>;
}

/// Фабрика: uinput-клавиатура или журналирующая заглушка в зависимости от dry_run
pub fn create_input_service(device_name: &str, dry_run: bool) -> Result<Box<dyn InputService>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunInput::new()))
    } else {
        Ok(Box::new(VirtualDevice::new(device_name)?))
    }
}
