use crate::error::{KioskError, Result};
use crate::events::{KeyCode, KeyState, VirtualKeyEvent};
use crate::services::input_service::InputService;
use tracing::{debug, info};

// Коды типов событий linux/input-event-codes.h
const EV_SYN: i32 = 0x00;
const EV_KEY: i32 = 0x01;
const SYN_REPORT: i32 = 0;

/// Виртуальная uinput-клавиатура, через которую симуляция получает клавиши
pub struct VirtualDevice {
    device: uinput::Device,
    device_name: String,
}

impl VirtualDevice {
    pub fn new(device_name: &str) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}'", device_name);

        Ok(Self {
            device: Self::create_virtual_device(device_name)?,
            device_name: device_name.to_string(),
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let virtual_device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| KioskError::Internal(format!("Не удалось создать виртуальное устройство '{}': {}", device_name, e)))?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(virtual_device)
    }

    pub fn send_event(&mut self, event: VirtualKeyEvent) -> Result<()> {
        debug!("Обработка виртуального события: {}", event);

        let keycode = event.key_code.value() as i32;

        // Отправляем событие клавиши
        self.device
            .write(EV_KEY, keycode, event.state.evdev_value())
            .map_err(|e| crate::kiosk_error!(input, "Не удалось отправить событие клавиши {}: {}", event.key_code, e))?;

        // Синхронизируем события
        self.device
            .write(EV_SYN, SYN_REPORT, 0)
            .map_err(|e| crate::kiosk_error!(input, "Не удалось синхронизировать события: {}", e))?;

        debug!("Виртуальное событие {} отправлено через '{}'", event.key_code, self.device_name);
        Ok(())
    }
}

impl InputService for VirtualDevice {
    fn key_down(&mut self, key: KeyCode) -> Result<()> {
        self.send_event(VirtualKeyEvent::new(key, KeyState::Pressed))
    }

    fn key_up(&mut self, key: KeyCode) -> Result<()> {
        self.send_event(VirtualKeyEvent::new(key, KeyState::Released))
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        info!("Закрытие виртуального устройства '{}'", self.device_name);
    }
}
