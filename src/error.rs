use thiserror::Error;

#[derive(Error, Debug)]
pub enum KioskError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Ошибка оконной системы: {0}")]
    Window(String),

    #[error("Ошибка синтеза ввода: {0}")]
    Input(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl KioskError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(KioskError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, KioskError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! kiosk_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::KioskError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::KioskError::Permission(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::KioskError::ServiceUnavailable(format!($($arg)*))
    };
    (window, $($arg:tt)*) => {
        $crate::error::KioskError::Window(format!($($arg)*))
    };
    (input, $($arg:tt)*) => {
        $crate::error::KioskError::Input(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::KioskError::Internal(format!($($arg)*))
    };
}
