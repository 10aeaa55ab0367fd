use crate::error::{KioskError, Result};
use evdev::{AbsoluteAxisCode, KeyCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти сенсорный экран: явный путь или `"auto"`
    pub fn find_touch_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                KioskError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        Self::auto_find_touchscreen()
    }

    fn auto_find_touchscreen() -> Result<PathBuf> {
        info!("Начинаем автопоиск сенсорного экрана...");

        if let Ok(device) = Self::find_by_id() {
            info!("Найден сенсорный экран по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices() {
            info!("Найден сенсорный экран среди event устройств: {:?}", device);
            return Ok(device);
        }

        KioskError::device_not_found(
            "Не удалось найти сенсорный экран. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return KioskError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| KioskError::Permission(format!("Нет доступа к /dev/input/by-id: {}", e)))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_lowercase();

            if name.contains("touch") && name.contains("event") && !name.contains("touchpad") {
                debug!("Потенциальный сенсорный экран: {:?}", path);
                if Self::is_device_accessible(&path) && Self::is_touch_device(&path) {
                    candidates.push(path);
                } else {
                    warn!("Устройство {:?} недоступно или не похоже на сенсорный экран", path);
                }
            }
        }

        candidates.sort();
        match candidates.into_iter().next() {
            Some(path) => Ok(path),
            None => KioskError::device_not_found("Сенсорный экран не найден в by-id"),
        }
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        let input_dir = Path::new("/dev/input");

        let entries = fs::read_dir(input_dir)
            .map_err(|e| KioskError::Permission(format!("Нет доступа к /dev/input: {}", e)))?;

        let mut event_devices = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_event = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with("event"));
            if is_event {
                event_devices.push(path);
            }
        }

        event_devices.sort();

        for device_path in event_devices {
            debug!("Проверяем устройство: {:?}", device_path);
            if Self::is_device_accessible(&device_path) && Self::is_touch_device(&device_path) {
                return Ok(device_path);
            }
        }

        KioskError::device_not_found("Не найден сенсорный экран среди event устройств")
    }

    /// Абсолютные оси X/Y и касание; тачпады исключаются по имени
    fn is_touch_device(device_path: &Path) -> bool {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let device_name = device.name().unwrap_or("Unknown").to_lowercase();
                if device_name.contains("touchpad") || device_name.contains("trackpad") {
                    debug!("Исключаем тачпад: {:?} ({})", device_path, device_name);
                    return false;
                }

                let has_axes = device.supported_absolute_axes().is_some_and(|axes| {
                    axes.contains(AbsoluteAxisCode::ABS_X) && axes.contains(AbsoluteAxisCode::ABS_Y)
                });
                let has_touch = device
                    .supported_keys()
                    .is_some_and(|keys| keys.contains(KeyCode::BTN_TOUCH));

                if has_axes && has_touch {
                    info!("Устройство {:?} подходит как сенсорный экран ({})", device_path, device_name);
                    true
                } else {
                    debug!("Устройство {:?} не подходит (имя: {})", device_path, device_name);
                    false
                }
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_touch_device_with_missing_path() {
        let result = DeviceFinder::find_touch_device("/non/existent/event99");
        assert!(matches!(result, Err(KioskError::DeviceNotFound(_))));
    }

    #[test]
    fn test_find_touch_device_with_existing_path() {
        let path = std::env::temp_dir();
        let found = DeviceFinder::find_touch_device(path.to_str().unwrap()).unwrap();
        assert_eq!(found, path);
    }
}
