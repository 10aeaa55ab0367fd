use crate::error::{KioskError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

const INPUT_DIR: &str = "/dev/input";
const UINPUT_DEVICE: &str = "/dev/uinput";

/// Проверить доступ к сенсорному экрану и uinput.
///
/// Возвращает первую найденную проблему; вызывающий решает, фатальна ли она.
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;
    check_uinput_access()?;
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    if !Path::new(INPUT_DIR).exists() {
        return Err(KioskError::Permission(format!("Директория {} не существует", INPUT_DIR)));
    }

    match fs::read_dir(INPUT_DIR) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", INPUT_DIR);
            Ok(())
        }
        Err(e) => Err(KioskError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            INPUT_DIR, e
        ))),
    }
}

fn check_uinput_access() -> Result<()> {
    if !Path::new(UINPUT_DEVICE).exists() {
        warn!("{} не существует, возможно модуль uinput не загружен", UINPUT_DEVICE);
        return Ok(());
    }

    let metadata = fs::metadata(UINPUT_DEVICE).map_err(|e| {
        KioskError::Permission(format!("Не удалось проверить права доступа к {}: {}", UINPUT_DEVICE, e))
    })?;

    if !mode_allows_group_or_other(metadata.permissions().mode()) {
        return Err(KioskError::Permission(format!(
            "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
            UINPUT_DEVICE
        )));
    }

    info!("Доступ к {} подтвержден", UINPUT_DEVICE);
    Ok(())
}

/// Обычно 660 или 666
fn mode_allows_group_or_other(mode: u32) -> bool {
    mode & 0o006 != 0 || mode & 0o060 != 0
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("Оверлей запущен от имени root");
            for line in setup_commands() {
                warn!("   {}", line);
            }
        }
        Ok(user) => info!("Оверлей запущен от имени пользователя: {}", user),
        Err(_) => warn!("Не удалось определить пользователя"),
    }
}

/// Команды настройки прав для киоск-пользователя
pub fn setup_commands() -> &'static [&'static str] {
    &[
        "sudo usermod -a -G input,uinput $USER",
        "sudo modprobe uinput",
        "echo 'uinput' | sudo tee /etc/modules-load.d/uinput.conf",
    ]
}
