use crate::config::TargetConfig;
use crate::error::{KioskError, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tracing::{info, warn};

/// Запуск процесса симуляции при старте оверлея
pub struct ProcessLauncher;

impl ProcessLauncher {
    /// Запустить исполняемый файл; рабочий каталог - каталог самого файла
    pub fn launch(executable: &Path) -> Result<Child> {
        if !executable.is_file() {
            return Err(KioskError::Internal(format!(
                "Исполняемый файл симуляции не найден: {:?}",
                executable
            )));
        }

        let mut command = Command::new(executable);
        if let Some(dir) = executable.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            command.current_dir(dir);
        }

        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        info!("Симуляция запущена: {:?} (pid {})", executable, child.id());
        Ok(child)
    }

    /// Запуск по конфигурации; ошибка не останавливает оверлей
    pub fn launch_target(target: &TargetConfig, dry_run: bool) -> Option<Child> {
        if !target.launch {
            info!("Запуск симуляции отключен в конфигурации");
            return None;
        }
        if dry_run {
            info!("[DRY RUN] Запуск симуляции пропущен: {:?}", target.executable);
            return None;
        }

        match Self::launch(&target.executable) {
            Ok(child) => Some(child),
            Err(e) => {
                warn!("Не удалось запустить симуляцию: {} - продолжаем без неё", e);
                None
            }
        }
    }
}
