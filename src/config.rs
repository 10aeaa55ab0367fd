use crate::events::KeyCode;
use crate::model::{ButtonMode, Layout, Rect};
use crate::services::keycode_map::KeycodeMap;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub target: TargetConfig,
    pub overlay: OverlayConfig,
    pub timing: TimingConfig,
    pub input: InputConfig,
    pub keys: KeysConfig,
    #[serde(default)]
    pub buttons: Vec<ButtonConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Внешняя симуляция, которой передаются клавиши
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Подстрока заголовка окна симуляции
    pub window_name: String,
    pub executable: PathBuf,
    #[serde(default = "default_true")]
    pub launch: bool,
}

/// Собственное окно оверлея
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverlayConfig {
    /// Префикс заголовка окна оверлея
    pub window_name: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub content_width: u32,
    pub content_height: u32,
    pub assets_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    pub momentary_pulse_ms: u64,
    pub watchdog_idle_ms: u64,
    pub focus_settle_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeysConfig {
    /// Все клавиши, которые оверлей вообще способен нажать
    pub registered: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonConfig {
    pub name: String,
    pub key: String,
    pub mode: ButtonMode,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ButtonConfig {
    fn new(name: &str, key: &str, mode: ButtonMode, rect: Rect) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            mode,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

fn default_true() -> bool {
    true
}

impl TimingConfig {
    pub fn momentary_pulse(&self) -> Duration {
        Duration::from_millis(self.momentary_pulse_ms)
    }

    pub fn watchdog_idle(&self) -> Duration {
        Duration::from_millis(self.watchdog_idle_ms)
    }

    pub fn focus_settle(&self) -> Duration {
        Duration::from_millis(self.focus_settle_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        use ButtonMode::{Continuous, Momentary};

        // Линия времени шириной 938px по центру области симуляции
        let timeline = (1360 - 938) / 2;

        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            target: TargetConfig {
                window_name: "Sunset Eruption Sony No Skybox".to_string(),
                executable: PathBuf::from("C:/ERUPTION SEQUENCE/Sunset Eruption Sony No Skybox.exe"),
                launch: true,
            },
            overlay: OverlayConfig {
                window_name: "Sunset Simulation Button Overlay".to_string(),
                screen_width: 1920,
                screen_height: 1080,
                content_width: 1360,
                content_height: 768,
                assets_dir: PathBuf::from("assets"),
            },
            timing: TimingConfig {
                momentary_pulse_ms: 100,
                watchdog_idle_ms: 10_000,
                focus_settle_ms: 10,
            },
            input: InputConfig {
                device_path: "auto".to_string(),
            },
            keys: KeysConfig {
                registered: ["left", "right", "up", "down", "5", "c", "ctrl", "alt", "space", "shift", "x"]
                    .iter()
                    .map(|key| key.to_string())
                    .collect(),
            },
            buttons: vec![
                // Кнопки вращения намеренно перекрёстные: симуляция крутит камеру в обратную сторону
                ButtonConfig::new("left", "right", Continuous, Rect::new(0, 0, 100, 100)),
                ButtonConfig::new("right", "left", Continuous, Rect::new(100, 0, 100, 100)),
                ButtonConfig::new("up", "up", Continuous, Rect::new(0, 100, 100, 120)),
                ButtonConfig::new("down", "down", Continuous, Rect::new(100, 100, 100, 120)),
                ButtonConfig::new("in", "5", Continuous, Rect::new(0, 220, 100, 150)),
                ButtonConfig::new("out", "c", Continuous, Rect::new(100, 220, 100, 150)),
                ButtonConfig::new("timeline_summ", "x", Momentary, Rect::new(timeline, 525, 168, 200)),
                ButtonConfig::new("timeline_pre", "ctrl", Momentary, Rect::new(timeline + 168, 525, 197, 200)),
                ButtonConfig::new("timeline_stage1", "alt", Momentary, Rect::new(timeline + 365, 525, 188, 200)),
                ButtonConfig::new("timeline_stage2", "space", Momentary, Rect::new(timeline + 553, 525, 197, 200)),
                ButtonConfig::new("timeline_stage3", "shift", Momentary, Rect::new(timeline + 750, 525, 188, 200)),
            ],
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("KIOSK_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "full" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Имена окон
        if self.target.window_name.trim().is_empty() {
            anyhow::bail!("target.window_name не может быть пустым");
        }
        if self.overlay.window_name.trim().is_empty() {
            anyhow::bail!("overlay.window_name не может быть пустым");
        }

        // Валидация таймингов
        if self.timing.momentary_pulse_ms == 0 {
            anyhow::bail!("momentary_pulse_ms должно быть больше 0");
        }
        if self.timing.watchdog_idle_ms == 0 {
            anyhow::bail!("watchdog_idle_ms должно быть больше 0");
        }
        if self.timing.focus_settle_ms >= self.timing.watchdog_idle_ms {
            anyhow::bail!("focus_settle_ms должно быть меньше watchdog_idle_ms");
        }

        // Геометрия
        if self.overlay.content_width == 0 || self.overlay.content_height == 0 {
            anyhow::bail!("Область симуляции не может быть пустой");
        }
        if self.overlay.content_width > self.overlay.screen_width
            || self.overlay.content_height > self.overlay.screen_height
        {
            anyhow::bail!(
                "Область симуляции {}x{} больше экрана {}x{}",
                self.overlay.content_width,
                self.overlay.content_height,
                self.overlay.screen_width,
                self.overlay.screen_height
            );
        }

        // Зарегистрированные клавиши
        let registered = self.registered_keys()?;

        // Валидация кнопок
        let mut names = HashSet::new();
        for (i, button) in self.buttons.iter().enumerate() {
            if button.name.is_empty() {
                anyhow::bail!("Пустое имя кнопки #{}", i + 1);
            }
            if !names.insert(button.name.as_str()) {
                anyhow::bail!("Повторяющееся имя кнопки '{}'", button.name);
            }
            if button.width == 0 || button.height == 0 {
                anyhow::bail!("Кнопка '{}' имеет нулевой размер", button.name);
            }

            let key = KeycodeMap::get_keycode(&button.key)
                .map_err(|e| anyhow::anyhow!("Кнопка '{}': {}", button.name, e))?;
            if !registered.contains(&key) {
                anyhow::bail!(
                    "Клавиша '{}' кнопки '{}' отсутствует в keys.registered",
                    button.key,
                    button.name
                );
            }
        }

        Ok(())
    }

    /// Зарегистрированный набор клавиш в виде кодов evdev (без повторов)
    pub fn registered_keys(&self) -> Result<BTreeSet<KeyCode>> {
        self.keys
            .registered
            .iter()
            .map(|name| {
                KeycodeMap::get_keycode(name)
                    .map_err(|e| anyhow::anyhow!("keys.registered: {}", e))
            })
            .collect()
    }

    /// Код клавиши кнопки; имя уже проверено в `validate`
    pub fn button_key(&self, button: &ButtonConfig) -> Result<KeyCode> {
        KeycodeMap::get_keycode(&button.key).map_err(|e| anyhow::anyhow!(e))
    }

    pub fn layout(&self) -> Layout {
        Layout::centered(
            self.overlay.screen_width,
            self.overlay.screen_height,
            self.overlay.content_width,
            self.overlay.content_height,
            self.buttons.iter().map(ButtonConfig::rect),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buttons.len(), 11);
        assert_eq!(config.registered_keys().unwrap().len(), 11);
    }

    #[test]
    fn test_default_timeline_is_centered() {
        let config = Config::default();
        let summary = config.buttons.iter().find(|b| b.name == "timeline_summ").unwrap();
        let stage3 = config.buttons.iter().find(|b| b.name == "timeline_stage3").unwrap();

        assert_eq!(summary.x, 211);
        assert_eq!(stage3.x + stage3.width as i32, 211 + 938);
    }

    #[test]
    fn test_button_key_must_be_registered() {
        let mut config = Config::default();
        config.keys.registered.retain(|k| k != "space");

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("space"), "{}", err);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut config = Config::default();
        config.buttons[0].key = "hyper".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_button_names_rejected() {
        let mut config = Config::default();
        config.buttons[1].name = config.buttons[0].name.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timings_rejected() {
        let mut config = Config::default();
        config.timing.momentary_pulse_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.timing.watchdog_idle_ms = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_content_must_fit_screen() {
        let mut config = Config::default();
        config.overlay.screen_width = 1024;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_merges_toml_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "kiosk.toml",
                r#"
                [timing]
                momentary_pulse_ms = 150
                watchdog_idle_ms = 20000
                focus_settle_ms = 10

                [target]
                window_name = "Demo"
                executable = "/opt/demo/run"
                launch = false
                "#,
            )?;
            jail.set_env("KIOSK_OVERLAY__WINDOW_NAME", "Demo Overlay");

            let config = Config::load("kiosk.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.timing.momentary_pulse_ms, 150);
            assert_eq!(config.target.window_name, "Demo");
            assert!(!config.target.launch);
            assert_eq!(config.overlay.window_name, "Demo Overlay");
            assert_eq!(config.buttons.len(), 11);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load("absent.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.timing.watchdog_idle_ms, 10_000);
            Ok(())
        });
    }
}
