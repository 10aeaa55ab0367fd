use crate::model::{ButtonMode, ButtonState, ButtonVisuals, VisualHandle};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Источник визуалов для пары (кнопка, состояние)
pub trait AssetProvider {
    fn visual(&self, button: &str, state: ButtonState) -> Option<VisualHandle>;
}

/// Ресурсы вида `<dir>/<кнопка>_<состояние>.png`
pub struct FileAssets {
    dir: PathBuf,
}

impl FileAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, button: &str, state: ButtonState) -> PathBuf {
        let state = match state {
            ButtonState::Idle => "idle",
            ButtonState::Clicked => "clicked",
            ButtonState::Active => "active",
        };
        self.dir.join(format!("{}_{}.png", button, state))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AssetProvider for FileAssets {
    fn visual(&self, button: &str, state: ButtonState) -> Option<VisualHandle> {
        let path = self.path_for(button, state);
        if path.is_file() {
            debug!("Ресурс найден: {}", path.display());
            Some(VisualHandle::new(path))
        } else {
            warn!("Не найден ресурс {} - кнопка '{}' останется без визуала", path.display(), button);
            None
        }
    }
}

/// Визуалы кнопки; у непрерывных кнопок состояния ACTIVE нет
pub fn load_visuals(provider: &dyn AssetProvider, button: &str, mode: ButtonMode) -> ButtonVisuals {
    ButtonVisuals {
        idle: provider.visual(button, ButtonState::Idle),
        clicked: provider.visual(button, ButtonState::Clicked),
        active: match mode {
            ButtonMode::Momentary => provider.visual(button, ButtonState::Active),
            ButtonMode::Continuous => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct CountingProvider {
        requested: RefCell<Vec<ButtonState>>,
    }

    impl AssetProvider for CountingProvider {
        fn visual(&self, _button: &str, state: ButtonState) -> Option<VisualHandle> {
            self.requested.borrow_mut().push(state);
            Some(VisualHandle::new(format!("{:?}", state)))
        }
    }

    #[test]
    fn test_path_naming() {
        let assets = FileAssets::new("/srv/assets");
        assert_eq!(
            assets.path_for("timeline_pre", ButtonState::Active),
            PathBuf::from("/srv/assets/timeline_pre_active.png")
        );
    }

    #[test]
    fn test_missing_asset_degrades_to_none() {
        let assets = FileAssets::new("/definitely/not/here");
        let visuals = load_visuals(&assets, "left", ButtonMode::Continuous);
        assert_eq!(visuals, ButtonVisuals::default());
    }

    #[test]
    fn test_continuous_buttons_skip_active_visual() {
        let provider = CountingProvider { requested: RefCell::new(Vec::new()) };

        let visuals = load_visuals(&provider, "up", ButtonMode::Continuous);
        assert!(visuals.active.is_none());
        assert_eq!(*provider.requested.borrow(), vec![ButtonState::Idle, ButtonState::Clicked]);

        let visuals = load_visuals(&provider, "stage1", ButtonMode::Momentary);
        assert!(visuals.active.is_some());
    }
}
