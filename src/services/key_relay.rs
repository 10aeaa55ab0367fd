use crate::debug_if_enabled;
use crate::error::{KioskError, Result};
use crate::events::KeyCode;
use crate::model::Button;
use crate::services::foreground_resolver::{ForegroundResolver, TitleMatch};
use crate::services::input_service::InputService;
use smallvec::SmallVec;
use tracing::{error, warn};

/// Фиксированный набор клавиш, которые оверлей вообще способен нажать
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRegistry {
    keys: SmallVec<[KeyCode; 16]>,
}

impl KeyRegistry {
    pub fn new(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        let mut keys: SmallVec<[KeyCode; 16]> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        Self { keys }
    }

    pub fn contains(&self, key: KeyCode) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Набор обязан покрывать клавиши всех кнопок
    pub fn ensure_covers(&self, buttons: &[Button]) -> Result<()> {
        match buttons.iter().find(|b| !self.contains(b.key())) {
            Some(button) => Err(KioskError::Internal(format!(
                "Клавиша кнопки {} не зарегистрирована",
                button
            ))),
            None => Ok(()),
        }
    }
}

/// Передача клавиш внешней симуляции.
///
/// Перед каждым событием симуляция получает фокус ОС. Ошибки фокуса и синтеза
/// только логируются: восстановление - задача сторожевого таймера.
pub struct KeyRelay {
    input: Box<dyn InputService>,
    resolver: ForegroundResolver,
    target: String,
    registry: KeyRegistry,
}

impl KeyRelay {
    pub fn new(
        input: Box<dyn InputService>,
        resolver: ForegroundResolver,
        target: impl Into<String>,
        registry: KeyRegistry,
    ) -> Self {
        Self {
            input,
            resolver,
            target: target.into(),
            registry,
        }
    }

    pub fn resolver(&self) -> &ForegroundResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if !self.is_registered(key) {
            return;
        }
        self.ensure_target_focus();
        debug_if_enabled!("key-down {}", key);
        if let Err(e) = self.input.key_down(key) {
            error!("Не удалось отправить нажатие {}: {}", key, e);
        }
    }

    pub fn lift_key(&mut self, key: KeyCode) {
        if !self.is_registered(key) {
            return;
        }
        self.ensure_target_focus();
        debug_if_enabled!("key-up {}", key);
        if let Err(e) = self.input.key_up(key) {
            error!("Не удалось отправить отпускание {}: {}", key, e);
        }
    }

    /// Отпустить каждую зарегистрированную клавишу, независимо от состояния модели
    pub fn all_keys_up(&mut self) {
        debug_if_enabled!("Отпускаем все {} зарегистрированных клавиш", self.registry.len());
        let keys: SmallVec<[KeyCode; 16]> = self.registry.iter().collect();
        for key in keys {
            self.lift_key(key);
        }
    }

    fn is_registered(&self, key: KeyCode) -> bool {
        let registered = self.registry.contains(key);
        if !registered {
            warn!("Клавиша {} не входит в зарегистрированный набор - пропускаем", key);
        }
        registered
    }

    fn ensure_target_focus(&self) {
        match self.resolver.is_foreground(&self.target, TitleMatch::Contains) {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => debug_if_enabled!("Не удалось определить окно переднего плана: {}", e),
        }

        match self.resolver.bring_to_foreground(&self.target, TitleMatch::Contains) {
            Ok(Some(_)) => {}
            Ok(None) => debug_if_enabled!("Окно симуляции '{}' не найдено", self.target),
            Err(e) => warn!("Не удалось передать фокус симуляции '{}': {}", self.target, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{self, keys, Call, Journal};

    #[test]
    fn test_registry_dedups_and_sorts() {
        let registry = KeyRegistry::new([keys::X, keys::LEFT, keys::X]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(keys::LEFT));
        assert!(!registry.contains(keys::SPACE));
    }

    #[test]
    fn test_registry_must_cover_buttons() {
        let registry = KeyRegistry::new([keys::LEFT]);
        assert!(registry.ensure_covers(&[Button::continuous("l", keys::LEFT)]).is_ok());
        assert!(registry.ensure_covers(&[Button::momentary("x", keys::X)]).is_err());
    }

    #[test]
    fn test_press_focuses_target_first() {
        let journal = Journal::default();
        let mut relay = testing::relay(&journal);

        relay.press_key(keys::LEFT);

        assert_eq!(
            journal.calls(),
            vec![
                Call::Foreground(testing::TARGET.to_string()),
                Call::KeyDown(keys::LEFT),
            ]
        );
    }

    #[test]
    fn test_focus_skipped_when_target_already_foreground() {
        let journal = Journal::default();
        let mut relay = testing::relay(&journal);

        relay.press_key(keys::LEFT);
        relay.lift_key(keys::LEFT);

        assert_eq!(journal.key_calls(), vec![Call::KeyDown(keys::LEFT), Call::KeyUp(keys::LEFT)]);
        assert_eq!(journal.calls().len(), 3);
    }

    #[test]
    fn test_unregistered_key_is_not_sent() {
        let journal = Journal::default();
        let mut relay = testing::relay(&journal);

        relay.press_key(KeyCode::new(59));

        assert!(journal.calls().is_empty());
    }

    #[test]
    fn test_all_keys_up_lifts_each_registered_key_once() {
        let journal = Journal::default();
        let mut relay = testing::relay(&journal);

        relay.all_keys_up();

        let ups: Vec<_> = journal.key_calls();
        assert_eq!(ups.len(), relay.registry().len());
        for key in relay.registry().iter() {
            assert_eq!(ups.iter().filter(|c| **c == Call::KeyUp(key)).count(), 1);
        }
    }

    #[test]
    fn test_all_keys_up_survives_failures_and_missing_target() {
        let journal = Journal::default();
        let mut relay = testing::failing_relay(&journal);

        relay.all_keys_up();

        // Симуляции нет, каждое отпускание падает - но все попытки сделаны
        assert_eq!(journal.failed_key_attempts(), relay.registry().len());
    }
}
