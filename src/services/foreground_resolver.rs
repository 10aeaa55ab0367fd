use crate::error::Result;
use crate::events::{WindowHandle, WindowInfo};
use crate::services::window_service::WindowService;
use crate::trace_if_enabled;
use tracing::debug;

/// Как сравнивать заголовок окна с искомым именем (с учётом регистра)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleMatch {
    StartsWith,
    Contains,
}

impl TitleMatch {
    pub fn matches(self, title: &str, name: &str) -> bool {
        match self {
            TitleMatch::StartsWith => title.starts_with(name),
            TitleMatch::Contains => title.contains(name),
        }
    }
}

/// Поиск окна верхнего уровня по заголовку и передача ему фокуса
pub struct ForegroundResolver {
    windows: Box<dyn WindowService>,
}

impl ForegroundResolver {
    pub fn new(windows: Box<dyn WindowService>) -> Self {
        Self { windows }
    }

    /// Первое окно (в порядке ОС), заголовок которого подходит под `name`.
    /// Окна, заголовок которых прочитать не удалось, пропускаются.
    pub fn find(&self, name: &str, how: TitleMatch) -> Result<Option<WindowInfo>> {
        for handle in self.windows.top_level_windows()? {
            let title = match self.windows.title(handle) {
                Ok(title) => title,
                Err(e) => {
                    debug!("Не удалось прочитать заголовок окна {}: {}", handle, e);
                    continue;
                }
            };

            trace_if_enabled!("Окно {}: '{}'", handle, title);
            if how.matches(&title, name) {
                return Ok(Some(WindowInfo::new(handle, title)));
            }
        }

        Ok(None)
    }

    /// Поднять первое подходящее окно. `Ok(None)` - окно не найдено, это не ошибка.
    pub fn bring_to_foreground(&self, name: &str, how: TitleMatch) -> Result<Option<WindowHandle>> {
        let Some(window) = self.find(name, how)? else {
            debug!("Окно '{}' ({:?}) не найдено", name, how);
            return Ok(None);
        };

        debug!("Передаём фокус окну {}", window);
        self.windows.set_foreground(window.handle)?;
        Ok(Some(window.handle))
    }

    /// Развернуть первое подходящее окно и поднять его
    pub fn restore_and_raise(&self, name: &str, how: TitleMatch) -> Result<Option<WindowHandle>> {
        let Some(window) = self.find(name, how)? else {
            debug!("Окно '{}' ({:?}) не найдено", name, how);
            return Ok(None);
        };

        self.windows.restore(window.handle)?;
        self.windows.set_foreground(window.handle)?;
        Ok(Some(window.handle))
    }

    /// Удовлетворяет ли текущее окно переднего плана условию
    pub fn is_foreground(&self, name: &str, how: TitleMatch) -> Result<bool> {
        match self.windows.foreground()? {
            Some(handle) => Ok(how.matches(&self.windows.title(handle)?, name)),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{Call, FakeWindows, Journal};

    fn resolver(titles: &[&str]) -> (ForegroundResolver, Journal) {
        let journal = Journal::default();
        let windows = FakeWindows::new(journal.clone(), titles);
        (ForegroundResolver::new(Box::new(windows)), journal)
    }

    #[test]
    fn test_title_match_modes() {
        assert!(TitleMatch::StartsWith.matches("Sunset Overlay v1", "Sunset Overlay"));
        assert!(!TitleMatch::StartsWith.matches("My Sunset Overlay", "Sunset Overlay"));
        assert!(TitleMatch::Contains.matches("My Sunset Overlay", "Sunset Overlay"));
        assert!(!TitleMatch::Contains.matches("sunset overlay", "Sunset Overlay"));
    }

    #[test]
    fn test_first_match_in_os_order_wins() {
        let (resolver, journal) = resolver(&["Editor", "Simulation A", "Simulation B"]);

        let raised = resolver.bring_to_foreground("Simulation", TitleMatch::Contains).unwrap();

        assert_eq!(raised, Some(FakeWindows::handle(1)));
        assert_eq!(journal.calls(), vec![Call::Foreground("Simulation A".to_string())]);
    }

    #[test]
    fn test_prefix_match_skips_substring_only_titles() {
        let (resolver, journal) = resolver(&["Not the Overlay", "Overlay main"]);

        resolver.bring_to_foreground("Overlay", TitleMatch::StartsWith).unwrap();

        assert_eq!(journal.calls(), vec![Call::Foreground("Overlay main".to_string())]);
    }

    #[test]
    fn test_missing_window_is_silent_noop() {
        let (resolver, journal) = resolver(&["Editor"]);

        let raised = resolver.bring_to_foreground("Simulation", TitleMatch::Contains).unwrap();

        assert_eq!(raised, None);
        assert!(journal.calls().is_empty());
    }

    #[test]
    fn test_restore_and_raise_restores_first() {
        let (resolver, journal) = resolver(&["Overlay", "Simulation"]);

        resolver.restore_and_raise("Overlay", TitleMatch::StartsWith).unwrap();

        assert_eq!(
            journal.calls(),
            vec![
                Call::Restore("Overlay".to_string()),
                Call::Foreground("Overlay".to_string()),
            ]
        );
    }

    #[test]
    fn test_is_foreground_reads_current_window() {
        let (resolver, _journal) = resolver(&["Overlay", "Simulation"]);
        assert!(!resolver.is_foreground("Simulation", TitleMatch::Contains).unwrap());

        resolver.bring_to_foreground("Simulation", TitleMatch::Contains).unwrap();
        assert!(resolver.is_foreground("Simulation", TitleMatch::Contains).unwrap());
        assert!(!resolver.is_foreground("Overlay", TitleMatch::StartsWith).unwrap());
    }
}
