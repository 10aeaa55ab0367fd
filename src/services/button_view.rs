use crate::model::Button;
use tracing::debug;

/// Адаптер отрисовки: получает кнопку после каждой смены состояния и
/// выбирает визуал по `button.visual()`. Логики состояний здесь нет.
pub trait ButtonView: Send {
    fn show(&mut self, button: &Button);
}

/// Отрисовка пикселей не входит в задачи оверлея; смены визуала только логируются
#[derive(Debug, Default)]
pub struct TracingView;

impl ButtonView for TracingView {
    fn show(&mut self, button: &Button) {
        match button.visual() {
            Some(visual) => debug!("Кнопка {} -> {:?} ({})", button, button.state(), visual.path().display()),
            None => debug!("Кнопка {} -> {:?} (без визуала)", button, button.state()),
        }
    }
}
