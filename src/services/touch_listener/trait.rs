use crate::config::Config;
use crate::error::Result;
use crate::events::DispatchEvent;
use crate::model::Layout;
use tokio::sync::mpsc;

/// Источник событий указателя, работающий до закрытия канала диспетчера
#[async_trait::async_trait]
pub trait TouchListenerTrait {
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Фабрика: реальный сенсорный экран или эмуляция нажатий в зависимости от dry_run
pub fn create_touch_listener(
    config: &Config,
    layout: Layout,
    sender: mpsc::Sender<DispatchEvent>,
    dry_run: bool,
) -> Result<Box<dyn TouchListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_touch_listener::DryRunTouchListener::new(
            layout.len(),
            sender,
        )))
    } else {
        Ok(Box::new(super::touch_listener::RealTouchListener::new(
            config, layout, sender,
        )?))
    }
}
