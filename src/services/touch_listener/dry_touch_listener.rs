use crate::error::Result;
use crate::events::{DispatchEvent, PointerEvent};
use crate::model::ButtonId;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

use super::r#trait::TouchListenerTrait;

const TAP_INTERVAL: Duration = Duration::from_secs(5);
const TAP_HOLD: Duration = Duration::from_millis(50);

/// Поочерёдно «нажимает» каждую кнопку раскладки
pub struct DryRunTouchListener {
    button_count: usize,
    sender: mpsc::Sender<DispatchEvent>,
    interval: Duration,
}

impl DryRunTouchListener {
    pub fn new(button_count: usize, sender: mpsc::Sender<DispatchEvent>) -> Self {
        info!("Инициализация DryRunTouchListener");
        Self {
            button_count,
            sender,
            interval: TAP_INTERVAL,
        }
    }

    #[cfg(test)]
    fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - касания эмулируются каждые {:?}", self.interval);
        if self.button_count == 0 {
            return Ok(());
        }

        for index in (0..self.button_count).cycle() {
            sleep(self.interval).await;
            let button = ButtonId(index);
            debug!("Эмулируем касание кнопки {}", button);

            if self.sender.send(PointerEvent::Pressed(button).into()).await.is_err() {
                break;
            }
            sleep(TAP_HOLD).await;
            if self.sender.send(PointerEvent::Released(button).into()).await.is_err() {
                break;
            }
        }

        info!("Диспетчер остановлен, эмуляция касаний завершена");
        Ok(())
    }
}

#[async_trait::async_trait]
impl TouchListenerTrait for DryRunTouchListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
