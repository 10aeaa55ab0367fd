//! Единственный контекст диспетчеризации.
//!
//! Задача владеет контроллером и сторожевым таймером и по очереди обрабатывает
//! события указателя, срок отложенного отпускания и срок простоя. События
//! обрабатываются раньше таймеров, ставших должными в тот же момент.

use crate::events::DispatchEvent;
use crate::services::controller::InteractionController;
use crate::services::watchdog::FocusWatchdog;
use crate::trace_if_enabled;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Ёмкость очереди событий указателя
pub const EVENT_QUEUE_CAPACITY: usize = 256;

pub struct Dispatcher {
    controller: InteractionController,
    watchdog: FocusWatchdog,
    events: mpsc::Receiver<DispatchEvent>,
}

impl Dispatcher {
    pub fn new(
        controller: InteractionController,
        watchdog: FocusWatchdog,
        events: mpsc::Receiver<DispatchEvent>,
    ) -> Self {
        Self {
            controller,
            watchdog,
            events,
        }
    }

    pub fn channel() -> (mpsc::Sender<DispatchEvent>, mpsc::Receiver<DispatchEvent>) {
        mpsc::channel(EVENT_QUEUE_CAPACITY)
    }

    pub async fn run(mut self) {
        info!("Диспетчер запущен");

        loop {
            let idle_deadline = self.controller.idle_deadline();
            let release_deadline = self.controller.release_deadline();

            tokio::select! {
                biased;

                event = self.events.recv() => match event {
                    Some(DispatchEvent::Pointer(event)) => {
                        self.controller.handle_pointer(event, Instant::now());
                    }
                    Some(DispatchEvent::Shutdown) => {
                        info!("Получен сигнал остановки диспетчера");
                        break;
                    }
                    None => {
                        debug!("Все источники событий закрыты");
                        break;
                    }
                },

                _ = sleep_until(release_deadline.unwrap_or(idle_deadline)), if release_deadline.is_some() => {
                    let fired = self.controller.fire_deferred_release(Instant::now());
                    trace_if_enabled!("Отложенное отпускание: {}", fired);
                }

                _ = sleep_until(idle_deadline) => {
                    let fired_at = Instant::now();
                    self.watchdog.fire(self.controller.relay_mut()).await;
                    self.controller.restart_idle_timer(fired_at);
                }
            }
        }

        // Ни одна клавиша не должна остаться зажатой после выхода
        self.controller.relay_mut().all_keys_up();
        info!(
            "Диспетчер остановлен, срабатываний сторожевого таймера: {}",
            self.watchdog.firings()
        );
    }
}
