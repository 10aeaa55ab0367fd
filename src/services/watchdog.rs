//! Сторожевой таймер фокуса.
//!
//! После `interval` без взаимодействия оверлей ненадолго берёт фокус себе
//! (иначе ОС может запретить передачу фокуса другому окну), затем отдаёт его
//! симуляции и отпускает все зарегистрированные клавиши. Состояние кнопок
//! и контроллера при этом не читается и не меняется.

use crate::services::foreground_resolver::TitleMatch;
use crate::services::key_relay::KeyRelay;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Отсчёт простоя; перезапускается каждым нажатием и отпусканием
#[derive(Debug, Clone, Copy)]
pub struct IdleTimer {
    interval: Duration,
    deadline: Instant,
}

impl IdleTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            deadline: now + interval,
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.deadline = now + self.interval;
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

pub struct FocusWatchdog {
    overlay_name: String,
    settle: Duration,
    firings: u64,
}

impl FocusWatchdog {
    pub fn new(overlay_name: impl Into<String>, settle: Duration) -> Self {
        Self {
            overlay_name: overlay_name.into(),
            settle,
            firings: 0,
        }
    }

    pub fn firings(&self) -> u64 {
        self.firings
    }

    pub async fn fire(&mut self, relay: &mut KeyRelay) {
        self.firings += 1;
        info!("Сторожевой таймер #{}: восстанавливаем фокус симуляции", self.firings);

        match relay.resolver().restore_and_raise(&self.overlay_name, TitleMatch::StartsWith) {
            Ok(Some(window)) => debug!("Оверлей {} поднят", window),
            Ok(None) => debug!("Окно оверлея '{}' не найдено", self.overlay_name),
            Err(e) => warn!("Не удалось поднять окно оверлея: {}", e),
        }

        // Даём ОС применить смену фокуса
        sleep(self.settle).await;

        match relay.resolver().bring_to_foreground(relay.target(), TitleMatch::Contains) {
            Ok(Some(window)) => debug!("Симуляция {} на переднем плане", window),
            Ok(None) => warn!("Окно симуляции '{}' не найдено", relay.target()),
            Err(e) => warn!("Не удалось передать фокус симуляции: {}", e),
        }

        relay.all_keys_up();
    }
}
