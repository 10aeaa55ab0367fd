use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{KeyCode, PointerEvent};
use crate::model::{Button, ButtonId, ButtonState};
use crate::services::button_view::ButtonView;
use crate::services::key_relay::KeyRelay;
use crate::services::watchdog::IdleTimer;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Отложенное отпускание клавиши радио-кнопки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRelease {
    pub button: ButtonId,
    pub key: KeyCode,
    /// Момент нажатия + длительность импульса
    pub due: Instant,
}

/// Контроллер взаимодействия: единственный владелец состояний кнопок.
///
/// Все методы синхронны и вызываются из одного контекста диспетчеризации,
/// поэтому блокировки не нужны. Инварианты после каждого вызова:
/// не больше одной кнопки CLICKED, не больше одной ACTIVE (и она радио-кнопка),
/// клавиша уходящей кнопки отпускается раньше, чем нажимается новая.
pub struct InteractionController {
    buttons: Vec<Button>,
    relay: KeyRelay,
    view: Box<dyn ButtonView>,
    clicked: Option<ButtonId>,
    active: Option<ButtonId>,
    pending_release: Option<PendingRelease>,
    idle: IdleTimer,
    pulse: Duration,
}

impl InteractionController {
    pub fn new(
        buttons: Vec<Button>,
        relay: KeyRelay,
        view: Box<dyn ButtonView>,
        pulse: Duration,
        idle: IdleTimer,
    ) -> Result<Self> {
        relay.registry().ensure_covers(&buttons)?;
        info!(
            "Инициализация InteractionController: {} кнопок, импульс {}мс, простой {}с",
            buttons.len(),
            pulse.as_millis(),
            idle.interval().as_secs()
        );

        Ok(Self {
            buttons,
            relay,
            view,
            clicked: None,
            active: None,
            pending_release: None,
            idle,
            pulse,
        })
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) {
        debug_if_enabled!("Событие указателя: {}", event);
        match event {
            PointerEvent::Pressed(button) => self.on_press(button, now),
            PointerEvent::Released(button) => self.on_release(button, now),
            PointerEvent::Entered { button, held } => self.on_drag_enter(button, held, now),
            PointerEvent::Exited { button, held } => self.on_drag_leave(button, held, now),
        }
    }

    pub fn on_press(&mut self, id: ButtonId, now: Instant) {
        self.idle.restart(now);

        let Some(button) = self.buttons.get(id.0) else {
            warn!("Нажатие неизвестной кнопки {}", id);
            return;
        };
        let key = button.key();
        let momentary = button.is_momentary();
        info!("Нажатие кнопки {}", button);

        // Незавершённый импульс прошлой радио-кнопки отпускается сразу
        if let Some(pending) = self.pending_release.take() {
            debug!("Отложенное отпускание {} заменено новым нажатием", pending.key);
            self.relay.lift_key(pending.key);
        }

        // Выбор новой радио-кнопки снимает выбор с прежней
        if momentary {
            if let Some(previous) = self.active.filter(|active| *active != id) {
                self.set_state(previous, ButtonState::Idle);
                self.active = None;
            }
        }

        if let Some(previous) = self.clicked.take() {
            // Клавиша радио-кнопки уже отпущена импульсом
            if !self.buttons[previous.0].is_momentary() {
                let previous_key = self.buttons[previous.0].key();
                self.relay.lift_key(previous_key);
            }
            if previous != id {
                let state = if self.active == Some(previous) {
                    ButtonState::Active
                } else {
                    ButtonState::Idle
                };
                self.set_state(previous, state);
            }
        }

        self.set_state(id, ButtonState::Clicked);
        self.clicked = Some(id);
        self.relay.press_key(key);

        if momentary {
            self.active = Some(id);
            self.pending_release = Some(PendingRelease {
                button: id,
                key,
                due: now + self.pulse,
            });
        }
    }

    pub fn on_release(&mut self, id: ButtonId, now: Instant) {
        self.idle.restart(now);

        let Some(released) = self.clicked.take() else {
            debug_if_enabled!("Отпускание {} без нажатой кнопки", id);
            return;
        };
        if released != id {
            debug_if_enabled!("Отпускание {} относится к нажатой кнопке {}", id, released);
        }

        let button = &self.buttons[released.0];
        info!("Отпускание кнопки {}", button);

        if button.is_momentary() {
            // key-up отправит отложенное отпускание
            self.set_state(released, ButtonState::Active);
        } else {
            let key = button.key();
            self.relay.lift_key(key);
            self.set_state(released, ButtonState::Idle);
        }
    }

    /// Вход указателя в кнопку; учитывается только при удержании
    pub fn on_drag_enter(&mut self, id: ButtonId, held: bool, now: Instant) {
        if held {
            self.on_press(id, now);
        }
    }

    /// Уход указателя с кнопки при удержании равносилен отпусканию
    pub fn on_drag_leave(&mut self, id: ButtonId, held: bool, now: Instant) {
        if held {
            self.on_release(id, now);
        }
    }

    /// Выполнить отложенное отпускание, если срок наступил
    pub fn fire_deferred_release(&mut self, now: Instant) -> bool {
        match self.pending_release {
            Some(pending) if pending.due <= now => {
                self.pending_release = None;
                debug!("Импульс {} завершён", pending.key);
                self.relay.lift_key(pending.key);
                true
            }
            _ => false,
        }
    }

    pub fn release_deadline(&self) -> Option<Instant> {
        self.pending_release.map(|pending| pending.due)
    }

    pub fn idle_deadline(&self) -> Instant {
        self.idle.deadline()
    }

    pub fn restart_idle_timer(&mut self, now: Instant) {
        self.idle.restart(now);
    }

    pub fn relay_mut(&mut self) -> &mut KeyRelay {
        &mut self.relay
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.get(id.0)
    }

    pub fn clicked(&self) -> Option<ButtonId> {
        self.clicked
    }

    pub fn active(&self) -> Option<ButtonId> {
        self.active
    }

    pub fn pending_release(&self) -> Option<PendingRelease> {
        self.pending_release
    }

    fn set_state(&mut self, id: ButtonId, state: ButtonState) {
        let button = &mut self.buttons[id.0];
        if button.state() != state {
            button.set_state(state);
            self.view.show(button);
        }
    }
}
