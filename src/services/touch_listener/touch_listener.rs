use crate::config::Config;
use crate::error::{KioskError, Result};
use crate::events::DispatchEvent;
use crate::model::Layout;
use crate::trace_if_enabled;
use crate::utils::DeviceFinder;
use evdev::{AbsoluteAxisCode, Device};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::pointer_tracker::{AxisRange, PointerTracker, TouchDecoder};
use super::r#trait::TouchListenerTrait;

const READ_RETRY_DELAY: Duration = Duration::from_millis(100);
const MAX_READ_ERRORS: u32 = 50;

pub struct RealTouchListener {
    device: Device,
    decoder: TouchDecoder,
    sender: mpsc::Sender<DispatchEvent>,
}

impl RealTouchListener {
    pub fn new(config: &Config, layout: Layout, sender: mpsc::Sender<DispatchEvent>) -> Result<Self> {
        info!("Инициализация RealTouchListener");

        let device_path = DeviceFinder::find_touch_device(&config.input.device_path)?;
        let device = Device::open(&device_path).map_err(|e| {
            KioskError::DeviceNotFound(format!("Не удалось открыть устройство {:?}: {}", device_path, e))
        })?;

        // Устройство не захватывается: оверлей лишь наблюдает за касаниями
        info!("Сенсорный экран: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());

        let (x_axis, y_axis) =
            Self::axis_ranges(&device, config.overlay.screen_width, config.overlay.screen_height);
        debug!("Оси сенсорного экрана: X {:?}, Y {:?}", x_axis, y_axis);

        Ok(Self {
            device,
            decoder: TouchDecoder::new(PointerTracker::new(layout), x_axis, y_axis),
            sender,
        })
    }

    fn axis_ranges(device: &Device, screen_width: u32, screen_height: u32) -> (AxisRange, AxisRange) {
        let mut x = None;
        let mut y = None;
        let mut mt_x = None;
        let mut mt_y = None;

        match device.get_absinfo() {
            Ok(axes) => {
                for (axis, info) in axes {
                    let range = Some((info.minimum(), info.maximum()));
                    if axis == AbsoluteAxisCode::ABS_X {
                        x = range;
                    } else if axis == AbsoluteAxisCode::ABS_Y {
                        y = range;
                    } else if axis == AbsoluteAxisCode::ABS_MT_POSITION_X {
                        mt_x = range;
                    } else if axis == AbsoluteAxisCode::ABS_MT_POSITION_Y {
                        mt_y = range;
                    }
                }
            }
            Err(e) => warn!("Не удалось прочитать диапазоны осей: {} - координаты считаются пикселями", e),
        }

        let to_range = |range: Option<(i32, i32)>, span: u32| match range {
            Some((min, max)) => AxisRange::new(min, max, span),
            None => AxisRange::identity(span),
        };

        (
            to_range(x.or(mt_x), screen_width),
            to_range(y.or(mt_y), screen_height),
        )
    }

    /// Блокирующий цикл чтения; завершается, когда диспетчер закрыл канал
    fn read_loop(mut self) -> Result<()> {
        let mut consecutive_errors = 0;

        loop {
            let events: Vec<_> = match self.device.fetch_events() {
                Ok(events) => {
                    consecutive_errors = 0;
                    events.collect()
                }
                Err(e) => {
                    consecutive_errors += 1;
                    error!("Ошибка чтения событий сенсорного экрана: {}", e);
                    if consecutive_errors >= MAX_READ_ERRORS {
                        return Err(KioskError::Io(e));
                    }
                    std::thread::sleep(READ_RETRY_DELAY);
                    continue;
                }
            };

            for event in events {
                let pointer_events = self.decoder.feed(event.event_type().0, event.code(), event.value());
                for pointer_event in pointer_events {
                    trace_if_enabled!("Касание: {}", pointer_event);
                    if self.sender.blocking_send(pointer_event.into()).is_err() {
                        info!("Диспетчер остановлен, чтение сенсорного экрана завершено");
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl TouchListenerTrait for RealTouchListener {
    async fn run(self: Box<Self>) -> Result<()> {
        info!("RealTouchListener запущен, начинаем чтение событий");
        tokio::task::spawn_blocking(move || (*self).read_loop())
            .await
            .map_err(|e| KioskError::Internal(format!("Поток чтения сенсорного экрана: {}", e)))?
    }
}
