//! Перевод сырых событий сенсорного экрана в переходы указателя по кнопкам.

use crate::events::PointerEvent;
use crate::model::{ButtonId, Layout, Point};
use smallvec::SmallVec;

pub type PointerEvents = SmallVec<[PointerEvent; 4]>;

const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;
const SYN_REPORT: u16 = 0x00;
const BTN_LEFT: u16 = 0x110;
const BTN_TOUCH: u16 = 0x14a;
const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const ABS_MT_POSITION_X: u16 = 0x35;
const ABS_MT_POSITION_Y: u16 = 0x36;

/// Диапазон абсолютной оси устройства, отображаемый на `span` пикселей экрана
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    min: i32,
    max: i32,
    span: u32,
}

impl AxisRange {
    pub fn new(min: i32, max: i32, span: u32) -> Self {
        Self { min, max, span }
    }

    /// Ось, уже выраженная в пикселях экрана
    pub fn identity(span: u32) -> Self {
        Self::new(0, span.saturating_sub(1) as i32, span)
    }

    pub fn scale(&self, raw: i32) -> i32 {
        let last = self.span.saturating_sub(1) as i64;
        if self.max <= self.min {
            return (raw as i64).clamp(0, last) as i32;
        }
        let offset = (raw as i64 - self.min as i64).clamp(0, (self.max - self.min) as i64);
        (offset * last / (self.max - self.min) as i64) as i32
    }
}

/// Состояние указателя относительно раскладки кнопок.
///
/// Вход и выход сообщаются кнопке под указателем, отпускание - кнопке,
/// на которой началось нажатие (или кнопке под указателем, если нажатие
/// началось вне кнопок).
#[derive(Debug, Clone)]
pub struct PointerTracker {
    layout: Layout,
    hovered: Option<ButtonId>,
    pressed_on: Option<ButtonId>,
    held: bool,
}

impl PointerTracker {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            hovered: None,
            pressed_on: None,
            held: false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn hovered(&self) -> Option<ButtonId> {
        self.hovered
    }

    pub fn motion(&mut self, point: Point) -> PointerEvents {
        let mut events = PointerEvents::new();
        let target = self.layout.hit_test(point);
        if target == self.hovered {
            return events;
        }

        if let Some(button) = self.hovered {
            events.push(PointerEvent::Exited { button, held: self.held });
        }
        if let Some(button) = target {
            events.push(PointerEvent::Entered { button, held: self.held });
        }
        self.hovered = target;
        events
    }

    pub fn press(&mut self, point: Point) -> PointerEvents {
        let mut events = self.motion(point);
        if self.held {
            return events;
        }

        self.held = true;
        self.pressed_on = self.hovered;
        if let Some(button) = self.hovered {
            events.push(PointerEvent::Pressed(button));
        }
        events
    }

    pub fn release(&mut self) -> PointerEvents {
        let mut events = PointerEvents::new();
        if !self.held {
            return events;
        }

        self.held = false;
        if let Some(button) = self.pressed_on.take().or(self.hovered) {
            events.push(PointerEvent::Released(button));
        }
        events
    }

    /// Указатель покинул экран (палец поднят)
    pub fn leave(&mut self) -> PointerEvents {
        let mut events = PointerEvents::new();
        if let Some(button) = self.hovered.take() {
            events.push(PointerEvent::Exited { button, held: self.held });
        }
        events
    }
}

/// Накапливает оси и касание до `SYN_REPORT` и передаёт кадр в `PointerTracker`
#[derive(Debug, Clone)]
pub struct TouchDecoder {
    tracker: PointerTracker,
    x_axis: AxisRange,
    y_axis: AxisRange,
    raw_x: Option<i32>,
    raw_y: Option<i32>,
    moved: bool,
    touch: Option<bool>,
}

impl TouchDecoder {
    pub fn new(tracker: PointerTracker, x_axis: AxisRange, y_axis: AxisRange) -> Self {
        Self {
            tracker,
            x_axis,
            y_axis,
            raw_x: None,
            raw_y: None,
            moved: false,
            touch: None,
        }
    }

    pub fn feed(&mut self, event_type: u16, code: u16, value: i32) -> PointerEvents {
        match (event_type, code) {
            (EV_ABS, ABS_X | ABS_MT_POSITION_X) => {
                self.raw_x = Some(value);
                self.moved = true;
            }
            (EV_ABS, ABS_Y | ABS_MT_POSITION_Y) => {
                self.raw_y = Some(value);
                self.moved = true;
            }
            (EV_KEY, BTN_TOUCH | BTN_LEFT) => self.touch = Some(value != 0),
            (EV_SYN, SYN_REPORT) => return self.flush(),
            _ => {}
        }
        PointerEvents::new()
    }

    fn position(&self) -> Option<Point> {
        match (self.raw_x, self.raw_y) {
            (Some(x), Some(y)) => Some(Point::new(self.x_axis.scale(x), self.y_axis.scale(y))),
            _ => None,
        }
    }

    fn flush(&mut self) -> PointerEvents {
        let moved = std::mem::take(&mut self.moved);
        let touch = self.touch.take();
        let position = self.position();
        let mut events = PointerEvents::new();

        match (touch, position) {
            (Some(true), Some(point)) => events.extend(self.tracker.press(point)),
            (Some(false), _) => {
                if let (true, Some(point)) = (moved, position) {
                    events.extend(self.tracker.motion(point));
                }
                events.extend(self.tracker.release());
                events.extend(self.tracker.leave());
            }
            (None, Some(point)) if moved => events.extend(self.tracker.motion(point)),
            _ => {}
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    const A: ButtonId = ButtonId(0);
    const B: ButtonId = ButtonId(1);

    fn tracker() -> PointerTracker {
        // Область содержимого совпадает с экраном
        PointerTracker::new(Layout::centered(
            400,
            200,
            400,
            200,
            vec![Rect::new(0, 0, 100, 100), Rect::new(200, 0, 100, 100)],
        ))
    }

    fn events(list: PointerEvents) -> Vec<PointerEvent> {
        list.into_vec()
    }

    #[test]
    fn test_axis_scaling() {
        let axis = AxisRange::new(0, 4095, 1920);
        assert_eq!(axis.scale(0), 0);
        assert_eq!(axis.scale(4095), 1919);
        assert_eq!(axis.scale(2048), 959);
        assert_eq!(axis.scale(-50), 0);
        assert_eq!(axis.scale(9000), 1919);
        assert_eq!(AxisRange::identity(1080).scale(540), 540);
    }

    #[test]
    fn test_tap_on_button() {
        let mut t = tracker();
        assert_eq!(
            events(t.press(Point::new(10, 10))),
            vec![
                PointerEvent::Entered { button: A, held: false },
                PointerEvent::Pressed(A),
            ]
        );
        assert!(t.is_held());
        assert_eq!(events(t.release()), vec![PointerEvent::Released(A)]);
        assert_eq!(
            events(t.leave()),
            vec![PointerEvent::Exited { button: A, held: false }]
        );
        assert_eq!(t.hovered(), None);
    }

    #[test]
    fn test_drag_off_and_back_reports_held() {
        let mut t = tracker();
        t.press(Point::new(10, 10));

        assert_eq!(
            events(t.motion(Point::new(150, 10))),
            vec![PointerEvent::Exited { button: A, held: true }]
        );
        assert_eq!(
            events(t.motion(Point::new(20, 20))),
            vec![PointerEvent::Entered { button: A, held: true }]
        );
        assert!(t.motion(Point::new(30, 30)).is_empty());
    }

    #[test]
    fn test_release_goes_to_button_where_press_began() {
        let mut t = tracker();
        t.press(Point::new(10, 10));
        t.motion(Point::new(210, 10));

        assert_eq!(events(t.release()), vec![PointerEvent::Released(A)]);
    }

    #[test]
    fn test_press_outside_buttons_releases_hovered() {
        let mut t = tracker();
        assert!(t.press(Point::new(150, 150)).is_empty());
        assert_eq!(
            events(t.motion(Point::new(210, 10))),
            vec![PointerEvent::Entered { button: B, held: true }]
        );
        assert_eq!(events(t.release()), vec![PointerEvent::Released(B)]);
    }

    #[test]
    fn test_release_without_press_is_silent() {
        let mut t = tracker();
        t.motion(Point::new(10, 10));
        assert!(t.release().is_empty());
    }

    fn decoder() -> TouchDecoder {
        TouchDecoder::new(tracker(), AxisRange::new(0, 3999, 400), AxisRange::new(0, 1999, 200))
    }

    fn feed(decoder: &mut TouchDecoder, frame: &[(u16, u16, i32)]) -> Vec<PointerEvent> {
        frame
            .iter()
            .flat_map(|&(ty, code, value)| decoder.feed(ty, code, value))
            .collect()
    }

    #[test]
    fn test_decoder_emits_only_on_syn_report() {
        let mut d = decoder();
        assert!(d.feed(EV_ABS, ABS_X, 500).is_empty());
        assert!(d.feed(EV_ABS, ABS_Y, 500).is_empty());
        assert!(d.feed(EV_KEY, BTN_TOUCH, 1).is_empty());
        assert_eq!(
            d.feed(EV_SYN, SYN_REPORT, 0).into_vec(),
            vec![
                PointerEvent::Entered { button: A, held: false },
                PointerEvent::Pressed(A),
            ]
        );
    }

    #[test]
    fn test_decoder_full_touch_cycle() {
        let mut d = decoder();
        let down = feed(
            &mut d,
            &[
                (EV_ABS, ABS_MT_POSITION_X, 500),
                (EV_ABS, ABS_MT_POSITION_Y, 500),
                (EV_KEY, BTN_TOUCH, 1),
                (EV_SYN, SYN_REPORT, 0),
            ],
        );
        assert_eq!(down.last(), Some(&PointerEvent::Pressed(A)));

        let drag = feed(&mut d, &[(EV_ABS, ABS_X, 2100), (EV_SYN, SYN_REPORT, 0)]);
        assert_eq!(
            drag,
            vec![
                PointerEvent::Exited { button: A, held: true },
                PointerEvent::Entered { button: B, held: true },
            ]
        );

        let up = feed(&mut d, &[(EV_KEY, BTN_TOUCH, 0), (EV_SYN, SYN_REPORT, 0)]);
        assert_eq!(
            up,
            vec![
                PointerEvent::Released(A),
                PointerEvent::Exited { button: B, held: false },
            ]
        );
    }

    #[test]
    fn test_decoder_ignores_touch_before_any_position() {
        let mut d = decoder();
        assert!(feed(&mut d, &[(EV_KEY, BTN_TOUCH, 1), (EV_SYN, SYN_REPORT, 0)]).is_empty());
    }
}
