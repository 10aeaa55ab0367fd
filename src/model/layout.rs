use crate::model::ButtonId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Прямоугольник в пикселях (правая и нижняя границы не включаются)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        let right = self.x as i64 + self.width as i64;
        let bottom = self.y as i64 + self.height as i64;
        point.x >= self.x
            && point.y >= self.y
            && (point.x as i64) < right
            && (point.y as i64) < bottom
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Экранная раскладка: область симуляции по центру экрана и кнопки внутри неё
#[derive(Debug, Clone)]
pub struct Layout {
    content: Rect,
    buttons: Vec<(ButtonId, Rect)>,
}

impl Layout {
    /// `button_rects` заданы относительно области содержимого
    pub fn centered(
        screen_width: u32,
        screen_height: u32,
        content_width: u32,
        content_height: u32,
        button_rects: impl IntoIterator<Item = Rect>,
    ) -> Self {
        let x = (screen_width as i32 - content_width as i32) / 2;
        let y = (screen_height as i32 - content_height as i32) / 2;
        let content = Rect::new(x, y, content_width, content_height);

        let buttons = button_rects
            .into_iter()
            .enumerate()
            .map(|(index, rect)| (ButtonId(index), rect.offset(content.x, content.y)))
            .collect();

        Self { content, buttons }
    }

    pub fn content(&self) -> Rect {
        self.content
    }

    /// Экранный прямоугольник кнопки
    pub fn rect(&self, id: ButtonId) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|(button, _)| *button == id)
            .map(|(_, rect)| *rect)
    }

    /// Первая кнопка, содержащая точку (в экранных координатах)
    pub fn hit_test(&self, point: Point) -> Option<ButtonId> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::centered(
            1920,
            1080,
            1360,
            768,
            vec![Rect::new(0, 0, 100, 100), Rect::new(100, 0, 100, 100)],
        )
    }

    #[test]
    fn test_content_is_centered() {
        assert_eq!(layout().content(), Rect::new(280, 156, 1360, 768));
    }

    #[test]
    fn test_button_rects_are_shifted_into_screen_space() {
        assert_eq!(layout().rect(ButtonId(1)), Some(Rect::new(380, 156, 100, 100)));
        assert_eq!(layout().rect(ButtonId(7)), None);
    }

    #[test]
    fn test_hit_test_respects_exclusive_edges() {
        let layout = layout();
        assert_eq!(layout.hit_test(Point::new(280, 156)), Some(ButtonId(0)));
        assert_eq!(layout.hit_test(Point::new(379, 255)), Some(ButtonId(0)));
        assert_eq!(layout.hit_test(Point::new(380, 156)), Some(ButtonId(1)));
        assert_eq!(layout.hit_test(Point::new(480, 156)), None);
        assert_eq!(layout.hit_test(Point::new(0, 0)), None);
    }

    #[test]
    fn test_content_larger_than_screen_gets_negative_offset() {
        let layout = Layout::centered(800, 600, 1360, 768, vec![Rect::new(0, 0, 10, 10)]);
        assert_eq!(layout.content().x, -280);
        assert_eq!(layout.hit_test(Point::new(-275, -80)), Some(ButtonId(0)));
    }
}
