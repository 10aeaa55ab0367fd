use crate::events::KeyCode;
use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Маппинг между именами клавиш в конфигурации и кодами evdev
pub struct KeycodeMap;

// Статическая карта основных клавиш
static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    map.insert("a", 30);  // KEY_A
    map.insert("b", 48);  // KEY_B
    map.insert("c", 46);  // KEY_C
    map.insert("d", 32);  // KEY_D
    map.insert("e", 18);  // KEY_E
    map.insert("f", 33);  // KEY_F
    map.insert("g", 34);  // KEY_G
    map.insert("h", 35);  // KEY_H
    map.insert("i", 23);  // KEY_I
    map.insert("j", 36);  // KEY_J
    map.insert("k", 37);  // KEY_K
    map.insert("l", 38);  // KEY_L
    map.insert("m", 50);  // KEY_M
    map.insert("n", 49);  // KEY_N
    map.insert("o", 24);  // KEY_O
    map.insert("p", 25);  // KEY_P
    map.insert("q", 16);  // KEY_Q
    map.insert("r", 19);  // KEY_R
    map.insert("s", 31);  // KEY_S
    map.insert("t", 20);  // KEY_T
    map.insert("u", 22);  // KEY_U
    map.insert("v", 47);  // KEY_V
    map.insert("w", 17);  // KEY_W
    map.insert("x", 45);  // KEY_X
    map.insert("y", 21);  // KEY_Y
    map.insert("z", 44);  // KEY_Z

    // Цифровые клавиши (верхний ряд)
    map.insert("1", 2);   // KEY_1
    map.insert("2", 3);   // KEY_2
    map.insert("3", 4);   // KEY_3
    map.insert("4", 5);   // KEY_4
    map.insert("5", 6);   // KEY_5
    map.insert("6", 7);   // KEY_6
    map.insert("7", 8);   // KEY_7
    map.insert("8", 9);   // KEY_8
    map.insert("9", 10);  // KEY_9
    map.insert("0", 11);  // KEY_0

    // Специальные клавиши
    map.insert("space", 57);      // KEY_SPACE
    map.insert("enter", 28);      // KEY_ENTER
    map.insert("escape", 1);      // KEY_ESC
    map.insert("backspace", 14);  // KEY_BACKSPACE
    map.insert("tab", 15);        // KEY_TAB
    map.insert("esc", 1);         // KEY_ESC (синоним)
    map.insert("minus", 12);      // KEY_MINUS
    map.insert("equal", 13);      // KEY_EQUAL

    // Модификаторы
    map.insert("ctrl", 29);       // KEY_LEFTCTRL
    map.insert("alt", 56);        // KEY_LEFTALT
    map.insert("shift", 42);      // KEY_LEFTSHIFT
    map.insert("super", 125);     // KEY_LEFTMETA
    map.insert("control", 29);    // KEY_LEFTCTRL (синоним)
    map.insert("rightctrl", 97);  // KEY_RIGHTCTRL
    map.insert("rightalt", 100);  // KEY_RIGHTALT
    map.insert("rightshift", 54); // KEY_RIGHTSHIFT

    // Стрелки
    map.insert("up", 103);        // KEY_UP
    map.insert("down", 108);      // KEY_DOWN
    map.insert("left", 105);      // KEY_LEFT
    map.insert("right", 106);     // KEY_RIGHT

    // Функциональные клавиши
    map.insert("f1", 59);         // KEY_F1
    map.insert("f2", 60);         // KEY_F2
    map.insert("f3", 61);         // KEY_F3
    map.insert("f4", 62);         // KEY_F4
    map.insert("f5", 63);         // KEY_F5
    map.insert("f6", 64);         // KEY_F6
    map.insert("f7", 65);         // KEY_F7
    map.insert("f8", 66);         // KEY_F8
    map.insert("f9", 67);         // KEY_F9
    map.insert("f10", 68);        // KEY_F10
    map.insert("f11", 87);        // KEY_F11
    map.insert("f12", 88);        // KEY_F12

    // Навигация
    map.insert("home", 102);      // KEY_HOME
    map.insert("end", 107);       // KEY_END
    map.insert("pageup", 104);    // KEY_PAGEUP
    map.insert("pagedown", 109);  // KEY_PAGEDOWN
    map.insert("insert", 110);    // KEY_INSERT
    map.insert("delete", 111);    // KEY_DELETE

    map
});

// Синонимы не попадают в обратную карту, чтобы имя для кода было стабильным
const ALIASES: &[&str] = &["esc", "control"];

static CODE_TO_KEY_NAME: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    KEY_NAME_TO_CODE
        .iter()
        .filter(|(name, _)| !ALIASES.contains(*name))
        .map(|(&name, &code)| (code, name))
        .collect()
});

impl KeycodeMap {
    /// Получить код клавиши по её имени
    pub fn get_keycode(key_name: &str) -> Result<KeyCode, String> {
        let normalized = key_name.trim().to_lowercase();
        KEY_NAME_TO_CODE.get(normalized.as_str())
            .copied()
            .map(KeyCode::new)
            .ok_or_else(|| format!("Unknown key: {}", key_name))
    }

    /// Получить имя клавиши по её коду
    pub fn get_key_name(keycode: u16) -> Option<&'static str> {
        CODE_TO_KEY_NAME.get(&keycode).copied()
    }

    /// Проверить, известно ли имя клавиши
    pub fn is_known(key_name: &str) -> bool {
        Self::get_keycode(key_name).is_ok()
    }
}
