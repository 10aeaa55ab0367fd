//! WindowService: единственное место, где оверлей касается идентичности окон ОС.
//!
//! Модули ниже умеют перечислять окна верхнего уровня, читать заголовки,
//! поднимать окно на передний план и разворачивать свёрнутое. Решения о том,
//! какое окно поднимать, принимает ForegroundResolver.

mod desktop;
mod dry_run;
mod wmctrl;
mod xdotool;
mod r#trait;

pub use self::dry_run::DryRunWindows;
pub use self::r#trait::{create_window_service, WindowService};
