pub mod assets;
pub mod button_view;
pub mod controller;
pub mod dispatcher;
pub mod foreground_resolver;
pub mod input_service;
pub mod key_relay;
pub mod keycode_map;
pub mod launcher;
pub mod touch_listener;
pub mod virtual_device;
pub mod watchdog;
pub mod window_service;

#[cfg(test)]
pub mod testing;

pub use assets::{load_visuals, AssetProvider, FileAssets};
pub use button_view::{ButtonView, TracingView};
pub use controller::InteractionController;
pub use dispatcher::Dispatcher;
pub use foreground_resolver::{ForegroundResolver, TitleMatch};
pub use input_service::create_input_service;
pub use key_relay::{KeyRegistry, KeyRelay};
pub use launcher::ProcessLauncher;
pub use touch_listener::create_touch_listener;
pub use virtual_device::VirtualDevice;
pub use watchdog::{FocusWatchdog, IdleTimer};
pub use window_service::create_window_service;
