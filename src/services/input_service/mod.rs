//! Синтез клавиш на уровне ОС.
//!
//! Сервис только отправляет key-down/key-up. Фокусом окон он не занимается,
//! это делает KeyRelay через ForegroundResolver.

mod dry_run;
mod r#trait;

pub use self::dry_run::DryRunInput;
pub use self::r#trait::{create_input_service, InputService};
