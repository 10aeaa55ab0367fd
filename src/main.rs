use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::signal;
use tokio::time::Instant;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod model;
mod services;
mod utils;

use config::Config;
use model::{Button, ButtonId};
use services::{
    create_input_service, create_touch_listener, create_window_service, load_visuals, Dispatcher,
    FileAssets, FocusWatchdog, ForegroundResolver, IdleTimer, InteractionController, KeyRegistry,
    KeyRelay, ProcessLauncher, TracingView,
};

const VIRTUAL_DEVICE_NAME: &str = "Kiosk Relay Virtual Keyboard";
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "kiosk-relay")]
#[command(about = "Оверлей киоска: сенсорные кнопки -> клавиши симуляции, с удержанием её в фокусе")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "kiosk.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Не запускать процесс симуляции
    #[arg(long)]
    no_launch: bool,

    /// Проверить конфигурацию, вывести таблицу кнопок и выйти
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
        config.validate()?;
    }

    if args.check {
        print_button_table(&config)?;
        return Ok(());
    }

    init_tracing(&config.logging.level, &config.logging.format)?;
    info!("Запуск Kiosk Relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(args, config));

    // Поток чтения сенсорного экрана может быть заблокирован в read()
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    info!("Kiosk Relay завершил работу");
    result
}

async fn run(args: Args, mut config: Config) -> Result<()> {
    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else if let Err(e) = utils::permissions::check_permissions() {
        warn!("{} - продолжаем, ошибки доступа проявятся при открытии устройств", e);
    }

    if args.no_launch {
        config.target.launch = false;
    }
    let _simulation = ProcessLauncher::launch_target(&config.target, args.dry_run);

    let assets = FileAssets::new(&config.overlay.assets_dir);
    let buttons = config
        .buttons
        .iter()
        .map(|button| {
            let key = config.button_key(button)?;
            let visuals = load_visuals(&assets, &button.name, button.mode);
            Ok(Button::new(button.name.as_str(), key, button.mode).with_visuals(visuals))
        })
        .collect::<Result<Vec<_>>>()?;

    let registry = KeyRegistry::new(config.registered_keys()?);
    let relay = KeyRelay::new(
        create_input_service(VIRTUAL_DEVICE_NAME, args.dry_run)?,
        ForegroundResolver::new(create_window_service(&config, args.dry_run)?),
        config.target.window_name.as_str(),
        registry,
    );

    let controller = InteractionController::new(
        buttons,
        relay,
        Box::new(TracingView),
        config.timing.momentary_pulse(),
        IdleTimer::new(config.timing.watchdog_idle(), Instant::now()),
    )?;
    let watchdog = FocusWatchdog::new(config.overlay.window_name.as_str(), config.timing.focus_settle());

    let (sender, receiver) = Dispatcher::channel();
    let dispatcher_handle = tokio::spawn(Dispatcher::new(controller, watchdog, receiver).run());

    let touch_handle = match create_touch_listener(&config, config.layout(), sender.clone(), args.dry_run) {
        Ok(listener) => Some(tokio::spawn(async move {
            if let Err(e) = listener.run().await {
                error!("Ошибка в TouchListener: {}", e);
            }
        })),
        Err(e) => {
            error!("Сенсорный экран недоступен: {} - работает только сторожевой таймер", e);
            None
        }
    };

    info!("Все компоненты инициализированы");

    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }

    info!("Завершение работы...");

    // Диспетчер отпускает все зарегистрированные клавиши перед выходом
    if sender.send(events::DispatchEvent::Shutdown).await.is_err() {
        warn!("Диспетчер уже остановлен");
    }
    drop(sender);

    if let Some(handle) = &touch_handle {
        handle.abort();
    }

    let shutdown_result = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
        let _ = dispatcher_handle.await;
        if let Some(handle) = touch_handle {
            let _ = handle.await;
        }
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    Ok(())
}

fn print_button_table(config: &Config) -> Result<()> {
    let layout = config.layout();
    let content = layout.content();
    println!(
        "Экран {}x{}, область симуляции {}x{} в ({}, {})",
        config.overlay.screen_width,
        config.overlay.screen_height,
        content.width,
        content.height,
        content.x,
        content.y
    );
    println!("{:<4} {:<18} {:<8} {:<11} {}", "#", "кнопка", "клавиша", "режим", "прямоугольник");

    for (index, button) in config.buttons.iter().enumerate() {
        let key = config.button_key(button)?;
        let rect = layout
            .rect(ButtonId(index))
            .ok_or_else(|| anyhow::anyhow!("нет прямоугольника для кнопки {}", button.name))?;
        println!(
            "{:<4} {:<18} {:<8} {:<11} {}x{} в ({}, {})",
            index,
            button.name,
            key.to_string(),
            format!("{:?}", button.mode).to_lowercase(),
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
    }

    println!("Зарегистрированные клавиши: {}", config.keys.registered.join(", "));
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(())
}
