use crate::bot;
use crate::bot::handlers::{register_sender, Command, WeatherService};
use crate::config::BotSettings;
use havo_core::storage::{FileUserRegistry, InMemoryLanguageStore, LanguageStore, UserStore};
use havo_core::weather::OpenWeatherClient;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};

/// Run the Telegram transport runtime.
pub async fn run_bot(settings: Arc<BotSettings>) {
    let users = init_user_registry(&settings).await;

    let weather = Arc::new(WeatherService::new(OpenWeatherClient::new(
        settings.core.as_ref(),
    )));
    info!(
        "Weather client initialized ({}).",
        settings.core.weather_api_base_url
    );

    let languages: Arc<dyn LanguageStore> = Arc::new(InMemoryLanguageStore::new());

    let bot = Bot::new(settings.telegram.bot_token.clone());
    let handler = setup_handler();

    info!("🚀 Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![users, weather, languages, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn init_user_registry(settings: &BotSettings) -> Arc<dyn UserStore> {
    match FileUserRegistry::load(&settings.core.users_file).await {
        Ok(registry) => {
            info!("User registry initialized.");
            Arc::new(registry)
        }
        Err(e) => {
            error!(
                "Failed to load user registry from {}: {}",
                settings.core.users_file, e
            );
            std::process::exit(1);
        }
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        // Every sender is registered before routing
        .inspect_async(register_sender)
        .branch(Update::filter_callback_query().endpoint(handle_language_callback))
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    users: Arc<dyn UserStore>,
    weather: Arc<WeatherService>,
    languages: Arc<dyn LanguageStore>,
    settings: Arc<BotSettings>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg).await,
        Command::Weather(city) => {
            bot::handlers::weather(bot, msg, city, weather, languages).await
        }
        Command::Broadcast(text) => {
            bot::handlers::broadcast(bot, msg, text, users, settings).await
        }
        Command::Usercount => bot::handlers::usercount(bot, msg, users, settings).await,
        Command::Myid => bot::handlers::myid(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_language_callback(
    bot: Bot,
    q: CallbackQuery,
    languages: Arc<dyn LanguageStore>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_language_callback(bot, q, languages).await {
        error!("Language callback handler error: {}", e);
    }
    respond(())
}
