use event_listing_server::config::database_settings_from_env;
use event_persistence_sea_orm::ConnectionManager;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let settings = match database_settings_from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // The first connection creates missing tables and indexes.
    let manager = ConnectionManager::new(settings);
    if let Err(e) = manager.ensure_connection().await {
        eprintln!("Failed to create database tables: {}", e);
        std::process::exit(1);
    }

    println!("Created database tables successfully");
}
