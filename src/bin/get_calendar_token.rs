use picalendar::config::Config;
use picalendar::error::AppResult;
use picalendar::sources::google_calendar::TokenManager;
use picalendar::startup;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;
    Ok(authorize().await?)
}

async fn authorize() -> AppResult<()> {
    // Load configuration
    let config = Config::load()?;

    // Run the consent flow and write token.json
    let token_manager = TokenManager::new(&config, reqwest::Client::new())?;
    let token = token_manager.authorize().await?;

    if token.refresh_token.is_none() {
        println!("Warning: no refresh token was issued, this token cannot be renewed");
    }
    println!(
        "Token successfully saved to {}!",
        config.token_path().display()
    );

    Ok(())
}
