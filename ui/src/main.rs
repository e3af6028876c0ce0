pub use app::App;

pub mod app;
mod data;
mod signup;

use cli_log::*;
use types::domain::FormVariant;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    init_cli_log!("signup");
    color_eyre::install()?;
    let variant = std::env::var("SIGNUP_FORM_VARIANT")
        .ok()
        .and_then(|value| value.parse::<FormVariant>().ok())
        .unwrap_or_default();
    let terminal = ratatui::init();
    let result = App::new(variant).run(terminal).await;
    ratatui::restore();
    result
}
