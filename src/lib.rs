pub mod app;
pub mod assess;
pub mod config;
pub mod error;
pub mod form;
pub mod gauge;
pub mod prompts;
pub mod schemas;

// Load env from HC_ENV_FILE if set, else ./.env. Silently ignores a missing
// file.
pub fn load_env() {
    if let Ok(env_path) = std::env::var("HC_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::dotenv();
    }
}
