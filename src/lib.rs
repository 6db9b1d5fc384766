pub mod client;
pub mod error;
pub mod task;
pub mod utils;

use once_cell::sync::Lazy;
use std::env;

const PALATINE_BASE_URL: &str = "http://localhost:7200";

pub static BASE_URL: Lazy<String> = Lazy::new(|| {
    match env::var("PALATINE_BASE_URL") {
        Ok(url) => url,
        Err(_) => {
            dotenv::var("PALATINE_BASE_URL").unwrap_or_else(|_| PALATINE_BASE_URL.to_string())
        }
    }
});

pub static API_KEY: Lazy<String> = Lazy::new(|| {
    match env::var("PALATINE_API_KEY") {
        Ok(key) => key,
        Err(_) => dotenv::var("PALATINE_API_KEY").unwrap_or_default(),
    }
});

pub fn init_env() {
    dotenv::dotenv().ok();
}
