//! [`TextCompletion`](weather_application::TextCompletion) adapters

mod ollama;

pub use ollama::OllamaCompletion;
