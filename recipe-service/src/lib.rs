//! recipe-service: thin proxy in front of the Gemini generative-language API
//! and the Cloud Vision label-detection API.
pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;
pub mod testing;
