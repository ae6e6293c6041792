// Adapters layer: concrete HTTP clients for the external providers.

pub mod chat;
pub mod places;

pub use chat::OpenRouterClient;
pub use places::GeoapifyClient;
