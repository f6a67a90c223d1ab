pub mod api_client;
pub mod prompt;
pub mod requester;

pub use api_client::{ApiClient, MessagesRequest, VisionBackend};
pub use requester::{ModelOptions, TranslationRequester};
