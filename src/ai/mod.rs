// Structured completion support: prompt construction and the OpenAI client

pub mod openai_client;
pub mod prompts;

pub use openai_client::OpenAiClient;
