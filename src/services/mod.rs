pub mod chat_client;
pub mod session_token;
