pub mod chat;
pub mod presence;
pub mod request;
pub mod resource;
