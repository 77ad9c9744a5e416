pub mod chat;
pub mod profile;
pub mod recommendation;
pub mod resume;
pub mod roadmap;
