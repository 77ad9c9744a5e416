//! Career guidance capabilities and the policy that resolves them.

pub mod chat;
pub mod extractor;
pub mod handlers;
pub mod policy;
pub mod prompts;
pub mod recommend;
pub mod resume;
pub mod roadmap;

/// Identifier used when a request does not name its user.
pub fn default_user_id() -> String {
    "demo-user".to_string()
}
