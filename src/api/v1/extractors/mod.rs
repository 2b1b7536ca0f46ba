pub mod auth_ctx;
pub mod body;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use body::{ApiJson, JsonOrForm};
