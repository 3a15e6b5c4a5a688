pub mod handler;
pub mod listener;
pub mod nonce;

pub use handler::{AjaxResponse, WidgetCallbackHandler};
pub use listener::InitListener;
pub use nonce::{NonceIssuer, NonceVerdict, NonceVerifier};
