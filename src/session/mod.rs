//! Chat session management.
//!
//! Each page load gets its own [`ChatSession`] holding the UI state: input
//! text, in-flight flags, the error banner, the conversation history and the
//! cached document list. Sessions live in memory only and are identified by
//! UUID.
//!
//! # Architecture
//!
//! - [`ChatSession`]: state of one page load plus the operations that drive it
//! - [`SessionStore`]: thread-safe store for all live sessions
//! - [`Message`]: one entry of the conversation history
//!
//! # Example
//!
//! ```rust
//! use xyz_assistant::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.create();
//!
//! assert!(store.get(session.id()).is_some());
//! assert!(session.snapshot().state.messages.is_empty());
//! ```

mod chat;
mod message;
mod store;

pub use chat::{ChatSession, Outcome, SessionSnapshot, SessionState};
pub use message::{Message, MessageKind};
pub use store::SessionStore;
