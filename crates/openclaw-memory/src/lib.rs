//! `openclaw-memory` — the vector-memory substrate (§3, §4.5): a local,
//! dependency-free embedder, cosine-similarity search over a Postgres
//! `memories` table via `openclaw-sql`, and the short-term conversation
//! ring that backs the router's immediate context window.

pub mod conversation;
pub mod embedder;
pub mod memory;
pub mod types;

pub use conversation::{ConversationBuffer, Role};
pub use embedder::HashEmbedder;
pub use memory::MemoryStore;
pub use types::MemoryCategory;
