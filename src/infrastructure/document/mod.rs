//! Document adapters - In-memory host page

mod chat_markup;
mod memory_document;

pub use chat_markup::{render_die, render_message};
#[allow(unused_imports)]
pub use memory_document::{ElementSnapshot, MemoryDocument};
