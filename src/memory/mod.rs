/*!
 * Memory Module
 * Arena allocation, handles and typed element access
 */

pub mod arena;
pub mod element;
pub mod shared;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use arena::Arena;
pub use element::{Element, ElementKind, ElementValue};
pub use shared::SharedArena;
pub use traits::*;
pub use types::*;
