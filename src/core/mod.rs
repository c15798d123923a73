mod catalog;
mod events;
mod expand;
mod faves;
mod node;
mod options;
mod render;
mod selection;
mod store;
mod text;
mod tree;
mod visibility;

pub use catalog::*;
pub use events::*;
pub use node::*;
pub use options::*;
pub use render::*;
pub use selection::*;
pub use store::*;
pub use text::*;
pub use tree::*;
