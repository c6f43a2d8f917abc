pub mod config;
pub mod folders;
pub mod items;
pub mod theme;
pub mod view;

pub use config::*;
pub use folders::*;
pub use items::*;
pub use theme::*;
pub use view::*;
