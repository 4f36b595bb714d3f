//! HTTP Handlers

mod book;
mod chapter;
mod entity;
mod ping;
mod section;
mod settings;
mod snapshot;
mod websocket;

pub use book::*;
pub use chapter::*;
pub use entity::*;
pub use ping::*;
pub use section::*;
pub use settings::*;
pub use snapshot::*;
pub use websocket::*;
