pub mod room;
pub mod story;
pub mod theme;
