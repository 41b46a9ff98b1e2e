pub mod controller;
pub mod debounce;
pub mod navigation;
pub mod render;

pub use controller::{Action, Followup, Shortcut, ViewController};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use navigation::{Navigation, View};
