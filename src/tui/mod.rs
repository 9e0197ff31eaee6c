mod handler;
mod markup;
mod ui;

pub use handler::{handle_key_event, AppAction};
pub use ui::draw;
