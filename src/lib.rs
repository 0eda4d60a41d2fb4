pub mod cli;
pub mod focus;
pub mod io;
pub mod layout;
pub mod manager;
pub mod model;
pub mod pane;
pub mod tui;
pub mod util;
