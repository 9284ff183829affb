mod command;
mod feeders;
mod input;
mod notice;
mod screen;
mod styles;
mod tui;
mod view;

pub use command::{Command, parse_command};
pub use feeders::spawn_input_reader;
pub use input::LineEditor;
pub use notice::Notice;
pub use screen::{Flow, LoadState, Screen};
pub use tui::{TuiMsg, run};
pub use view::{article_lines, draw, filter_bar};
