//! Robot printer widget components.

mod action_menu;
mod antenna;
mod eyes;
mod info_bar;
mod paper;
mod result_panel;
mod robot_head;
mod robot_printer;

pub use action_menu::ActionConfig;
pub use result_panel::{ResultAction, ResultPanelConfig};
pub use robot_printer::RobotPrinter;
