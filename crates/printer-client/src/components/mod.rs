//! UI components for the robot printer client.

pub mod printer;

pub use printer::{ActionConfig, ResultAction, ResultPanelConfig, RobotPrinter};
