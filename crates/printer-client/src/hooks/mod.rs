mod use_printer;
mod use_theme;

pub use use_printer::{use_printer, PrinterRefs};
pub use use_theme::*;
