//! JSON runtime configs of the `omr_scan` and `render_sheet` tools.

pub mod scan;
pub mod sheet;
