//! Chart generation and rendering for the fitgraph export visualiser

pub mod renderer;
pub mod types;

pub use renderer::{ChartRenderer, LineChartRenderer};
pub use types::{ChartSpec, ChartStyle, ColorScheme, FontSpec, Margins};
