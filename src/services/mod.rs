//! External collaborators: chart-data fetching and scan orchestration.

pub mod chart_data;
pub mod scanner;

pub use chart_data::{ChartDataProvider, ChartDataRequest, NseChartClient};
pub use scanner::{scan_symbols, ScanConfig};
