pub mod header;
pub mod metric;
pub mod rank_bar;

pub use header::Header;
pub use metric::MetricTile;
pub use rank_bar::{RankBarConfig, RankBars};
