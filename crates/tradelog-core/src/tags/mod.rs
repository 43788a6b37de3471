pub mod attribution;
pub mod impact;
pub mod session;

pub use attribution::{tag_attribution, TagAttribution, TagRow};
pub use impact::{analyze_tag_impact, TagImpactInput, TagImpactOutput};
pub use session::{max_drawdown, session_metrics, SessionMetrics};
