pub mod alternative;
pub mod exam_model;
pub mod page;
pub mod question;
pub mod rows;
pub mod stats;
pub mod test_summary;

pub use alternative::Alternative;
pub use exam_model::ExamModel;
pub use page::{DurationStats, Page, PageMap};
pub use question::Question;
pub use rows::{parse_rows, AlternativeRow, QuestionRow, RawRow, SpeedPageRow};
pub use stats::ReconcileStats;
pub use test_summary::{Cohort, TestSummary};
