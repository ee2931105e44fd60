pub mod alternative_reconciler;
pub mod page_builder;
pub mod question_linker;
pub mod summary_aggregator;

pub use alternative_reconciler::{attach_alternative, AttachOutcome, SORT_TRIGGER_LEN};
pub use page_builder::{fold_page, PageOutcome};
pub use question_linker::{link_question, LinkOutcome};
pub use summary_aggregator::{accumulate_test, TestAccumulator};
