pub mod logging;
pub mod notice;

pub use notice::{Notice, NoticeBoard};
