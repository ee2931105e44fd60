//! 页面构建 - 业务能力层
//!
//! 把 `Speed_Pages` 的行折叠成 页码 → 页面 的映射

use crate::models::{Page, PageMap, SpeedPageRow};

/// 单行折叠结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// 新建了页面
    Created,
    /// 页码已存在，以第一次出现的行为准
    Duplicate,
    /// 行中没有页码
    MissingPageNumber,
}

/// 折叠一行耗时统计
///
/// 页码首次出现时新建页面（题目列表为空），之后同页码的行全部忽略。
pub fn fold_page(mut pages: PageMap, row: &SpeedPageRow) -> (PageMap, PageOutcome) {
    let Some(page_number) = row.page else {
        return (pages, PageOutcome::MissingPageNumber);
    };

    if pages.contains_key(&page_number) {
        return (pages, PageOutcome::Duplicate);
    }

    pages.insert(page_number, Page::from_row(page_number, row));
    (pages, PageOutcome::Created)
}
