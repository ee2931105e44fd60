use exam_stats::config::XLSX_CONTENT_TYPE;
use exam_stats::error::AppResult;
use exam_stats::infrastructure::FileReader;
use exam_stats::utils::{logging, NoticeBoard};
use exam_stats::{App, Config, DashboardSession, LoadOutcome, SelectedFile};
use futures::future::BoxFuture;
use futures::FutureExt;
use rust_xlsxwriter::Workbook;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing_subscriber::layer::SubscriberExt;

// ========== 工作簿构造 ==========

enum Cell {
    Text(&'static str),
    Num(f64),
    Bool(bool),
    Blank,
}

use Cell::*;

fn add_sheet(workbook: &mut Workbook, name: &str, headers: &[&str], rows: &[Vec<Cell>]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).unwrap();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Text(s) => {
                    sheet.write_string(r, c, *s).unwrap();
                }
                Num(n) => {
                    sheet.write_number(r, c, *n).unwrap();
                }
                Bool(b) => {
                    sheet.write_boolean(r, c, *b).unwrap();
                }
                Blank => {}
            }
        }
    }
}

fn speed_pages(workbook: &mut Workbook, rows: &[Vec<Cell>]) {
    add_sheet(
        workbook,
        "Speed_Pages",
        &["Page", "Instruction", "duration_mean", "duration_sd"],
        rows,
    );
}

fn questions(workbook: &mut Workbook, rows: &[Vec<Cell>]) {
    add_sheet(
        workbook,
        "Questions",
        &["TestCode", "Diplome", "nCandidates", "Page", "ItemRank", "correct_pct"],
        rows,
    );
}

fn alternatives(workbook: &mut Workbook, rows: &[Vec<Cell>]) {
    add_sheet(
        workbook,
        "Alternatives",
        &["Page", "ItemRank", "Diplome", "answer_Id", "Answer", "correct"],
        rows,
    );
}

/// 两页、三道有效题目、一道孤立题目、五个有效选项和一个孤立选项
fn full_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    speed_pages(
        &mut workbook,
        &[
            vec![Num(1.0), Bool(false), Num(30.0), Num(5.0)],
            vec![Num(2.0), Text("TRUE"), Num(45.0), Num(6.0)],
            vec![Num(1.0), Bool(true), Num(99.0), Num(1.0)],
        ],
    );
    questions(
        &mut workbook,
        &[
            vec![Text("T1"), Text("D1"), Num(40.0), Num(2.0), Num(3.0), Num(0.5)],
            vec![Text("T1"), Text("D1"), Num(40.0), Num(1.0), Num(5.0), Num(0.6)],
            vec![Text("T1"), Text("D2"), Num(12.0), Num(1.0), Num(5.0), Blank],
            vec![Text("T2"), Text("D1"), Num(40.0), Num(9.0), Num(1.0), Num(0.1)],
        ],
    );
    alternatives(
        &mut workbook,
        &[
            vec![Num(1.0), Num(5.0), Text("D1"), Text("a"), Text("Paris"), Text("FALSE")],
            vec![Num(1.0), Num(5.0), Text("D1"), Text("b"), Text("Lyon"), Text("FALSE")],
            vec![Num(1.0), Num(5.0), Text("D1"), Text("c"), Text("Rome"), Text("TRUE")],
            vec![Num(1.0), Num(5.0), Text("D1"), Text("d"), Text("Nice"), Bool(true)],
            vec![Num(1.0), Num(5.0), Text("D1"), Text("e"), Text("Metz"), Text("FALSE")],
            vec![Num(9.0), Num(1.0), Text("D1"), Text("x"), Blank, Text("TRUE")],
        ],
    );

    workbook.save_to_buffer().unwrap()
}

/// 只有一页、没有题目
fn single_page_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    speed_pages(&mut workbook, &[vec![Num(7.0), Blank, Num(12.0), Blank]]);
    workbook.save_to_buffer().unwrap()
}

fn xlsx(name: &str, bytes: Vec<u8>) -> SelectedFile {
    SelectedFile::from_bytes(name, XLSX_CONTENT_TYPE, bytes)
}

async fn load(session: &DashboardSession, file: SelectedFile) -> LoadOutcome {
    session
        .select(Some(file))
        .expect("文件类型应被接受")
        .expect("应启动加载任务")
        .wait()
        .await
}

/// 在收到放行信号之前一直挂起的读取器
struct GatedReader {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    bytes: Vec<u8>,
}

impl FileReader for GatedReader {
    fn read(&self) -> BoxFuture<'static, AppResult<Vec<u8>>> {
        let gate = self.gate.lock().unwrap().take();
        let bytes = self.bytes.clone();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(bytes)
        }
        .boxed()
    }
}

// ========== 对账结果 ==========

#[tokio::test]
async fn test_full_workbook_reconciles() {
    logging::init(true);
    let session = DashboardSession::new(&Config::default());

    assert_eq!(load(&session, xlsx("full.xlsx", full_workbook())).await, LoadOutcome::Published);
    let model = session.snapshot().expect("应已发布模型");

    // 重复页码只保留第一行
    let numbers: Vec<i64> = model.pages().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    let page1 = model.page(1).unwrap();
    assert_eq!(page1.duration.mean, Some(30.0));
    assert!(!page1.has_instruction);
    assert!(model.page(2).unwrap().has_instruction);

    // 页面不存在的题目被丢弃
    assert_eq!(model.question_count(), 3);
    assert!(model.questions().all(|q| q.page_number != Some(9)));

    // 第 4 个选项到达时正确选项排到最前，第 5 个追加在末尾
    let question = &page1.questions[0];
    assert_eq!(question.diploma_code.as_deref(), Some("D1"));
    let order: Vec<_> = question
        .alternatives
        .iter()
        .filter_map(|a| a.choice_id.as_deref())
        .collect();
    assert_eq!(order, vec!["c", "a", "b", "d", "e"]);
    // 布尔单元格不等于字面量 TRUE
    assert_eq!(question.correct_alternatives().count(), 1);
    assert!(!question.alternatives[3].is_correct);
    assert!(page1.questions[1].alternatives.is_empty());

    let stats = model.stats;
    assert_eq!(stats.pages_built, 2);
    assert_eq!(stats.duplicate_page_rows, 1);
    assert_eq!(stats.questions_linked, 3);
    assert_eq!(stats.orphan_question_rows, 1);
    assert_eq!(stats.alternatives_attached, 5);
    assert_eq!(stats.orphan_alternative_rows, 1);
}

#[tokio::test]
async fn test_summary_comes_from_all_question_rows() {
    let session = DashboardSession::new(&Config::default());
    load(&session, xlsx("full.xlsx", full_workbook())).await;
    let model = session.snapshot().unwrap();

    let codes: Vec<_> = model.tests.iter().filter_map(|t| t.test_code.as_deref()).collect();
    assert_eq!(codes, vec!["T1", "T2"]);

    let t1 = model.test("T1").unwrap();
    assert_eq!(t1.cohort("D1").map(|c| c.question_count), Some(2));
    assert_eq!(t1.cohort("D2").and_then(|c| c.candidate_count), Some(12));
    assert_eq!(t1.min_page, Some(1));
    assert_eq!(t1.min_item_rank, Some(3));

    // 孤立题目也计入汇总
    let t2 = model.test("T2").unwrap();
    assert_eq!(t2.question_count(), 1);
    assert_eq!(t2.min_page, Some(9));
}

#[tokio::test]
async fn test_same_bytes_give_identical_model() {
    let session = DashboardSession::new(&Config::default());

    load(&session, xlsx("full.xlsx", full_workbook())).await;
    let first = session.snapshot().unwrap();
    load(&session, xlsx("full.xlsx", full_workbook())).await;
    let second = session.snapshot().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);
}

#[tokio::test]
async fn test_missing_sheets_give_partial_model() {
    let mut workbook = Workbook::new();
    questions(
        &mut workbook,
        &[vec![Text("T1"), Text("D1"), Num(40.0), Num(1.0), Num(1.0), Blank]],
    );
    let bytes = workbook.save_to_buffer().unwrap();

    let session = DashboardSession::new(&Config::default());
    assert_eq!(load(&session, xlsx("partial.xlsx", bytes)).await, LoadOutcome::Published);

    let model = session.snapshot().unwrap();
    assert!(model.pages.is_empty());
    assert_eq!(model.stats.orphan_question_rows, 1);
    assert_eq!(model.tests.len(), 1);
}

// ========== 选择与发布 ==========

#[tokio::test]
async fn test_rejected_file_keeps_model_and_reports_once() {
    let board = NoticeBoard::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(board.clone()));

    let session = DashboardSession::new(&Config::default());
    load(&session, xlsx("full.xlsx", full_workbook())).await;
    let before = session.snapshot().unwrap();
    assert!(board.errors().is_empty());

    let result = session.select(Some(SelectedFile::from_bytes("notes.csv", "text/csv", vec![1])));

    assert!(result.is_err());
    assert_eq!(board.errors().len(), 1);
    assert!(Arc::ptr_eq(&before, &session.snapshot().unwrap()));
    assert_eq!(session.latest_seq(), 1);
}

#[tokio::test]
async fn test_undecodable_workbook_keeps_model() {
    let session = DashboardSession::new(&Config::default());
    load(&session, xlsx("full.xlsx", full_workbook())).await;
    let before = session.snapshot().unwrap();

    let outcome = load(&session, xlsx("broken.xlsx", b"not a workbook".to_vec())).await;

    assert_eq!(outcome, LoadOutcome::Failed);
    assert!(Arc::ptr_eq(&before, &session.snapshot().unwrap()));
}

#[tokio::test]
async fn test_slow_stale_read_does_not_clobber() {
    let session = DashboardSession::new(&Config::default());
    let mut updates = session.subscribe();

    let (release, gate) = oneshot::channel();
    let slow = SelectedFile::new(
        "slow.xlsx",
        XLSX_CONTENT_TYPE,
        GatedReader {
            gate: Mutex::new(Some(gate)),
            bytes: full_workbook(),
        },
    );
    let slow_task = session.select(Some(slow)).unwrap().unwrap();

    let fast_task = session
        .select(Some(xlsx("fast.xlsx", single_page_workbook())))
        .unwrap()
        .unwrap();
    assert_eq!(fast_task.wait().await, LoadOutcome::Published);

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().seq, 2);

    release.send(()).unwrap();
    assert_eq!(slow_task.wait().await, LoadOutcome::Superseded);

    let model = session.snapshot().unwrap();
    assert_eq!(model.pages.len(), 1);
    assert!(model.page(7).is_some());
    assert_eq!(session.subscribe().borrow().seq, 2);
}

#[tokio::test]
async fn test_deselect_resets_model() {
    let session = DashboardSession::new(&Config::default());
    load(&session, xlsx("full.xlsx", full_workbook())).await;
    assert!(session.snapshot().is_some());

    assert!(session.select(None).unwrap().is_none());

    assert!(session.snapshot().is_none());
}

// ========== 命令行应用 ==========

#[tokio::test]
async fn test_app_exports_last_selection_as_json() {
    let dir = std::env::temp_dir().join(format!("exam_stats_test_{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let first = dir.join("first.xlsx");
    let last = dir.join("last.xlsx");
    let output = dir.join("model.json");
    tokio::fs::write(&first, full_workbook()).await.unwrap();
    tokio::fs::write(&last, single_page_workbook()).await.unwrap();

    let config = Config {
        output_json_file: Some(output.display().to_string()),
        ..Config::default()
    };
    let app = App::new(config, NoticeBoard::default());
    let stats = app.run(&[first, last]).await.unwrap();

    assert_eq!(stats.published, 1);
    assert_eq!(stats.published + stats.superseded, 2);

    let json = tokio::fs::read_to_string(&output).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pages"]["7"]["pageNumber"], 7);
    assert_eq!(value["pages"]["7"]["duration"]["mean"], 12.0);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}
