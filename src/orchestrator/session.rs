//! 看板会话 - 编排层
//!
//! ## 职责
//!
//! 持有"当前发布的模型"，是它唯一的写入者。
//!
//! 1. **类型检查**：文件类型不符时拒绝，报告一次错误，不改变已发布的模型
//! 2. **序号分配**：每次被接受的选择获得单调递增的序号
//! 3. **后台加载**：每次选择启动一个任务，唯一的挂起点是读取文件字节
//! 4. **发布守卫**：只有序号仍为最新的结果才能覆盖已发布的模型
//!
//! 读取方通过 [`DashboardSession::subscribe`] 拿到 `watch::Receiver`，
//! 每次发布都是对 `Arc<ExamModel>` 的整体替换。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{CalamineDecoder, SelectedFile, WorkbookDecoder};
use crate::models::ExamModel;
use crate::workflow::{ReconcileFlow, SelectionCtx};

/// 已发布的状态
#[derive(Debug, Clone, Default)]
pub struct Published {
    /// 产生该状态的选择序号（0 表示从未选择过）
    pub seq: u64,
    /// `None` 表示没有模型（尚未选择或已取消选择）
    pub model: Option<Arc<ExamModel>>,
}

/// 单次加载的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Published,
    /// 完成前已有更新的选择
    Superseded,
    /// 读取或解码失败，已发布的模型保持不变
    Failed,
}

/// 一次被接受的选择对应的后台任务
#[derive(Debug)]
pub struct LoadTask {
    seq: u64,
    handle: JoinHandle<LoadOutcome>,
}

impl LoadTask {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// 等待任务结束
    pub async fn wait(self) -> LoadOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("[选择 #{}] 任务执行失败: {}", self.seq, e);
                LoadOutcome::Failed
            }
        }
    }
}

/// 看板会话
pub struct DashboardSession {
    expected_content_type: String,
    decoder: Arc<dyn WorkbookDecoder>,
    flow: Arc<ReconcileFlow>,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<Published>>,
}

impl DashboardSession {
    /// 使用 calamine 解码器创建会话
    pub fn new(config: &Config) -> Self {
        Self::with_decoder(config, Arc::new(CalamineDecoder::new(config)))
    }

    /// 使用自定义解码器创建会话
    pub fn with_decoder(config: &Config, decoder: Arc<dyn WorkbookDecoder>) -> Self {
        let (state, _) = watch::channel(Published::default());
        Self {
            expected_content_type: config.expected_content_type.clone(),
            decoder,
            flow: Arc::new(ReconcileFlow::new(config)),
            latest: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    /// 订阅已发布的状态
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.state.subscribe()
    }

    /// 当前已发布的模型
    pub fn snapshot(&self) -> Option<Arc<ExamModel>> {
        self.state.borrow().model.clone()
    }

    /// 最近一次被接受的选择序号
    pub fn latest_seq(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// 处理一次文件选择
    ///
    /// - `None`：取消选择，模型重置为空，不启动任务
    /// - 文件类型不符：返回错误，序号和模型都不变
    /// - 其他：分配新序号并启动后台加载任务
    ///
    /// 必须在 tokio 运行时中调用
    pub fn select(&self, file: Option<SelectedFile>) -> AppResult<Option<LoadTask>> {
        let Some(file) = file else {
            self.deselect();
            return Ok(None);
        };

        if file.content_type != self.expected_content_type {
            let err = AppError::content_type_mismatch(
                &file.name,
                &self.expected_content_type,
                &file.content_type,
            );
            error!("❌ 已拒绝文件: {}", err);
            return Err(err);
        }

        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let ctx = SelectionCtx::new(seq, &file.name);
        info!("{} 📂 已接受选择，开始读取", ctx);

        let handle = tokio::spawn(load(
            ctx,
            file,
            Arc::clone(&self.decoder),
            Arc::clone(&self.flow),
            Arc::clone(&self.latest),
            Arc::clone(&self.state),
        ));

        Ok(Some(LoadTask { seq, handle }))
    }

    fn deselect(&self) {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = &self.latest;
        let reset = self.state.send_if_modified(|current| {
            if latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            *current = Published { seq, model: None };
            true
        });

        if reset {
            info!("[选择 #{}] 🧹 已取消选择，模型已清空", seq);
        }
    }
}

/// 后台加载：读取 → 解码 → 对账 → 发布
async fn load(
    ctx: SelectionCtx,
    file: SelectedFile,
    decoder: Arc<dyn WorkbookDecoder>,
    flow: Arc<ReconcileFlow>,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<Published>>,
) -> LoadOutcome {
    let bytes = match file.read_bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("{} ❌ 读取文件失败: {}", ctx, e);
            return LoadOutcome::Failed;
        }
    };
    debug!("{} 读取完成: {} 字节", ctx, bytes.len());

    if latest.load(Ordering::SeqCst) != ctx.seq {
        log_superseded(&ctx, &latest);
        return LoadOutcome::Superseded;
    }

    let sheets = match decoder.decode(&bytes) {
        Ok(sheets) => sheets,
        Err(e) => {
            error!("{} ❌ 工作簿解码失败: {}", ctx, e);
            return LoadOutcome::Failed;
        }
    };
    info!("{} 📖 工作簿解码完成: 共 {} 行", ctx, sheets.total());

    let model = Arc::new(flow.run(sheets, &ctx));

    let published = state.send_if_modified(|current| {
        if latest.load(Ordering::SeqCst) != ctx.seq {
            return false;
        }
        *current = Published {
            seq: ctx.seq,
            model: Some(Arc::clone(&model)),
        };
        true
    });

    if published {
        info!("{} ✅ 模型已发布", ctx);
        LoadOutcome::Published
    } else {
        log_superseded(&ctx, &latest);
        LoadOutcome::Superseded
    }
}

// ========== 日志辅助函数 ==========

fn log_superseded(ctx: &SelectionCtx, latest: &AtomicU64) {
    info!(
        "{} ⏭️ 已被选择 #{} 取代，丢弃结果",
        ctx,
        latest.load(Ordering::SeqCst)
    );
}
