//! 通知收集
//!
//! 以 tracing Layer 的形式把每条日志的级别和消息收集起来，
//! 供展示层读取（例如在界面上列出错误）

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// 一条通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

/// 通知板，可被克隆后在多处共享同一份记录
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeBoard {
    /// 全部通知，按产生顺序
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    /// 错误级别的通知
    pub fn errors(&self) -> Vec<Notice> {
        self.lock()
            .iter()
            .filter(|n| n.level == Level::ERROR)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: Subscriber> Layer<S> for NoticeBoard {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.lock().push(Notice {
            level: *event.metadata().level(),
            message: visitor.message,
        });
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}
