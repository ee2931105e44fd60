pub mod reconcile_flow;
pub mod selection_ctx;

pub use reconcile_flow::ReconcileFlow;
pub use selection_ctx::SelectionCtx;
