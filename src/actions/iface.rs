use async_trait::async_trait;

/// A mutation the page can fire without awaiting it.
pub trait ActionHandler<R>: Send + Sync {
    fn mutate(&self, request: R);

    /// True while at least one mutation is still running.
    fn is_loading(&self) -> bool;
}

/// The part that actually builds, signs and sends transactions.
#[async_trait]
pub trait ActionExecutor: Send + Sync + 'static {
    type Request: Send + 'static;

    /// Short verb used in logs and notifications, e.g. `"stake"`.
    fn name(&self) -> &'static str;

    /// Returns the signatures of the submitted transactions.
    async fn execute(&self, request: Self::Request) -> anyhow::Result<Vec<String>>;
}
