use tokio::sync::watch;

/// Current namespace filter. The empty string means "all namespaces".
#[derive(Debug)]
pub struct NamespaceSelector {
    tx: watch::Sender<String>,
}

impl NamespaceSelector {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(initial.into());
        Self { tx }
    }

    /// Publishes `namespace` to every observer, even when it equals the
    /// current value.
    pub fn set_namespace(&self, namespace: impl Into<String>) {
        let namespace = namespace.into();
        tracing::info!(namespace = %namespace, "namespace selected");
        self.tx.send_replace(namespace);
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// The current value counts as already seen; `changed()` resolves on
    /// the next `set_namespace`.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for NamespaceSelector {
    fn default() -> Self {
        Self::new("")
    }
}
