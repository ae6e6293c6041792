use tokio::sync::watch;

/// 畫面的存活期。drop 或呼叫 `tear_down` 之後，所有 `TeardownSignal` 都會收到通知。
#[derive(Debug)]
pub struct ScreenLifetime {
    tx: watch::Sender<bool>,
}

impl ScreenLifetime {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> TeardownSignal {
        TeardownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn tear_down(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for ScreenLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScreenLifetime {
    fn drop(&mut self) {
        self.tear_down();
    }
}

#[derive(Debug, Clone)]
pub struct TeardownSignal {
    rx: watch::Receiver<bool>,
}

impl TeardownSignal {
    pub fn is_torn_down(&self) -> bool {
        *self.rx.borrow()
    }

    /// sender 消失也視為已拆除
    pub async fn torn_down(&mut self) {
        let _ = self.rx.wait_for(|torn_down| *torn_down).await;
    }
}
