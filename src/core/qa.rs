use crate::domain::ports::ChatProvider;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const EMPTY_QUESTION_PROMPT: &str = "Please type a question.";
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

pub const COMMON_QA: [(&str, &str); 5] = [
    ("What is a normal period length?", "Usually 3–7 days."),
    (
        "Can I swim on my period?",
        "Yes! Just use a tampon or menstrual cup.",
    ),
    (
        "Is brown blood normal?",
        "Yes. Brown blood is just older blood that's been exposed to air.",
    ),
    (
        "Can I get pregnant during my period?",
        "It's rare, but possible especially with irregular cycles.",
    ),
    (
        "What's PMS?",
        "PMS stands for premenstrual syndrome. It includes mood swings, cramps, and more.",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
    pub expanded: bool,
}

pub fn format_error_answer(message: &str) -> String {
    format!("❌ Error: {}", message)
}

/// 送出中的 chat 請求；drop 時中止背景 task
pub struct PendingAnswer {
    rx: oneshot::Receiver<String>,
    task: JoinHandle<()>,
}

impl PendingAnswer {
    pub async fn recv(mut self) -> String {
        match (&mut self.rx).await {
            Ok(text) => text,
            Err(_) => format_error_answer("request was cancelled"),
        }
    }
}

impl Drop for PendingAnswer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Q&A 畫面的狀態
#[derive(Debug, Clone)]
pub struct QaState {
    items: Vec<FaqItem>,
    answer: String,
}

impl Default for QaState {
    fn default() -> Self {
        Self::new()
    }
}

impl QaState {
    pub fn new() -> Self {
        let items = COMMON_QA
            .iter()
            .map(|&(question, answer)| FaqItem {
                question,
                answer,
                expanded: false,
            })
            .collect();

        Self {
            items,
            answer: String::new(),
        }
    }

    pub fn items(&self) -> &[FaqItem] {
        &self.items
    }

    /// 展開/收合；回傳新的狀態，索引無效時回傳 None
    pub fn toggle_item(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.expanded = !item.expanded;
        Some(item.expanded)
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn set_answer(&mut self, text: impl Into<String>) {
        self.answer = text.into();
    }

    /// 空白問題不送出。其餘情況先顯示 "Thinking..." 再於背景送出請求。
    pub fn ask(&mut self, provider: Arc<dyn ChatProvider>, question: &str) -> Option<PendingAnswer> {
        let question = question.trim().to_string();
        if question.is_empty() {
            self.set_answer(EMPTY_QUESTION_PROMPT);
            return None;
        }

        self.set_answer(THINKING_PLACEHOLDER);
        let (tx, rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let text = match provider.complete(&question).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("Chat request failed: {}", e);
                    format_error_answer(&e.to_string())
                }
            };
            let _ = tx.send(text);
        });

        Some(PendingAnswer { rx, task })
    }

    /// 等待回覆並取代 placeholder
    pub async fn resolve(&mut self, pending: PendingAnswer) -> &str {
        let text = pending.recv().await;
        self.set_answer(text);
        self.answer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{Result, TrackerError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct EchoProvider;

    #[async_trait]
    impl ChatProvider for EchoProvider {
        async fn complete(&self, question: &str) -> Result<String> {
            Ok(format!("You asked: {}", question))
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl ChatProvider for BrokenProvider {
        async fn complete(&self, _question: &str) -> Result<String> {
            Err(TrackerError::parse("no choices"))
        }
    }

    /// 回覆前先睡一下，回覆時設定旗標
    struct SlowProvider {
        replied: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ChatProvider for SlowProvider {
        async fn complete(&self, _question: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.replied.store(true, Ordering::SeqCst);
            Ok("late".to_string())
        }
    }

    #[test]
    fn test_faq_items_toggle_independently() {
        let mut qa = QaState::new();
        assert_eq!(qa.items().len(), 5);
        assert!(qa.items().iter().all(|item| !item.expanded));

        assert_eq!(qa.toggle_item(1), Some(true));
        assert!(qa.items()[1].expanded);
        assert!(!qa.items()[0].expanded);
        assert_eq!(qa.toggle_item(1), Some(false));
        assert_eq!(qa.toggle_item(42), None);
    }

    #[tokio::test]
    async fn test_blank_question_is_not_sent() {
        let mut qa = QaState::new();
        assert!(qa.ask(Arc::new(EchoProvider), "   \n").is_none());
        assert_eq!(qa.answer(), EMPTY_QUESTION_PROMPT);
    }

    #[tokio::test]
    async fn test_answer_replaces_placeholder() {
        let mut qa = QaState::new();
        let pending = qa.ask(Arc::new(EchoProvider), "  What's PMS? ").unwrap();
        assert_eq!(qa.answer(), THINKING_PLACEHOLDER);

        assert_eq!(qa.resolve(pending).await, "You asked: What's PMS?");
    }

    #[tokio::test]
    async fn test_failure_becomes_error_text() {
        let mut qa = QaState::new();
        let pending = qa.ask(Arc::new(BrokenProvider), "hello").unwrap();

        let answer = qa.resolve(pending).await;
        assert!(answer.starts_with("❌ Error: "));
        assert!(answer.contains("no choices"));
    }

    #[tokio::test]
    async fn test_dropping_pending_answer_aborts_request() {
        let replied = Arc::new(AtomicBool::new(false));
        let provider = Arc::new(SlowProvider {
            replied: Arc::clone(&replied),
        });

        let mut qa = QaState::new();
        let pending = qa.ask(provider, "Can I swim on my period?").unwrap();
        tokio::task::yield_now().await;
        drop(pending);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!replied.load(Ordering::SeqCst));
        assert_eq!(qa.answer(), THINKING_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_kept_pending_answer_completes() {
        let replied = Arc::new(AtomicBool::new(false));
        let provider = Arc::new(SlowProvider {
            replied: Arc::clone(&replied),
        });

        let mut qa = QaState::new();
        let pending = qa.ask(provider, "Is brown blood normal?").unwrap();

        assert_eq!(qa.resolve(pending).await, "late");
        assert!(replied.load(Ordering::SeqCst));
    }
}
