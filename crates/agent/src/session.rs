//! Per-thread session state.
//!
//! [`SessionStore`] keys conversations by thread id. The map itself is
//! behind an `RwLock`; each conversation is behind its own async `Mutex`,
//! so turns on the same thread are strictly serialized while different
//! threads proceed in parallel. In-memory only — a restart forgets all
//! sessions, which is acceptable for front-desk small talk.

use crate::loop_runner::AgentLoop;
use maitred_core::error::AgentError;
use maitred_core::message::{Conversation, Message, ThreadId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

#[derive(Default)]
pub struct SessionStore {
    threads: RwLock<HashMap<String, Arc<Mutex<Conversation>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the conversation for `thread_id`, creating it on first use.
    pub async fn get_or_create(&self, thread_id: &str) -> Arc<Mutex<Conversation>> {
        {
            let threads = self.threads.read().await;
            if let Some(conversation) = threads.get(thread_id) {
                return Arc::clone(conversation);
            }
        }

        let mut threads = self.threads.write().await;
        // Lost the race? Use whoever got there first.
        Arc::clone(threads.entry(thread_id.to_string()).or_insert_with(|| {
            debug!(thread_id, "Creating session");
            Arc::new(Mutex::new(Conversation::for_thread(ThreadId::from(
                thread_id,
            ))))
        }))
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.threads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.threads.read().await.is_empty()
    }
}

/// The front desk: the agent loop plus session state.
///
/// `handle` is the whole public contract — give it a thread id and what
/// the guest said, get back what the receptionist says.
pub struct Concierge {
    agent: AgentLoop,
    sessions: SessionStore,
}

impl Concierge {
    pub fn new(agent: AgentLoop) -> Self {
        Self {
            agent,
            sessions: SessionStore::new(),
        }
    }

    /// Run one guest turn on the given thread.
    ///
    /// Holds the thread's lock for the whole turn, so two calls on the
    /// same thread id never interleave their transcripts.
    pub async fn handle(
        &self,
        thread_id: &str,
        user_text: &str,
    ) -> std::result::Result<String, AgentError> {
        let conversation = self.sessions.get_or_create(thread_id).await;
        let mut conversation = conversation.lock().await;

        conversation.push(Message::user(user_text));
        self.agent.process(&mut conversation).await
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maitred_core::error::{ReasonerError, ToolError};
    use maitred_core::message::{MessageToolCall, Role};
    use maitred_core::reasoner::{Reasoner, ReasonerRequest, ReasonerResponse};
    use maitred_core::tool::{Tool, ToolRegistry, ToolResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Echoes the last user message back, numbered, after a short delay —
    /// long enough for interleaving to show up if serialization is broken.
    struct CountingReasoner {
        turns: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Reasoner for CountingReasoner {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(
            &self,
            request: ReasonerRequest,
        ) -> Result<ReasonerResponse, ReasonerError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let n = self.turns.fetch_add(1, Ordering::SeqCst);
            let last_user = request
                .messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(ReasonerResponse {
                message: Message::assistant(format!("reply {n} to: {last_user}")),
                usage: None,
                model: "counting".into(),
            })
        }
    }

    fn concierge() -> Arc<Concierge> {
        let agent = AgentLoop::new(
            Arc::new(CountingReasoner {
                turns: AtomicUsize::new(0),
            }),
            "counting",
            0.7,
            Arc::new(ToolRegistry::new()),
        );
        Arc::new(Concierge::new(agent))
    }

    #[tokio::test]
    async fn sessions_are_created_on_first_use() {
        let concierge = concierge();
        assert!(concierge.sessions().is_empty().await);

        concierge.handle("front-desk", "Hello").await.unwrap();
        assert_eq!(concierge.sessions().len().await, 1);

        // Same thread id reuses the session.
        concierge.handle("front-desk", "Hello again").await.unwrap();
        assert_eq!(concierge.sessions().len().await, 1);
    }

    #[tokio::test]
    async fn context_carries_across_turns() {
        let concierge = concierge();

        concierge.handle("abc123", "My name is Ada").await.unwrap();
        concierge.handle("abc123", "Book me a table").await.unwrap();

        let conversation = concierge.sessions().get_or_create("abc123").await;
        let conversation = conversation.lock().await;

        // System + 2 × (user + assistant)
        assert_eq!(conversation.messages.len(), 5);
        assert_eq!(conversation.messages[0].role, Role::System);
        assert!(conversation.messages[1].content.contains("Ada"));
    }

    #[tokio::test]
    async fn same_thread_turns_never_interleave() {
        let concierge = concierge();

        let a = {
            let c = Arc::clone(&concierge);
            tokio::spawn(async move { c.handle("shared", "first").await })
        };
        let b = {
            let c = Arc::clone(&concierge);
            tokio::spawn(async move { c.handle("shared", "second").await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let conversation = concierge.sessions().get_or_create("shared").await;
        let conversation = conversation.lock().await;

        // Whatever order the tasks won the lock in, each user message is
        // immediately followed by its own reply.
        let roles: Vec<_> = conversation.messages.iter().map(|m| &m.role).collect();
        assert_eq!(
            roles,
            vec![
                &Role::System,
                &Role::User,
                &Role::Assistant,
                &Role::User,
                &Role::Assistant
            ]
        );
        for pair in conversation.messages[1..].chunks(2) {
            assert!(pair[1].content.contains(&pair[0].content));
        }
    }

    /// Requests one operation on its first step, answers plainly after.
    struct OpThenReply {
        steps: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Reasoner for OpThenReply {
        fn name(&self) -> &str {
            "op-then-reply"
        }

        async fn complete(
            &self,
            _request: ReasonerRequest,
        ) -> Result<ReasonerResponse, ReasonerError> {
            let message = if self.steps.fetch_add(1, Ordering::SeqCst) == 0 {
                let mut m = Message::assistant("");
                m.tool_calls = vec![MessageToolCall {
                    id: "call_1".into(),
                    name: "slow_listing".into(),
                    arguments: "{}".into(),
                }];
                m
            } else {
                Message::assistant("All set.")
            };
            Ok(ReasonerResponse {
                message,
                usage: None,
                model: "op-then-reply".into(),
            })
        }
    }

    struct SlowListing;

    #[async_trait::async_trait]
    impl Tool for SlowListing {
        fn name(&self) -> &str {
            "slow_listing"
        }
        fn description(&self) -> &str {
            "slow"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(ToolResult::ok(&serde_json::json!({"count": 0})))
        }
    }

    #[tokio::test]
    async fn aborted_turn_leaves_transcript_valid_and_thread_usable() {
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(SlowListing));
        let agent = AgentLoop::new(
            Arc::new(OpThenReply {
                steps: AtomicUsize::new(0),
            }),
            "op-then-reply",
            0.7,
            Arc::new(tools),
        );
        let concierge = Arc::new(Concierge::new(agent));

        // Abandon the turn while its dispatch is still in flight.
        let turn = {
            let c = Arc::clone(&concierge);
            tokio::spawn(async move { c.handle("impatient", "list everything").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        turn.abort();
        assert!(turn.await.unwrap_err().is_cancelled());

        {
            let conversation = concierge.sessions().get_or_create("impatient").await;
            let conversation = conversation.lock().await;

            // Every tool result answers a call an earlier assistant
            // message actually issued.
            let mut issued: Vec<&str> = Vec::new();
            for m in &conversation.messages {
                match m.role {
                    Role::Assistant => {
                        issued.extend(m.tool_calls.iter().map(|tc| tc.id.as_str()))
                    }
                    Role::Tool => {
                        let answers = m.tool_call_id.as_deref().unwrap();
                        assert!(issued.contains(&answers));
                    }
                    _ => {}
                }
            }
        }

        // The thread takes a fresh turn after the abort.
        let reply = concierge.handle("impatient", "are you there?").await.unwrap();
        assert_eq!(reply, "All set.");
    }

    #[tokio::test]
    async fn different_threads_proceed_independently() {
        let concierge = concierge();

        let mut handles = Vec::new();
        for i in 0..4 {
            let c = Arc::clone(&concierge);
            handles.push(tokio::spawn(async move {
                c.handle(&format!("thread-{i}"), "Hello").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(concierge.sessions().len().await, 4);
    }
}
