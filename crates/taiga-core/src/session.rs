use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::split::MessageLink;

// ── Quality options ──────────────────────────────────────────────

/// The five fixed quality offerings presented during the anime flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    P480,
    P720,
    P1080,
    P720And1080,
    P480To1080,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::P480,
        Quality::P720,
        Quality::P1080,
        Quality::P720And1080,
        Quality::P480To1080,
    ];

    /// Button label shown in the quality keyboard.
    pub fn label(self) -> &'static str {
        match self {
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
            Quality::P720And1080 => "720p & 1080p",
            Quality::P480To1080 => "480p, 720p & 1080p",
        }
    }

    /// Stable datum carried by the button callback.
    pub fn callback_data(self) -> &'static str {
        match self {
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
            Quality::P720And1080 => "720p_1080p",
            Quality::P480To1080 => "480p_720p_1080p",
        }
    }

    pub fn from_callback(data: &str) -> Option<Quality> {
        Quality::ALL
            .iter()
            .copied()
            .find(|q| q.callback_data() == data)
    }

    /// Rendering used inside announcement text.
    pub fn display(self) -> &'static str {
        match self {
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
            Quality::P720And1080 => "720p, 1080p",
            Quality::P480To1080 => "480p, 720p, 1080p",
        }
    }
}

// ── Per-chat state ───────────────────────────────────────────────

/// Where a chat currently is within one of the guided flows.
///
/// Collected inputs ride along as payloads, so a later step cannot exist
/// without the data its earlier steps gathered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingAnimeName,
    AwaitingQuality {
        search: String,
    },
    AwaitingFormat {
        search: String,
        quality: Quality,
    },
    AwaitingImageLimit {
        url: String,
    },
    AwaitingStartLink,
    AwaitingEndLink {
        start: MessageLink,
    },
}

/// Per-chat conversational state plus the sticky name template set by
/// /setparams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    pub state: ChatState,
    pub name_template: Option<String>,
}

// ── Session store ────────────────────────────────────────────────

/// In-memory session store keyed by chat id.
///
/// One store-wide lock makes every read and transition atomic, so rapid
/// double-submission cannot corrupt a session. Two long pipelines for the
/// same chat can still overlap at the flow level; that is accepted, since
/// chat events arrive at human cadence. The lock is never held across
/// network calls.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, ChatSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the chat's session; default (idle) when none exists.
    pub async fn get(&self, chat_id: i64) -> ChatSession {
        self.sessions
            .lock()
            .await
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_state(&self, chat_id: i64, state: ChatState) {
        self.sessions.lock().await.entry(chat_id).or_default().state = state;
    }

    pub async fn set_template(&self, chat_id: i64, template: String) {
        self.sessions
            .lock()
            .await
            .entry(chat_id)
            .or_default()
            .name_template = Some(template);
    }

    /// Replace the whole session, discarding whatever was stored before.
    pub async fn replace(&self, chat_id: i64, session: ChatSession) {
        self.sessions.lock().await.insert(chat_id, session);
    }

    /// Back to idle, keeping the name template.
    pub async fn reset_state(&self, chat_id: i64) {
        self.set_state(chat_id, ChatState::Idle).await;
    }

    /// Drop the session entirely (state and template).
    pub async fn clear(&self, chat_id: i64) {
        self.sessions.lock().await.remove(&chat_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_session_is_idle() {
        let store = SessionStore::new();
        let session = store.get(7).await;
        assert_eq!(session.state, ChatState::Idle);
        assert!(session.name_template.is_none());
    }

    #[tokio::test]
    async fn test_state_roundtrip() {
        let store = SessionStore::new();
        store.set_state(7, ChatState::AwaitingAnimeName).await;
        assert_eq!(store.get(7).await.state, ChatState::AwaitingAnimeName);
        assert_eq!(store.get(8).await.state, ChatState::Idle);
    }

    #[tokio::test]
    async fn test_reset_keeps_template() {
        let store = SessionStore::new();
        store.set_template(7, "S01-E{episode}".into()).await;
        store.set_state(7, ChatState::AwaitingStartLink).await;

        store.reset_state(7).await;
        let session = store.get(7).await;
        assert_eq!(session.state, ChatState::Idle);
        assert_eq!(session.name_template.as_deref(), Some("S01-E{episode}"));
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let store = SessionStore::new();
        store.set_template(7, "E{episode}".into()).await;
        store.clear(7).await;
        assert_eq!(store.get(7).await, ChatSession::default());
    }

    #[tokio::test]
    async fn test_replace_discards_template() {
        let store = SessionStore::new();
        store.set_template(7, "E{episode}".into()).await;
        store
            .replace(
                7,
                ChatSession {
                    state: ChatState::AwaitingAnimeName,
                    name_template: None,
                },
            )
            .await;

        let session = store.get(7).await;
        assert_eq!(session.state, ChatState::AwaitingAnimeName);
        assert!(session.name_template.is_none());
    }

    #[test]
    fn test_quality_callback_roundtrip() {
        for quality in Quality::ALL {
            assert_eq!(Quality::from_callback(quality.callback_data()), Some(quality));
        }
        assert_eq!(Quality::from_callback("4k"), None);
    }

    #[test]
    fn test_quality_display() {
        assert_eq!(Quality::P480To1080.display(), "480p, 720p, 1080p");
        assert_eq!(Quality::P720And1080.display(), "720p, 1080p");
        assert_eq!(Quality::P1080.display(), "1080p");
    }
}
