//! Conversation state machine.
//!
//! Transitions live here, away from Telegram I/O: handlers feed incoming
//! text or callback data through [`on_text`] / [`on_callback`] and get back
//! a description of what to send. The whole machine stays unit-testable
//! without a live bot.

use taiga_core::session::{ChatSession, ChatState, Quality, SessionStore};
use taiga_core::split::{self, MessageLink, SplitError, EPISODE_PLACEHOLDER, LINES_PER_MESSAGE};

use crate::format::AnnouncementKind;

/// Links starting with this prefix kick off the image pipeline.
pub const IMAGE_HOST_PREFIX: &str = "https://multporn.net/";

// ── User-facing messages ─────────────────────────────────────────────────────

pub const DENIED_TEXT: &str = "🚫 You are not authorized to use this bot.";

pub const WELCOME_TEXT: &str = "Welcome! Here's what I can do:\n\n\
    • Use /anime to search for anime info\n\
    • Send a multporn.net link to get images and PDF\n\
    • Use /setparams to set anime name format\n\
    • Use /split for Telegram links with episode numbering";

pub const ASK_ANIME_NAME: &str = "📩 Send me the anime name:";
pub const ASK_QUALITY: &str = "📊 Choose quality:";
pub const ASK_FORMAT: &str = "📁 Choose format:";

pub const SETPARAMS_USAGE: &str = "❌ Invalid usage. Use /setparams <anime_name with {episode}>\n\
    Example: /setparams [AW] S01-E{episode} Anime Name [1080p] [Dual]";
pub const SETPARAMS_MISSING_PLACEHOLDER: &str = "❌ Format must include {episode} placeholder.";
pub const SPLIT_NEEDS_TEMPLATE: &str =
    "❌ Please use /setparams first to set the anime name format.";

pub const ASK_START_LINK: &str = "Send the start link (format: https://t.me/channel/message_id)";
pub const ASK_END_LINK: &str = "Now send the end link";
pub const INVALID_LINK: &str = "❌ Invalid link format. Should be https://t.me/channel/message_id";
pub const INVERTED_RANGE: &str = "❌ Start ID cannot be greater than End ID.";

pub const ASK_IMAGE_LIMIT: &str = "How many images would you like to download?";
pub const INVALID_LIMIT: &str = "❌ Please send a valid number.";

pub const NO_ACTIVE_SELECTION: &str = "❌ No active selection found.";
pub const ANIME_NOT_FOUND: &str = "❌ Anime not found.";
pub const INFO_SENT: &str = "✅ Anime info sent!";

// ── Text transitions ─────────────────────────────────────────────────────────

/// What the message handler should do after a text transition.
#[derive(Debug, Clone, PartialEq)]
pub enum TextAction {
    /// Nothing recognized; stay silent.
    Ignore,
    Reply(String),
    /// Several replies, sent in order.
    ReplyMany(Vec<String>),
    /// Prompt with the quality keyboard.
    AskQuality,
    /// Kick off the scrape → download → PDF pipeline.
    RunImagePipeline { url: String, limit: usize },
}

/// Advance the chat's flow with one text message.
pub async fn on_text(store: &SessionStore, chat_id: i64, text: &str) -> TextAction {
    let text = text.trim();

    if let Some(action) = on_command(store, chat_id, text).await {
        return action;
    }

    let session = store.get(chat_id).await;
    match session.state {
        ChatState::AwaitingStartLink => match text.parse::<MessageLink>() {
            Ok(start) => {
                store
                    .set_state(chat_id, ChatState::AwaitingEndLink { start })
                    .await;
                TextAction::Reply(ASK_END_LINK.to_owned())
            }
            Err(_) => TextAction::Reply(INVALID_LINK.to_owned()),
        },
        ChatState::AwaitingEndLink { start } => match text.parse::<MessageLink>() {
            Ok(end) => {
                let template = session.name_template.unwrap_or_default();
                let action = match split::split_range(&start, &end, &template) {
                    Ok(lines) => {
                        TextAction::ReplyMany(split::chunk_lines(&lines, LINES_PER_MESSAGE))
                    }
                    Err(SplitError::InvertedRange { .. }) => {
                        TextAction::Reply(INVERTED_RANGE.to_owned())
                    }
                    Err(error) => {
                        tracing::error!(%error, "split failed");
                        TextAction::Reply(format!("❌ Error: {error}"))
                    }
                };
                store.reset_state(chat_id).await;
                action
            }
            Err(_) => TextAction::Reply(INVALID_LINK.to_owned()),
        },
        ChatState::AwaitingAnimeName => {
            store
                .set_state(
                    chat_id,
                    ChatState::AwaitingQuality {
                        search: text.to_owned(),
                    },
                )
                .await;
            TextAction::AskQuality
        }
        ChatState::AwaitingImageLimit { url } => match text.parse::<i64>() {
            Ok(limit) if limit >= 1 => TextAction::RunImagePipeline {
                url,
                limit: limit as usize,
            },
            _ => TextAction::Reply(INVALID_LIMIT.to_owned()),
        },
        ChatState::Idle if text.starts_with(IMAGE_HOST_PREFIX) => {
            store
                .set_state(
                    chat_id,
                    ChatState::AwaitingImageLimit {
                        url: text.to_owned(),
                    },
                )
                .await;
            TextAction::Reply(ASK_IMAGE_LIMIT.to_owned())
        }
        _ => TextAction::Ignore,
    }
}

/// Slash commands. Unknown commands return `None` and fall through to
/// state handling, so stray slashes cannot wedge a flow.
async fn on_command(store: &SessionStore, chat_id: i64, text: &str) -> Option<TextAction> {
    let (head, args) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };
    // A group mention like /anime@SomeBot still counts as /anime.
    let command = head.split('@').next().unwrap_or(head);

    match command {
        "/start" => Some(TextAction::Reply(WELCOME_TEXT.to_owned())),
        "/anime" => {
            store
                .replace(
                    chat_id,
                    ChatSession {
                        state: ChatState::AwaitingAnimeName,
                        name_template: None,
                    },
                )
                .await;
            Some(TextAction::Reply(ASK_ANIME_NAME.to_owned()))
        }
        "/setparams" => Some(set_params(store, chat_id, args).await),
        "/split" => {
            if store.get(chat_id).await.name_template.is_none() {
                return Some(TextAction::Reply(SPLIT_NEEDS_TEMPLATE.to_owned()));
            }
            store.set_state(chat_id, ChatState::AwaitingStartLink).await;
            Some(TextAction::Reply(ASK_START_LINK.to_owned()))
        }
        _ => None,
    }
}

async fn set_params(store: &SessionStore, chat_id: i64, args: &str) -> TextAction {
    if args.is_empty() {
        return TextAction::Reply(SETPARAMS_USAGE.to_owned());
    }
    if !args.contains(EPISODE_PLACEHOLDER) {
        return TextAction::Reply(SETPARAMS_MISSING_PLACEHOLDER.to_owned());
    }
    store.set_template(chat_id, args.to_owned()).await;
    TextAction::Reply(format!("✅ Anime name set to: {args}"))
}

// ── Callback transitions ─────────────────────────────────────────────────────

/// What the callback handler should do after a button press.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackAction {
    /// Stale or unknown button; tell the user nothing is pending.
    NoActiveSelection,
    /// Quality was chosen; show the format keyboard.
    AskFormat,
    /// Terminal step: look up the record and send the announcement.
    Announce {
        search: String,
        quality: Quality,
        kind: AnnouncementKind,
    },
}

/// Advance the anime flow with one button press.
///
/// A format choice clears the whole session before the announcement is
/// attempted: the flow instance is over whether or not the lookup
/// succeeds.
pub async fn on_callback(store: &SessionStore, chat_id: i64, data: &str) -> CallbackAction {
    let session = store.get(chat_id).await;

    if let Some(quality) = Quality::from_callback(data) {
        if let ChatState::AwaitingQuality { search } = session.state {
            store
                .set_state(chat_id, ChatState::AwaitingFormat { search, quality })
                .await;
            return CallbackAction::AskFormat;
        }
        return CallbackAction::NoActiveSelection;
    }

    if let Some(kind) = AnnouncementKind::from_callback(data) {
        if let ChatState::AwaitingFormat { search, quality } = session.state {
            store.clear(chat_id).await;
            return CallbackAction::Announce {
                search,
                quality,
                kind,
            };
        }
        return CallbackAction::NoActiveSelection;
    }

    CallbackAction::NoActiveSelection
}

// ── Tests ───────────────────────────────────────────────────────────────────
