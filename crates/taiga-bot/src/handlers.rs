//! Telegram update handlers.
//!
//! Authorization comes first in every handler; after that the flow module
//! decides what happens and this module performs the sends.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use url::Url;

use taiga_core::session::Quality;

use crate::flow::{self, CallbackAction, TextAction};
use crate::format::{self, AnnouncementKind};
use crate::keyboards;
use crate::pipeline;
use crate::AppState;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if !state.config.is_authorized(user.id.0) {
        bot.send_message(msg.chat.id, flow::DENIED_TEXT).await?;
        return Ok(());
    }

    let chat_id = msg.chat.id;
    match flow::on_text(&state.sessions, chat_id.0, text).await {
        TextAction::Ignore => {}
        TextAction::Reply(reply) => {
            bot.send_message(chat_id, reply).await?;
        }
        TextAction::ReplyMany(replies) => {
            for reply in replies {
                bot.send_message(chat_id, reply).await?;
            }
        }
        TextAction::AskQuality => {
            bot.send_message(chat_id, flow::ASK_QUALITY)
                .reply_markup(keyboards::quality_keyboard())
                .await?;
        }
        TextAction::RunImagePipeline { url, limit } => {
            pipeline::run_image_pipeline(&bot, &state, chat_id, &url, limit).await?;
        }
    }

    Ok(())
}

pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    if !state.config.is_authorized(q.from.id.0) {
        bot.answer_callback_query(q.id)
            .text(flow::DENIED_TEXT)
            .await?;
        return Ok(());
    }

    let Some(message) = q.message else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };
    let Some(data) = q.data else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    let chat_id = message.chat.id;
    match flow::on_callback(&state.sessions, chat_id.0, &data).await {
        CallbackAction::NoActiveSelection => {
            bot.answer_callback_query(q.id)
                .text(flow::NO_ACTIVE_SELECTION)
                .await?;
        }
        CallbackAction::AskFormat => {
            bot.edit_message_text(chat_id, message.id, flow::ASK_FORMAT)
                .reply_markup(keyboards::format_keyboard())
                .await?;
            bot.answer_callback_query(q.id).await?;
        }
        CallbackAction::Announce {
            search,
            quality,
            kind,
        } => {
            let delivered = announce(&bot, &state, chat_id, &search, quality, kind).await?;
            let answer = bot.answer_callback_query(q.id);
            if delivered {
                answer.text(flow::INFO_SENT).await?;
            } else {
                answer.await?;
            }
        }
    }

    Ok(())
}

/// Look up the record and send the announcement; `Ok(false)` means the
/// record was not found and the user has been told so.
async fn announce(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
    search: &str,
    quality: Quality,
    kind: AnnouncementKind,
) -> ResponseResult<bool> {
    let record = match state.anilist.find_anime(search).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            bot.send_message(chat_id, flow::ANIME_NOT_FOUND).await?;
            return Ok(false);
        }
        Err(error) => {
            tracing::error!(search, %error, "anime lookup failed");
            bot.send_message(chat_id, flow::ANIME_NOT_FOUND).await?;
            return Ok(false);
        }
    };

    let caption = format::render(&record, kind, quality);
    let cover = format::cover_url(&record);

    // Photo first; fall back to plain text when the cover cannot be sent.
    let mut sent = false;
    match Url::parse(&cover) {
        Ok(cover_url) => {
            match bot
                .send_photo(chat_id, InputFile::url(cover_url))
                .caption(caption.clone())
                .parse_mode(ParseMode::Html)
                .await
            {
                Ok(_) => sent = true,
                Err(error) => tracing::error!(%error, "error sending photo"),
            }
        }
        Err(error) => tracing::error!(%cover, %error, "cover url did not parse"),
    }

    if !sent {
        bot.send_message(chat_id, format::fallback_text(&caption))
            .parse_mode(ParseMode::Html)
            .await?;
    }

    Ok(true)
}
