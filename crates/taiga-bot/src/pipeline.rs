//! The scrape → download → PDF pipeline behind image-host links.

use teloxide::prelude::*;
use teloxide::types::InputFile;

use taiga_core::download::download_images;
use taiga_core::pdf::assemble_pdf;
use taiga_core::scrape::fetch_gallery;
use taiga_core::scratch::ScratchDir;

use crate::AppState;

/// Name presented to the chat for the assembled document.
const PDF_FILE_NAME: &str = "multporn_images.pdf";

/// Run the whole pipeline for one chat: scrape the gallery page, download
/// up to `limit` images, send each original, then assemble and send a PDF.
///
/// Whatever happens inside, the chat's session is cleared and the scratch
/// folder is removed before this returns; only Telegram send failures
/// propagate.
pub async fn run_image_pipeline(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
    url: &str,
    limit: usize,
) -> ResponseResult<()> {
    let outcome = run_inner(bot, state, chat_id, url, limit).await;
    state.sessions.clear(chat_id.0).await;
    outcome
}

async fn run_inner(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
    url: &str,
    limit: usize,
) -> ResponseResult<()> {
    bot.send_message(chat_id, "🔍 Fetching images, please wait...")
        .await?;

    let image_urls = match fetch_gallery(&state.http, url).await {
        Ok(urls) => urls,
        Err(error) => {
            tracing::error!(url, %error, "gallery scrape failed");
            bot.send_message(chat_id, format!("❌ Error: {error}")).await?;
            return Ok(());
        }
    };
    let selected: Vec<String> = image_urls.into_iter().take(limit).collect();

    let scratch = match ScratchDir::create(&state.work_dir, &format!("temp_downloads_{}", chat_id.0))
    {
        Ok(scratch) => scratch,
        Err(error) => {
            tracing::error!(%error, "could not create download folder");
            bot.send_message(chat_id, format!("❌ Error: {error}")).await?;
            return Ok(());
        }
    };

    bot.send_message(chat_id, format!("⬇️ Downloading {} images...", selected.len()))
        .await?;

    let downloaded = match download_images(&state.http, &selected, scratch.path()).await {
        Ok(paths) => paths,
        Err(error) => {
            tracing::error!(%error, "image download failed");
            bot.send_message(chat_id, format!("❌ Error: {error}")).await?;
            return Ok(());
        }
    };

    for path in &downloaded {
        if let Err(error) = bot.send_document(chat_id, InputFile::file(path.clone())).await {
            tracing::error!(path = %path.display(), %error, "error sending document");
        }
    }

    bot.send_message(chat_id, "📄 Generating PDF...").await?;

    let pdf_path = scratch.path().join("output.pdf");
    let assembled = tokio::task::spawn_blocking({
        let folder = scratch.path().to_path_buf();
        let pdf_path = pdf_path.clone();
        move || assemble_pdf(&folder, &pdf_path)
    })
    .await;

    match assembled {
        Ok(Ok(pages)) => {
            tracing::debug!(pages, "assembled gallery PDF");
            bot.send_document(chat_id, InputFile::file(pdf_path).file_name(PDF_FILE_NAME))
                .await?;
            bot.send_message(chat_id, "✅ All images and PDF have been sent!")
                .await?;
        }
        Ok(Err(error)) => {
            tracing::error!(%error, "error creating PDF");
            bot.send_message(chat_id, format!("❌ Error creating PDF: {error}"))
                .await?;
        }
        Err(error) => {
            tracing::error!(%error, "PDF assembly task failed");
            bot.send_message(chat_id, "❌ Error creating PDF: assembly task failed.")
                .await?;
        }
    }

    Ok(())
}
