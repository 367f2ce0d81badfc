//! Announcement rendering for anime lookups.
//!
//! Everything here is pure string work: the same record, layout, and
//! quality always produce identical output, so the templates are pinned
//! by tests without any network involvement.

use taiga_api::AnimeRecord;
use taiga_core::session::Quality;

/// Base URL for cover art derived from an AniList media id.
const COVER_URL_BASE: &str = "https://img.anili.st/media";

/// The fixed announcement layouts a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementKind {
    Otaku,
    Hanime,
    Ongoing,
}

impl AnnouncementKind {
    /// All layouts, in the order they are offered on the keyboard.
    pub const ALL: [AnnouncementKind; 3] = [
        AnnouncementKind::Otaku,
        AnnouncementKind::Hanime,
        AnnouncementKind::Ongoing,
    ];

    /// Button label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            AnnouncementKind::Otaku => "Otaku",
            AnnouncementKind::Hanime => "Hanime",
            AnnouncementKind::Ongoing => "Ongoing",
        }
    }

    /// Stable identifier carried in callback data.
    pub fn callback_data(self) -> &'static str {
        match self {
            AnnouncementKind::Otaku => "otaku",
            AnnouncementKind::Hanime => "hanime",
            AnnouncementKind::Ongoing => "ongoing",
        }
    }

    pub fn from_callback(data: &str) -> Option<Self> {
        AnnouncementKind::ALL
            .into_iter()
            .find(|kind| kind.callback_data() == data)
    }
}

/// Cover image URL for a record.
pub fn cover_url(record: &AnimeRecord) -> String {
    format!("{COVER_URL_BASE}/{}", record.id)
}

/// Text sent when the cover photo cannot be delivered.
pub fn fallback_text(caption: &str) -> String {
    format!("⚠️ Could not load image, but here's the info:\n\n{caption}")
}

/// Render the announcement caption for one record.
///
/// The output uses Telegram HTML parse mode. The English title is
/// preferred, falling back to romaji; a missing episode count renders
/// as `N/A`.
pub fn render(record: &AnimeRecord, kind: AnnouncementKind, quality: Quality) -> String {
    let title = record
        .title_english
        .as_deref()
        .or(record.title_romaji.as_deref())
        .unwrap_or_default();
    let episodes = record
        .episodes
        .map(|n| n.to_string())
        .unwrap_or_else(|| "N/A".to_owned());
    let genres_text = record.genres.join(", ");
    let genre_tags = record
        .genres
        .iter()
        .map(|g| format!("#{g}"))
        .collect::<Vec<_>>()
        .join(" ");
    let quality = quality.display();

    match kind {
        AnnouncementKind::Hanime => format!(
            "<b>💦 {title}\n\
             ╭──────────────────────\n\
             ├ 📺 Episode : {episodes}\n\
             ├ 💾 Quality : {quality}\n\
             ├ 🎭 Genres: {genres_text}\n\
             ├ 🔊 Audio track : Sub\n\
             ├ #Censored\n\
             ├ #Recommendation +++++++\n\
             ╰──────────────────────</b>"
        ),
        AnnouncementKind::Otaku => format!(
            "<b>💙 {title}</b>\n\
             \n\
             <b>🎭 Genres :</b> {genres_text}\n\
             <b>🔊 Audio :</b> Dual Audio\n\
             <b>📡 Status :</b> Completed\n\
             <b>🗓 Episodes :</b> {episodes}\n\
             <b>💾 Quality :</b> {quality}\n\
             <b>✂️ Sizes :</b> 50MB, 120MB & 300MB\n\
             <b>🔞 Rating :</b> PG-13\n\
             \n\
             <blockquote>📌 : {genre_tags}</blockquote>"
        ),
        AnnouncementKind::Ongoing => format!(
            "❤️  {title}\n\
             ╭───────────────────\n\
             ├ 📺 Episodes : {episodes}\n\
             ├ 💾 Quality : {quality}\n\
             ├ 🎭 Genres: {genres_text}\n\
             ├ 🔊 Audio track : Dual [English+Japanese]\n\
             ╰───────────────────\n\
             Report Missing Episodes: @Otaku_Library_Support_Bot"
        ),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
