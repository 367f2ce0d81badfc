//! Clients for external metadata services.

pub mod anilist;

pub use anilist::{AniListClient, AniListError, AnimeRecord};
