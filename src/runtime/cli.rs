use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cadenza", version, about = "Local music library and player")]
pub struct Args {
    /// Music directory to scan (overrides `library.music_dir`).
    #[arg(long, global = true)]
    pub music_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the music directory and record new tracks.
    Scan,
    /// List every known track.
    Tracks,
    #[command(subcommand)]
    Playlist(PlaylistCommand),
    #[command(subcommand)]
    Album(AlbumCommand),
    /// Manage the favorites playlist.
    #[command(subcommand)]
    Favorite(FavoriteCommand),
    /// Configure the metadata search API.
    #[command(subcommand)]
    Api(ApiCommand),
    /// Search tracks and manage the recent search history.
    #[command(subcommand)]
    Search(SearchCommand),
    /// List artists, or the tracks and albums of one artist.
    Artists { name: Option<String> },
    /// Look up artist and image for tracks without cached metadata.
    Enrich,
    /// Print lyrics for a track named `Artist - Title`.
    Lyrics { track_id: String },
    /// Drop every cached lyrics entry.
    ClearLyrics,
    /// Play the library, a playlist or an album.
    Play {
        #[arg(long, conflicts_with = "album")]
        playlist: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        shuffle: bool,
    },
    /// Delete every track, playlist and album record.
    Reset {
        /// Required; reset cannot be undone.
        #[arg(long)]
        yes: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Subcommand)]
pub enum PlaylistCommand {
    List,
    Create {
        name: String,
        /// Track ids to start with.
        tracks: Vec<String>,
    },
    Show { id: String },
    Add { id: String, tracks: Vec<String> },
    Remove { id: String, tracks: Vec<String> },
    Delete { id: String },
    Rename { id: String, name: String },
}

#[derive(Debug, Subcommand)]
pub enum AlbumCommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value = "")]
        artist: String,
        #[arg(long, default_value = "")]
        cover_art: String,
        tracks: Vec<String>,
    },
    Show { id: String },
    Add { id: String, tracks: Vec<String> },
    Remove { id: String, tracks: Vec<String> },
    Delete { id: String },
    Rename { id: String, name: String },
}

#[derive(Debug, Subcommand)]
pub enum FavoriteCommand {
    List,
    Add { track_id: String },
    Remove { track_id: String },
}

#[derive(Debug, Subcommand)]
pub enum SearchCommand {
    /// Find tracks by filename, title or artist.
    Find { query: String },
    Recent,
    Forget { query: String },
}

#[derive(Debug, Subcommand)]
pub enum ApiCommand {
    Show,
    Enable,
    Disable,
    /// Set the bearer token.
    Token { token: String },
}
