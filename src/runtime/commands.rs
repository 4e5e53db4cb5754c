use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::info;

use cadenza::audio::QueueSource;
use cadenza::collections::{AlbumInfo, ItemCollection, Library, Manager};
use cadenza::config::Settings;
use cadenza::enrich::{
    ApiSettings, GeniusClient, LyricsOvhClient, clear_lyrics, enrich_library, lyrics_for,
};
use cadenza::library::{Track, display_from_fields, scan};
use cadenza::store::{JsonFileStore, KvStore};

use super::cli::{
    AlbumCommand, ApiCommand, Args, Command, FavoriteCommand, PlaylistCommand, SearchCommand,
};
use super::player;

/// The edit operations playlists and albums share.
enum CollectionOp {
    List,
    Show(String),
    Add(String, Vec<String>),
    Remove(String, Vec<String>),
    Delete(String),
    Rename(String, String),
}

pub async fn run(args: Args, settings: Settings) -> anyhow::Result<()> {
    if matches!(args.command, Command::Config) {
        return print_config(&settings);
    }

    let store_path = settings.store_path();
    let store = JsonFileStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store {}", store_path.display()))?;
    let library = Library::new(Arc::new(store));
    library.initialize().await?;

    match args.command {
        Command::Scan => {
            let dir = music_dir(args.music_dir, &settings)?;
            scan_into(&library, dir, &settings).await
        }
        Command::Tracks => list_tracks(&library, &settings).await,
        Command::Playlist(cmd) => playlist(&library, cmd).await,
        Command::Album(cmd) => album(&library, cmd).await,
        Command::Favorite(cmd) => favorite(&library, &settings, cmd).await,
        Command::Api(cmd) => api(library.store(), cmd).await,
        Command::Search(cmd) => search(&library, &settings, cmd).await,
        Command::Artists { name } => artists(&library, &settings, name).await,
        Command::Enrich => {
            let client = GeniusClient::new(&settings.enrichment)?;
            let report = enrich_library(&library, &client, &settings.enrichment).await?;
            if report.api_disabled {
                println!("metadata API is disabled or has no token; see `cadenza api`");
            } else {
                println!(
                    "enriched {}, already cached {}, failed {}",
                    report.enriched, report.cached, report.failed
                );
            }
            Ok(())
        }
        Command::Lyrics { track_id } => {
            let track = library.tracks.require(&track_id).await?;
            let client = LyricsOvhClient::new(&settings.enrichment)?;
            match lyrics_for(library.store(), &client, &track.filename).await? {
                Some(text) => println!("{text}"),
                None => println!("no lyrics found for {}", track.filename),
            }
            Ok(())
        }
        Command::ClearLyrics => {
            let removed = clear_lyrics(library.store()).await?;
            println!("removed {removed} cached lyrics");
            Ok(())
        }
        Command::Play {
            playlist,
            album,
            shuffle,
        } => {
            let source = match (playlist, album) {
                (Some(id), _) => QueueSource::Playlist(id),
                (None, Some(id)) => QueueSource::Album(id),
                (None, None) => QueueSource::All,
            };
            player::run(&library, &settings, source, shuffle).await
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("reset deletes every track, playlist and album; pass --yes to confirm");
            }
            let removed = library.reset().await?;
            println!("removed {removed} records");
            Ok(())
        }
        Command::Config => print_config(&settings),
    }
}

fn print_config(settings: &Settings) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(settings)?);
    Ok(())
}

fn music_dir(flag: Option<PathBuf>, settings: &Settings) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag.or_else(|| settings.library.music_dir.clone()) {
        return Ok(dir);
    }
    std::env::current_dir().context("no music directory configured and no current directory")
}

async fn scan_into<S: KvStore>(
    library: &Library<S>,
    dir: PathBuf,
    settings: &Settings,
) -> anyhow::Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let library_settings = settings.library.clone();
    let scan_dir = dir.clone();
    let tracks = tokio::task::spawn_blocking(move || scan(&scan_dir, &library_settings)).await?;

    let added = library.tracks.sync(&tracks).await?;
    let dropped = library.reconcile().await?;
    info!(dir = %dir.display(), found = tracks.len(), added, dropped, "scan finished");
    println!("found {} tracks, {added} new", tracks.len());
    if dropped > 0 {
        println!("dropped {dropped} dangling index entries");
    }
    Ok(())
}

fn track_line(track: &Track, settings: &Settings) -> String {
    display_from_fields(
        track,
        &settings.library.display_fields,
        &settings.library.display_separator,
    )
}

async fn list_tracks<S: KvStore>(library: &Library<S>, settings: &Settings) -> anyhow::Result<()> {
    let favorites = library.playlists.favorites().await?;
    for track in library.tracks.all().await? {
        let star = if favorites.contains(&track.id) { "*" } else { " " };
        println!("{star} {}  [{}]", track_line(&track, settings), track.id);
    }
    Ok(())
}

async fn playlist<S: KvStore>(library: &Library<S>, cmd: PlaylistCommand) -> anyhow::Result<()> {
    let op = match cmd {
        PlaylistCommand::Create { name, tracks } => {
            let created = library.playlists.create(&name, tracks, ()).await?;
            println!("created playlist {} ({})", created.name, created.id);
            return Ok(());
        }
        PlaylistCommand::List => CollectionOp::List,
        PlaylistCommand::Show { id } => CollectionOp::Show(id),
        PlaylistCommand::Add { id, tracks } => CollectionOp::Add(id, tracks),
        PlaylistCommand::Remove { id, tracks } => CollectionOp::Remove(id, tracks),
        PlaylistCommand::Delete { id } => CollectionOp::Delete(id),
        PlaylistCommand::Rename { id, name } => CollectionOp::Rename(id, name),
    };
    collection(&library.playlists, op).await
}

async fn album<S: KvStore>(library: &Library<S>, cmd: AlbumCommand) -> anyhow::Result<()> {
    let op = match cmd {
        AlbumCommand::Create {
            name,
            artist,
            cover_art,
            tracks,
        } => {
            let info = AlbumInfo { artist, cover_art };
            let created = library.albums.create(&name, tracks, info).await?;
            println!("created album {} ({})", created.name, created.id);
            return Ok(());
        }
        AlbumCommand::List => CollectionOp::List,
        AlbumCommand::Show { id } => CollectionOp::Show(id),
        AlbumCommand::Add { id, tracks } => CollectionOp::Add(id, tracks),
        AlbumCommand::Remove { id, tracks } => CollectionOp::Remove(id, tracks),
        AlbumCommand::Delete { id } => CollectionOp::Delete(id),
        AlbumCommand::Rename { id, name } => CollectionOp::Rename(id, name),
    };
    collection(&library.albums, op).await
}

async fn collection<S, E>(manager: &Manager<S, E>, op: CollectionOp) -> anyhow::Result<()>
where
    S: KvStore,
    E: ItemCollection,
{
    match op {
        CollectionOp::List => {
            for summary in manager.list().await? {
                println!("{}  [{}]", summary.name, summary.id);
            }
        }
        CollectionOp::Show(id) => {
            let entity = manager.require(&id).await?;
            println!("{} ({})", entity.name(), entity.id());
            for item in entity.items() {
                println!("  {item}");
            }
        }
        CollectionOp::Add(id, tracks) => {
            let entity = manager.add_items(&id, &tracks).await?;
            println!("{} now has {} tracks", entity.name(), entity.items().len());
        }
        CollectionOp::Remove(id, tracks) => {
            let entity = manager.remove_items(&id, &tracks).await?;
            println!("{} now has {} tracks", entity.name(), entity.items().len());
        }
        CollectionOp::Delete(id) => {
            if manager.remove(&id).await? {
                println!("deleted {} {id}", E::KIND);
            } else {
                println!("no {} {id}", E::KIND);
            }
        }
        CollectionOp::Rename(id, name) => {
            let entity = manager.rename(&id, &name).await?;
            println!("renamed {} to {}", entity.id(), entity.name());
        }
    }
    Ok(())
}

async fn favorite<S: KvStore>(
    library: &Library<S>,
    settings: &Settings,
    cmd: FavoriteCommand,
) -> anyhow::Result<()> {
    match cmd {
        FavoriteCommand::List => {
            let ids = library.playlists.favorites().await?;
            for track in library.tracks.hydrate(&ids).await? {
                println!("{}  [{}]", track_line(&track, settings), track.id);
            }
        }
        FavoriteCommand::Add { track_id } => {
            library.tracks.require(&track_id).await?;
            library.playlists.add_favorite(&track_id).await?;
            println!("added {track_id} to favorites");
        }
        FavoriteCommand::Remove { track_id } => {
            library.playlists.remove_favorite(&track_id).await?;
            println!("removed {track_id} from favorites");
        }
    }
    Ok(())
}

async fn api<S: KvStore>(store: &S, cmd: ApiCommand) -> anyhow::Result<()> {
    let mut api = ApiSettings::load(store).await?;
    match cmd {
        ApiCommand::Show => {
            let token = if api.token.trim().is_empty() { "unset" } else { "set" };
            println!("enabled: {}, token: {token}", api.enabled);
            return Ok(());
        }
        ApiCommand::Enable => api.enabled = true,
        ApiCommand::Disable => api.enabled = false,
        ApiCommand::Token { token } => api.token = token,
    }
    api.save(store).await?;
    println!("metadata API {}", if api.enabled { "enabled" } else { "disabled" });
    Ok(())
}

async fn search<S: KvStore>(
    library: &Library<S>,
    settings: &Settings,
    cmd: SearchCommand,
) -> anyhow::Result<()> {
    let recent = match cmd {
        SearchCommand::Find { query } => {
            let found = library.search(&query).await?;
            if found.is_empty() {
                println!("no tracks match {query:?}");
            }
            for track in &found {
                println!("{}  [{}]", track_line(track, settings), track.id);
            }
            return Ok(());
        }
        SearchCommand::Recent => library.searches.recent().await?,
        SearchCommand::Forget { query } => library.searches.forget(&query).await?,
    };
    for query in recent {
        println!("{query}");
    }
    Ok(())
}

async fn artists<S: KvStore>(
    library: &Library<S>,
    settings: &Settings,
    name: Option<String>,
) -> anyhow::Result<()> {
    let Some(name) = name else {
        for (artist, tracks) in library.tracks.group_by_artist().await? {
            let artist = if artist.is_empty() { "(unknown)" } else { artist.as_str() };
            println!("{artist}  ({} tracks)", tracks.len());
        }
        return Ok(());
    };

    for album in library.albums.by_artist(&name).await? {
        println!("album {}  [{}]", album.name, album.id);
    }
    for track in library.tracks.by_artist(&name).await? {
        println!("  {}  [{}]", track_line(&track, settings), track.id);
    }
    Ok(())
}
