//! Line-driven playback session.
//!
//! Reads one command per line from stdin while a timer polls the backend so
//! the queue moves on when a track ends.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use cadenza::audio::{AudioError, PlaybackBackend, QueueController, QueueSource, RodioBackend};
use cadenza::collections::Library;
use cadenza::config::Settings;
use cadenza::store::KvStore;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const HELP: &str = "\
commands: <enter>/t toggle, n next, p previous, s shuffle, l list queue,
          r remove current from queue, f favorite current, q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Toggle,
    Next,
    Previous,
    Shuffle,
    List,
    Remove,
    Favorite,
    Quit,
    Help,
}

fn parse_key(line: &str) -> Option<Key> {
    match line.trim() {
        "" | "t" | "toggle" => Some(Key::Toggle),
        "n" | "next" => Some(Key::Next),
        "p" | "prev" | "previous" => Some(Key::Previous),
        "s" | "shuffle" => Some(Key::Shuffle),
        "l" | "list" => Some(Key::List),
        "r" | "remove" => Some(Key::Remove),
        "f" | "fav" | "favorite" => Some(Key::Favorite),
        "q" | "quit" | "exit" => Some(Key::Quit),
        "h" | "?" | "help" => Some(Key::Help),
        _ => None,
    }
}

fn now_playing<B: PlaybackBackend>(queue: &QueueController<B>) {
    match queue.current_track() {
        Some(track) if queue.state().is_loaded() => println!(
            "[{}/{}] {:?}: {}",
            queue.current_index() + 1,
            queue.queue().len(),
            queue.state(),
            track.filename
        ),
        _ => println!("{:?}", queue.state()),
    }
}

fn report(result: Result<(), AudioError>) {
    if let Err(e) = result {
        warn!(error = %e, "playback command failed");
        eprintln!("cadenza: {e}");
    }
}

pub async fn run<S: KvStore>(
    library: &Library<S>,
    settings: &Settings,
    source: QueueSource,
    shuffle: bool,
) -> anyhow::Result<()> {
    let backend = RodioBackend::open_default()?;
    let mut queue = QueueController::new(backend);

    if queue.set_queue_from(library, &source).await? == 0 {
        println!("nothing to play");
        return Ok(());
    }
    if shuffle || settings.playback.shuffle_on_load {
        queue.shuffle();
    }

    println!("{HELP}");
    report(queue.play(0));
    now_playing(&queue);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(key) = parse_key(&line) else {
                    println!("{HELP}");
                    continue;
                };
                match key {
                    Key::Toggle => {
                        queue.toggle_playback();
                    }
                    Key::Next => report(queue.skip()),
                    Key::Previous => report(queue.previous()),
                    Key::Shuffle => queue.shuffle(),
                    Key::List => {
                        for (i, track) in queue.queue().iter().enumerate() {
                            let marker = if i == queue.current_index() { ">" } else { " " };
                            println!("{marker} {:>3} {}", i + 1, track.filename);
                        }
                        continue;
                    }
                    Key::Remove => {
                        if let Some(id) = queue.current_track().map(|t| t.id.clone()) {
                            report(queue.remove_from_queue(&id).map(|_| ()));
                        }
                        if queue.queue().is_empty() {
                            println!("queue is empty");
                            break;
                        }
                    }
                    Key::Favorite => {
                        if let Some(id) = queue.current_track().map(|t| t.id.clone()) {
                            library.playlists.add_favorite(&id).await?;
                            println!("added {id} to favorites");
                        }
                        continue;
                    }
                    Key::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Key::Quit => break,
                }
                now_playing(&queue);
            }
            _ = ticker.tick() => {
                if !settings.playback.auto_advance {
                    continue;
                }
                match queue.tick() {
                    Ok(true) => now_playing(&queue),
                    Ok(false) => {}
                    Err(e) => report(Err(e)),
                }
            }
        }
    }

    queue.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_accepts_short_and_long_forms() {
        assert_eq!(parse_key(""), Some(Key::Toggle));
        assert_eq!(parse_key("  n "), Some(Key::Next));
        assert_eq!(parse_key("previous"), Some(Key::Previous));
        assert_eq!(parse_key("q"), Some(Key::Quit));
        assert_eq!(parse_key("?"), Some(Key::Help));
        assert_eq!(parse_key("dance"), None);
    }
}
