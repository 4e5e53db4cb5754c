use std::sync::Arc;

use super::*;
use crate::collections::{AlbumInfo, Library};
use crate::library::Track;
use crate::store::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Load(String),
    Play,
    Pause,
    Unload,
}

/// Records every call; can be told to fail loads or report the track finished.
#[derive(Default)]
struct FakeBackend {
    calls: Vec<Call>,
    fail_load: Option<String>,
    fail_unload: bool,
    finished: bool,
}

impl FakeBackend {
    fn loads(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PlaybackBackend for FakeBackend {
    fn load(&mut self, track: &Track) -> Result<(), AudioError> {
        if self.fail_load.as_deref() == Some(track.id.as_str()) {
            return Err(AudioError::Decode {
                path: track.id.clone().into(),
                reason: "bad frame".into(),
            });
        }
        self.calls.push(Call::Load(track.id.clone()));
        self.finished = false;
        Ok(())
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn unload(&mut self) -> Result<(), AudioError> {
        self.calls.push(Call::Unload);
        if self.fail_unload {
            return Err(AudioError::Device("gone".into()));
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

fn track(id: &str) -> Track {
    Track::new(id, format!("file:///music/{id}"))
}

fn controller(ids: &[&str]) -> QueueController<FakeBackend> {
    let mut c = QueueController::new(FakeBackend::default());
    c.set_queue(ids.iter().map(|id| track(id)).collect());
    c
}

fn queue_ids(c: &QueueController<FakeBackend>) -> Vec<&str> {
    c.queue().iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn new_controller_is_idle_and_empty() {
    let c = QueueController::new(FakeBackend::default());
    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(c.queue().is_empty());
    assert!(c.current_track().is_none());
}

#[test]
fn play_loads_and_starts() {
    let mut c = controller(&["a", "b", "c"]);
    c.play(1).unwrap();

    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.current_index(), 1);
    assert_eq!(c.current_track().unwrap().id, "b");
    assert_eq!(c.backend().loads(), vec!["b"]);
}

#[test]
fn play_out_of_range_leaves_state_alone() {
    let mut c = controller(&["a", "b"]);
    c.play(0).unwrap();

    let err = c.play(2).unwrap_err();
    assert!(matches!(err, AudioError::IndexOutOfRange { index: 2, len: 2 }));
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.current_index(), 0);
}

#[test]
fn play_releases_previous_track_first() {
    let mut c = controller(&["a", "b"]);
    c.play(0).unwrap();
    c.play(1).unwrap();

    let calls = &c.backend().calls;
    let second_load = calls
        .iter()
        .position(|x| *x == Call::Load("b".into()))
        .unwrap();
    assert_eq!(calls[second_load - 1], Call::Unload);
}

#[test]
fn failed_release_still_loads_next() {
    let mut c = controller(&["a", "b"]);
    c.play(0).unwrap();
    c.backend_mut().fail_unload = true;

    c.play(1).unwrap();
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.backend().loads(), vec!["a", "b"]);
}

#[test]
fn failed_load_goes_idle() {
    let mut c = controller(&["a", "broken"]);
    c.backend_mut().fail_load = Some("broken".into());
    c.play(0).unwrap();

    assert!(matches!(c.play(1), Err(AudioError::Decode { .. })));
    assert_eq!(c.state(), PlaybackState::Idle);
}

#[test]
fn toggle_cycles_between_playing_and_paused() {
    let mut c = controller(&["a"]);
    assert_eq!(c.toggle_playback(), PlaybackState::Idle);

    c.play(0).unwrap();
    assert_eq!(c.toggle_playback(), PlaybackState::Paused);
    assert_eq!(c.toggle_playback(), PlaybackState::Playing);
    assert_eq!(c.backend().calls.last(), Some(&Call::Play));
}

#[test]
fn skip_and_previous_wrap_both_ends() {
    let mut c = controller(&["a", "b", "c"]);
    c.play(2).unwrap();
    c.skip().unwrap();
    assert_eq!(c.current_index(), 0);

    c.previous().unwrap();
    assert_eq!(c.current_index(), 2);
    assert_eq!(c.current_track().unwrap().id, "c");
}

#[test]
fn skip_and_previous_on_empty_queue_do_nothing() {
    let mut c = QueueController::new(FakeBackend::default());
    c.skip().unwrap();
    c.previous().unwrap();
    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(c.backend().calls.is_empty());
}

#[test]
fn shuffle_is_a_permutation() {
    let ids: Vec<String> = (0..50).map(|i| format!("t{i}.mp3")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let mut c = controller(&refs);
    c.play(7).unwrap();

    c.shuffle();
    assert_eq!(c.current_index(), 7);
    let mut after: Vec<&str> = queue_ids(&c);
    after.sort_unstable();
    let mut before = refs.clone();
    before.sort_unstable();
    assert_eq!(after, before);
}

#[test]
fn set_queue_stops_playback() {
    let mut c = controller(&["a", "b"]);
    c.play(1).unwrap();
    c.set_queue(vec![track("x")]);

    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.current_index(), 0);
    assert_eq!(queue_ids(&c), vec!["x"]);
    assert_eq!(c.backend().calls.last(), Some(&Call::Unload));
}

#[test]
fn add_to_queue_appends() {
    let mut c = controller(&["a"]);
    c.add_to_queue(track("b"));
    assert_eq!(queue_ids(&c), vec!["a", "b"]);
}

#[test]
fn reorder_keeps_index_on_current_track() {
    let mut c = controller(&["a", "b", "c", "d"]);
    c.play(1).unwrap();

    c.reorder(0, 3).unwrap();
    assert_eq!(queue_ids(&c), vec!["b", "c", "d", "a"]);
    assert_eq!(c.current_track().unwrap().id, "b");

    c.reorder(3, 0).unwrap();
    assert_eq!(c.current_track().unwrap().id, "b");

    c.reorder(1, 2).unwrap();
    assert_eq!(queue_ids(&c), vec!["a", "c", "b", "d"]);
    assert_eq!(c.current_index(), 2);

    assert!(matches!(
        c.reorder(0, 4),
        Err(AudioError::IndexOutOfRange { index: 4, .. })
    ));
}

#[test]
fn removing_earlier_entry_shifts_index() {
    let mut c = controller(&["a", "b", "c"]);
    c.play(2).unwrap();

    assert_eq!(c.remove_from_queue("a").unwrap(), 1);
    assert_eq!(c.current_index(), 1);
    assert_eq!(c.current_track().unwrap().id, "c");
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn removing_playing_entry_advances() {
    let mut c = controller(&["a", "b", "c"]);
    c.play(1).unwrap();

    c.remove_from_queue("b").unwrap();
    assert_eq!(c.current_track().unwrap().id, "c");
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.backend().loads(), vec!["b", "c"]);
}

#[test]
fn removing_last_playing_entry_wraps() {
    let mut c = controller(&["a", "b", "c"]);
    c.play(2).unwrap();

    c.remove_from_queue("c").unwrap();
    assert_eq!(c.current_index(), 0);
    assert_eq!(c.current_track().unwrap().id, "a");
}

#[test]
fn removing_paused_entry_leaves_next_loaded() {
    let mut c = controller(&["a", "b"]);
    c.play(0).unwrap();
    c.toggle_playback();

    c.remove_from_queue("a").unwrap();
    assert_eq!(c.state(), PlaybackState::Loaded);
    assert_eq!(c.current_track().unwrap().id, "b");
}

#[test]
fn removing_only_entry_goes_idle() {
    let mut c = controller(&["a"]);
    c.play(0).unwrap();

    c.remove_from_queue("a").unwrap();
    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(c.queue().is_empty());
    assert_eq!(c.backend().calls.last(), Some(&Call::Unload));
}

#[test]
fn removing_drops_duplicates_and_ignores_unknown_ids() {
    let mut c = controller(&["a", "b", "a", "c"]);
    c.play(3).unwrap();

    assert_eq!(c.remove_from_queue("zzz").unwrap(), 0);
    assert_eq!(c.remove_from_queue("a").unwrap(), 2);
    assert_eq!(queue_ids(&c), vec!["b", "c"]);
    assert_eq!(c.current_track().unwrap().id, "c");
}

#[test]
fn stop_releases_and_keeps_index() {
    let mut c = controller(&["a", "b"]);
    c.play(1).unwrap();
    c.stop();

    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.current_index(), 1);
}

#[test]
fn tick_advances_only_when_playing_and_drained() {
    let mut c = controller(&["a", "b"]);
    c.play(0).unwrap();
    assert!(!c.tick().unwrap());

    c.backend_mut().finished = true;
    assert!(c.tick().unwrap());
    assert_eq!(c.current_track().unwrap().id, "b");

    c.toggle_playback();
    c.backend_mut().finished = true;
    assert!(!c.tick().unwrap());
    assert_eq!(c.current_index(), 1);
}

#[test]
fn on_track_finished_wraps_around() {
    let mut c = controller(&["a", "b"]);
    c.play(1).unwrap();
    c.on_track_finished().unwrap();
    assert_eq!(c.current_index(), 0);
    assert_eq!(c.state(), PlaybackState::Playing);
}

async fn library() -> Library<MemoryStore> {
    let lib = Library::new(Arc::new(MemoryStore::new()));
    lib.initialize().await.unwrap();
    lib.tracks
        .sync(&[track("a.mp3"), track("b.mp3"), track("c.mp3")])
        .await
        .unwrap();
    lib
}

#[tokio::test]
async fn set_queue_from_playlist_hydrates_in_order() {
    let lib = library().await;
    let playlist = lib
        .playlists
        .create(
            "Road Trip",
            vec!["c.mp3".into(), "missing.mp3".into(), "a.mp3".into()],
            (),
        )
        .await
        .unwrap();

    let mut c = controller(&["x"]);
    c.play(0).unwrap();
    let len = c
        .set_queue_from(&lib, &QueueSource::Playlist(playlist.id.clone()))
        .await
        .unwrap();

    assert_eq!(len, 2);
    assert_eq!(queue_ids(&c), vec!["c.mp3", "a.mp3"]);
    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.current_index(), 0);
}

#[tokio::test]
async fn set_queue_from_album_and_all() {
    let lib = library().await;
    let album = lib
        .albums
        .create(
            "Greatest Hits",
            vec!["b.mp3".into()],
            AlbumInfo {
                artist: "Queen".into(),
                cover_art: String::new(),
            },
        )
        .await
        .unwrap();

    let mut c = QueueController::new(FakeBackend::default());
    c.set_queue_from(&lib, &QueueSource::Album(album.id.clone()))
        .await
        .unwrap();
    assert_eq!(queue_ids(&c), vec!["b.mp3"]);

    c.set_queue_from(&lib, &QueueSource::All).await.unwrap();
    assert_eq!(queue_ids(&c), vec!["a.mp3", "b.mp3", "c.mp3"]);
}

#[tokio::test]
async fn set_queue_from_unknown_playlist_is_empty() {
    let lib = library().await;
    let mut c = controller(&["x"]);
    let len = c
        .set_queue_from(&lib, &QueueSource::Playlist("nope".into()))
        .await
        .unwrap();
    assert_eq!(len, 0);
    assert!(c.current_track().is_none());
}
