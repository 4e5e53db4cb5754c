use super::display::display_from_fields;
use super::model::Track;
use crate::config::TrackDisplayField;

fn tagged(id: &str, title: Option<&str>, artist: &str) -> Track {
    let mut t = Track::new(id, format!("file:///music/{id}"));
    t.title = title.map(str::to_string);
    t.artist = artist.to_string();
    t
}

#[test]
fn display_from_fields_can_format_artist_title() {
    let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(
        display_from_fields(&tagged("x/Song.mp3", Some("Song"), "Artist"), &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(&tagged("Song.mp3", Some("Song"), "  Artist  "), &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(&tagged("Song.mp3", None, ""), &fields, " - "),
        "Song"
    );
}

#[test]
fn display_falls_back_to_stem() {
    let t = tagged("dir/Untitled.flac", None, "");
    assert_eq!(display_from_fields(&t, &[TrackDisplayField::Album], " - "), "Untitled");
    assert_eq!(display_from_fields(&t, &[TrackDisplayField::Id], " - "), "dir/Untitled.flac");
}

#[test]
fn track_new_derives_filename_from_id() {
    let t = Track::new("Queen/A Night at the Opera/Bohemian Rhapsody.mp3", "file:///x");
    assert_eq!(t.filename, "Bohemian Rhapsody.mp3");
    assert_eq!(t.stem(), "Bohemian Rhapsody");
    assert_eq!(Track::new("noext", "u").stem(), "noext");
    assert_eq!(Track::new(".hidden", "u").stem(), ".hidden");
}

#[test]
fn cached_metadata_requires_non_empty_image_url() {
    let mut t = Track::new("a.mp3", "file:///a.mp3");
    assert!(!t.has_cached_metadata());
    t.image_url = Some("   ".into());
    assert!(!t.has_cached_metadata());
    t.image_url = Some("https://img/queen.jpg".into());
    assert!(t.has_cached_metadata());
}

#[test]
fn track_record_uses_camel_case_and_tolerates_missing_fields() {
    let mut t = Track::new("a.mp3", "file:///a.mp3");
    t.creation_time = 5;
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["mediaType"], "audio");
    assert_eq!(json["creationTime"], 5);
    assert!(json.get("imageUrl").is_none());

    let sparse: Track =
        serde_json::from_str(r#"{"id":"b.mp3","filename":"b.mp3","uri":"file:///b.mp3"}"#)
            .unwrap();
    assert_eq!(sparse.media_type, "audio");
    assert_eq!(sparse.artist, "");
    assert_eq!(sparse.duration, 0.0);
}
