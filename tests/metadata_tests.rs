use serde_json::json;

use metadata_customizer::config::{
    Config, ConfigUpdate, OPT_HIDE_EMPTY_LINES, OPT_REPLACE_DEFAULT_METADATA, OPT_SHOW_ICONS,
};
use metadata_customizer::header::{build_header, header_lines};
use metadata_customizer::metadata::{album_values, disc_counts, format_length};
use metadata_customizer::models::{AlbumDetails, HeaderLine};
use metadata_customizer::template::TemplateEngine;

fn album(release_date: &str, discs: &[u32]) -> AlbumDetails {
    let items: Vec<_> = discs
        .iter()
        .map(|d| json!({ "disc_number": d, "duration_ms": 240_000, "name": "ignored" }))
        .collect();
    let doc = json!({
        "id": "abc",
        "name": "Some Album",
        "release_date": release_date,
        "release_date_precision": "day",
        "tracks": { "total": discs.len(), "items": items, "next": null }
    });
    AlbumDetails::from_json(&doc.to_string()).unwrap()
}

#[test]
fn multi_disc_album_values() {
    let details = album("2000-08-14", &[1, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
    assert_eq!(disc_counts(&details), vec![5, 4, 4]);

    let values = album_values(&details);
    assert_eq!(values["release_date"], "Monday, August 14, 2000");
    assert_eq!(values["tracks"], "13 tracks");
    assert_eq!(values["discs"], "3 discs");
    assert_eq!(values["disc_ratio"], "5/4/4");
    assert_eq!(values["length"], "52 min 0 sec");

    let engine = TemplateEngine::default();
    assert_eq!(
        engine.render("$tracks$, $discs$ [$disc_ratio$]", &values),
        "13 tracks, 3 discs [5/4/4]"
    );
}

#[test]
fn single_disc_album_hides_disc_tokens() {
    let values = album_values(&album("2021-01-01", &[1]));
    assert_eq!(values["tracks"], "1 track");
    assert_eq!(values["discs"], "");
    assert_eq!(values["disc_ratio"], "");
    assert_eq!(
        TemplateEngine::default().render("$tracks$, $discs$ [$disc_ratio$]", &values),
        "1 track"
    );
}

#[test]
fn malformed_album_json_is_an_error() {
    assert!(AlbumDetails::from_json(r#"{"release_date": "2000"}"#).is_err());
}

#[test]
fn header_lines_apply_display_options() {
    let details = AlbumDetails::from_json(
        r#"{"release_date": "1999", "tracks": {"total": 0, "items": []}}"#,
    )
    .unwrap();
    let values = album_values(&details);
    let engine = TemplateEngine::default();

    let lines = header_lines(&Config::default(), &engine, &values);
    assert_eq!(lines, vec![HeaderLine { icon: Some("calendar".into()), text: "1999".into() }]);

    let cfg = Config::default()
        .apply(ConfigUpdate::SetOption { name: OPT_HIDE_EMPTY_LINES.into(), value: false })
        .and_then(|c| {
            c.apply(ConfigUpdate::SetOption { name: OPT_SHOW_ICONS.into(), value: false })
        })
        .unwrap();
    let lines = header_lines(&cfg, &engine, &values);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.icon.is_none()));
    assert_eq!(lines[1].text, "");
}

#[test]
fn huge_track_durations_saturate() {
    let doc = json!({
        "release_date": "2000-08-14",
        "tracks": { "total": 2, "items": [
            { "disc_number": 1, "duration_ms": u64::MAX },
            { "disc_number": 1, "duration_ms": 2 }
        ]}
    });
    let details = AlbumDetails::from_json(&doc.to_string()).unwrap();
    let values = album_values(&details);
    assert_eq!(values["length"], format_length(u64::MAX));
    assert!(values["length"].ends_with(" min"));
}

#[test]
fn header_carries_replace_default_metadata() {
    let details = AlbumDetails::from_json(
        r#"{"release_date": "1999", "tracks": {"total": 0, "items": []}}"#,
    )
    .unwrap();
    let values = album_values(&details);
    let engine = TemplateEngine::default();

    let header = build_header(&Config::default(), &engine, &values);
    assert!(header.replace_default_metadata);
    assert_eq!(header.lines, header_lines(&Config::default(), &engine, &values));

    let cfg = Config::default()
        .apply(ConfigUpdate::SetOption { name: OPT_REPLACE_DEFAULT_METADATA.into(), value: false })
        .unwrap();
    assert!(!build_header(&cfg, &engine, &values).replace_default_metadata);
}
