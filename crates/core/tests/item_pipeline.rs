//! Item pipeline integration tests.
//!
//! Each test drives one item through the real pipeline with mock
//! collaborators and a real temp filesystem:
//! - stage ordering and the terminal state reached
//! - DRM bypass for free streams and the disabled-DRM failure
//! - skip-on-exists before any side effect
//! - sibling files (cover, synced lyrics, playlist), also for skipped items
//! - license and remux-mode failures before any download
//! - lyrics-only runs and music-video substitution
//! - scratch cleanup on failure and interruption

mod common;

use common::{Harness, Options};

use spindle_core::download::DownloadError;
use spindle_core::license::LicenseError;
use spindle_core::media::{
    AudioQuality, Container, Lyrics, LyricsLine, MediaItem, MediaKind, Metadata, PlaylistContext,
    VideoResolution,
};
use spindle_core::metadata::TagError;
use spindle_core::pipeline::SkipReason;
use spindle_core::quality::{QualityConfig, SelectionMode};
use spindle_core::remux::RemuxError;
use spindle_core::testing::fixtures::{
    audio_stream, drm_protected, song_metadata, video_stream,
};
use spindle_core::{ErrorKind, ItemState, PipelineResult, Stage};

fn synced_lyrics(text: &str) -> Lyrics {
    Lyrics {
        plain: None,
        synced: vec![LyricsLine {
            start_ms: 1500,
            text: text.to_string(),
        }],
    }
}

/// Registers music video `id` with one mp4 stream and returns its item.
async fn add_video(harness: &Harness, id: &str, title: &str) -> MediaItem {
    harness
        .catalog
        .set_streams(
            id,
            vec![video_stream("vs1", Container::Mp4, VideoResolution::P720, 2000)],
        )
        .await;
    harness
        .catalog
        .set_metadata(
            id,
            Metadata {
                kind: Some(MediaKind::MusicVideo),
                ..song_metadata(id, title, 1)
            },
        )
        .await;
    MediaItem::new(id, MediaKind::MusicVideo).with_label(title)
}

#[tokio::test]
async fn test_song_placed_at_default_template_path() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            3,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    let expected = harness.song_path(3, "Song", "m4a");
    assert_eq!(report.result.written_path(), Some(&expected));
    assert_eq!(report.state(), ItemState::Active { stage: Stage::Placed });
    assert_eq!(
        report.trace,
        vec![
            Stage::Resolved,
            Stage::QualitySelected,
            Stage::Planned,
            Stage::Licensed,
            Stage::Downloaded,
            Stage::Remuxed,
            Stage::Tagged,
            Stage::Placed,
        ]
    );

    let contents = tokio::fs::read_to_string(&expected).await.unwrap();
    assert_eq!(contents, "mock-bytes:t1");

    let tag_jobs = harness.tagger.recorded_jobs().await;
    assert_eq!(tag_jobs.len(), 1);
    assert_eq!(tag_jobs[0].tags.get("title"), Some("Song"));
    assert_eq!(tag_jobs[0].tags.get("track"), Some("3/10"));

    assert_eq!(harness.scratch_entries(), 0);
}

#[tokio::test]
async fn test_drm_free_stream_never_calls_license_service() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    assert!(!report.result.is_failed());
    assert_eq!(harness.license.call_count().await, 0);
    let remuxes = harness.remuxer.recorded_jobs().await;
    assert_eq!(remuxes.len(), 1);
    assert!(!remuxes[0].decrypted);
}

#[tokio::test]
async fn test_drm_stream_is_licensed_and_decrypted() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![drm_protected(audio_stream("s1", AudioQuality::AacMedium, 128))],
        )
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    assert!(report.result.written_path().is_some());
    assert_eq!(harness.license.call_count().await, 1);
    let requests = harness.license.recorded_requests().await;
    assert_eq!(requests[0].stream_id, "s1");

    let remuxes = harness.remuxer.recorded_jobs().await;
    assert!(remuxes[0].decrypted);
    assert_eq!(remuxes[0].stream_id, "s1");
}

#[tokio::test]
async fn test_drm_only_item_fails_when_drm_disabled() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![drm_protected(audio_stream("s1", AudioQuality::AacMedium, 128))],
        )
        .await;

    let options = Options {
        no_drm: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert_eq!(
        report.state(),
        ItemState::Failed {
            stage: Stage::Licensed,
            kind: ErrorKind::DrmRequiredButDisabled,
        }
    );
    assert_eq!(
        report.state().to_string(),
        "Failed(Licensed, DrmRequiredButDisabled)"
    );
    assert!(harness.downloader.recorded_jobs().await.is_empty());
    assert_eq!(harness.license.call_count().await, 0);
    assert!(!harness.song_path(1, "Song", "m4a").exists());
}

#[tokio::test]
async fn test_drm_disabled_prefers_free_candidate() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![
                drm_protected(audio_stream("locked", AudioQuality::AacMedium, 256)),
                audio_stream("free", AudioQuality::AacMedium, 128),
            ],
        )
        .await;

    let options = Options {
        no_drm: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert!(report.result.written_path().is_some());
    assert_eq!(harness.remuxer.recorded_jobs().await[0].stream_id, "free");
}

#[tokio::test]
async fn test_existing_output_skips_before_side_effects() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            3,
            vec![drm_protected(audio_stream("s1", AudioQuality::AacMedium, 128))],
        )
        .await;

    let existing = harness.song_path(3, "Song", "m4a");
    tokio::fs::create_dir_all(existing.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&existing, b"already here").await.unwrap();

    let report = harness.pipeline(Options::default()).run(item).await;

    assert_eq!(report.state(), ItemState::Skipped);
    assert!(matches!(report.result, PipelineResult::Skipped { .. }));
    assert_eq!(harness.license.call_count().await, 0);
    assert!(harness.downloader.recorded_jobs().await.is_empty());
    assert!(harness.remuxer.recorded_jobs().await.is_empty());
    assert!(harness.tagger.recorded_jobs().await.is_empty());
    assert_eq!(
        tokio::fs::read(&existing).await.unwrap(),
        b"already here".to_vec()
    );
}

#[tokio::test]
async fn test_overwrite_replaces_existing_output() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            3,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;

    let existing = harness.song_path(3, "Song", "m4a");
    tokio::fs::create_dir_all(existing.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&existing, b"stale").await.unwrap();

    let options = Options {
        overwrite: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert_eq!(report.result.written_path(), Some(&existing));
    assert_eq!(
        tokio::fs::read_to_string(&existing).await.unwrap(),
        "mock-bytes:t1"
    );
}

#[tokio::test]
async fn test_ask_mode_prompts_once_and_uses_choice() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![
                audio_stream("aac", AudioQuality::AacMedium, 128),
                audio_stream("vorbis", AudioQuality::VorbisMedium, 160),
            ],
        )
        .await;
    harness.chooser.set_choice(1).await;

    let options = Options {
        quality: QualityConfig::default().with_selection(SelectionMode::Ask),
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert_eq!(harness.chooser.call_count().await, 1);
    assert_eq!(harness.remuxer.recorded_jobs().await[0].stream_id, "vorbis");
    assert_eq!(
        report.result.written_path(),
        Some(&harness.song_path(1, "Song", "ogg"))
    );
}

#[tokio::test]
async fn test_cancelled_selection_reports_interrupted() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![
                audio_stream("aac", AudioQuality::AacMedium, 128),
                audio_stream("vorbis", AudioQuality::VorbisMedium, 160),
            ],
        )
        .await;
    harness.chooser.set_cancel(true).await;

    let options = Options {
        quality: QualityConfig::default().with_selection(SelectionMode::Ask),
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert_eq!(
        report.state(),
        ItemState::Failed {
            stage: Stage::QualitySelected,
            kind: ErrorKind::Interrupted,
        }
    );
    assert!(harness.downloader.recorded_jobs().await.is_empty());
}

#[tokio::test]
async fn test_no_eligible_stream() {
    let harness = Harness::new();
    let item = harness.add_song("t1", "Song", 1, Vec::new()).await;

    let report = harness.pipeline(Options::default()).run(item).await;

    assert_eq!(
        report.result.failure(),
        Some((Stage::QualitySelected, ErrorKind::NoEligibleStream))
    );
}

#[tokio::test]
async fn test_transient_download_failure_is_retried() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;
    harness
        .downloader
        .push_error(DownloadError::Http {
            url: "https://cdn.test/audio/s1".to_string(),
            status: 503,
        })
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    assert!(report.result.written_path().is_some());
    assert_eq!(harness.downloader.recorded_jobs().await.len(), 2);
}

#[tokio::test]
async fn test_permanent_download_failure_fails_item() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;
    harness
        .downloader
        .push_error(DownloadError::Http {
            url: "https://cdn.test/audio/s1".to_string(),
            status: 404,
        })
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    assert_eq!(
        report.result.failure(),
        Some((Stage::Downloaded, ErrorKind::DownloadFailed))
    );
    assert_eq!(harness.downloader.recorded_jobs().await.len(), 1);
    assert_eq!(harness.scratch_entries(), 0);
}

#[tokio::test]
async fn test_remux_failure_purges_scratch() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;
    harness
        .remuxer
        .fail_item(
            "t1",
            RemuxError::remux_failed("exit status 1", Some("moov atom not found".to_string())),
        )
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    match &report.result {
        PipelineResult::Failed {
            stage,
            kind,
            diagnostics,
            ..
        } => {
            assert_eq!(*stage, Stage::Remuxed);
            assert_eq!(*kind, ErrorKind::RemuxFailed);
            assert_eq!(diagnostics.as_deref(), Some("moov atom not found"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(harness.scratch_entries(), 0);
    assert!(!harness.song_path(1, "Song", "m4a").exists());
}

#[tokio::test]
async fn test_tagging_failure_is_reported_at_tag_stage() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;
    harness
        .tagger
        .set_next_error(TagError::tagging_failed("bad atom", None))
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    assert_eq!(
        report.result.failure(),
        Some((Stage::Tagged, ErrorKind::TaggingFailed))
    );
    assert!(!harness.song_path(1, "Song", "m4a").exists());
}

#[tokio::test]
async fn test_cover_and_synced_lyrics_siblings() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            2,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;
    harness
        .catalog
        .set_cover("https://img.test/t1.jpg", b"jpeg-bytes".to_vec())
        .await;
    harness
        .catalog
        .set_lyrics(
            "t1",
            Lyrics {
                plain: None,
                synced: vec![LyricsLine {
                    start_ms: 1500,
                    text: "first line".to_string(),
                }],
            },
        )
        .await;

    let options = Options {
        save_cover: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;
    assert!(report.result.written_path().is_some());

    let album = harness.output_dir().join("Artist").join("Album");
    assert_eq!(
        tokio::fs::read(album.join("Cover.jpg")).await.unwrap(),
        b"jpeg-bytes".to_vec()
    );

    let lrc = tokio::fs::read_to_string(album.join("02 Song.lrc"))
        .await
        .unwrap();
    assert!(lrc.contains("first line"));

    let tag_jobs = harness.tagger.recorded_jobs().await;
    assert!(tag_jobs[0].cover.is_some());
    assert!(tag_jobs[0].tags.get("lyrics").is_some());
}

#[tokio::test]
async fn test_playlist_file_updated_at_item_position() {
    let harness = Harness::new();
    harness
        .catalog
        .set_streams("t1", vec![audio_stream("s1", AudioQuality::AacMedium, 128)])
        .await;
    harness
        .catalog
        .set_metadata("t1", song_metadata("t1", "Song", 7))
        .await;
    let item = spindle_core::testing::fixtures::song("t1", "Song").with_playlist(PlaylistContext {
        id: "p1".to_string(),
        title: "Mix".to_string(),
        artist: "Me".to_string(),
        track: 3,
        track_total: 12,
    });

    let options = Options {
        save_playlist: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;
    assert!(report.result.written_path().is_some());

    let playlist = harness
        .output_dir()
        .join("Playlists")
        .join("Me")
        .join("Mix.m3u8");
    let contents = tokio::fs::read_to_string(&playlist).await.unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "../../Artist/Album/07 Song.m4a");
}

#[tokio::test]
async fn test_interrupt_aborts_item_and_purges_scratch() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;

    let report = harness
        .pipeline(Options::default())
        .run_until(item, async {})
        .await;

    assert_eq!(
        report.result.failure().map(|(_, kind)| kind),
        Some(ErrorKind::Interrupted)
    );
    assert_eq!(harness.scratch_entries(), 0);
    assert!(!harness.song_path(1, "Song", "m4a").exists());
}

#[tokio::test]
async fn test_license_denied_fails_at_license_stage() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![drm_protected(audio_stream("s1", AudioQuality::AacMedium, 128))],
        )
        .await;
    harness
        .license
        .push_error(LicenseError::denied("subscription expired"))
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    assert_eq!(
        report.state(),
        ItemState::Failed {
            stage: Stage::Licensed,
            kind: ErrorKind::LicenseDenied,
        }
    );
    assert_eq!(harness.license.call_count().await, 1);
    assert!(harness.downloader.recorded_jobs().await.is_empty());
    assert!(!harness.song_path(1, "Song", "m4a").exists());
    assert_eq!(harness.scratch_entries(), 0);
}

#[tokio::test]
async fn test_license_unavailable_after_retries() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![drm_protected(audio_stream("s1", AudioQuality::AacMedium, 128))],
        )
        .await;
    for _ in 0..3 {
        harness
            .license
            .push_error(LicenseError::unavailable("503 Service Unavailable"))
            .await;
    }

    let report = harness.pipeline(Options::default()).run(item).await;

    assert_eq!(
        report.result.failure(),
        Some((Stage::Licensed, ErrorKind::LicenseServiceUnavailable))
    );
    assert_eq!(harness.license.call_count().await, 3);
    assert!(harness.downloader.recorded_jobs().await.is_empty());
    assert!(!harness.song_path(1, "Song", "m4a").exists());
}

#[tokio::test]
async fn test_keyed_stream_rejected_by_copy_mode_before_license() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![drm_protected(audio_stream("s1", AudioQuality::AacMedium, 128))],
        )
        .await;

    let options = Options {
        copy_remuxer: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert_eq!(
        report.state(),
        ItemState::Failed {
            stage: Stage::QualitySelected,
            kind: ErrorKind::IncompatibleRemuxMode,
        }
    );
    assert_eq!(report.trace, vec![Stage::Resolved]);
    assert_eq!(harness.license.call_count().await, 0);
    assert!(harness.downloader.recorded_jobs().await.is_empty());
    assert!(!harness.song_path(1, "Song", "m4a").exists());
    assert_eq!(harness.scratch_entries(), 0);
}

#[tokio::test]
async fn test_skipped_item_still_writes_siblings() {
    let harness = Harness::new();
    harness
        .catalog
        .set_streams("t1", vec![audio_stream("s1", AudioQuality::AacMedium, 128)])
        .await;
    harness
        .catalog
        .set_metadata("t1", song_metadata("t1", "Song", 4))
        .await;
    harness
        .catalog
        .set_cover("https://img.test/t1.jpg", b"jpeg-bytes".to_vec())
        .await;
    harness
        .catalog
        .set_lyrics("t1", synced_lyrics("first line"))
        .await;
    let item = spindle_core::testing::fixtures::song("t1", "Song").with_playlist(PlaylistContext {
        id: "p1".to_string(),
        title: "Mix".to_string(),
        artist: "Me".to_string(),
        track: 2,
        track_total: 5,
    });

    let existing = harness.song_path(4, "Song", "m4a");
    tokio::fs::create_dir_all(existing.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&existing, b"already here").await.unwrap();

    let options = Options {
        save_cover: true,
        save_playlist: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert_eq!(report.state(), ItemState::Skipped);
    assert!(harness.downloader.recorded_jobs().await.is_empty());

    let album = harness.output_dir().join("Artist").join("Album");
    assert_eq!(
        tokio::fs::read(album.join("Cover.jpg")).await.unwrap(),
        b"jpeg-bytes".to_vec()
    );
    let lrc = tokio::fs::read_to_string(album.join("04 Song.lrc"))
        .await
        .unwrap();
    assert!(lrc.contains("first line"));

    let playlist = harness
        .output_dir()
        .join("Playlists")
        .join("Me")
        .join("Mix.m3u8");
    let contents = tokio::fs::read_to_string(&playlist).await.unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["", "../../Artist/Album/04 Song.m4a"]);
    assert_eq!(
        tokio::fs::read(&existing).await.unwrap(),
        b"already here".to_vec()
    );
}

#[tokio::test]
async fn test_music_video_gets_embedded_cover() {
    let harness = Harness::new();
    let item = add_video(&harness, "v1", "Clip").await;
    harness
        .catalog
        .set_cover("https://img.test/v1.jpg", b"jpeg-bytes".to_vec())
        .await;

    let report = harness.pipeline(Options::default()).run(item).await;

    let path = report.result.written_path().expect("video placed");
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
    let tag_jobs = harness.tagger.recorded_jobs().await;
    assert_eq!(tag_jobs.len(), 1);
    assert!(tag_jobs[0].is_video);
    assert!(tag_jobs[0].cover.is_some());
}

#[tokio::test]
async fn test_synced_lyrics_only_writes_lrc_and_skips_media() {
    let harness = Harness::new();
    let item = harness
        .add_song(
            "t1",
            "Song",
            5,
            vec![drm_protected(audio_stream("s1", AudioQuality::AacMedium, 128))],
        )
        .await;
    harness
        .catalog
        .set_lyrics("t1", synced_lyrics("only the words"))
        .await;

    let options = Options {
        synced_lyrics_only: true,
        ..Default::default()
    };
    let report = harness.pipeline(options).run(item).await;

    assert!(matches!(
        report.result,
        PipelineResult::Skipped {
            reason: SkipReason::SyncedLyricsOnly
        }
    ));
    let lrc = tokio::fs::read_to_string(harness.song_path(5, "Song", "lrc"))
        .await
        .unwrap();
    assert!(lrc.contains("only the words"));
    assert!(!harness.song_path(5, "Song", "m4a").exists());
    assert_eq!(harness.catalog.stream_calls().await, 0);
    assert_eq!(harness.license.call_count().await, 0);
    assert!(harness.downloader.recorded_jobs().await.is_empty());
}

#[tokio::test]
async fn test_prefer_video_swaps_in_music_video() {
    let harness = Harness::new();
    let song = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;
    let video = add_video(&harness, "v1", "Song").await;
    harness.catalog.set_video_version("t1", video).await;

    let options = Options {
        quality: QualityConfig::default().with_prefer_video(true),
        ..Default::default()
    };
    let report = harness.pipeline(options).run(song).await;

    assert_eq!(report.item_id, "t1");
    let path = report.result.written_path().expect("video placed");
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
    assert_eq!(harness.remuxer.recorded_jobs().await[0].stream_id, "vs1");
}

#[tokio::test]
async fn test_song_kept_without_video_preference() {
    let harness = Harness::new();
    let song = harness
        .add_song(
            "t1",
            "Song",
            1,
            vec![audio_stream("s1", AudioQuality::AacMedium, 128)],
        )
        .await;
    let video = add_video(&harness, "v1", "Song").await;
    harness.catalog.set_video_version("t1", video).await;

    let report = harness.pipeline(Options::default()).run(song).await;

    assert_eq!(
        report.result.written_path(),
        Some(&harness.song_path(1, "Song", "m4a"))
    );
    assert_eq!(harness.remuxer.recorded_jobs().await[0].stream_id, "s1");
}
