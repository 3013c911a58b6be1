// Tag-triggered jukebox demo over a scripted mock bus.
//
// Usage:
//   cargo run -p nfcjuke --example jukebox
//
// Swap the MockBus for `I2cBus::open(1, 0x24)` (built with `--features
// i2c`) to drive a real reader HAT instead.

use std::thread;
use std::time::Duration;

use nfcjuke::ndef;
use nfcjuke::prelude::*;
use nfcjuke::test_support::{no_tag_response, uid_response, version_response};

struct ConsoleStore {
    next_id: i64,
}

impl MediaStore for ConsoleStore {
    fn resolve_media_by_uid(&mut self, uid: &TagUid) -> Result<Option<MediaRef>> {
        println!("store: no association for uid {}", uid);
        Ok(None)
    }

    fn resolve_or_create_media_by_url(
        &mut self,
        url: &str,
        uid: Option<&TagUid>,
    ) -> Result<MediaRef> {
        self.next_id += 1;
        let media = MediaRef::new(self.next_id);
        println!("store: created {} for {} (uid {:?})", media, url, uid.map(TagUid::to_hex));
        Ok(media)
    }

    fn record_playback(&mut self, _uid: Option<&TagUid>, media: &MediaRef) -> Result<()> {
        println!("store: history entry for {}", media);
        Ok(())
    }
}

struct ConsolePlayback;

impl Playback for ConsolePlayback {
    fn stop(&mut self) -> Result<()> {
        println!("playback: stop");
        Ok(())
    }

    fn play(&mut self, media: &MediaRef) -> Result<()> {
        println!("playback: play {}", media);
        Ok(())
    }
}

struct ConsoleFeedback;

impl Feedback for ConsoleFeedback {
    fn play_feedback(&mut self, kind: FeedbackKind) -> Result<()> {
        println!("feedback: {:?} beep", kind);
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    // Script one tag carrying a media URL, then an empty field.
    let mut bus = MockBus::new();
    bus.push_response(version_response(0x01));
    bus.push_response(uid_response(&[0x04, 0xA1, 0xB2, 0xC3]));
    for page in ndef::encode_ndef_uri("https://youtu.be/dQw4w9WgXcQ")?.chunks(4) {
        bus.push_response(page.to_vec());
    }
    bus.set_idle_response(no_tag_response());

    let resolver = Resolver::new(
        Box::new(ConsoleStore { next_id: 0 }),
        Box::new(ConsolePlayback),
        Box::new(ConsoleFeedback),
    );
    let handle = NfcWorker::spawn(Box::new(bus), resolver, WorkerConfig::default())?;

    thread::sleep(Duration::from_secs(1));

    println!("online: {}", handle.online());
    if let Some(detection) = handle.last_detection() {
        println!("last detection: {:?}", detection);
    }

    handle.shutdown();
    Ok(())
}
