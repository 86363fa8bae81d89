use super::*;
use crate::foundation::error::HeartfieldError;

#[derive(Default)]
struct Recorder {
    volumes: Vec<f32>,
    plays: usize,
    reject: bool,
}

impl AudioOutput for Recorder {
    fn set_volume(&mut self, volume: f32) {
        self.volumes.push(volume);
    }

    fn play(&mut self) -> HeartfieldResult<()> {
        self.plays += 1;
        if self.reject {
            return Err(HeartfieldError::validation("autoplay blocked"));
        }
        Ok(())
    }
}

#[test]
fn first_gesture_sets_volume_and_plays() {
    let mut cue = AudioCue::default();
    let mut out = Recorder::default();
    assert_eq!(cue.on_event(InputEvent::PointerDown, &mut out), CueOutcome::Played);
    assert_eq!(out.volumes, vec![0.4]);
    assert_eq!(out.plays, 1);
    assert!(!cue.is_armed());
}

#[test]
fn later_gestures_of_either_kind_are_ignored() {
    let mut cue = AudioCue::default();
    let mut out = Recorder::default();
    cue.on_event(InputEvent::TouchStart, &mut out);
    assert_eq!(cue.on_event(InputEvent::PointerDown, &mut out), CueOutcome::Ignored);
    assert_eq!(cue.on_event(InputEvent::TouchStart, &mut out), CueOutcome::Ignored);
    assert_eq!(out.plays, 1);
}

#[test]
fn rejected_play_is_swallowed_and_not_retried() {
    let mut cue = AudioCue::new(0.7);
    let mut out = Recorder {
        reject: true,
        ..Recorder::default()
    };
    assert_eq!(cue.on_event(InputEvent::PointerDown, &mut out), CueOutcome::Rejected);
    assert_eq!(cue.on_event(InputEvent::PointerDown, &mut out), CueOutcome::Ignored);
    assert_eq!(out.plays, 1);
    assert_eq!(out.volumes, vec![0.7]);
}
