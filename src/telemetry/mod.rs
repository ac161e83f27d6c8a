//! JSON-lines analytics log.
//!
//! Each [`TelemetryEvent`] becomes one [`LogEntry`] line. Letter positions are written in
//! centered coordinates, so `(0, 0)` is the middle of the board.

use std::io::Write;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    game::grid::to_logical,
    models::Coord,
    ports::{KeyFrameState, SelectedLetter, TelemetryEvent, TelemetrySink},
};

pub const LOG_VERSION: &str = "1.0";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const KEY_PREFIX: &str = "WF_";
const ACTION_KEY: &str = "WF_Action";
const KEY_FRAME_KEY: &str = "WF_KeyFrame";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub log_version: String,
    pub app_version: String,
    pub game_id: Uuid,
    pub timestamp: String,
    pub timestamp_epoch: i64,
    pub key: String,
    pub parent_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken_in_milliseconds: Option<i64>,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Letter(LetterPayload),
    DeselectWord(DeselectWordPayload),
    SubmitWord(SubmitWordPayload),
    KeyFrame(KeyFramePayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterPayload {
    pub letter: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeselectWordPayload {
    pub word: String,
    pub letters: Vec<LetterPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWordPayload {
    pub word: String,
    pub score_total: u64,
    pub score_base: u64,
    pub success: bool,
    pub letters: Vec<LetterPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFramePayload {
    pub board: String,
    pub total_score: u64,
    pub words_played: u32,
    pub total_interactions: u32,
    pub state: KeyFrameState,
}

/// Writes one JSON object per line to any writer.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    game_id: Uuid,
    radius_x: i32,
    radius_y: i32,
    previous_submission: i64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, game_id: Uuid, radius_x: u32, radius_y: u32) -> Self {
        Self {
            writer,
            game_id,
            radius_x: radius_x as i32,
            radius_y: radius_y as i32,
            previous_submission: Local::now().timestamp_millis(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Turn an event into its log line representation at time `now`.
    ///
    /// Submissions, accepted or not, advance the "time since previous submission" clock.
    pub fn entry(&mut self, event: &TelemetryEvent, now: DateTime<Local>) -> LogEntry {
        let epoch = now.timestamp_millis();
        let mut time_taken = None;

        let payload = match event {
            TelemetryEvent::LetterSelected { letter, coord }
            | TelemetryEvent::LetterDeselected { letter, coord } => {
                Payload::Letter(self.letter_payload(*letter, *coord))
            }
            TelemetryEvent::DeselectAll { word, letters } => {
                Payload::DeselectWord(DeselectWordPayload {
                    word: word.clone(),
                    letters: self.letters(letters),
                })
            }
            TelemetryEvent::WordSubmitted {
                word,
                points,
                score,
                letters,
            } => {
                time_taken = Some(self.submission_gap(epoch));
                Payload::SubmitWord(SubmitWordPayload {
                    word: word.clone(),
                    score_total: *score,
                    score_base: *points,
                    success: true,
                    letters: self.letters(letters),
                })
            }
            TelemetryEvent::WordRejected { word, letters } => {
                time_taken = Some(self.submission_gap(epoch));
                Payload::SubmitWord(SubmitWordPayload {
                    word: word.clone(),
                    score_total: 0,
                    score_base: 0,
                    success: false,
                    letters: self.letters(letters),
                })
            }
            TelemetryEvent::KeyFrame {
                state,
                board,
                score,
                words_played,
                interactions,
            } => Payload::KeyFrame(KeyFramePayload {
                board: board.clone(),
                total_score: *score,
                words_played: *words_played,
                total_interactions: *interactions,
                state: *state,
            }),
        };

        let parent_key = match event {
            TelemetryEvent::KeyFrame { .. } => KEY_FRAME_KEY,
            _ => ACTION_KEY,
        };

        LogEntry {
            log_version: LOG_VERSION.to_string(),
            app_version: APP_VERSION.to_string(),
            game_id: self.game_id,
            timestamp: now.format("%Y/%m/%d %H:%M:%S").to_string(),
            timestamp_epoch: epoch,
            key: format!("{}{}", KEY_PREFIX, event.name()),
            parent_key: parent_key.to_string(),
            time_taken_in_milliseconds: time_taken,
            payload,
        }
    }

    fn submission_gap(&mut self, epoch: i64) -> i64 {
        let gap = epoch - self.previous_submission;
        self.previous_submission = epoch;
        gap
    }

    fn letter_payload(&self, letter: char, coord: Coord) -> LetterPayload {
        let (x, y) = to_logical(coord, self.radius_x, self.radius_y);
        LetterPayload {
            letter: letter.to_string(),
            x,
            y,
        }
    }

    fn letters(&self, letters: &[SelectedLetter]) -> Vec<LetterPayload> {
        letters
            .iter()
            .map(|l| self.letter_payload(l.letter, l.coord))
            .collect()
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn record(&mut self, event: &TelemetryEvent) {
        let entry = self.entry(event, Local::now());

        let line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to serialize log entry {}: {}", entry.key, e);
                return;
            }
        };

        if let Err(e) = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush()) {
            tracing::warn!("Failed to write telemetry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn sink() -> JsonLinesSink<Vec<u8>> {
        JsonLinesSink::new(Vec::new(), Uuid::nil(), 5, 4)
    }

    fn at(ms: i64) -> DateTime<Local> {
        Local.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_letter_entry_uses_centered_coordinates() {
        let mut sink = sink();
        let entry = sink.entry(
            &TelemetryEvent::LetterSelected {
                letter: 'Q',
                coord: Coord::new(5, 4),
            },
            at(1_000),
        );

        assert_eq!(entry.key, "WF_LetterSelected");
        assert_eq!(entry.parent_key, "WF_Action");
        assert_eq!(entry.timestamp_epoch, 1_000);
        assert_eq!(entry.time_taken_in_milliseconds, None);
        assert_eq!(
            entry.payload,
            Payload::Letter(LetterPayload {
                letter: "Q".to_string(),
                x: 0,
                y: 0
            })
        );
    }

    #[test]
    fn test_letter_coordinates_match_grid() {
        let grid = crate::game::Grid::new(5, 4);
        let sink = sink();

        for coord in [Coord::new(0, 0), Coord::new(10, 8), Coord::new(3, 6)] {
            let payload = sink.letter_payload('A', coord);
            assert_eq!((payload.x, payload.y), grid.to_logical(coord));
        }
    }

    #[test]
    fn test_submission_gap_tracks_previous_submission() {
        let mut sink = sink();
        sink.previous_submission = 500;
        let letters = vec![SelectedLetter {
            letter: 'C',
            coord: Coord::new(0, 0),
        }];

        let first = sink.entry(
            &TelemetryEvent::WordRejected {
                word: "CXT".to_string(),
                letters: letters.clone(),
            },
            at(2_000),
        );
        let second = sink.entry(
            &TelemetryEvent::WordSubmitted {
                word: "CAT".to_string(),
                points: 3,
                score: 3,
                letters,
            },
            at(2_750),
        );

        assert_eq!(first.time_taken_in_milliseconds, Some(1_500));
        assert_eq!(second.time_taken_in_milliseconds, Some(750));
        match second.payload {
            Payload::SubmitWord(ref p) => {
                assert!(p.success);
                assert_eq!(p.score_base, 3);
                assert_eq!(p.letters[0].x, -5);
                assert_eq!(p.letters[0].y, -4);
            }
            ref other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_record_writes_json_lines() {
        let mut sink = sink();
        sink.record(&TelemetryEvent::DeselectAll {
            word: "CA".to_string(),
            letters: vec![],
        });
        sink.record(&TelemetryEvent::KeyFrame {
            state: KeyFrameState::GameStart,
            board: "..../CAT.".to_string(),
            score: 0,
            words_played: 0,
            interactions: 0,
        });

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["key"], "WF_DeselectAll");
        assert_eq!(lines[0]["payload"]["word"], "CA");
        assert!(lines[0].get("timeTakenInMilliseconds").is_none());
        assert_eq!(lines[1]["parentKey"], "WF_KeyFrame");
        assert_eq!(lines[1]["payload"]["state"], "gameStart");
        assert_eq!(lines[1]["payload"]["totalInteractions"], 0);
        assert_eq!(lines[1]["logVersion"], LOG_VERSION);
        assert_eq!(lines[1]["gameId"], Uuid::nil().to_string());
        assert_eq!(lines[1]["timestamp"].as_str().unwrap().len(), 19);
    }
}
