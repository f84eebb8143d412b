use serde::Deserialize;
use serde_aux::prelude::*;

use crate::category::Category;

/// One element of the `/api/skipSegments` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipSegmentRecord {
    pub category: Category,
    pub segment: Vec<f64>,
    #[serde(rename = "UUID", default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub action_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub video_duration: Option<f64>,
}

/// A skippable interval of a video, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub category: Category,
    pub start: f64,
    pub end: f64,
    pub uuid: Option<String>,
    pub action_type: Option<String>,
    pub video_duration: Option<f64>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidSegment {
    #[error("expected [start, end], got {0} values")]
    Arity(usize),
    #[error("timestamps must be finite and non-negative")]
    OutOfRange,
    #[error("start {0} is not before end {1}")]
    Empty(f64, f64),
}

impl TryFrom<SkipSegmentRecord> for Segment {
    type Error = InvalidSegment;

    fn try_from(record: SkipSegmentRecord) -> Result<Self, Self::Error> {
        let (start, end) = match record.segment.as_slice() {
            [start, end] => (*start, *end),
            values => return Err(InvalidSegment::Arity(values.len())),
        };

        if !start.is_finite() || !end.is_finite() || start < 0.0 {
            return Err(InvalidSegment::OutOfRange);
        }
        if start >= end {
            return Err(InvalidSegment::Empty(start, end));
        }

        Ok(Segment {
            category: record.category,
            start,
            end,
            uuid: record.uuid,
            action_type: record.action_type,
            video_duration: record.video_duration,
        })
    }
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `position` falls inside `[start, end)`.
    pub fn contains(&self, position: f64) -> bool {
        self.start <= position && position < self.end
    }
}

/// Parses a skipSegments response body.
///
/// The body has to be a JSON array of records, anything else is an error.
/// Records with an unusable interval are dropped. The result is ordered by
/// `end`, ties keep the order the server sent them in.
pub fn parse_segments(body: &str) -> Result<Vec<Segment>, serde_json::Error> {
    let records: Vec<SkipSegmentRecord> = serde_json::from_str(body)?;

    let mut segments = records
        .into_iter()
        .filter_map(|record| {
            let uuid = record.uuid.clone().unwrap_or_default();
            Segment::try_from(record)
                .map_err(|e| warn!("dropping segment {}: {}", uuid, e))
                .ok()
        })
        .collect::<Vec<_>>();
    segments.sort_by(|a, b| a.end.total_cmp(&b.end));

    Ok(segments)
}
