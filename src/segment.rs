use crate::{CaptionFragment, TimeSegment, watch_url};

/// Width of a timeline bucket, in seconds
pub const BUCKET_SECONDS: f64 = 10.0;

/// Round a start offset to the nearest bucket boundary (halves round up)
pub fn bucket_of(start: f64) -> f64 {
    (start / BUCKET_SECONDS).round() * BUCKET_SECONDS
}

/// Format a bucket start as `m:ss`
pub fn format_label(bucket_start: f64) -> String {
    let total = bucket_start.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

enum Grouping {
    Idle,
    Accumulating { bucket: f64, buffer: String },
}

impl Grouping {
    /// Feed one fragment, returning the finished group when the bucket changes
    fn push(&mut self, fragment: &CaptionFragment) -> Option<(f64, String)> {
        let bucket = bucket_of(fragment.start);
        if let Grouping::Accumulating { bucket: current, buffer } = self {
            if *current == bucket {
                buffer.push(' ');
                buffer.push_str(&fragment.text);
                return None;
            }
        }
        let next = Grouping::Accumulating {
            bucket,
            buffer: fragment.text.clone(),
        };
        std::mem::replace(self, next).finish()
    }

    fn finish(self) -> Option<(f64, String)> {
        match self {
            Grouping::Idle => None,
            Grouping::Accumulating { bucket, buffer } => Some((bucket, buffer)),
        }
    }
}

fn to_segment(video_id: &str, bucket: f64, buffer: &str) -> TimeSegment {
    TimeSegment {
        bucket_start: bucket,
        label: format_label(bucket),
        text: buffer.trim().to_string(),
        url: watch_url(video_id, bucket.max(0.0).floor() as u64),
    }
}

/// Group fragments into 10-second segments with labels and deep links.
///
/// Contiguous fragments whose rounded start falls in the same bucket share a
/// segment; every fragment lands in exactly one segment, in input order.
pub fn segment(fragments: &[CaptionFragment], video_id: &str) -> Vec<TimeSegment> {
    let mut state = Grouping::Idle;
    let mut segments = Vec::new();

    for fragment in fragments {
        if let Some((bucket, buffer)) = state.push(fragment) {
            segments.push(to_segment(video_id, bucket, &buffer));
        }
    }
    if let Some((bucket, buffer)) = state.finish() {
        segments.push(to_segment(video_id, bucket, &buffer));
    }

    segments
}
