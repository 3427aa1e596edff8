//! Repairs the summary counts of Cubism 3 motion files.
//!
//! Some packages ship `motion3.json` files whose `Meta` counts disagree with
//! their curves, which makes stricter runtimes refuse to load them.

use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MotionCounts {
    pub(crate) curves: u64,
    pub(crate) segments: u64,
    pub(crate) points: u64,
}

fn is_motion(value: &Value) -> bool {
    value.get("Meta").is_some_and(Value::is_object) && value.get("Curves").is_some_and(Value::is_array)
}

/// Recounts curves, segments and points from the curve data.
///
/// Segment lists start with one point (time, value) followed by segments
/// led by a type identifier: linear (`0`), stepped (`2`) and inverse
/// stepped (`3`) add one point, bezier (`1`) adds three. Returns `None` for
/// malformed curves or unknown identifiers.
pub(crate) fn recount(motion: &Value) -> Option<MotionCounts> {
    let curves = motion.get("Curves")?.as_array()?;
    let mut counts = MotionCounts { curves: curves.len() as u64, segments: 0, points: 0 };
    for curve in curves {
        let segments = curve.get("Segments")?.as_array()?;
        counts.points += 1;
        let mut position = 2;
        while position < segments.len() {
            let (points, advance) = match segments[position].as_f64()? {
                0.0 | 2.0 | 3.0 => (1, 3),
                1.0 => (3, 7),
                _ => return None,
            };
            counts.points += points;
            counts.segments += 1;
            position += advance;
        }
    }
    Some(counts)
}

/// Rewrites the `Meta` counts of a motion file. Anything that is not a
/// motion, or cannot be recounted, is returned untouched.
pub(crate) fn repair(data: Vec<u8>) -> Vec<u8> {
    let Ok(mut motion) = serde_json::from_slice::<Value>(&data) else {
        return data;
    };
    if !is_motion(&motion) {
        return data;
    }
    let Some(counts) = recount(&motion) else {
        tracing::warn!("Motion has malformed curves; leaving it unchanged");
        return data;
    };
    let meta = &mut motion["Meta"];
    let current = (&meta["CurveCount"], &meta["TotalSegmentCount"], &meta["TotalPointCount"]);
    if current == (&json!(counts.curves), &json!(counts.segments), &json!(counts.points)) {
        return data;
    }
    tracing::debug!(
        curves = counts.curves,
        segments = counts.segments,
        points = counts.points,
        "Repairing motion counts"
    );
    meta["CurveCount"] = json!(counts.curves);
    meta["TotalSegmentCount"] = json!(counts.segments);
    meta["TotalPointCount"] = json!(counts.points);
    serde_json::to_vec_pretty(&motion).unwrap_or(data)
}
