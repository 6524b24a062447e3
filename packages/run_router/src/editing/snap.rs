//! Snapping of user-edited polylines onto the street graph: densify the
//! polyline so corners follow streets instead of cutting across blocks,
//! then project every point onto the nearest segment in the local frame.

use crate::common::config::SnapParams;
use crate::editing::projection::LocalFrame;
use crate::editing::structs::TracePoint;
use crate::loading::graph::RouteGraph;

/// Insert evenly spaced interior points wherever consecutive vertices are
/// further apart than `max_step_m` in the local frame. The original first
/// and last vertices are always kept verbatim.
pub fn densify(
    points: &[TracePoint],
    frame: &LocalFrame,
    max_step_m: f64,
) -> Vec<TracePoint> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let mut densified = Vec::new();
    for pair in points.windows(2) {
        let p1 = pair[0];
        let p2 = pair[1];

        densified.push(p1);

        let (x1, y1) = frame.to_local(p1.lat, p1.lon);
        let (x2, y2) = frame.to_local(p2.lat, p2.lon);
        let dx = x2 - x1;
        let dy = y2 - y1;
        let seg_len = dx.hypot(dy);

        if seg_len > max_step_m {
            let n = (seg_len / max_step_m).floor() as usize;
            for k in 1..=n {
                let t = k as f64 / (n + 1) as f64;
                let (lat, lon) =
                    frame.to_geographic(x1 + dx * t, y1 + dy * t);
                densified.push(TracePoint { lat, lon });
            }
        }
    }
    densified.push(points[points.len() - 1]);

    densified
}

/// Closest point to P on the finite segment A-B, plus the distance to it.
/// The projection parameter is clamped so endpoints win beyond the ends.
fn project_onto_segment(
    px: f64,
    py: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
) -> (f64, f64, f64) {
    let vx = x2 - x1;
    let vy = y2 - y1;
    let wx = px - x1;
    let wy = py - y1;

    let seg_len2 = vx * vx + vy * vy;
    if seg_len2 == 0.0 {
        // A and B are the same point
        return (x1, y1, (px - x1).hypot(py - y1));
    }

    let t = ((vx * wx + vy * wy) / seg_len2).clamp(0.0, 1.0);

    let proj_x = x1 + t * vx;
    let proj_y = y1 + t * vy;

    (proj_x, proj_y, (px - proj_x).hypot(py - proj_y))
}

/// Snap an edited polyline onto the graph. Points that end up further than
/// the snap threshold from every segment stay where the user put them, and
/// the first and last output points always equal the first and last input
/// coordinates exactly.
///
/// The per-point scan over all segments is deliberately naive; at current
/// graph sizes it beats maintaining a spatial index.
pub fn snap_to_graph(
    points: &[TracePoint],
    graph: &RouteGraph,
    frame: &LocalFrame,
    params: &SnapParams,
) -> Vec<TracePoint> {
    if points.len() < 2 || graph.node_count() == 0 {
        return points.to_vec();
    }

    let dense = densify(points, frame, params.max_step_m);

    // One planar copy of the de-duplicated segment set per call
    let segments: Vec<(f64, f64, f64, f64)> = graph
        .segments()
        .iter()
        .map(|segment| {
            let (x1, y1) = frame.to_local(segment.lat1, segment.lon1);
            let (x2, y2) = frame.to_local(segment.lat2, segment.lon2);
            (x1, y1, x2, y2)
        })
        .collect();
    if segments.is_empty() {
        return points.to_vec();
    }

    let mut snapped = Vec::with_capacity(dense.len());
    for point in &dense {
        let (px, py) = frame.to_local(point.lat, point.lon);

        let mut best_dist = f64::INFINITY;
        let mut best_proj = None;

        for (x1, y1, x2, y2) in segments.iter() {
            let (proj_x, proj_y, dist) =
                project_onto_segment(px, py, *x1, *y1, *x2, *y2);
            if dist < best_dist {
                best_dist = dist;
                best_proj = Some((proj_x, proj_y));
            }
        }

        match best_proj {
            Some((proj_x, proj_y)) if best_dist <= params.max_snap_dist_m => {
                let (lat, lon) = frame.to_geographic(proj_x, proj_y);
                snapped.push(TracePoint { lat, lon });
            }
            // Too far from any street: leave the edited point alone
            _ => snapped.push(*point),
        }
    }

    // The user's endpoints are authoritative regardless of snapping
    snapped[0] = points[0];
    let last = snapped.len() - 1;
    snapped[last] = points[points.len() - 1];

    snapped
}
