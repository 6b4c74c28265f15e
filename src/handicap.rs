use crate::Point;

/// Conventional handicap star points in placement order: diagonal corners
/// first, then the center, then the side points.
///
/// Only the standard 9/13/19 sizes carry a handicap convention.
fn star_order(size: u8) -> Option<[Point; 9]> {
    match size {
        9 => Some([
            (2, 2),
            (6, 6),
            (2, 6),
            (6, 2),
            (4, 4),
            (2, 4),
            (6, 4),
            (4, 2),
            (4, 6),
        ]),
        13 => Some([
            (3, 3),
            (9, 9),
            (3, 9),
            (9, 3),
            (6, 6),
            (3, 6),
            (9, 6),
            (6, 3),
            (6, 9),
        ]),
        19 => Some([
            (3, 3),
            (15, 15),
            (3, 15),
            (15, 3),
            (9, 9),
            (3, 9),
            (15, 9),
            (9, 3),
            (9, 15),
        ]),
        _ => None,
    }
}

/// The first `count` handicap points for a board of the given size.
///
/// Returns `None` for unsupported sizes or a count outside 2..=9.
pub fn handicap_points(size: u8, count: u8) -> Option<Vec<Point>> {
    if !(2..=9).contains(&count) {
        return None;
    }
    let order = star_order(size)?;
    Some(order[..count as usize].to_vec())
}
