use std::cmp;

use crate::voxels::WorldPoint;

/// All integer points on a straight line between two 3D points, both
/// endpoints included exactly once.
///
/// Integer-only digital differential analyser: the axis with the greatest
/// absolute delta drives, stepping one unit per iteration, while the two
/// secondary axes accumulate independent error terms and step whenever their
/// error crosses the driving delta. Consecutive points never differ by more
/// than one unit on any axis, so a carved corridor has no gaps.
pub fn line3d(p0: WorldPoint, p1: WorldPoint) -> Vec<WorldPoint> {
    let (mut x0, mut y0, mut z0) = (p0.x, p0.y, p0.z);
    let (x1, y1, z1) = (p1.x, p1.y, p1.z);

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let dz = (z1 - z0).abs();

    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let sz = if z0 < z1 { 1 } else { -1 };

    let mut points = Vec::with_capacity(cmp::max(dx, cmp::max(dy, dz)) as usize + 1);

    if dx >= dy && dx >= dz {
        let mut err_y = 2 * dy - dx;
        let mut err_z = 2 * dz - dx;
        while x0 != x1 {
            points.push(WorldPoint::new(x0, y0, z0));
            if err_y > 0 {
                y0 += sy;
                err_y -= 2 * dx;
            }
            if err_z > 0 {
                z0 += sz;
                err_z -= 2 * dx;
            }
            err_y += 2 * dy;
            err_z += 2 * dz;
            x0 += sx;
        }
    } else if dy >= dx && dy >= dz {
        let mut err_x = 2 * dx - dy;
        let mut err_z = 2 * dz - dy;
        while y0 != y1 {
            points.push(WorldPoint::new(x0, y0, z0));
            if err_x > 0 {
                x0 += sx;
                err_x -= 2 * dy;
            }
            if err_z > 0 {
                z0 += sz;
                err_z -= 2 * dy;
            }
            err_x += 2 * dx;
            err_z += 2 * dz;
            y0 += sy;
        }
    } else {
        let mut err_y = 2 * dy - dz;
        let mut err_x = 2 * dx - dz;
        while z0 != z1 {
            points.push(WorldPoint::new(x0, y0, z0));
            if err_y > 0 {
                y0 += sy;
                err_y -= 2 * dz;
            }
            if err_x > 0 {
                x0 += sx;
                err_x -= 2 * dz;
            }
            err_y += 2 * dy;
            err_x += 2 * dx;
            z0 += sz;
        }
    }

    points.push(WorldPoint::new(x0, y0, z0));
    points
}

/// Every integer point of the closed axis-aligned box spanned by two corners,
/// in either order: each axis is min/max normalised independently. Used for
/// solid fills, the boundary shell and the cross-section swept along a carved
/// line.
pub fn cuboid<A, B>(corner_a: A, corner_b: B) -> CuboidIter
    where A: Into<WorldPoint>,
          B: Into<WorldPoint>
{
    let a = corner_a.into();
    let b = corner_b.into();
    let min = WorldPoint::new(cmp::min(a.x, b.x), cmp::min(a.y, b.y), cmp::min(a.z, b.z));
    let max = WorldPoint::new(cmp::max(a.x, b.x), cmp::max(a.y, b.y), cmp::max(a.z, b.z));
    CuboidIter {
        min,
        max,
        current: Some(min),
    }
}

/// Iterates x outermost, then y, then z fastest.
#[derive(Debug, Copy, Clone)]
pub struct CuboidIter {
    min: WorldPoint,
    max: WorldPoint,
    current: Option<WorldPoint>,
}

impl Iterator for CuboidIter {
    type Item = WorldPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let point = self.current?;

        self.current = if point.z < self.max.z {
            Some(WorldPoint::new(point.x, point.y, point.z + 1))
        } else if point.y < self.max.y {
            Some(WorldPoint::new(point.x, point.y + 1, self.min.z))
        } else if point.x < self.max.x {
            Some(WorldPoint::new(point.x + 1, self.min.y, self.min.z))
        } else {
            None
        };

        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.current {
            None => 0,
            Some(p) => {
                let spans = |min: i32, max: i32| (max - min + 1) as usize;
                let (y_span, z_span) = (spans(self.min.y, self.max.y),
                                        spans(self.min.z, self.max.z));
                let done_x = (p.x - self.min.x) as usize * y_span * z_span;
                let done_y = (p.y - self.min.y) as usize * z_span;
                let done_z = (p.z - self.min.z) as usize;
                spans(self.min.x, self.max.x) * y_span * z_span - done_x - done_y - done_z
            }
        };
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for CuboidIter {} // default impl using size_hint()

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;

    use super::*;
    use crate::utils::FnvHashSet;

    fn wp(x: i32, y: i32, z: i32) -> WorldPoint {
        WorldPoint::new(x, y, z)
    }

    #[test]
    fn degenerate_line_is_one_point() {
        assert_eq!(line3d(wp(0, 0, 0), wp(0, 0, 0)), vec![wp(0, 0, 0)]);
        assert_eq!(line3d(wp(-3, 7, 2), wp(-3, 7, 2)), vec![wp(-3, 7, 2)]);
    }

    #[test]
    fn axis_aligned_line_has_no_gaps() {
        let points = line3d(wp(0, 0, 0), wp(5, 0, 0));
        assert_eq!(points,
                   vec![wp(0, 0, 0), wp(1, 0, 0), wp(2, 0, 0), wp(3, 0, 0), wp(4, 0, 0),
                        wp(5, 0, 0)]);

        let down = line3d(wp(0, 0, 0), wp(0, -3, 0));
        assert_eq!(down, vec![wp(0, 0, 0), wp(0, -1, 0), wp(0, -2, 0), wp(0, -3, 0)]);
    }

    #[test]
    fn diagonal_line_hits_both_endpoints_once() {
        let points = line3d(wp(0, 0, 0), wp(3, 2, 1));
        assert_eq!(points.first(), Some(&wp(0, 0, 0)));
        assert_eq!(points.last(), Some(&wp(3, 2, 1)));
        assert_eq!(points.len(), 4); // driving axis delta + 1
        let distinct: FnvHashSet<WorldPoint> = points.iter().cloned().collect();
        assert_eq!(distinct.len(), points.len());
    }

    #[test]
    fn line_properties_hold_for_arbitrary_endpoints() {
        fn prop(a: (i8, i8, i8), b: (i8, i8, i8)) -> bool {
            let p0 = wp(i32::from(a.0), i32::from(a.1), i32::from(a.2));
            let p1 = wp(i32::from(b.0), i32::from(b.1), i32::from(b.2));
            let points = line3d(p0, p1);

            let expected_len = (p1.x - p0.x)
                .abs()
                .max((p1.y - p0.y).abs())
                .max((p1.z - p0.z).abs()) as usize + 1;

            let endpoints_ok = points.first() == Some(&p0) && points.last() == Some(&p1);
            let gap_free = points.windows(2).all(|pair| {
                (pair[1].x - pair[0].x).abs() <= 1
                    && (pair[1].y - pair[0].y).abs() <= 1
                    && (pair[1].z - pair[0].z).abs() <= 1
                    && pair[0] != pair[1]
            });
            endpoints_ok && gap_free && points.len() == expected_len
        }
        quickcheck(prop as fn((i8, i8, i8), (i8, i8, i8)) -> bool);
    }

    #[test]
    fn cuboid_corner_order_does_not_matter() {
        let forward: FnvHashSet<WorldPoint> = cuboid((0, 0, 0), (1, 1, 1)).collect();
        let reversed: FnvHashSet<WorldPoint> = cuboid((1, 1, 1), (0, 0, 0)).collect();
        assert_eq!(forward.len(), 8);
        assert_eq!(forward, reversed);

        let mixed: FnvHashSet<WorldPoint> = cuboid((1, 0, 1), (0, 1, 0)).collect();
        assert_eq!(forward, mixed);
    }

    #[test]
    fn cuboid_single_point() {
        assert_eq!(cuboid((2, 2, 2), (2, 2, 2)).collect::<Vec<_>>(), vec![wp(2, 2, 2)]);
    }

    #[test]
    fn cuboid_enumeration_order_z_fastest() {
        let points: Vec<WorldPoint> = cuboid((0, 0, 0), (1, 0, 1)).collect();
        assert_eq!(points, vec![wp(0, 0, 0), wp(0, 0, 1), wp(1, 0, 0), wp(1, 0, 1)]);
    }

    #[test]
    fn cuboid_size_hint_is_exact() {
        let mut iter = cuboid((-1, -1, -1), (1, 1, 1));
        assert_eq!(iter.len(), 27);
        let mut seen = 0;
        while let Some(_) = iter.next() {
            seen += 1;
            assert_eq!(iter.size_hint().0, 27 - seen);
        }
        assert_eq!(seen, 27);
    }

    #[test]
    fn cuboid_count_is_span_product() {
        fn prop(a: (i8, i8, i8), b: (i8, i8, i8)) -> bool {
            let pa = wp(i32::from(a.0), i32::from(a.1), i32::from(a.2));
            let pb = wp(i32::from(b.0), i32::from(b.1), i32::from(b.2));
            let expected = ((pa.x - pb.x).abs() as usize + 1)
                * ((pa.y - pb.y).abs() as usize + 1)
                * ((pa.z - pb.z).abs() as usize + 1);
            // Keep the boxes small enough to enumerate quickly.
            if expected > 1 << 16 {
                return true;
            }
            cuboid(pa, pb).count() == expected
        }
        quickcheck(prop as fn((i8, i8, i8), (i8, i8, i8)) -> bool);
    }
}
