//! Distance and intersection predicates for simplices of dimension 0 to 3.
//!
//! Simplices are given as vertex lists of 1 to 4 points. Two closed
//! simplices intersect iff a vertex of one lies in the other, or an edge of
//! one meets an edge or a triangle of the other; the tests below check
//! exactly those feature pairs, each up to an absolute tolerance.

use crate::geometry::cells::{
    segment_squared_distance, tetrahedron_closest_point, triangle_closest_point,
    triangle_contains,
};
use crate::geometry::point::Point;

/// Squared distance between segments `[p1, q1]` and `[p2, q2]`
/// (Ericson, Real-Time Collision Detection, 5.1.9).
pub fn segment_segment_squared_distance(p1: &Point, q1: &Point, p2: &Point, q2: &Point) -> f64 {
    let d1 = *q1 - *p1;
    let d2 = *q2 - *p2;
    let r = *p1 - *p2;
    let a = d1.squared_norm();
    let e = d2.squared_norm();
    let f = d2.dot(&r);

    let (s, t) = if a == 0.0 && e == 0.0 {
        (0.0, 0.0)
    } else if a == 0.0 {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e == 0.0 {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            // parallel segments: any s works, pick the start
            let mut s = if denom != 0.0 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let c1 = *p1 + s * d1;
    let c2 = *p2 + t * d2;
    c1.squared_distance(&c2)
}

/// Whether segment `[p, q]` meets triangle `abc` within `tol`.
pub fn segment_triangle_intersect(
    p: &Point,
    q: &Point,
    triangle: [&Point; 3],
    tol: f64,
) -> bool {
    let [a, b, c] = triangle;
    let tol2 = tol * tol;

    // endpoints on the triangle
    for x in [p, q] {
        if triangle_closest_point(x, a, b, c).squared_distance(x) <= tol2 {
            return true;
        }
    }
    // crossing a triangle edge (covers the coplanar case)
    for (u, v) in [(a, b), (b, c), (c, a)] {
        if segment_segment_squared_distance(p, q, u, v) <= tol2 {
            return true;
        }
    }
    // piercing the interior
    let n = (*b - *a).cross(&(*c - *a));
    let sp = n.dot(&(*p - *a));
    let sq = n.dot(&(*q - *a));
    if sp * sq > 0.0 || sp == sq {
        return false;
    }
    let x = *p + (sp / (sp - sq)) * (*q - *p);
    triangle_contains(&x, a, b, c, tol)
}

/// Squared distance from `p` to the closed simplex with vertices `simplex`.
pub fn point_simplex_squared_distance(p: &Point, simplex: &[Point]) -> f64 {
    match simplex {
        [a] => p.squared_distance(a),
        [a, b] => segment_squared_distance(p, a, b),
        [a, b, c] => triangle_closest_point(p, a, b, c).squared_distance(p),
        [a, b, c, d] => tetrahedron_closest_point(p, &[*a, *b, *c, *d]).squared_distance(p),
        _ => f64::INFINITY,
    }
}

fn edges(simplex: &[Point]) -> impl Iterator<Item = (&Point, &Point)> {
    let n = simplex.len();
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (&simplex[i], &simplex[j])))
}

fn triangles(simplex: &[Point]) -> impl Iterator<Item = [&Point; 3]> {
    let n = simplex.len();
    (0..n).flat_map(move |i| {
        ((i + 1)..n).flat_map(move |j| ((j + 1)..n).map(move |k| [&simplex[i], &simplex[j], &simplex[k]]))
    })
}

fn vertex_in(a: &[Point], b: &[Point], tol2: f64) -> bool {
    a.iter().any(|p| point_simplex_squared_distance(p, b) <= tol2)
}

fn edge_meets_triangle(a: &[Point], b: &[Point], tol: f64) -> bool {
    edges(a).any(|(p, q)| triangles(b).any(|t| segment_triangle_intersect(p, q, t, tol)))
}

/// Whether two closed simplices (1 to 4 vertices each) intersect within
/// `tol`.
pub fn simplices_intersect(a: &[Point], b: &[Point], tol: f64) -> bool {
    let tol2 = tol * tol;
    if vertex_in(a, b, tol2) || vertex_in(b, a, tol2) {
        return true;
    }
    let edge_pair = edges(a).any(|(p, q)| {
        edges(b).any(|(u, v)| segment_segment_squared_distance(p, q, u, v) <= tol2)
    });
    edge_pair || edge_meets_triangle(a, b, tol) || edge_meets_triangle(b, a, tol)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z)
    }

    #[test]
    fn crossing_and_skew_segments() {
        let d = segment_segment_squared_distance(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 1.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &p(1.0, 0.0, 0.0),
        );
        assert!(d < 1e-30);
        let d = segment_segment_squared_distance(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.5, -1.0, 2.0),
            &p(0.5, 1.0, 2.0),
        );
        assert!((d - 4.0).abs() < 1e-14);
        // parallel, offset
        let d = segment_segment_squared_distance(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(2.0, 1.0, 0.0),
            &p(3.0, 1.0, 0.0),
        );
        assert!((d - 2.0).abs() < 1e-14);
    }

    #[test]
    fn segment_pierces_triangle() {
        let t = [&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(0.0, 1.0, 0.0)];
        assert!(segment_triangle_intersect(&p(0.2, 0.2, -1.0), &p(0.2, 0.2, 1.0), t, 1e-14));
        assert!(!segment_triangle_intersect(&p(0.8, 0.8, -1.0), &p(0.8, 0.8, 1.0), t, 1e-14));
        assert!(!segment_triangle_intersect(&p(0.2, 0.2, 0.5), &p(0.2, 0.2, 1.0), t, 1e-14));
    }

    #[test]
    fn overlapping_triangles_without_vertex_containment() {
        // star of David: no vertex of one lies in the other
        let a = [p(0.0, 1.0, 0.0), p(-0.866, -0.5, 0.0), p(0.866, -0.5, 0.0)];
        let b = [p(0.0, -1.0, 0.0), p(0.866, 0.5, 0.0), p(-0.866, 0.5, 0.0)];
        assert!(simplices_intersect(&a, &b, 1e-14));
        let far = [p(5.0, 5.0, 0.0), p(6.0, 5.0, 0.0), p(5.0, 6.0, 0.0)];
        assert!(!simplices_intersect(&a, &far, 1e-14));
    }

    #[test]
    fn tetrahedra_touching_at_a_face() {
        let a = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0)];
        let b = [p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0), p(1.0, 1.0, 1.0)];
        assert!(simplices_intersect(&a, &b, 1e-14));
        let c = [p(2.0, 2.0, 2.0), p(3.0, 2.0, 2.0), p(2.0, 3.0, 2.0), p(2.0, 2.0, 3.0)];
        assert!(!simplices_intersect(&a, &c, 1e-14));
        assert!(point_simplex_squared_distance(&p(0.1, 0.1, 0.1), &a) == 0.0);
    }
}
