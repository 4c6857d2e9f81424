//! Point and load types.

use serde::{Deserialize, Serialize};

/// A 2-D coordinate. Equality is exact.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Point;
///
/// let p = Point::new(3.0, 4.0);
/// assert!((Point::ORIGIN.distance_to(&p) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// The depot location.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A pickup-and-delivery task: drive to `start`, carry to `end`.
///
/// The three distances the search and the prioritization care about are
/// computed once on construction.
///
/// # Examples
///
/// ```
/// use u_pickup::models::{Load, Point};
///
/// let load = Load::new(1, Point::new(3.0, 4.0), Point::new(3.0, 0.0));
/// assert!((load.depot_to_start() - 5.0).abs() < 1e-10);
/// assert!((load.leg_distance() - 4.0).abs() < 1e-10);
/// assert!((load.end_to_depot() - 3.0).abs() < 1e-10);
/// assert!((load.round_trip() - 12.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Load {
    id: usize,
    start: Point,
    end: Point,
    #[serde(skip)]
    leg_distance: f64,
    #[serde(skip)]
    depot_to_start: f64,
    #[serde(skip)]
    end_to_depot: f64,
}

impl Load {
    /// Creates a load. Ids are validated when the task graph is built.
    pub fn new(id: usize, start: Point, end: Point) -> Self {
        Self {
            id,
            start,
            end,
            leg_distance: start.distance_to(&end),
            depot_to_start: Point::ORIGIN.distance_to(&start),
            end_to_depot: end.distance_to(&Point::ORIGIN),
        }
    }

    /// Load id (positive).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Pickup location.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Drop-off location.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Distance from pickup to drop-off.
    pub fn leg_distance(&self) -> f64 {
        self.leg_distance
    }

    /// Distance from the depot to the pickup.
    pub fn depot_to_start(&self) -> f64 {
        self.depot_to_start
    }

    /// Distance from the drop-off back to the depot.
    pub fn end_to_depot(&self) -> f64 {
        self.end_to_depot
    }

    /// Duration of a route serving only this load.
    pub fn round_trip(&self) -> f64 {
        self.depot_to_start + self.leg_distance + self.end_to_depot
    }
}
