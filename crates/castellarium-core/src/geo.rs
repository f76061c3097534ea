//! Distance and bounding-box helpers backing the map views.

use crate::castle::{Castle, Coordinates};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters (haversine).
#[must_use]
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// A castle within range of a position.
#[derive(Debug, Clone, Copy)]
pub struct Nearby<'a> {
    pub castle: &'a Castle,
    pub distance_m: f64,
}

/// Castles with coordinates within `radius_m` of `origin`, closest first.
#[must_use]
pub fn nearby(castles: &[Castle], origin: Coordinates, radius_m: f64) -> Vec<Nearby<'_>> {
    let mut hits: Vec<Nearby<'_>> = castles
        .iter()
        .filter_map(|castle| {
            let position = castle.coordinates?;
            let distance_m = distance_meters(origin, position);
            (distance_m <= radius_m).then_some(Nearby { castle, distance_m })
        })
        .collect();
    hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    hits
}

/// South-west / north-east corners enclosing every point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

/// Bounding box of `points`, or `None` when there are none.
pub fn bounds<I>(points: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Coordinates>,
{
    points.into_iter().fold(None, |acc, p| {
        Some(match acc {
            None => Bounds {
                south_west: p,
                north_east: p,
            },
            Some(b) => Bounds {
                south_west: Coordinates {
                    latitude: b.south_west.latitude.min(p.latitude),
                    longitude: b.south_west.longitude.min(p.longitude),
                },
                north_east: Coordinates {
                    latitude: b.north_east.latitude.max(p.latitude),
                    longitude: b.north_east.longitude.max(p.longitude),
                },
            },
        })
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dataset::normalize_dataset;

    const RENNES: Coordinates = Coordinates {
        latitude: 48.1173,
        longitude: -1.6778,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert!(distance_meters(RENNES, RENNES).abs() < 1e-6);
    }

    #[test]
    fn distance_rennes_to_paris_is_about_310_km() {
        let paris = Coordinates {
            latitude: 48.8566,
            longitude: 2.3522,
        };
        let km = distance_meters(RENNES, paris) / 1000.0;
        assert!((300.0..320.0).contains(&km), "got {km} km");
    }

    #[test]
    fn nearby_filters_by_radius_and_sorts_by_distance() {
        let castles = normalize_dataset(vec![
            json!({"id": "fougeres", "coordonnees": {"lat": 48.3534, "lon": -1.2094}}),
            json!({"id": "vitre", "coordonnees": {"lat": 48.1236, "lon": -1.2096}}),
            json!({"id": "chambord", "coordonnees": {"lat": 47.6162, "lon": 1.5170}}),
            json!({"id": "no-coords"}),
        ])
        .unwrap();

        let hits = nearby(&castles, RENNES, 50_000.0);
        let ids: Vec<&str> = hits.iter().map(|n| n.castle.id.as_str()).collect();
        assert_eq!(ids, vec!["vitre", "fougeres"]);
        assert!(hits[0].distance_m < hits[1].distance_m);
    }

    #[test]
    fn bounds_of_empty_is_none() {
        assert!(bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn bounds_encloses_all_points() {
        let b = bounds([
            Coordinates {
                latitude: 48.0,
                longitude: -1.0,
            },
            Coordinates {
                latitude: 47.0,
                longitude: 2.0,
            },
            Coordinates {
                latitude: 49.0,
                longitude: 0.5,
            },
        ])
        .unwrap();
        assert_eq!(
            b.south_west,
            Coordinates {
                latitude: 47.0,
                longitude: -1.0
            }
        );
        assert_eq!(
            b.north_east,
            Coordinates {
                latitude: 49.0,
                longitude: 2.0
            }
        );
    }
}
