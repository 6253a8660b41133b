//! Great-circle math for the digest's location filter. Distances are in
//! statute miles; coordinates are (latitude, longitude) degree pairs.

const EARTH_RADIUS_MILES: f64 = 3958.8;
const MILES_PER_DEGREE_LAT: f64 = 69.0;

pub fn haversine_miles(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lng1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lng2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

pub fn centroid(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.0, lng + p.1));
    Some((lat_sum / n, lng_sum / n))
}

/// Cheap rectangular prefilter around a center point. Candidates inside
/// the box still need a true great-circle check against the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn around(center: (f64, f64), radius_miles: f64) -> Self {
        let (lat, lng) = center;
        let lat_delta = radius_miles / MILES_PER_DEGREE_LAT;
        // Longitude degrees shrink with latitude; guard the poles.
        let lng_scale = lat.to_radians().cos().max(0.01);
        let lng_delta = radius_miles / (MILES_PER_DEGREE_LAT * lng_scale);
        Self {
            min_lat: lat - lat_delta,
            max_lat: lat + lat_delta,
            min_lng: lng - lng_delta,
            max_lng: lng + lng_delta,
        }
    }

    pub fn contains(&self, point: (f64, f64)) -> bool {
        let (lat, lng) = point;
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DENVER: (f64, f64) = (39.7392, -104.9903);
    const BOULDER: (f64, f64) = (40.0150, -105.2705);
    const FORT_COLLINS: (f64, f64) = (40.5853, -105.0844);

    #[test]
    fn haversine_matches_known_distances() {
        let d = haversine_miles(DENVER, BOULDER);
        assert!((d - 24.0).abs() < 2.0, "Denver-Boulder was {} miles", d);

        let d = haversine_miles(DENVER, FORT_COLLINS);
        assert!((d - 58.0).abs() < 3.0, "Denver-Fort Collins was {} miles", d);

        assert!(haversine_miles(DENVER, DENVER) < 1e-9);
    }

    #[test]
    fn centroid_of_points() {
        assert_eq!(centroid(&[]), None);
        assert_eq!(centroid(&[DENVER]), Some(DENVER));

        let c = centroid(&[(40.0, -105.0), (41.0, -104.0)]).expect("Centroid");
        assert!((c.0 - 40.5).abs() < 1e-9);
        assert!((c.1 + 104.5).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_covers_the_radius() {
        let bbox = BoundingBox::around(DENVER, 30.0);
        assert!(bbox.contains(BOULDER));
        assert!(!bbox.contains(FORT_COLLINS));
        assert!(bbox.contains(DENVER));
    }
}
