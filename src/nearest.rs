use geo::{GeodesicDistance, Point};

use crate::stores::Store;

/// Geodesic distance on the WGS84 ellipsoid, in kilometres.
pub fn distance_km(a: &Point, b: &Point) -> f64 {
    a.geodesic_distance(b) / 1000.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<'a> {
    pub store: &'a Store,
    pub distance_km: f64,
}

/// The `limit` stores closest to `user`, nearest first. Equal distances keep
/// the order the stores were given in.
pub fn nearest<'a>(
    stores: impl IntoIterator<Item = &'a Store>,
    user: &Point,
    limit: usize,
) -> Vec<Nearby<'a>> {
    let mut output: Vec<_> = stores
        .into_iter()
        .map(|store| Nearby {
            store,
            distance_km: distance_km(user, &store.point()),
        })
        .collect();

    output.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    output.truncate(limit);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(address: &str, lon: f64, lat: f64) -> Store {
        Store {
            state: "MA".to_string(),
            lon,
            lat,
            address: address.to_string(),
            city: "Somewhere".to_string(),
            phone: String::new(),
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let waltham = Point::new(-71.2356, 42.3765);
        let pairs = [
            (waltham, Point::new(-71.0589, 42.3601)),
            (waltham, Point::new(-118.2437, 34.0522)),
            (Point::new(-157.8583, 21.3069), Point::new(-149.9003, 61.2181)),
        ];
        for (a, b) in pairs {
            let ab = distance_km(&a, &b);
            let ba = distance_km(&b, &a);
            assert!((ab - ba).abs() < 1e-6, "{ab} != {ba}");
        }
    }

    #[test]
    fn known_distance() {
        // Waltham to downtown Boston is roughly 14.6km
        let d = distance_km(
            &Point::new(-71.2356, 42.3765),
            &Point::new(-71.0589, 42.3601),
        );
        assert!((14.0..15.5).contains(&d), "{d}");
        assert!(distance_km(&Point::new(1.0, 2.0), &Point::new(1.0, 2.0)) < 1e-9);
    }

    #[test]
    fn picks_closest_ten_in_order() {
        let user = Point::new(-71.0, 42.0);
        // one store per 0.01 degree of latitude, shuffled
        let offsets = [7, 3, 12, 0, 9, 14, 1, 5, 11, 2, 13, 6, 4, 10, 8];
        let stores: Vec<_> = offsets
            .iter()
            .map(|x| store(&format!("store {x}"), -71.0, 42.0 + *x as f64 * 0.01))
            .collect();

        let result = nearest(&stores, &user, 10);
        assert_eq!(result.len(), 10);
        let names: Vec<_> = result.iter().map(|x| x.store.address.as_str()).collect();
        let expected: Vec<_> = (0..10).map(|x| format!("store {x}")).collect();
        assert_eq!(names, expected);
        assert!(result
            .windows(2)
            .all(|x| x[0].distance_km <= x[1].distance_km));
        assert!(result[0].distance_km < 1e-9);
    }

    #[test]
    fn fewer_than_limit() {
        let stores = vec![store("a", -71.1, 42.0), store("b", -71.0, 42.0)];
        let result = nearest(&stores, &Point::new(-71.0, 42.0), 10);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].store.address, "b");
        assert!(nearest(&Vec::<Store>::new(), &Point::new(0.0, 0.0), 10).is_empty());
    }

    #[test]
    fn ties_keep_dataset_order() {
        let stores = vec![
            store("east", -70.5, 42.0),
            store("west", -71.5, 42.0),
            store("far", -73.0, 42.0),
        ];
        let result = nearest(&stores, &Point::new(-71.0, 42.0), 2);
        assert_eq!(result[0].store.address, "east");
        assert_eq!(result[1].store.address, "west");
    }
}
