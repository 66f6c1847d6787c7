//! Tests for fd-report.

#[cfg(test)]
mod helpers {
    use fd_core::{Driver, DriverId, GeoPoint, Restaurant, RestaurantId};

    /// Two restaurants ~350 m apart in central Sofia with one driver
    /// already assigned to each.
    pub fn sofia_pair() -> (Vec<Driver>, Vec<Restaurant>) {
        let restaurants = vec![
            Restaurant::new(RestaurantId(1), "Vitosha Grill", GeoPoint::new(42.6977, 23.3219), 50),
            Restaurant::new(RestaurantId(2), "Serdika Pizza", GeoPoint::new(42.7000, 23.3250), 45),
        ];
        let mut a = Driver::new(DriverId(1), "Ivan Petrov", GeoPoint::new(42.6980, 23.3220), 2);
        a.restaurant = Some(RestaurantId(1));
        let mut b = Driver::new(DriverId(2), "Maria Ivanova", GeoPoint::new(42.6995, 23.3245), 3);
        b.restaurant = Some(RestaurantId(2));
        (vec![a, b], restaurants)
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod report {
    use std::collections::HashMap;

    use fd_core::{Driver, DriverId, GeoPoint, RestaurantId, haversine_km};

    use super::helpers::sofia_pair;
    use crate::report::{generate_report, orders_snapshot};

    #[test]
    fn two_restaurants_two_drivers() {
        let (drivers, restaurants) = sofia_pair();
        let before = orders_snapshot(&restaurants);
        let report = generate_report(&drivers, &restaurants, &before);

        assert_eq!(report.restaurants.len(), 2);
        assert_eq!(report.drivers.len(), 2);
        assert_eq!(report.restaurants[0].orders_before, 50);
        assert_eq!(report.restaurants[0].orders_after, 48);
        assert_eq!(report.restaurants[1].orders_before, 45);
        assert_eq!(report.restaurants[1].orders_after, 42);

        let d = &report.drivers[0];
        assert_eq!(d.assigned_restaurant.as_deref(), Some("Vitosha Grill"));
        assert_eq!(d.nearest_restaurant.as_deref(), Some("Vitosha Grill"));
        assert_eq!(d.assigned_distance_km, 0.03);
        assert!(report.average_distance_km < 0.1);
        assert_eq!(report.unassigned_count(), 0);
    }

    #[test]
    fn serialised_shape() {
        let (drivers, restaurants) = sofia_pair();
        let report = generate_report(&drivers, &restaurants, &orders_snapshot(&restaurants));
        let v = serde_json::to_value(&report).unwrap();

        let top: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(top.len(), 3);
        for key in ["restaurants", "drivers", "average_distance_km"] {
            assert!(top.contains(&key), "missing {key}");
        }
        assert!(v["average_distance_km"].is_f64());

        let r = &v["restaurants"][0];
        for key in ["restaurant_id", "title", "orders_before", "orders_after"] {
            assert!(r.get(key).is_some(), "restaurant row missing {key}");
        }

        let d = &v["drivers"][1];
        for key in [
            "id",
            "name",
            "position",
            "assigned_restaurant",
            "assigned_distance_km",
            "nearest_restaurant",
            "nearest_distance_km",
        ] {
            assert!(d.get(key).is_some(), "driver row missing {key}");
        }
        assert_eq!(d["position"]["lat"], 42.6995);
        assert_eq!(d["position"]["lng"], 23.3245);
    }

    #[test]
    fn unassigned_driver_reports_none() {
        let (mut drivers, restaurants) = sofia_pair();
        drivers[1].restaurant = None;
        let report = generate_report(&drivers, &restaurants, &orders_snapshot(&restaurants));

        let d = &report.drivers[1];
        assert_eq!(d.assigned_restaurant, None);
        assert_eq!(d.assigned_distance_km, 0.0);
        assert!(d.nearest_restaurant.is_some());
        assert_eq!(report.unassigned_count(), 1);
        assert_eq!(report.restaurants[1].orders_after, 45);

        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["drivers"][1]["assigned_restaurant"], "none");
    }

    #[test]
    fn nearest_ignores_assignment() {
        let (mut drivers, restaurants) = sofia_pair();
        // Sitting on restaurant 1 but assigned to restaurant 2.
        drivers[0].restaurant = Some(RestaurantId(2));
        let report = generate_report(&drivers, &restaurants, &orders_snapshot(&restaurants));

        let d = &report.drivers[0];
        assert_eq!(d.assigned_restaurant.as_deref(), Some("Serdika Pizza"));
        assert_eq!(d.nearest_restaurant.as_deref(), Some("Vitosha Grill"));
        assert!(d.nearest_distance_km < d.assigned_distance_km);
        assert_eq!(report.restaurants[0].orders_after, 50);
        assert_eq!(report.restaurants[1].orders_after, 40);
    }

    #[test]
    fn no_restaurants() {
        let (drivers, _) = sofia_pair();
        let report = generate_report(&drivers, &[], &HashMap::new());
        assert!(report.restaurants.is_empty());
        for d in &report.drivers {
            assert_eq!(d.nearest_restaurant, None);
            assert_eq!(d.nearest_distance_km, 0.0);
            // Assigned to IDs that no longer exist.
            assert_eq!(d.assigned_restaurant, None);
        }
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["drivers"][0]["nearest_restaurant"], "none");
    }

    #[test]
    fn unplaced_drivers_skipped() {
        let (mut drivers, restaurants) = sofia_pair();
        let mut ghost = Driver::new(DriverId(3), "Ghost", GeoPoint::new(0.0, 0.0), 4);
        ghost.position = None;
        ghost.restaurant = Some(RestaurantId(1));
        drivers.push(ghost);

        let report = generate_report(&drivers, &restaurants, &orders_snapshot(&restaurants));
        assert_eq!(report.drivers.len(), 2);
        // Its capacity still counts against the restaurant.
        assert_eq!(report.restaurants[0].orders_after, 44);
    }

    #[test]
    fn orders_after_clamped_at_zero() {
        let (mut drivers, mut restaurants) = sofia_pair();
        restaurants[0].orders_count = 1;
        drivers[1].restaurant = Some(RestaurantId(1));
        let report = generate_report(&drivers, &restaurants, &orders_snapshot(&restaurants));
        assert_eq!(report.restaurants[0].orders_after, 0);
        assert_eq!(report.remaining_orders(), 45);
    }

    #[test]
    fn missing_orders_before_is_zero() {
        let (drivers, restaurants) = sofia_pair();
        let mut before = HashMap::new();
        before.insert(RestaurantId(2), 45);
        let report = generate_report(&drivers, &restaurants, &before);
        assert_eq!(report.restaurants[0].orders_before, 0);
        assert_eq!(report.restaurants[1].orders_before, 45);
    }

    #[test]
    fn orders_before_sums_to_pre_run_orders() {
        let (drivers, restaurants) = sofia_pair();
        let before = orders_snapshot(&restaurants);
        let report = generate_report(&drivers, &restaurants, &before);
        let sum: u32 = report.restaurants.iter().map(|r| r.orders_before).sum();
        assert_eq!(sum, restaurants.iter().map(|r| r.orders_count).sum::<u32>());
    }

    #[test]
    fn distances_rounded_to_two_decimals() {
        let (drivers, restaurants) = sofia_pair();
        let report = generate_report(&drivers, &restaurants, &orders_snapshot(&restaurants));
        let raw = haversine_km(drivers[1].position.unwrap(), restaurants[1].position);
        let d = &report.drivers[1];
        assert_eq!(d.assigned_distance_km, (raw * 100.0).round() / 100.0);
    }

    #[test]
    fn empty_fleet_average_is_zero() {
        let (_, restaurants) = sofia_pair();
        let report = generate_report(&[], &restaurants, &orders_snapshot(&restaurants));
        assert_eq!(report.average_distance_km, 0.0);
        assert_eq!(report.remaining_orders(), 95);
    }
}

// ── Distribution end to end ───────────────────────────────────────────────────

#[cfg(test)]
mod end_to_end {
    use fd_core::{Driver, DriverId, GeoPoint, Restaurant, RestaurantId};
    use fd_dispatch::{DistributorKind, FleetStore, MemoryFleetStore, run_distribution};

    use crate::report::{generate_report, orders_snapshot};

    #[test]
    fn greedy_then_report() {
        let restaurants = vec![
            Restaurant::new(RestaurantId(1), "Center", GeoPoint::new(42.6886, 23.308027), 50),
            Restaurant::new(RestaurantId(2), "Lozenets", GeoPoint::new(42.80, 23.60), 45),
        ];
        let drivers = vec![
            Driver::new(DriverId(1), "Near center", GeoPoint::new(42.6889, 23.3083), 2),
            Driver::new(DriverId(2), "Near Lozenets", GeoPoint::new(42.8003, 23.6003), 3),
        ];
        let store = MemoryFleetStore::with_drivers(restaurants, drivers);

        let before = orders_snapshot(&store.restaurants().unwrap());
        run_distribution(&store, &DistributorKind::Greedy.build()).unwrap();
        let report = generate_report(
            &store.drivers().unwrap(),
            &store.restaurants().unwrap(),
            &before,
        );

        let after: Vec<u32> = report.restaurants.iter().map(|r| r.orders_after).collect();
        assert_eq!(after, vec![48, 42]);
        assert_eq!(report.drivers[0].assigned_restaurant.as_deref(), Some("Center"));
        assert_eq!(report.drivers[1].assigned_restaurant.as_deref(), Some("Lozenets"));
        assert!(report.average_distance_km < 0.1);
        assert_eq!(report.unassigned_count(), 0);
    }
}

// ── Writers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod writers {
    use tempfile::TempDir;

    use super::helpers::sofia_pair;
    use crate::csv::CsvReportWriter;
    use crate::json::JsonReportWriter;
    use crate::report::{FleetReport, generate_report, orders_snapshot};
    use crate::writer::ReportWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn sample() -> FleetReport {
        let (mut drivers, restaurants) = sofia_pair();
        drivers[1].restaurant = None;
        generate_report(&drivers, &restaurants, &orders_snapshot(&restaurants))
    }

    #[test]
    fn json_matches_serde_value() {
        let dir = tmp();
        let path = dir.path().join("report.json");
        let report = sample();

        let mut w = JsonReportWriter::new(&path).unwrap();
        w.write_report(&report).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serde_json::to_value(&report).unwrap());
    }

    #[test]
    fn csv_files_and_headers() {
        let dir = tmp();
        let mut w = CsvReportWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("restaurants.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["restaurant_id", "title", "orders_before", "orders_after"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("drivers.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            [
                "id",
                "name",
                "lat",
                "lng",
                "assigned_restaurant",
                "assigned_distance_km",
                "nearest_restaurant",
                "nearest_distance_km",
            ]
        );
    }

    #[test]
    fn csv_rows() {
        let dir = tmp();
        let report = sample();
        let mut w = CsvReportWriter::new(dir.path()).unwrap();
        w.write_report(&report).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("restaurants.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Vitosha Grill");
        assert_eq!(&rows[0][3], "48");

        let mut rdr = csv::Reader::from_path(dir.path().join("drivers.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Ivan Petrov");
        assert_eq!(&rows[1][4], "none");
        assert_eq!(&rows[1][5], "0");
        assert_eq!(rows[1][2].parse::<f64>().unwrap(), 42.6995);
    }
}
