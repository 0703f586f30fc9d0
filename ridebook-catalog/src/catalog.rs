use crate::route::{Route, RouteError, RouteId, VehicleKind};

/// Read-only lookup of the routes on sale
#[derive(Debug, Clone, Default)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The four routes the service ships with
    pub fn builtin() -> Result<Self, RouteError> {
        let routes = vec![
            Route::new(
                "r1",
                "CBE - Erode Express",
                VehicleKind::Bus,
                250,
                40,
                "Volvo AC",
                "2h 30m",
                &["06:00 AM", "09:30 AM", "02:00 PM", "06:30 PM"],
            )?
            .with_details(
                &["Coimbatore", "Sulur", "Tiruppur", "Erode"],
                4.5,
                &["AC", "WiFi", "Charging Port"],
            ),
            Route::new(
                "r2",
                "CBE - Madurai Superfast",
                VehicleKind::Train,
                150,
                100,
                "Express Train",
                "4h 15m",
                &["05:45 AM", "12:30 PM", "08:00 PM"],
            )?
            .with_details(
                &["Coimbatore", "Karur", "Dindigul", "Madurai"],
                4.8,
                &["Pantry", "AC Coach", "Reserved Seating"],
            ),
            Route::new(
                "r3",
                "CBE - Chennai Luxury",
                VehicleKind::Bus,
                850,
                36,
                "Mercedes Multi-Axle",
                "8h 00m",
                &["10:00 PM", "11:00 PM"],
            )?
            .with_details(
                &["Coimbatore", "Salem", "Dharmapuri", "Krishnagiri", "Chennai"],
                4.9,
                &["AC Sleeper", "WiFi", "Blanket", "Water Bottle"],
            ),
            Route::new(
                "r4",
                "Nilgiri Express",
                VehicleKind::Train,
                80,
                120,
                "Passenger Train",
                "3h 45m",
                &["07:15 AM", "03:30 PM"],
            )?
            .with_details(
                &["Coimbatore", "Mettupalayam", "Coonoor", "Ooty"],
                4.3,
                &["Scenic Route", "Reserved Seating"],
            ),
        ];

        Ok(Self::new(routes))
    }

    pub fn get(&self, id: &RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| &r.id == id)
    }

    pub fn list(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = RouteCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 4);

        let r1 = catalog.get(&RouteId::from("r1")).unwrap();
        assert_eq!(r1.price, 250);
        assert_eq!(r1.total_seats, 40);
        assert_eq!(r1.departures.len(), 4);

        let r3 = catalog.get(&RouteId::from("r3")).unwrap();
        assert_eq!(r3.price, 850);
        assert_eq!(r3.departures, vec!["10:00 PM".to_string(), "11:00 PM".to_string()]);
    }

    #[test]
    fn test_unknown_route() {
        let catalog = RouteCatalog::builtin().unwrap();
        assert!(catalog.get(&RouteId::from("r9")).is_none());
    }
}
