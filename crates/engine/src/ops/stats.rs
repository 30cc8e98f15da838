use chrono::{Datelike, Local};

use crate::{ResultRepo, stats, stats::MonthlyRecap};

use super::VehicleRepository;

impl VehicleRepository {
    /// Liters refueled in the given calendar month. `year = None` means the
    /// current year. No vehicle or no data yields 0.
    pub async fn get_fuel_used(&self, month: u32, year: Option<i32>) -> ResultRepo<f64> {
        let year = resolve_year(year);
        Ok(self
            .load_active_vehicle()
            .await?
            .map_or(0.0, |v| stats::fuel_used(&v, month, year)))
    }

    /// Fuel cost in the given calendar month, in the settings currency.
    pub async fn get_fuel_cost(&self, month: u32, year: Option<i32>) -> ResultRepo<f64> {
        let year = resolve_year(year);
        Ok(self
            .load_active_vehicle()
            .await?
            .map_or(0.0, |v| stats::fuel_cost(&v, month, year)))
    }

    /// Distance driven in the given calendar month, from the odometer history.
    pub async fn get_km_driven(&self, month: u32, year: Option<i32>) -> ResultRepo<i64> {
        let year = resolve_year(year);
        Ok(self
            .load_active_vehicle()
            .await?
            .map_or(0, |v| stats::km_driven(&v, month, year)))
    }

    /// Average consumption (liters per km) over full-to-full fill intervals
    /// in the given calendar month.
    pub async fn get_average_fuel_usage(&self, month: u32, year: Option<i32>) -> ResultRepo<f64> {
        let year = resolve_year(year);
        Ok(self
            .load_active_vehicle()
            .await?
            .map_or(0.0, |v| stats::average_fuel_usage(&v, month, year)))
    }

    /// All four monthly statistics in one read, the shape the notification
    /// layer pulls when a recap is due.
    pub async fn monthly_recap(&self, month: u32, year: Option<i32>) -> ResultRepo<MonthlyRecap> {
        let year = resolve_year(year);
        Ok(match self.load_active_vehicle().await? {
            Some(vehicle) => stats::monthly_recap(&vehicle, month, year),
            None => MonthlyRecap {
                month,
                year,
                fuel_used: 0.0,
                fuel_cost: 0.0,
                km_driven: 0,
                average_fuel_usage: 0.0,
            },
        })
    }
}

fn resolve_year(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| Local::now().year())
}
