//! Pure aggregation over a loaded [`Vehicle`] snapshot.
//!
//! Every function here takes an immutable snapshot plus a `(month, year)`
//! calendar window and returns a scalar. Nothing touches the store, nothing
//! mutates the input, and absence of data yields zero instead of an error, so
//! the functions are safe to call from any thread and trivially re-entrant.
//!
//! Window membership is decided on the stored naive timestamps: an entry
//! belongs to the window when its date falls in the requested calendar month
//! and year.
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{FuelUsage, Mileage, Vehicle};

/// The monthly statistics bundle pulled by the notification layer for the
/// "recap due" read path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecap {
    pub month: u32,
    pub year: i32,
    pub fuel_used: f64,
    pub fuel_cost: f64,
    pub km_driven: i64,
    pub average_fuel_usage: f64,
}

fn in_window(date: NaiveDateTime, month: u32, year: i32) -> bool {
    date.month() == month && date.year() == year
}

fn before_window(date: NaiveDateTime, month: u32, year: i32) -> bool {
    (date.year(), date.month()) < (year, month)
}

/// Total liters refueled in the window. Partial fills count.
#[must_use]
pub fn fuel_used(vehicle: &Vehicle, month: u32, year: i32) -> f64 {
    vehicle
        .fuel_usages
        .iter()
        .filter(|f| in_window(f.date, month, year))
        .map(|f| f.liters)
        .sum()
}

/// Total fuel cost in the window, in the settings currency. Partial fills
/// count.
#[must_use]
pub fn fuel_cost(vehicle: &Vehicle, month: u32, year: i32) -> f64 {
    vehicle
        .fuel_usages
        .iter()
        .filter(|f| in_window(f.date, month, year))
        .map(|f| f.cost)
        .sum()
}

/// Distance driven in the window, derived from the odometer history.
///
/// The result is `max(0, latest in-window value - baseline)` where the
/// baseline is the last reading dated before the window when one exists, the
/// earliest in-window reading otherwise. With fewer than two readings
/// bounding the window the result is 0: never negative, never extrapolated.
#[must_use]
pub fn km_driven(vehicle: &Vehicle, month: u32, year: i32) -> i64 {
    let mut readings: Vec<&Mileage> = vehicle.mileage.iter().collect();
    readings.sort_by(|a, b| (a.date, &a.id).cmp(&(b.date, &b.id)));

    let Some(latest) = readings
        .iter()
        .rev()
        .find(|m| in_window(m.date, month, year))
    else {
        return 0;
    };

    let baseline = readings
        .iter()
        .rev()
        .find(|m| before_window(m.date, month, year))
        .or_else(|| readings.iter().find(|m| in_window(m.date, month, year)));

    match baseline {
        Some(baseline) if baseline.id != latest.id => (latest.value - baseline.value).max(0),
        _ => 0,
    }
}

/// Average consumption in liters per kilometer over the window.
///
/// Only consecutive fill-up pairs where neither endpoint is a partial fill
/// contribute: the liters of the later fill are the fuel burned between the
/// two odometer anchors, so intervals touching a partial fill have an
/// unknown true distance and are skipped. A pair belongs to the window when
/// its later fill does. No eligible pair means 0.
#[must_use]
pub fn average_fuel_usage(vehicle: &Vehicle, month: u32, year: i32) -> f64 {
    let mut fills: Vec<(&FuelUsage, i64)> = vehicle
        .fuel_usages
        .iter()
        .filter_map(|fuel| {
            let mileage_id = fuel.mileage_id.as_deref()?;
            let anchor = vehicle.mileage.iter().find(|m| m.id == mileage_id)?;
            Some((fuel, anchor.value))
        })
        .collect();
    fills.sort_by(|(a, _), (b, _)| (a.date, &a.id).cmp(&(b.date, &b.id)));

    let mut liters = 0.0;
    let mut distance = 0i64;
    for pair in fills.windows(2) {
        let (earlier, earlier_value) = pair[0];
        let (later, later_value) = pair[1];
        if earlier.is_partial_fill || later.is_partial_fill {
            continue;
        }
        if !in_window(later.date, month, year) {
            continue;
        }
        let interval = later_value - earlier_value;
        if interval <= 0 {
            continue;
        }
        liters += later.liters;
        distance += interval;
    }

    if distance == 0 {
        0.0
    } else {
        liters / distance as f64
    }
}

/// All four window statistics in one pass-friendly bundle.
#[must_use]
pub fn monthly_recap(vehicle: &Vehicle, month: u32, year: i32) -> MonthlyRecap {
    MonthlyRecap {
        month,
        year,
        fuel_used: fuel_used(vehicle, month, year),
        fuel_cost: fuel_cost(vehicle, month, year),
        km_driven: km_driven(vehicle, month, year),
        average_fuel_usage: average_fuel_usage(vehicle, month, year),
    }
}
