use chrono::NaiveTime;
use serde::Serialize;
use uuid::Uuid;

use crate::configuration::BookingSettings;
use crate::domain::booking_status::BookingStatus;
use crate::domain::table_inventory::{SyntheticTable, TableInventory};
use crate::models::Booking;

// How close an existing reservation has to be to the requested time before
// the table counts as taken. A proxy for a seating-duration model the
// product has not defined; see configuration::BookingSettings.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityPolicy{
    pub window_minutes: u32
}

impl From<&BookingSettings> for AvailabilityPolicy {
    fn from(settings: &BookingSettings) -> Self {
        AvailabilityPolicy{window_minutes: settings.availability_window_minutes}
    }
}

impl AvailabilityPolicy {
    pub fn conflicts(&self, booked: NaiveTime, requested: NaiveTime) -> bool{
        let minutes_apart = (booked - requested).num_minutes().abs();
        minutes_apart <= self.window_minutes as i64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableStatus{
    #[serde(flatten)]
    pub table: SyntheticTable,
    pub occupied_by: Option<Uuid>
}

impl TableStatus {
    pub fn is_free(&self) -> bool{
        self.occupied_by.is_none()
    }
}

// Cross-reference the inventory against the day's ledger: a table is
// occupied when an active booking for it lies within the policy window of
// the requested time.
//
// Bookings that point at a table id the current inventory does not produce
// (the configuration changed after they were made) are skipped. When several
// in-window bookings share a table, the later one in ledger order wins the
// occupied-by marker; conflict detection is the write path's job, not a
// read-layer concern.
pub fn resolve_tables(
    inventory: &TableInventory,
    ledger: &[Booking],
    requested: NaiveTime,
    policy: &AvailabilityPolicy
) -> Vec<TableStatus>{
    let mut tables: Vec<TableStatus> = inventory
        .synthetic_tables()
        .into_iter()
        .map(|table| TableStatus{table, occupied_by: None})
        .collect();

    for booking in ledger {
        let active = BookingStatus::parse(&booking.status)
            .map(|status| status.is_active())
            .unwrap_or(false);

        if !active || !policy.conflicts(booking.time, requested) {
            continue;
        }

        if let Some(slot) = tables.iter_mut().find(|t| t.table.table_id == booking.table_id) {
            slot.occupied_by = Some(booking.booking_id);
        }
    }

    tables
}

// First free table that can seat the party, in synthetic-id order. Drives
// booking placement.
pub fn first_free_table(
    inventory: &TableInventory,
    ledger: &[Booking],
    requested: NaiveTime,
    party_size: i32,
    policy: &AvailabilityPolicy
) -> Option<SyntheticTable>{
    resolve_tables(inventory, ledger, requested, policy)
        .into_iter()
        .filter(|status| status.is_free() && status.table.size >= party_size)
        .map(|status| status.table)
        .next()
}

pub fn has_free_table(
    inventory: &TableInventory,
    ledger: &[Booking],
    requested: NaiveTime,
    party_size: i32,
    policy: &AvailabilityPolicy
) -> bool{
    first_free_table(inventory, ledger, requested, party_size, policy).is_some()
}
